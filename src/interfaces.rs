//! Locally bound addresses, parsed from `ip addr` or `ifconfig` output.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::{CheckError, Result};
use crate::system::{InterfaceLister, System};

/// IPv4 addresses in an interface listing.
///
/// Handles `inet 10.0.0.5/24` (iproute2), `inet addr:10.0.0.5` (net-tools)
/// and `inet 10.0.0.5 netmask ...` (BSD/AIX).
#[must_use]
pub fn ipv4_addresses(listing: &str) -> Vec<Ipv4Addr> {
    values_after(listing, "inet")
        .filter_map(|token| {
            let token = token.strip_prefix("addr:").unwrap_or(token);
            strip_prefix_len(token).parse().ok()
        })
        .collect()
}

/// IPv6 addresses in an interface listing, with zone and prefix removed.
#[must_use]
pub fn ipv6_addresses(listing: &str) -> Vec<Ipv6Addr> {
    values_after(listing, "inet6")
        .filter_map(|token| {
            let token = strip_prefix_len(token);
            token.split('%').next().unwrap_or(token).parse().ok()
        })
        .collect()
}

fn values_after<'a>(listing: &'a str, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    listing.lines().filter_map(move |line| {
        let mut words = line.split_whitespace();
        words.by_ref().find(|word| *word == key)?;
        words.next()
    })
}

fn strip_prefix_len(token: &str) -> &str {
    token.split('/').next().unwrap_or(token)
}

/// Whether `addr` appears in the listing of any of `listers`.
///
/// # Errors
///
/// [`CheckError::ToolFailed`] if a lister cannot be run.
pub fn is_bound(system: &dyn System, listers: &[InterfaceLister], addr: Ipv4Addr) -> Result<bool> {
    for &lister in listers {
        let listing = system
            .list_interfaces(lister)
            .map_err(|source| CheckError::ToolFailed {
                tool: lister.tool().name(),
                source,
            })?;
        if ipv4_addresses(&listing).contains(&addr) {
            tracing::debug!(%addr, ?lister, "Address is bound locally");
            return Ok(true);
        }
    }
    Ok(false)
}
