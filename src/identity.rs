//! Local host identity.

use std::net::Ipv4Addr;

use crate::error::{CheckError, Result};
use crate::system::System;

/// Addresses a broken `/etc/hosts` typically maps the host name to.
pub const BOGUS_ADDRESSES: [Ipv4Addr; 2] = [Ipv4Addr::UNSPECIFIED, Ipv4Addr::new(127, 0, 1, 1)];

/// The host's name and the address its name resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    /// `<short name>.<domain>`.
    pub fqdn: String,
    /// `None` when the lookup found nothing.
    pub address: Option<Ipv4Addr>,
}

impl HostIdentity {
    /// Resolves `<short_name>.<domain>` with the host lookup tool.
    ///
    /// An unresolvable name is not an error here; the forward lookup check
    /// reports it against a specific server.
    ///
    /// # Errors
    ///
    /// [`CheckError::BogusAddress`] for `0.0.0.0` and `127.0.1.1`, or
    /// [`CheckError::ToolFailed`] if the lookup cannot be run.
    pub fn resolve(system: &dyn System, short_name: &str, domain: &str) -> Result<Self> {
        let fqdn = format!("{short_name}.{domain}");
        let output = system
            .lookup_host(&fqdn)
            .map_err(|source| CheckError::ToolFailed {
                tool: "host",
                source,
            })?;

        let address = parse_lookup(&output);
        tracing::debug!(fqdn = %fqdn, ?address, "Resolved local hostname");

        if let Some(addr) = address.filter(|addr| BOGUS_ADDRESSES.contains(addr)) {
            return Err(CheckError::BogusAddress { fqdn, addr });
        }

        Ok(Self { fqdn, address })
    }
}

/// Extracts the IPv4 address from `host` output.
///
/// Understands `name has address 10.0.0.5` and the AIX form
/// `name is 10.0.0.5, Aliases: ...`.
#[must_use]
pub fn parse_lookup(output: &str) -> Option<Ipv4Addr> {
    for line in output.lines() {
        if line.contains("not found") || line.contains("does not exist") {
            return None;
        }

        let rest = line
            .split_once(" has address ")
            .or_else(|| line.split_once(" is "))
            .map(|(_, rest)| rest);
        let token = rest.and_then(|rest| rest.split_whitespace().next());
        if let Some(addr) = token.and_then(|t| t.trim_end_matches(',').parse().ok()) {
            return Some(addr);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_linux_host_output() {
        let out = "host.example.com has address 192.168.1.10\nhost.example.com mail is handled by 10 mx.example.com.\n";
        assert_eq!(parse_lookup(out), Some(Ipv4Addr::new(192, 168, 1, 10)));
    }

    #[test]
    fn parses_aix_host_output() {
        let out = "host.example.com is 10.20.30.40,  Aliases:   host\n";
        assert_eq!(parse_lookup(out), Some(Ipv4Addr::new(10, 20, 30, 40)));
    }

    #[test]
    fn not_found_is_none() {
        assert_eq!(
            parse_lookup("Host host.example.com not found: 3(NXDOMAIN)\n"),
            None
        );
        assert_eq!(parse_lookup("host: host.example.com does not exist\n"), None);
        assert_eq!(parse_lookup(""), None);
    }

    #[test]
    fn ipv6_only_answer_is_none() {
        let out = "host.example.com has IPv6 address 2001:db8::1\n";
        assert_eq!(parse_lookup(out), None);
    }
}
