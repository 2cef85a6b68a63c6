//! Operating system detection and AIX-only invariants.

use std::fmt;
use std::net::Ipv6Addr;
use std::path::Path;

use crate::error::{CheckError, Result};
use crate::interfaces;
use crate::system::System;

/// Operating systems the check knows how to interrogate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Aix,
}

impl Platform {
    /// Maps a `uname -s` value.
    ///
    /// # Errors
    ///
    /// [`CheckError::UnsupportedPlatform`] for anything but Linux and AIX.
    pub fn from_os_name(name: &str) -> Result<Self> {
        match name.trim() {
            "Linux" => Ok(Self::Linux),
            "AIX" => Ok(Self::Aix),
            other => Err(CheckError::UnsupportedPlatform(other.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Linux => "Linux",
            Self::Aix => "AIX",
        })
    }
}

/// `hosts=` orderings that consult `/etc/hosts` before DNS.
const LOCAL_FIRST_ORDERS: [&str; 4] = [
    "hosts=local,bind",
    "hosts=local4,bind4",
    "hosts=local,bind4",
    "hosts=local4,bind",
];

/// First AIX release whose loopback is expected to carry `::1`.
const LOOPBACK_V6_MIN_MAJOR: u32 = 7;

/// Runs the checks that only apply to `platform`; a no-op on Linux.
///
/// # Errors
///
/// [`CheckError::NetsvcConf`] or [`CheckError::MissingLoopbackV6`].
pub fn validate(system: &dyn System, platform: Platform, netsvc_conf: &Path) -> Result<()> {
    match platform {
        Platform::Linux => Ok(()),
        Platform::Aix => {
            check_netsvc(netsvc_conf)?;
            check_loopback_v6(system)
        }
    }
}

fn check_netsvc(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CheckError::NetsvcConf(format!(
            "{} does not exist, create it with the line 'hosts = local, bind' so /etc/hosts is consulted before DNS.",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        CheckError::NetsvcConf(format!(
            "{} is not readable ({e}), fix its permissions with 'chmod 644 {}'.",
            path.display(),
            path.display()
        ))
    })?;

    if !has_local_first_order(&content) {
        return Err(CheckError::NetsvcConf(format!(
            "{} does not resolve hosts locally first, set 'hosts = local, bind' in it.",
            path.display()
        )));
    }

    tracing::debug!(path = %path.display(), "netsvc.conf resolves locally first");
    Ok(())
}

/// Whether any active line of a `netsvc.conf` matches an accepted ordering.
#[must_use]
pub fn has_local_first_order(content: &str) -> bool {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .map(|line| {
            line.chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_lowercase()
        })
        .any(|line| LOCAL_FIRST_ORDERS.contains(&line.as_str()))
}

fn check_loopback_v6(system: &dyn System) -> Result<()> {
    let level = system
        .os_level()
        .map_err(|source| CheckError::ToolFailed {
            tool: "oslevel",
            source,
        })?;

    let Some(major) = major_version(&level) else {
        tracing::debug!(level = %level.trim(), "Unrecognised oslevel output, skipping IPv6 loopback check");
        return Ok(());
    };
    if major < LOOPBACK_V6_MIN_MAJOR {
        return Ok(());
    }

    let listing = system
        .loopback_listing()
        .map_err(|source| CheckError::ToolFailed {
            tool: "ifconfig",
            source,
        })?;
    if interfaces::ipv6_addresses(&listing).contains(&Ipv6Addr::LOCALHOST) {
        Ok(())
    } else {
        Err(CheckError::MissingLoopbackV6)
    }
}

/// Leading number of an `oslevel` string such as `7.2.0.0`.
#[must_use]
pub fn major_version(level: &str) -> Option<u32> {
    level.trim().split('.').next()?.parse().ok()
}
