//! Error types.
//!
//! Every check fails with a [`CheckError`]. The variant decides the
//! monitoring [`Severity`] and the message is the single line an operator
//! sees, so each one names the offending server, record or file.

use std::fmt;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for pipeline steps.
pub type Result<T> = std::result::Result<T, CheckError>;

/// Monitoring status, ordered by exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Every check passed.
    Ok,
    /// The DNS or network configuration is deficient.
    Warn,
    /// Reserved by the monitoring protocol; no check produces it.
    Critical,
    /// The environment prevented the check from evaluating DNS at all.
    Unknown,
}

impl Severity {
    /// Process exit code understood by the monitoring framework.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Warn => 1,
            Self::Critical => 2,
            Self::Unknown => 3,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warn => "WARN",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failures that terminate a run.
#[derive(Debug, Error)]
pub enum CheckError {
    // -- environment / tooling: Unknown ------------------------------------
    /// `uname` reported an OS other than Linux or AIX.
    #[error("Unsupported operating system {0}, this check only runs on Linux and AIX.")]
    UnsupportedPlatform(String),

    /// A required executable is not installed.
    #[error("Required executable {tool} not found in {searched}.")]
    MissingTool {
        /// Name of the executable, or the alternatives accepted.
        tool: &'static str,
        /// Colon-separated directories that were searched.
        searched: String,
    },

    /// `gethostname` failed.
    #[error("Could not determine the local hostname: {0}")]
    Hostname(std::io::Error),

    /// The resolver configuration file is missing or unreadable.
    #[error("Could not read {}: {source}", .path.display())]
    ConfigUnreadable {
        /// The file that was read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An external command could not be started.
    #[error("Failed to run {tool}: {source}")]
    ToolFailed {
        /// Name of the command.
        tool: &'static str,
        /// The spawn error.
        #[source]
        source: std::io::Error,
    },

    // -- DNS configuration: Warn --------------------------------------------
    /// Neither `domain` nor `search` is configured; carries the remediation.
    #[error("{0}")]
    MissingDomain(String),

    /// Fewer name servers than the configured minimum.
    #[error(
        "Only {count} nameserver entries found in {}, it should contain at least {min}.",
        .path.display()
    )]
    TooFewNameservers {
        /// Entries found, duplicates included.
        count: usize,
        /// Required minimum.
        min: usize,
        /// File the entries were read from.
        path: PathBuf,
    },

    /// More name servers than the configured maximum.
    #[error(
        "Found {count} nameserver entries in {}, it should contain no more than {max}.",
        .path.display()
    )]
    TooManyNameservers {
        /// Entries found, duplicates included.
        count: usize,
        /// Allowed maximum.
        max: usize,
        /// File the entries were read from.
        path: PathBuf,
    },

    /// Ping lost every packet, or printed no statistics at all.
    #[error("Nameserver {server} is not reachable, ping reported {detail}.")]
    Unreachable {
        /// The name server that was pinged.
        server: String,
        /// `100% packet loss`, or ping's own complaint.
        detail: String,
    },

    /// The host name resolves to a placeholder from `/etc/hosts`.
    #[error(
        "Hostname {fqdn} resolves to {addr}, check /etc/hosts and make sure the host name maps to its real IP address."
    )]
    BogusAddress {
        /// The name that was looked up.
        fqdn: String,
        /// `0.0.0.0` or `127.0.1.1`.
        addr: Ipv4Addr,
    },

    /// A name server has no A record for the queried name.
    #[error(
        "Could not find an A record for {name} using the {tool} command against the {server} DNS server."
    )]
    MissingARecord {
        /// The queried name.
        name: String,
        /// `dig` or `drill`.
        tool: &'static str,
        /// The server that was asked.
        server: String,
    },

    /// The host lookup produced no address, so its PTR cannot be checked.
    #[error("Could not determine the IP address of {fqdn}, unable to check its PTR record.")]
    UnknownHostAddress {
        /// The host's fully qualified name.
        fqdn: String,
    },

    /// A name server has no PTR record for the reverse name.
    #[error(
        "Could not find a PTR record for {reverse} using the {tool} command against the {server} DNS server."
    )]
    MissingPtrRecord {
        /// The `in-addr.arpa` name queried.
        reverse: String,
        /// `dig` or `drill`.
        tool: &'static str,
        /// The server that was asked.
        server: String,
    },

    /// The PTR record exists but names a different host.
    #[error(
        "The PTR record for {reverse} on the {server} DNS server does not point at {expected}, fix the reverse zone for {addr}."
    )]
    WrongPtrTarget {
        /// The `in-addr.arpa` name queried.
        reverse: String,
        /// The server that was asked.
        server: String,
        /// The name the record should point at.
        expected: &'static str,
        /// The address being reverse-resolved.
        addr: Ipv4Addr,
    },

    /// The address has a PTR record but no local interface carries it.
    #[error("The IP address {addr} has a PTR record but is not bound to any network interface.")]
    NotBound {
        /// The address that was looked for.
        addr: Ipv4Addr,
    },

    /// AIX `/etc/netsvc.conf` is missing, unreadable or orders DNS first.
    #[error("{0}")]
    NetsvcConf(String),

    /// AIX 7+ loopback without `::1`.
    #[error(
        "The loopback interface lo0 has no ::1 IPv6 address, add it with: chdev -l lo0 -a netaddr6=::1"
    )]
    MissingLoopbackV6,
}

/// Invalid name server thresholds.
///
/// These are usage errors: the process exits with status 1 before any check
/// runs, outside the monitoring status codes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("minimum nameserver count must be between 1 and 3, got {0}")]
    MinOutOfRange(i64),

    #[error("maximum nameserver count must be between 1 and 3, got {0}")]
    MaxOutOfRange(i64),

    #[error("minimum nameserver count ({min}) cannot exceed the maximum ({max})")]
    MinAboveMax { min: i64, max: i64 },
}

impl CheckError {
    /// Status this failure reports to the monitoring framework.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::UnsupportedPlatform(_)
            | Self::MissingTool { .. }
            | Self::Hostname(_)
            | Self::ConfigUnreadable { .. }
            | Self::ToolFailed { .. } => Severity::Unknown,
            _ => Severity::Warn,
        }
    }
}
