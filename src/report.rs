//! Monitoring output: one status line and an exit code.

use std::fmt;
use std::net::Ipv4Addr;

use crate::error::{CheckError, Severity};
use crate::resolver::ResolverMode;

/// Name prefixed to every output line.
pub const CHECK_NAME: &str = "DNS";

/// Diagnostic fields of a fully passing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub fqdn: String,
    pub address: Option<Ipv4Addr>,
    pub localhost: Ipv4Addr,
    pub mode: ResolverMode,
    pub nameservers: Vec<String>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CHECK_NAME} OK hostname={} ipaddr=", self.fqdn)?;
        match self.address {
            Some(addr) => write!(f, "{addr}")?,
            None => f.write_str("unknown")?,
        }
        write!(
            f,
            " localhost={} resolver={} nameservers={} | nameserver_count={};;;;",
            self.localhost,
            self.mode,
            self.nameservers.join(" "),
            self.nameservers.len()
        )
    }
}

/// Final status of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub severity: Severity,
    pub line: String,
}

impl Outcome {
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.severity.exit_code()
    }
}

impl From<Result<Report, CheckError>> for Outcome {
    fn from(result: Result<Report, CheckError>) -> Self {
        match result {
            Ok(report) => Self {
                severity: Severity::Ok,
                line: report.to_string(),
            },
            Err(err) => {
                let severity = err.severity();
                let line = match severity {
                    Severity::Warn => format!("{CHECK_NAME} {severity} - {err}"),
                    _ => format!("{CHECK_NAME} {severity} {err}"),
                };
                Self { severity, line }
            }
        }
    }
}
