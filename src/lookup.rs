//! Forward and reverse record checks against each configured name server.

use std::net::Ipv4Addr;

use crate::error::{CheckError, Result};
use crate::interfaces;
use crate::resolver::Toolchain;
use crate::system::{RecordType, System};

/// Public resolvers that cannot answer for private names.
pub const PUBLIC_RESOLVERS: [&str; 10] = [
    // Google
    "8.8.8.8",
    "8.8.4.4",
    // Cloudflare
    "1.1.1.1",
    "1.0.0.1",
    // Quad9
    "9.9.9.9",
    "149.112.112.112",
    // OpenDNS
    "208.67.222.222",
    "208.67.220.220",
    "208.67.222.220",
    "208.67.220.222",
];

/// Name every host is expected to resolve for itself.
pub const LOCALHOST: &str = "localhost";

/// Exact, case-sensitive membership in [`PUBLIC_RESOLVERS`].
#[must_use]
pub fn is_public_resolver(server: &str) -> bool {
    PUBLIC_RESOLVERS.contains(&server)
}

/// `1.2.3.4` becomes `4.3.2.1.in-addr.arpa`.
#[must_use]
pub fn reverse_name(addr: Ipv4Addr) -> String {
    let [a, b, c, d] = addr.octets();
    format!("{d}.{c}.{b}.{a}.in-addr.arpa")
}

/// Answer lines of a `dig`/`drill` response; `;` comment lines dropped.
#[derive(Debug, Clone)]
pub struct Response {
    lines: Vec<String>,
}

impl Response {
    #[must_use]
    pub fn parse(output: &str) -> Self {
        let lines = output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(';'))
            .map(str::to_lowercase)
            .collect();
        Self { lines }
    }

    /// Lines mentioning `name`, case-insensitively.
    pub fn matching<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        let name = name.to_lowercase();
        self.lines
            .iter()
            .map(String::as_str)
            .filter(move |line| line.contains(&name))
    }

    #[must_use]
    pub fn mentions(&self, name: &str) -> bool {
        self.matching(name).next().is_some()
    }
}

/// Forward and reverse checks over the non-public servers of a run.
pub struct RecordChecker<'a> {
    system: &'a dyn System,
    toolchain: &'a Toolchain,
    nameservers: &'a [String],
}

impl<'a> RecordChecker<'a> {
    #[must_use]
    pub fn new(system: &'a dyn System, toolchain: &'a Toolchain, nameservers: &'a [String]) -> Self {
        Self {
            system,
            toolchain,
            nameservers,
        }
    }

    fn private_servers(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.nameservers.iter().map(String::as_str).filter(|server| {
            let public = is_public_resolver(server);
            if public {
                tracing::debug!(server = %server, "Skipping public resolver");
            }
            !public
        })
    }

    fn query(&self, server: &str, name: &str, kind: RecordType) -> Result<Response> {
        let tool = self.toolchain.query;
        let output = self
            .system
            .query(tool, server, name, kind)
            .map_err(|source| CheckError::ToolFailed {
                tool: tool.name(),
                source,
            })?;
        Ok(Response::parse(&output))
    }

    /// Requires an A record for `name` on every non-public server.
    ///
    /// # Errors
    ///
    /// [`CheckError::MissingARecord`] naming the first server without one.
    pub fn forward(&self, name: &str) -> Result<()> {
        for server in self.private_servers() {
            let response = self.query(server, name, RecordType::A)?;
            if !response.mentions(name) {
                tracing::warn!(server = %server, name = %name, "A record missing");
                return Err(CheckError::MissingARecord {
                    name: name.to_string(),
                    tool: self.toolchain.query.name(),
                    server: server.to_string(),
                });
            }
            tracing::debug!(server = %server, name = %name, "A record found");
        }
        Ok(())
    }

    /// Requires a PTR record for `addr` on every non-public server, pointing
    /// at `expected` when given, and `addr` bound to a local interface.
    ///
    /// # Errors
    ///
    /// [`CheckError::MissingPtrRecord`], [`CheckError::WrongPtrTarget`] or
    /// [`CheckError::NotBound`], in that order of precedence per server.
    pub fn reverse(&self, addr: Ipv4Addr, expected: Option<&'static str>) -> Result<()> {
        let reverse = reverse_name(addr);
        for server in self.private_servers() {
            let response = self.query(server, &reverse, RecordType::Ptr)?;

            if !response.mentions(&reverse) {
                tracing::warn!(server = %server, reverse = %reverse, "PTR record missing");
                return Err(CheckError::MissingPtrRecord {
                    reverse,
                    tool: self.toolchain.query.name(),
                    server: server.to_string(),
                });
            }

            if let Some(expected) = expected {
                if !response.matching(&reverse).any(|line| line.contains(expected)) {
                    tracing::warn!(server = %server, reverse = %reverse, "PTR points at wrong host");
                    return Err(CheckError::WrongPtrTarget {
                        reverse,
                        server: server.to_string(),
                        expected,
                        addr,
                    });
                }
            }

            if !interfaces::is_bound(self.system, &self.toolchain.listers, addr)? {
                tracing::warn!(%addr, "Address not bound to any interface");
                return Err(CheckError::NotBound { addr });
            }
            tracing::debug!(server = %server, reverse = %reverse, "PTR record verified");
        }
        Ok(())
    }

    /// Reverse check for the host's own address, which may be unknown.
    ///
    /// # Errors
    ///
    /// As [`RecordChecker::reverse`], plus [`CheckError::UnknownHostAddress`]
    /// when a non-public server must be asked about an address the host
    /// lookup did not produce.
    pub fn reverse_host(&self, fqdn: &str, addr: Option<Ipv4Addr>) -> Result<()> {
        match addr {
            Some(addr) => self.reverse(addr, None),
            None if self.private_servers().next().is_none() => Ok(()),
            None => Err(CheckError::UnknownHostAddress {
                fqdn: fqdn.to_string(),
            }),
        }
    }
}
