//! Resolver configuration discovery.
//!
//! Works out which name resolution subsystem owns the host, which tools are
//! available to interrogate it, and reads the upstream name servers and
//! default domain from the file that subsystem generates.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Paths;
use crate::error::{CheckError, Result};
use crate::system::{InterfaceLister, QueryTool, System, Tool};

/// Name resolution subsystem in charge of `/etc/resolv.conf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverMode {
    /// Classic `/etc/resolv.conf` pointing straight at upstream servers.
    BindOrLegacy,
    /// systemd-resolved stub on 127.0.0.53; upstreams live in its own file.
    SystemdStubResolver,
    /// Unbound toolchain, queried with `drill`.
    UnboundAlternate,
}

impl ResolverMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BindOrLegacy => "bind",
            Self::SystemdStubResolver => "systemd-resolved",
            Self::UnboundAlternate => "unbound",
        }
    }
}

impl fmt::Display for ResolverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tools chosen once at startup and used by every later check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub query: QueryTool,
    /// Every available lister; an address counts as bound if any shows it.
    pub listers: Vec<InterfaceLister>,
}

impl Toolchain {
    /// Probes `system` for the required executables.
    ///
    /// Unbound hosts are always queried with `drill`; every other mode
    /// prefers `dig` and falls back to `drill`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::MissingTool`] if `ping`, `host`, the query tool
    /// for `mode` or an interface lister (`ip` or `ifconfig`) is absent.
    pub fn resolve(system: &dyn System, paths: &Paths, mode: ResolverMode) -> Result<Self> {
        let missing = |tool: &'static str| CheckError::MissingTool {
            tool,
            searched: search_path(paths),
        };

        for required in [Tool::Ping, Tool::Host] {
            if !system.has_tool(required) {
                return Err(missing(required.name()));
            }
        }

        let query = match mode {
            ResolverMode::UnboundAlternate if system.has_tool(Tool::Drill) => QueryTool::Drill,
            ResolverMode::UnboundAlternate => return Err(missing("drill")),
            _ if system.has_tool(Tool::Dig) => QueryTool::Dig,
            _ if system.has_tool(Tool::Drill) => QueryTool::Drill,
            _ => return Err(missing("dig or drill")),
        };

        let listers: Vec<_> = [InterfaceLister::Ip, InterfaceLister::Ifconfig]
            .into_iter()
            .filter(|lister| system.has_tool(lister.tool()))
            .collect();
        if listers.is_empty() {
            return Err(missing("ip or ifconfig"));
        }

        tracing::debug!(mode = %mode, query = query.name(), ?listers, "Resolved toolchain");
        Ok(Self { query, listers })
    }
}

fn search_path(paths: &Paths) -> String {
    paths
        .tool_dirs
        .iter()
        .map(|dir| dir.display().to_string())
        .collect::<Vec<_>>()
        .join(":")
}

/// Picks the active subsystem.
///
/// The systemd stub marker wins; otherwise the presence of `drill` selects
/// Unbound; otherwise the classic resolver is assumed.
#[must_use]
pub fn detect_mode(system: &dyn System, paths: &Paths) -> ResolverMode {
    if paths.stub_marker.exists() {
        ResolverMode::SystemdStubResolver
    } else if system.has_tool(Tool::Drill) {
        ResolverMode::UnboundAlternate
    } else {
        ResolverMode::BindOrLegacy
    }
}

/// Directives of interest from a `resolv.conf`-format file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvConf {
    /// In file order, duplicates kept.
    pub nameservers: Vec<String>,
    pub domain: Option<String>,
    /// First entry of the last `search` line.
    pub search: Option<String>,
}

impl ResolvConf {
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut conf = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let mut words = line.split_whitespace();
            let (Some(key), Some(value)) = (words.next(), words.next()) else {
                continue;
            };
            match key {
                "nameserver" => conf.nameservers.push(value.to_string()),
                "domain" => conf.domain = Some(value.to_string()),
                "search" => conf.search = Some(value.to_string()),
                _ => {}
            }
        }
        conf
    }

    /// `domain` if set, else the first `search` entry.
    #[must_use]
    pub fn domain_suffix(&self) -> Option<&str> {
        self.domain.as_deref().or(self.search.as_deref())
    }
}

/// Outcome of the configuration step.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub mode: ResolverMode,
    /// File the name servers were read from.
    pub source: PathBuf,
    pub nameservers: Vec<String>,
    pub domain: String,
}

/// Reads the effective resolver configuration for `mode`.
///
/// # Errors
///
/// Returns [`CheckError::ConfigUnreadable`] if the configuration file is
/// missing or unreadable, or [`CheckError::MissingDomain`] if it has neither
/// a `domain` nor a `search` directive.
pub fn load(system: &dyn System, paths: &Paths, mode: ResolverMode) -> Result<ResolverSettings> {
    let source = match mode {
        ResolverMode::SystemdStubResolver => &paths.systemd_resolv_conf,
        ResolverMode::BindOrLegacy | ResolverMode::UnboundAlternate => &paths.resolv_conf,
    };
    let conf = read_conf(source)?;

    let Some(domain) = conf.domain_suffix().map(str::to_string) else {
        return Err(CheckError::MissingDomain(missing_domain_message(
            system, mode, source,
        )));
    };

    tracing::info!(
        mode = %mode,
        source = %source.display(),
        nameservers = ?conf.nameservers,
        domain = %domain,
        "Loaded resolver configuration"
    );
    Ok(ResolverSettings {
        mode,
        source: source.clone(),
        nameservers: conf.nameservers,
        domain,
    })
}

fn read_conf(path: &Path) -> Result<ResolvConf> {
    std::fs::read_to_string(path)
        .map(|content| ResolvConf::parse(&content))
        .map_err(|source| CheckError::ConfigUnreadable {
            path: path.to_path_buf(),
            source,
        })
}

fn missing_domain_message(system: &dyn System, mode: ResolverMode, source: &Path) -> String {
    match mode {
        ResolverMode::SystemdStubResolver if system.has_tool(Tool::Netplan) => format!(
            "No domain or search entry found in {}, add a search domain under nameservers in /etc/netplan/*.yaml and run 'netplan apply'.",
            source.display()
        ),
        ResolverMode::SystemdStubResolver => format!(
            "No domain or search entry found in {}, set Domains= in /etc/systemd/resolved.conf and restart systemd-resolved.",
            source.display()
        ),
        ResolverMode::BindOrLegacy | ResolverMode::UnboundAlternate => format!(
            "No domain or search entry found in {}, add a 'domain' or 'search' line.",
            source.display()
        ),
    }
}
