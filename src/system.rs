//! Host collaborators: tool discovery and the external commands the checks
//! interpret.
//!
//! Everything the pipeline learns about the host outside of the resolver
//! files goes through [`System`]. [`LocalSystem`] runs the real commands;
//! tests substitute canned output.

use std::fmt;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::util;

/// Executables the checks may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// BIND `dig`, the preferred query tool.
    Dig,
    /// ldns `drill`, the query tool of Unbound hosts.
    Drill,
    /// `host`, for the system resolver's view of the host name.
    Host,
    /// Reachability of each name server.
    Ping,
    /// iproute2 `ip`.
    Ip,
    /// `ifconfig`, on AIX and hosts without iproute2.
    Ifconfig,
    /// Only consulted to word the missing domain remediation.
    Netplan,
    /// AIX release level.
    Oslevel,
}

impl Tool {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dig => "dig",
            Self::Drill => "drill",
            Self::Host => "host",
            Self::Ping => "ping",
            Self::Ip => "ip",
            Self::Ifconfig => "ifconfig",
            Self::Netplan => "netplan",
            Self::Oslevel => "oslevel",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Command used for direct DNS queries against a single server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTool {
    /// `dig @server name TYPE`
    Dig,
    /// `drill @server name TYPE`
    Drill,
}

impl QueryTool {
    #[must_use]
    pub const fn tool(self) -> Tool {
        match self {
            Self::Dig => Tool::Dig,
            Self::Drill => Tool::Drill,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.tool().name()
    }
}

/// Source of the locally bound address listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceLister {
    /// `ip addr show`
    Ip,
    /// `ifconfig -a`
    Ifconfig,
}

impl InterfaceLister {
    #[must_use]
    pub const fn tool(self) -> Tool {
        match self {
            Self::Ip => Tool::Ip,
            Self::Ifconfig => Tool::Ifconfig,
        }
    }
}

/// DNS record types the checks query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    /// IPv4 address.
    A,
    /// Reverse pointer.
    Ptr,
}

impl RecordType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Ptr => "PTR",
        }
    }
}

/// Operations the pipeline needs from the host.
///
/// Command-backed methods return the raw text the command printed; parsing
/// is the caller's job. An `Err` means the command could not be run at all,
/// not that it reported a failure.
pub trait System {
    /// Kernel name as reported by `uname -s`.
    fn os_name(&self) -> io::Result<String>;

    /// Host name without its domain part.
    fn short_hostname(&self) -> io::Result<String>;

    /// Whether `tool` is installed as an executable.
    fn has_tool(&self, tool: Tool) -> bool;

    /// Queries `server` directly for `name`.
    fn query(&self, tool: QueryTool, server: &str, name: &str, kind: RecordType)
    -> io::Result<String>;

    /// Sends `count` echo requests to `target`.
    fn ping(&self, target: &str, count: u32) -> io::Result<String>;

    /// Resolves `name` the way the system resolver would.
    fn lookup_host(&self, name: &str) -> io::Result<String>;

    /// Lists addresses bound to every network interface.
    fn list_interfaces(&self, lister: InterfaceLister) -> io::Result<String>;

    /// AIX `oslevel` output, e.g. `7.2.0.0`.
    fn os_level(&self) -> io::Result<String>;

    /// Interface listing for the loopback device only.
    fn loopback_listing(&self) -> io::Result<String>;
}

/// [`System`] backed by the running host.
#[derive(Debug, Clone)]
pub struct LocalSystem {
    tool_dirs: Vec<PathBuf>,
}

impl LocalSystem {
    /// Creates a system that looks for executables in `tool_dirs`.
    #[must_use]
    pub fn new(tool_dirs: Vec<PathBuf>) -> Self {
        Self { tool_dirs }
    }

    fn locate(&self, tool: Tool) -> Option<PathBuf> {
        self.tool_dirs
            .iter()
            .map(|dir| dir.join(tool.name()))
            .find(|path| is_executable(path))
    }

    fn run(&self, tool: Tool, args: &[&str]) -> io::Result<String> {
        let program = self.locate(tool).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{tool} is not installed"))
        })?;

        tracing::debug!(command = %program.display(), ?args, "Running");
        let output = Command::new(&program).args(args).output()?;

        // ping, host and dig all exit non-zero on the conditions we want to
        // inspect, so the status is only logged.
        if !output.status.success() {
            tracing::debug!(
                command = %program.display(),
                status = %output.status,
                "Command exited unsuccessfully"
            );
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}

impl System for LocalSystem {
    fn os_name(&self) -> io::Result<String> {
        util::os_name()
    }

    fn short_hostname(&self) -> io::Result<String> {
        util::short_hostname()
    }

    fn has_tool(&self, tool: Tool) -> bool {
        self.locate(tool).is_some()
    }

    fn query(
        &self,
        tool: QueryTool,
        server: &str,
        name: &str,
        kind: RecordType,
    ) -> io::Result<String> {
        let at = format!("@{server}");
        self.run(tool.tool(), &[at.as_str(), name, kind.as_str()])
    }

    fn ping(&self, target: &str, count: u32) -> io::Result<String> {
        let count = count.to_string();
        self.run(Tool::Ping, &["-c", count.as_str(), target])
    }

    fn lookup_host(&self, name: &str) -> io::Result<String> {
        self.run(Tool::Host, &[name])
    }

    fn list_interfaces(&self, lister: InterfaceLister) -> io::Result<String> {
        match lister {
            InterfaceLister::Ip => self.run(Tool::Ip, &["addr", "show"]),
            InterfaceLister::Ifconfig => self.run(Tool::Ifconfig, &["-a"]),
        }
    }

    fn os_level(&self) -> io::Result<String> {
        self.run(Tool::Oslevel, &[])
    }

    fn loopback_listing(&self) -> io::Result<String> {
        self.run(Tool::Ifconfig, &["lo0"])
    }
}

fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}
