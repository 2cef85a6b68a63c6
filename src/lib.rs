//! # check-dns
//!
//! Monitoring check for a host's DNS setup, speaking the Nagios plugin
//! protocol: one status line on stdout and an exit code of 0 (OK), 1 (WARN)
//! or 3 (UNKNOWN).
//!
//! The check runs a fixed sequence of gates and stops at the first failure:
//!
//! 1. Detect the resolver subsystem (classic `resolv.conf`,
//!    systemd-resolved or Unbound) and read its name servers and domain.
//! 2. Require between `min` and `max` name servers.
//! 3. Ping every name server; total loss fails.
//! 4. Resolve the host's own FQDN and reject `/etc/hosts` placeholders.
//! 5. Query every non-public name server for A records of the FQDN and
//!    `localhost`.
//! 6. Query PTR records for the host address and `127.0.0.1` and require
//!    those addresses to be bound locally.
//! 7. On AIX, verify `/etc/netsvc.conf` ordering and the `::1` loopback.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use check_dns::{Checker, LocalSystem, Paths, RunParameters};
//!
//! let paths = Paths::new();
//! let system = LocalSystem::new(paths.tool_dirs.clone());
//! let outcome = Checker::new(&system, paths, RunParameters::new(2, 3)?).run();
//! println!("{}", outcome.line);
//! ```
//!
//! ## Testing
//!
//! Every command the check runs goes through the [`System`] trait and every
//! file it reads is located through [`Paths`], so the whole pipeline can be
//! driven from canned output and a tempdir.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod identity;
pub mod interfaces;
pub mod lookup;
pub mod pipeline;
pub mod platform;
pub mod probe;
pub mod report;
pub mod resolver;
pub mod system;
pub mod util;

pub use config::{Paths, RunParameters};
pub use error::{CheckError, ParamError, Result, Severity};
pub use pipeline::Checker;
pub use report::{Outcome, Report};
pub use resolver::ResolverMode;
pub use system::{InterfaceLister, LocalSystem, QueryTool, RecordType, System, Tool};
