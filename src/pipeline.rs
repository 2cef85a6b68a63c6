//! The ordered check pipeline.
//!
//! Steps run strictly in order and the first failure ends the run. Later
//! steps read the [`Context`] produced by configuration discovery plus the
//! host identity; nothing is retried.

use std::net::Ipv4Addr;

use crate::config::{Paths, RunParameters};
use crate::error::{CheckError, Result};
use crate::identity::HostIdentity;
use crate::lookup::{LOCALHOST, RecordChecker};
use crate::platform::{self, Platform};
use crate::probe;
use crate::report::{Outcome, Report};
use crate::resolver::{self, ResolverSettings, Toolchain};
use crate::system::System;

/// What the configuration step learned about the host, read by every later
/// step.
#[derive(Debug, Clone)]
pub struct Context {
    pub platform: Platform,
    pub toolchain: Toolchain,
    pub resolver: ResolverSettings,
}

/// Runs the DNS health check against a [`System`].
///
/// # Example
///
/// ```rust,ignore
/// use check_dns::{Checker, LocalSystem, Paths, RunParameters};
///
/// let paths = Paths::new();
/// let system = LocalSystem::new(paths.tool_dirs.clone());
/// let outcome = Checker::new(&system, paths, RunParameters::default()).run();
/// println!("{}", outcome.line);
/// std::process::exit(outcome.exit_code());
/// ```
pub struct Checker<'a> {
    system: &'a dyn System,
    paths: Paths,
    params: RunParameters,
}

impl<'a> Checker<'a> {
    #[must_use]
    pub fn new(system: &'a dyn System, paths: Paths, params: RunParameters) -> Self {
        Self {
            system,
            paths,
            params,
        }
    }

    /// Runs every step and converts the result into monitoring output.
    #[must_use]
    pub fn run(&self) -> Outcome {
        let result = self.check();
        match &result {
            Ok(_) => tracing::info!("All DNS checks passed"),
            Err(err) => tracing::info!(severity = %err.severity(), error = %err, "DNS check failed"),
        }
        Outcome::from(result)
    }

    /// Runs every step, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// The [`CheckError`] of the first failing step.
    pub fn check(&self) -> Result<Report> {
        let ctx = self.discover()?;
        let nameservers = &ctx.resolver.nameservers;

        tracing::debug!("Counting nameservers");
        probe::census(nameservers, &self.params, &ctx.resolver.source)?;

        tracing::debug!("Probing nameserver reachability");
        probe::reachability(self.system, nameservers)?;

        let short_name = self.system.short_hostname().map_err(CheckError::Hostname)?;
        let host = HostIdentity::resolve(self.system, &short_name, &ctx.resolver.domain)?;

        let records = RecordChecker::new(self.system, &ctx.toolchain, nameservers);

        tracing::debug!(fqdn = %host.fqdn, "Checking forward records");
        records.forward(&host.fqdn)?;
        records.forward(LOCALHOST)?;

        tracing::debug!(address = ?host.address, "Checking reverse records");
        records.reverse_host(&host.fqdn, host.address)?;
        records.reverse(Ipv4Addr::LOCALHOST, Some(LOCALHOST))?;

        tracing::debug!(platform = %ctx.platform, "Checking platform specifics");
        platform::validate(self.system, ctx.platform, &self.paths.netsvc_conf)?;

        Ok(Report {
            fqdn: host.fqdn,
            address: host.address,
            localhost: Ipv4Addr::LOCALHOST,
            mode: ctx.resolver.mode,
            nameservers: ctx.resolver.nameservers,
        })
    }

    /// Platform, tools and resolver configuration.
    fn discover(&self) -> Result<Context> {
        let os_name = self
            .system
            .os_name()
            .map_err(|source| CheckError::ToolFailed {
                tool: "uname",
                source,
            })?;
        let platform = Platform::from_os_name(&os_name)?;
        let mode = resolver::detect_mode(self.system, &self.paths);
        let toolchain = Toolchain::resolve(self.system, &self.paths, mode)?;
        let resolver = resolver::load(self.system, &self.paths, mode)?;

        Ok(Context {
            platform,
            toolchain,
            resolver,
        })
    }
}
