use std::process::ExitCode;

use check_dns::{Checker, LocalSystem, Paths, RunParameters};
use clap::Parser;
use clap::error::ErrorKind;

/// Check the host's DNS resolver configuration, name servers and records.
#[derive(Parser, Debug)]
#[command(name = "check_dns", version, about, long_about = None)]
struct Cli {
    /// Minimum number of configured name servers (1-3, default 2)
    #[arg(allow_negative_numbers = true)]
    min: Option<i64>,

    /// Maximum number of configured name servers (1-3, default 3)
    #[arg(allow_negative_numbers = true)]
    max: Option<i64>,
}

fn main() -> ExitCode {
    // Usage errors exit 1, outside the monitoring status codes.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprint!("{e}");
            return ExitCode::from(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let params = match RunParameters::from_args(cli.min, cli.max) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("check_dns: {e}");
            return ExitCode::from(1);
        }
    };

    let paths = Paths::new();
    let system = LocalSystem::new(paths.tool_dirs.clone());
    let outcome = Checker::new(&system, paths, params).run();

    println!("{}", outcome.line);
    // Exit codes are 0..=3.
    ExitCode::from(u8::try_from(outcome.exit_code()).unwrap_or(3))
}
