// ABOUTME: Entry point for the imgprobe CLI application.
// ABOUTME: Resolves profiles, opens the engine, runs the probes, and reports.

mod cli;

use clap::Parser;
use cli::Cli;
use imgprobe::config::{ProfileSet, Target};
use imgprobe::diagnostics::Diagnostics;
use imgprobe::error::{Error, Result};
use imgprobe::output::{Output, ReportFormat};
use imgprobe::probe::{self, RunConfig};
use imgprobe::runtime::BollardRuntime;
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise the verbose flag picks the level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(ReportFormat::from_flags(cli.json, cli.pretty));

    match run(cli, &output).await {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            output.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Returns the exit status for the finished batch.
async fn run(cli: Cli, output: &Output) -> Result<u8> {
    let target: Target = cli.target.parse()?;

    let cwd = env::current_dir().map_err(|source| imgprobe::error::ConfigError::Read {
        path: ".".into(),
        source,
    })?;
    let (set, source) = ProfileSet::resolve(cli.config.as_deref(), &cwd)?;
    tracing::debug!(%source, "profiles loaded");

    let profiles = set.select(&target, cli.name.as_deref())?;
    if target == Target::All && cli.name.is_some() {
        output.warning("--name is ignored when probing all profiles");
    }

    let config = RunConfig {
        target,
        custom_name: cli.name,
        output_dir: cli.path,
        command_override: cli.command,
        default_command: set.default_command().to_string(),
        clean: cli.clean,
    };

    let runtime = BollardRuntime::open(&set.engine)?;
    tracing::debug!(
        runtime = %runtime.runtime_type(),
        endpoint = %runtime.endpoint(),
        "engine selected"
    );

    let mut diag = Diagnostics::default();
    let outcomes = probe::execute(
        &runtime,
        runtime.endpoint(),
        &profiles,
        &config,
        output,
        &mut diag,
    )
    .await?;

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    output
        .report(&outcomes, config.target.is_single())
        .map_err(Error::Report)?;

    Ok(probe::exit_status(&outcomes))
}
