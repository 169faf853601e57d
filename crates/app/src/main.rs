//! divcheck - Main Entry Point
//!
//! Runs the divide checks (or the cases of a case file) one after another,
//! logging to the console and to `test_results.log`.
//!
//! Exit status: 0 when every case passed, 1 when any case failed, 2 when
//! the run could not be set up.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use divcheck_application::config::{parse_base_url, parse_timeout_ms};
use divcheck_application::{ConfigError, FailurePolicy, Harness, HarnessConfig};
use divcheck_domain::{RunReport, TestCase, standard_cases};
use divcheck_infrastructure::{
    CaseFileError, LogSession, LoggingError, ReqwestHttpClient, load_cases,
};
use thiserror::Error;
use tracing::{error, info};

const EXIT_FAILED: u8 = 1;
const EXIT_SETUP: u8 = 2;

/// Request/assert checks against a divide service.
#[derive(Debug, Parser)]
#[command(name = "divcheck", version)]
#[command(about = "Runs request/assert checks against a divide service")]
struct Cli {
    /// Base URL of the service under test [default: $API_URL or http://127.0.0.1:8000].
    #[arg(long)]
    api_url: Option<String>,
    /// Directory receiving test_results.log [default: $DIVCHECK_LOG_DIR or /app/logs].
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Per-request timeout in milliseconds [default: $DIVCHECK_TIMEOUT_MS or none].
    #[arg(long)]
    timeout_ms: Option<String>,
    /// JSON case file; the standard divide cases run when omitted.
    #[arg(long)]
    cases: Option<PathBuf>,
    /// Stop at the first failing case.
    #[arg(long)]
    fail_fast: bool,
    /// Log to the file only.
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Error)]
enum SetupError {
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Cases(#[from] CaseFileError),
    #[error("cannot create HTTP client: {0}")]
    Client(String),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("divcheck: {e}");
            return ExitCode::from(EXIT_SETUP);
        }
    };

    let session = match open_log_session(&config, cli.quiet) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("divcheck: {e}");
            return ExitCode::from(EXIT_SETUP);
        }
    };

    let code = session.in_scope(|| run(&cli, &config));

    if let Err(e) = session.finish() {
        eprintln!("divcheck: {e}");
    }
    code
}

/// Environment first, then command-line overrides.
fn build_config(cli: &Cli) -> Result<HarnessConfig, ConfigError> {
    let mut config = HarnessConfig::from_env()?;

    if let Some(url) = &cli.api_url {
        config.base_url = parse_base_url(url)?;
    }
    if let Some(dir) = &cli.log_dir {
        config = config.with_log_dir(dir.clone());
    }
    if let Some(raw) = &cli.timeout_ms {
        config = config.with_timeout(Some(parse_timeout_ms(raw)?));
    }
    if cli.fail_fast {
        config = config.with_policy(FailurePolicy::Raise);
    }

    Ok(config)
}

fn open_log_session(config: &HarnessConfig, quiet: bool) -> Result<LogSession, SetupError> {
    let session = if quiet {
        LogSession::file_only(config.log_dir())?
    } else {
        LogSession::open(config.log_dir())?
    };
    Ok(session)
}

fn run(cli: &Cli, config: &HarnessConfig) -> ExitCode {
    info!("===== Starting divide API tests =====");
    info!("Target endpoint: {}", config.divide_endpoint());
    if let Some(timeout) = config.timeout {
        info!("Request timeout: {}ms", timeout.as_millis());
    }

    let result = prepare(cli, config).map(|(cases, client)| {
        let harness = Harness::new(Arc::new(client), config.policy);
        harness.run_all(&cases)
    });

    match result {
        Err(e) => {
            error!("Setup failed: {e}");
            ExitCode::from(EXIT_SETUP)
        }
        Ok(Ok(report)) => {
            log_failures(&report);
            info!(
                "===== Finished: {}/{} passed =====",
                report.passed, report.total
            );
            if report.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_FAILED)
            }
        }
        Ok(Err(e)) => {
            error!("Stopped at first failure: {e}");
            info!("===== Finished: stopped early =====");
            ExitCode::from(EXIT_FAILED)
        }
    }
}

fn prepare(
    cli: &Cli,
    config: &HarnessConfig,
) -> Result<(Vec<TestCase>, ReqwestHttpClient), SetupError> {
    let endpoint = config.divide_endpoint();
    let cases = match &cli.cases {
        Some(path) => {
            info!("Loading cases from {}", path.display());
            load_cases(path, &endpoint)?
        }
        None => standard_cases(&endpoint),
    };
    let client = ReqwestHttpClient::new(config.timeout)
        .map_err(|e| SetupError::Client(e.to_string()))?;
    Ok((cases, client))
}

fn log_failures(report: &RunReport) {
    for outcome in report.failures() {
        error!(
            "  {}: {}",
            outcome.name,
            outcome.error.as_deref().unwrap_or("failed")
        );
    }
}
