//! MongoDB to S3 exporter
//!
//! Dumps every collection of the `configurator` database into
//! `<collection>.json` objects in an S3 bucket.
//!
//! # Usage
//!
//! ```bash
//! # As a Lambda function (default)
//! mongo-s3-export
//!
//! # One local run, report printed to stdout
//! MONGODB_URI=mongodb://localhost:27017 S3_BUCKET_NAME=backups mongo-s3-export --once
//! ```

use lambda_runtime::{run, service_fn};
use tracing::level_filters::LevelFilter;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use mongo_s3_export::cli::CliInterface;
use mongo_s3_export::config::LogFormat;
use mongo_s3_export::error::{ExportError, Result};
use mongo_s3_export::handler::{ExportFunction, function_handler};

/// Application entry point
#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Build clients
/// 4. Serve Lambda invocations, or run once in local mode
async fn run_app() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    let function = ExportFunction::from_config(cli.config()).await;

    if cli.is_local() {
        return run_once(&function).await;
    }

    info!("Starting Lambda runtime");
    let function = &function;
    run(service_fn(move |event| async move {
        function_handler(function, event).await
    }))
    .await
    .map_err(|e| ExportError::Generic(format!("Lambda runtime error: {e}")))
}

/// Run a single export and print the report
///
/// Exits with an error when the run was aborted or any upload failed.
async fn run_once(function: &ExportFunction) -> Result<()> {
    let report = function.invoke().await;

    let output = serde_json::to_string_pretty(&report)
        .map_err(|e| ExportError::Generic(format!("Failed to render report: {e}")))?;
    println!("{}", output);

    if report.is_success() {
        Ok(())
    } else {
        Err(ExportError::Generic(report.summary()))
    }
}

/// Initialize logging system based on configuration and verbosity flags
///
/// `RUST_LOG` takes precedence over the configured level when set.
fn initialize_logging(cli: &CliInterface) {
    let logging = &cli.config().logging;
    let level = if cli.args().very_verbose {
        Level::TRACE
    } else if cli.args().verbose {
        Level::DEBUG
    } else {
        logging.level.to_tracing_level()
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match (logging.format, logging.timestamps) {
        (LogFormat::Json, true) => subscriber.json().init(),
        (LogFormat::Json, false) => subscriber.json().without_time().init(),
        (LogFormat::Text, true) => subscriber.init(),
        (LogFormat::Text, false) => subscriber.without_time().init(),
    }
}
