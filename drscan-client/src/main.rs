//! drscan - retinal image analysis client
//!
//! Sends a fundus photograph to the diabetic retinopathy inference service and
//! prints the severity assessment with the per-grade probability distribution.
//!
//! Configuration priority for the service URL:
//! `--api-url` → `DRSCAN_API_URL` → TOML `api_url` → compiled default

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use drscan_client::report::{self, CliFormatter};
use drscan_client::{CandidateFile, ControllerError, SubmitOutcome, UploadClient, UploadController};
use drscan_common::config::{self, ClientConfig};
use drscan_common::events::{EventBus, NotificationLevel, UploadEvent};
use tracing::{info, warn};

/// Command-line arguments for drscan
#[derive(Parser, Debug)]
#[command(name = "drscan")]
#[command(about = "Diabetic retinopathy screening client")]
#[command(version)]
struct Args {
    /// Inference service base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// TOML config file (defaults to <config dir>/drscan/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a retinal image
    Analyze {
        /// Image file to upload
        path: PathBuf,

        /// Print the display model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether the inference service is up
    Health,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Config file is read before tracing exists; problems are logged after init
    let startup = config::load_startup_config(args.config.as_deref());
    let toml_config = startup.toml;

    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&toml_config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting drscan v{}", env!("CARGO_PKG_VERSION"));

    if let Some(warning) = &startup.warning {
        warn!("Ignoring config file, using defaults: {}", warning);
    }

    let client_config = ClientConfig::resolve(args.api_url.as_deref(), &toml_config);
    let client = UploadClient::new(&client_config.api_url)
        .context("Failed to create inference client")?;

    match args.command {
        Command::Analyze { path, json } => analyze(client, path, json).await,
        Command::Health => {
            let health = client.check_health().await;
            print!("{}", CliFormatter::format_health(&health));
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn analyze(client: UploadClient, path: PathBuf, json: bool) -> Result<ExitCode> {
    let file = CandidateFile::from_path(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let event_bus = EventBus::new(16);
    let mut events = event_bus.subscribe();
    let controller = UploadController::new(client, event_bus);

    match controller.select(file).await {
        Ok(()) => {}
        Err(ControllerError::Rejected(rejection)) => {
            eprintln!("{}", rejection.user_message());
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e).context("Failed to select file"),
    }

    let outcome = controller.submit().await;

    while let Ok(event) = events.try_recv() {
        if let UploadEvent::Notification { level, message, .. } = event {
            match level {
                NotificationLevel::Success => info!("{}", message),
                NotificationLevel::Error => warn!("{}", message),
            }
        }
    }

    match outcome {
        SubmitOutcome::Completed(model) => {
            if json {
                println!("{}", report::to_json(&model)?);
            } else {
                print!("{}", CliFormatter::format_report(&model));
            }
            Ok(ExitCode::SUCCESS)
        }
        SubmitOutcome::Failed(message) => {
            eprintln!("{}", message);
            Ok(ExitCode::FAILURE)
        }
        SubmitOutcome::Skipped(reason) => {
            anyhow::bail!("Analysis was not submitted: {:?}", reason)
        }
    }
}
