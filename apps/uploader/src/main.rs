use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use upload_client::{
    HttpUploadTransport, SelectedFile, SubmitOutcome, UploadController, UploadOutcome,
    UploadTransport,
};

mod config;
mod terminal;

use config::load_settings;
use terminal::TerminalPresenter;

#[derive(Parser, Debug)]
#[command(about = "Upload a vocal recording for analysis")]
struct Cli {
    /// Config file; defaults to ./uploader.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate and upload one audio file.
    Upload {
        path: PathBuf,
        /// Declared MIME type; guessed from the extension when omitted.
        #[arg(long)]
        mime: Option<String>,
    },
    /// Read file paths from stdin and upload each one.
    Interactive,
    /// Query the analysis service health endpoint.
    Health,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref(), cli.server_url.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(server_url = %settings.server_url, "uploader: starting");
    let transport = Arc::new(HttpUploadTransport::new(settings.server_url.clone()));
    let presenter = Arc::new(TerminalPresenter::stdout());
    let controller = UploadController::new(transport.clone(), presenter);

    match cli.command {
        Command::Upload { path, mime } => {
            select_path(&controller, path, mime);
            Ok(exit_code(&controller.submit().await))
        }
        Command::Interactive => run_interactive(&controller).await,
        Command::Health => check_health(transport.as_ref()).await,
    }
}

/// An unreadable path leaves the selection empty, as an empty file input would.
fn select_path(controller: &UploadController, path: PathBuf, mime: Option<String>) {
    match SelectedFile::from_path(&path) {
        Ok(file) => {
            let file = match mime {
                Some(mime) => file.with_mime_type(mime),
                None => file,
            };
            controller.select(file);
        }
        Err(err) => warn!(error = %err, path = %path.display(), "uploader: cannot select file"),
    }
}

async fn run_interactive(controller: &UploadController) -> Result<ExitCode> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut last = ExitCode::SUCCESS;

    loop {
        stdout
            .write_all(b"audio file path (blank to quit): ")
            .await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        controller.reset();
        select_path(controller, PathBuf::from(line), None);
        last = exit_code(&controller.submit().await);
    }

    Ok(last)
}

async fn check_health(transport: &dyn UploadTransport) -> Result<ExitCode> {
    match transport.health().await {
        Ok(health) => {
            let service = health.service.as_deref().unwrap_or("analysis service");
            println!("{service}: {}", health.status);
            Ok(if health.is_healthy() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(err) => {
            println!("Network error: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn exit_code(outcome: &SubmitOutcome) -> ExitCode {
    match outcome {
        SubmitOutcome::Uploaded(UploadOutcome::Success(_)) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
