use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use neuroscreen::capture::{InputConfig, InputFactory, InputSource};
use neuroscreen::{handoff, Config, ScreeningSession, SelectedFile};

#[derive(Parser)]
#[command(name = "neuroscreen", about = "Run a screening test against the analysis service")]
struct Cli {
    /// Config file (defaults to config/neuroscreen, built-in defaults if absent)
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Voice test: record from the microphone, or submit an audio file
    Voice {
        /// Audio file to submit instead of recording
        #[arg(long)]
        input: Option<PathBuf>,

        /// Recording length in seconds when capturing live
        #[arg(long, default_value_t = 10)]
        seconds: u64,
    },
    /// Drawing test: submit an image of a drawn spiral
    Drawing {
        /// Image file to submit
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load("config/neuroscreen").unwrap_or_default(),
    };

    let (handoff_tx, mut handoff_rx) = handoff::channel();

    match cli.command {
        Command::Voice { input, seconds } => {
            let input_config = InputConfig {
                sample_rate: config.capture.sample_rate,
                channels: config.capture.channels,
                buffer_duration_ms: config.capture.buffer_duration_ms,
            };

            let device = InputFactory::create(InputSource::Microphone, input_config);
            let mut session = ScreeningSession::voice(&config, device)?.with_handoff(handoff_tx);

            match input {
                Some(path) => {
                    session.select_file(SelectedFile::open(&path)?);
                }
                None => {
                    info!("Recording for {} seconds...", seconds);
                    session.start_recording().await;
                    if let Some(message) = session.error() {
                        bail!("{}", message);
                    }

                    tokio::time::sleep(std::time::Duration::from_secs(seconds)).await;
                    session.stop_recording().await;
                }
            }

            if let Some(message) = session.error() {
                bail!("{}", message);
            }

            session.submit().await;
            finish(session, &mut handoff_rx)
        }
        Command::Drawing { input } => {
            let mut session = ScreeningSession::drawing(&config)?.with_handoff(handoff_tx);
            session.select_file(SelectedFile::open(&input)?);

            if let Some(message) = session.error() {
                bail!("{}", message);
            }

            session.submit().await;
            finish(session, &mut handoff_rx)
        }
    }
}

/// Display layer: render the handed-off result, or the session's error.
fn finish(session: ScreeningSession, handoff_rx: &mut handoff::HandoffReceiver) -> Result<()> {
    match handoff_rx.take() {
        Some(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        None => match session.error() {
            Some(message) => bail!("{}", message),
            None => Ok(()),
        },
    }
}
