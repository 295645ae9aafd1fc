use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use odiadev_client::{
    AudioResourceManager, AudioUpload, ClientConfig, CommandPlayer, PlaybackStatus,
    SubmitOutcome, TransportClient, TtsSession, VoiceCloneSession,
    core::transport::{CredentialSupplier, StoredApiKey},
};

/// ODIADEV TTS - text-to-speech and voice cloning from the command line
#[derive(Parser, Debug)]
#[command(name = "odiadev")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that the service is reachable
    Health,

    /// Convert text to speech and save it as an MP3
    Speak {
        text: String,

        /// Voice to synthesize with
        #[arg(short = 'v', long = "voice")]
        voice: Option<String>,

        /// Directory the audio is saved into
        #[arg(short = 'o', long = "out", value_name = "DIR", default_value = ".")]
        out: PathBuf,

        /// Play the audio once it is ready
        #[arg(short = 'p', long = "play")]
        play: bool,
    },

    /// Clone a voice from an audio sample
    Clone {
        #[arg(short = 'f', long = "file", value_name = "PATH")]
        file: PathBuf,

        #[arg(short = 'n', long = "name")]
        name: String,

        /// Confirm you have the speaker's consent to clone this voice
        #[arg(long = "consent")]
        consent: bool,
    },

    /// Manage cloned voices
    Voices {
        #[command(subcommand)]
        command: VoicesCommand,
    },

    /// Save an API key in the configured key file
    Login { api_key: String },
}

#[derive(Subcommand, Debug)]
enum VoicesCommand {
    List,
    Get { voice_id: String },
    Delete { voice_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = if let Some(ref config_path) = cli.config {
        info!("Loading configuration from {}", config_path.display());
        ClientConfig::from_file(config_path).map_err(|e| anyhow!(e.to_string()))?
    } else {
        ClientConfig::from_env().map_err(|e| anyhow!(e.to_string()))?
    };

    match cli.command {
        Commands::Login { api_key } => login(&config, &api_key),
        Commands::Health => {
            let transport = TransportClient::new(&config)?;
            let health = with_deadline(&config, transport.health()).await??;
            println!(
                "{} ({})",
                health.status,
                health.service.as_deref().unwrap_or("unknown service")
            );
            if !health.is_healthy() {
                bail!("Service reported status '{}'", health.status);
            }
            Ok(())
        }
        Commands::Speak {
            text,
            voice,
            out,
            play,
        } => speak(&config, &text, voice.as_deref(), &out, play).await,
        Commands::Clone {
            file,
            name,
            consent,
        } => clone_voice(&config, &file, &name, consent).await,
        Commands::Voices { command } => voices(&config, command).await,
    }
}

/// Apply the configured request deadline, if any
async fn with_deadline<F: Future>(config: &ClientConfig, future: F) -> anyhow::Result<F::Output> {
    match config.request_timeout() {
        Some(timeout) => tokio::time::timeout(timeout, future)
            .await
            .map_err(|_| anyhow!("Request timed out after {}s", timeout.as_secs())),
        None => Ok(future.await),
    }
}

fn login(config: &ClientConfig, api_key: &str) -> anyhow::Result<()> {
    let Some(ref path) = config.api_key_file else {
        bail!("No key file configured; set ODIADEV_API_KEY_FILE or auth.key_file");
    };

    let store = StoredApiKey::new(path.clone());
    store.store(api_key)?;
    if store.api_key().is_none() {
        bail!("Key file {} could not be read back", path.display());
    }
    println!("API key saved to {}", path.display());
    Ok(())
}

async fn speak(
    config: &ClientConfig,
    text: &str,
    voice: Option<&str>,
    out: &Path,
    play: bool,
) -> anyhow::Result<()> {
    let transport = TransportClient::new(config)?;
    let player = Arc::new(CommandPlayer::default());

    let mut audio = AudioResourceManager::from_config(config);
    if play || config.autoplay {
        audio = audio
            .with_player(player.clone())
            .with_autoplay(true);
    }

    let session = TtsSession::new(transport, audio, config);
    let artifact = match with_deadline(config, session.submit(text, voice)).await? {
        SubmitOutcome::Succeeded(artifact) => artifact,
        other => bail!(
            "{}",
            other
                .reason()
                .unwrap_or_else(|| "Failed to generate audio".to_string())
        ),
    };

    let saved = artifact.save_to(out)?;
    println!("Saved {}", saved.display());

    match session.audio().playback_status() {
        PlaybackStatus::Playing => {
            let player = player.clone();
            tokio::task::spawn_blocking(move || player.wait()).await??;
        }
        PlaybackStatus::Blocked(reason) => {
            eprintln!("Playback did not start ({reason}); open {} to listen", saved.display());
        }
        PlaybackStatus::Idle => {}
    }

    Ok(())
}

async fn clone_voice(
    config: &ClientConfig,
    file: &Path,
    name: &str,
    consent: bool,
) -> anyhow::Result<()> {
    let upload = AudioUpload::from_path(file)
        .await
        .map_err(|e| anyhow!("Failed to read {}: {}", file.display(), e))?;

    let session = VoiceCloneSession::new(TransportClient::new(config)?, config);
    match with_deadline(config, session.submit(Some(upload), name, consent)).await? {
        SubmitOutcome::Succeeded(result) => {
            println!("Voice {} is {}", result.voice_id, result.status);
            if let Some(message) = result.message {
                println!("{message}");
            }
            Ok(())
        }
        other => bail!(
            "{}",
            other
                .reason()
                .unwrap_or_else(|| "Failed to clone voice".to_string())
        ),
    }
}

async fn voices(config: &ClientConfig, command: VoicesCommand) -> anyhow::Result<()> {
    let transport = TransportClient::new(config)?;

    match command {
        VoicesCommand::List => {
            let voices = with_deadline(config, transport.list_voices()).await??;
            if voices.is_empty() {
                println!("No voices");
            }
            for voice in voices {
                println!(
                    "{}\t{}\t{}",
                    voice.voice_id,
                    voice.name.as_deref().unwrap_or("-"),
                    voice.status.as_deref().unwrap_or("-")
                );
            }
        }
        VoicesCommand::Get { voice_id } => {
            let voice = with_deadline(config, transport.get_voice(&voice_id)).await??;
            println!("{}", serde_json::to_string_pretty(&voice)?);
        }
        VoicesCommand::Delete { voice_id } => {
            let confirmation = with_deadline(config, transport.delete_voice(&voice_id)).await??;
            println!(
                "{}",
                confirmation
                    .message
                    .unwrap_or_else(|| format!("Deleted voice {voice_id}"))
            );
        }
    }

    Ok(())
}
