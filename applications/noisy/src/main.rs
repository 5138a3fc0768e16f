/// Noisy - mix looping ambient sounds from the terminal
use clap::Parser;
use noisy::{App, AppConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "noisy")]
#[command(about = "Mix rain, forest, ocean and night sounds", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./noisy.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run without opening an audio device
    #[arg(long)]
    no_audio: bool,

    /// Directory that root-relative track sources resolve under
    #[arg(long, env = "NOISY_MEDIA_ROOT")]
    media_root: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the status line on stdout stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "noisy=info,noisy_mixer=info,noisy_audio_desktop=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if cli.no_audio {
        config.audio.enabled = false;
    }
    if let Some(media_root) = cli.media_root {
        config.audio.media_root = media_root;
    }

    tracing::info!(
        tracks = config.catalog()?.len(),
        audio = config.audio.enabled,
        "Starting Noisy"
    );

    App::new(&config)?.run().await
}
