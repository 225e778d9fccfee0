use std::path::PathBuf;

use clap::Parser;

use phonetic_relay::config::load_or_default;
use phonetic_relay::lifecycle::{run_converter, Shutdown};
use phonetic_relay::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "converter")]
#[command(about = "TCP service converting text to English-sound phonetics", long_about = None)]
struct Cli {
    /// TOML configuration file; the `[converter]` section applies.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `converter.dictionary_path`.
    #[arg(short, long)]
    dictionary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(dictionary) = cli.dictionary {
        config.converter.dictionary_path = dictionary;
    }

    init_logging(&config.observability);
    tracing::info!("converter v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    run_converter(config, &shutdown).await?;
    Ok(())
}
