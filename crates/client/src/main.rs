//! `artifacts-bot` binary.
//!
//! ```bash
//! BOT_DATA_DIR=data RUST_LOG=runtime=debug cargo run -p bot-client
//! ```

use anyhow::Result;
use bot_client::{BotFile, ClientConfig, logging, monitor};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    logging::setup_logging(&config.log_root(), config.session_id.as_deref())?;

    let config_path = config.config_path();
    tracing::info!("Loading configuration from {}", config_path.display());
    let file = BotFile::load(&config_path)?;

    let session = bot_client::start(&config, file).await?;
    let names: Vec<&str> = session
        .runtime
        .characters()
        .iter()
        .map(|character| character.name())
        .collect();
    tracing::info!(characters = ?names, "bot running");
    let monitor = monitor::spawn(&session.runtime);

    match config.run_for {
        Some(limit) => {
            tokio::select! {
                _ = tokio::time::sleep(limit) => tracing::info!("run time elapsed"),
                _ = tokio::signal::ctrl_c() => tracing::info!("interrupted"),
            }
        }
        None => {
            tokio::signal::ctrl_c().await?;
            tracing::info!("interrupted");
        }
    }

    for character in session.runtime.characters() {
        let snapshot = character.snapshot();
        tracing::info!(
            character = %snapshot.name,
            level = snapshot.level,
            gold = snapshot.gold,
            actions = session.server.actions(&snapshot.name).len(),
            "final state"
        );
    }

    session.runtime.shutdown().await?;
    monitor.abort();
    tracing::info!("Shutdown complete");
    Ok(())
}
