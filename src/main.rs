//! CardioScreen: Heart disease risk screening
//!
//! Main entry point for the terminal application.

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardioscreen::adapters::sanitize::SanitizingMakeWriter;
use cardioscreen::config::AppConfig;
use cardioscreen::tui::App;
use cardioscreen::ScreeningService;

fn main() -> Result<()> {
    let config = AppConfig::from_env().context("Invalid CARDIOSCREEN_* setting")?;

    // Writing logs to the terminal would corrupt the TUI (alternate screen).
    // Default behavior:
    // - interactive TTY: log to a file
    // - non-interactive: log to stdout
    let interactive = std::io::stdout().is_terminal();
    let (writer, _guard) = if config.log_mode.use_file(interactive) {
        if let Some(parent) = config.log_file.parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("Failed to open log file {:?}", config.log_file))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting CardioScreen...");

    // Refuse to start if the artifacts cannot be loaded and verified.
    let service = ScreeningService::new(config.artifact_store(), config.policy);
    service
        .initialize()
        .with_context(|| format!("Failed to load model from {:?}", config.model_dir))?;

    let mut app = App::new(Arc::new(service))?;
    app.run()?;

    tracing::info!("CardioScreen shutdown complete.");
    Ok(())
}
