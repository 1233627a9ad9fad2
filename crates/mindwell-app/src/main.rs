//! MindWell application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize logging
//! 3. Build the chat provider and, for the voice variant, the speech clients
//! 4. Start the axum HTTP server

mod cli;

use std::sync::Arc;

use clap::Parser;

use mindwell_api::{create_router, AppState};
use mindwell_chat::OllamaChatProvider;
use mindwell_core::config::MindWellConfig;
use mindwell_core::UiVariant;
use mindwell_voice::{GoogleSpeechRecognizer, GoogleTranslateSynthesizer};

use cli::CliArgs;

/// Fold CLI and environment overrides into the loaded configuration.
fn apply_overrides(args: &CliArgs, config: &mut MindWellConfig) {
    config.general.port = args.resolve_port(config.general.port);
    config.general.host = args.resolve_host(&config.general.host);
    config.general.log_level = args.resolve_log_level(&config.general.log_level);
    config.ui.variant = args.resolve_variant(config.ui.variant);
    config.voice.recognition_api_key =
        args.resolve_speech_api_key(&config.voice.recognition_api_key);
}

fn build_state(config: MindWellConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let provider = Arc::new(OllamaChatProvider::new(&config.chat)?);
    tracing::info!(url = %config.chat.base_url, model = %config.chat.model, "Chat provider ready");

    match config.ui.variant {
        UiVariant::Text => Ok(AppState::text(config, provider)?),
        UiVariant::Voice => {
            if config.voice.recognition_api_key.is_empty() {
                tracing::warn!("No speech API key configured; audio uploads will not be recognized");
            }
            let recognizer = Arc::new(GoogleSpeechRecognizer::new(&config.voice)?);
            let synthesizer = Arc::new(GoogleTranslateSynthesizer::new(&config.voice)?);
            tracing::info!("Speech recognition and synthesis ready");
            Ok(AppState::voice(config, provider, recognizer, synthesizer)?)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = MindWellConfig::load_or_default(&config_file);
    apply_overrides(&args, &mut config);

    // Tracing. RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting MindWell v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), variant = %config.ui.variant, "Configuration loaded");

    let addr = format!("{}:{}", config.general.host, config.general.port);
    let state = build_state(config)?;
    let router = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind. Is another instance running?");
            return Err(e.into());
        }
    };

    tracing::info!(addr = %addr, "Chat page at http://{}/", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
