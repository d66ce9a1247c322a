use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod api;
mod buffer;
mod config;
mod editor;
mod error;
mod voice;

use api::routes::{create_router, AppState};
use buffer::TextBuffer;
use config::Config;
use editor::SystemLauncher;
use voice::VoiceClient;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    tracing::info!("Voice gateway v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", config.listen_addr);
    tracing::info!(
        "Default voice service: http://{}:{}",
        config
            .voice
            .host
            .as_deref()
            .unwrap_or("(unset, supplied by the frontend)"),
        config.voice.port
    );
    tracing::info!("The `host` query parameter selects the voice service per request");
    tracing::info!("Text buffer: {}", config.text_file.display());

    let state = Arc::new(AppState {
        voice: config.voice.clone(),
        client: VoiceClient::new(),
        buffer: TextBuffer::new(config.text_file.clone()),
        launcher: Arc::new(SystemLauncher),
    });

    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
