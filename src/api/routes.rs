use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::handlers;
use crate::buffer::TextBuffer;
use crate::config::VoiceTarget;
use crate::editor::ProcessLauncher;
use crate::voice::VoiceClient;

pub struct AppState {
    pub voice: VoiceTarget,
    pub client: VoiceClient,
    pub buffer: TextBuffer,
    pub launcher: Arc<dyn ProcessLauncher>,
}

pub fn create_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/voices", get(handlers::list_voices))
        .route("/forward", get(handlers::forward))
        .route("/save-text", post(handlers::save_text))
        .route("/load-text", get(handlers::load_text))
        .route("/open-editor", post(handlers::open_editor))
        .route("/ping", get(handlers::ping));

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/", ServeDir::new(static_dir).append_index_html_on_directories(true))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
