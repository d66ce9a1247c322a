use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::{HostQuery, OpenEditorRequest, SaveTextRequest, SuccessResponse, TextResponse};
use crate::api::routes::AppState;
use crate::editor;
use crate::error::AppError;
use crate::voice::SynthesisParams;

pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HostQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let query = query_params(query)?;
    let base_url = state.voice.base_url(query.host.as_deref());
    let voices = state.client.list_voices(&base_url).await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], voices).into_response())
}

pub async fn forward(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HostQuery>, QueryRejection>,
    params: Result<Query<SynthesisParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let query = query_params(query)?;
    let params = query_params(params)?;
    let base_url = state.voice.base_url(query.host.as_deref());
    let audio = state.client.synthesize(&base_url, &params).await?;

    Ok(([(header::CONTENT_TYPE, audio.content_type)], audio.body).into_response())
}

pub async fn save_text(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SuccessResponse>, AppError> {
    let request: SaveTextRequest = json_body(&headers, &body)?;
    state
        .buffer
        .save(request.text.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

pub async fn load_text(State(state): State<Arc<AppState>>) -> Json<TextResponse> {
    Json(TextResponse {
        text: state.buffer.load().await,
    })
}

pub async fn open_editor(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SuccessResponse>, AppError> {
    let request: OpenEditorRequest = json_body(&headers, &body)?;
    let name = request.editor.unwrap_or_default();
    editor::open(state.launcher.as_ref(), &name, state.buffer.path())?;
    Ok(Json(SuccessResponse::ok()))
}

pub async fn ping(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HostQuery>, QueryRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let query = query_params(query)?;
    let base_url = state.voice.base_url(query.host.as_deref());
    state.client.ping(&base_url).await?;
    Ok(Json(SuccessResponse::ok()))
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// A body that is empty or not declared as JSON reads as `{}`.
fn json_body<T: DeserializeOwned + Default>(headers: &HeaderMap, body: &[u8]) -> Result<T, AppError> {
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Failed to parse the request body as JSON: {}", e)))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}
