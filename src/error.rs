use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Failed to fetch voice list: {0}")]
    VoiceList(String),

    #[error("Speech synthesis failed: {detail}")]
    Synthesis {
        detail: String,
        status: Option<u16>,
        backend: Option<serde_json::Value>,
    },

    #[error("Failed to save text: {0}")]
    SaveText(#[source] std::io::Error),

    #[error("Unsupported editor: {0}")]
    UnsupportedEditor(String),

    #[error("Failed to open editor: {0}")]
    EditorLaunch(#[source] std::io::Error),

    #[error("Voice service unreachable: {0}")]
    Unreachable(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<serde_json::Value>,
    pub code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error, detail) = match &self {
            AppError::VoiceList(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "VOICE_LIST_FAILED",
                "Failed to fetch voice list",
                Some(msg.clone()),
            ),
            AppError::Synthesis { detail, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SYNTHESIS_FAILED",
                "Speech synthesis failed",
                Some(detail.clone()),
            ),
            AppError::SaveText(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SAVE_FAILED",
                "Failed to save text",
                Some(e.to_string()),
            ),
            AppError::UnsupportedEditor(_) => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_EDITOR",
                "Unsupported editor",
                None,
            ),
            AppError::EditorLaunch(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EDITOR_LAUNCH_FAILED",
                "Failed to open editor",
                Some(e.to_string()),
            ),
            AppError::Unreachable(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "VOICE_SERVICE_UNREACHABLE",
                "Cannot reach voice service",
                Some(msg.clone()),
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Bad request",
                Some(msg.clone()),
            ),
        };

        if status.is_server_error() {
            match &self {
                AppError::Synthesis {
                    status: upstream,
                    backend,
                    ..
                } => tracing::error!(
                    "Request failed: {} - {} (upstream status {:?}, body {:?})",
                    code,
                    self,
                    upstream,
                    backend
                ),
                _ => tracing::error!("Request failed: {} - {}", code, self),
            }
        } else {
            tracing::warn!("Request rejected: {} - {}", code, self);
        }

        let success = matches!(self, AppError::Unreachable(_)).then_some(false);
        let backend = match self {
            AppError::Synthesis { backend, .. } => backend,
            _ => None,
        };

        (
            status,
            Json(ErrorResponse {
                success,
                error: error.to_string(),
                detail,
                backend,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unsupported_editor_is_400_without_detail() {
        let (status, body) = body_json(AppError::UnsupportedEditor("vim".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unsupported editor");
        assert!(body.get("detail").is_none());
        assert!(body.get("success").is_none());
    }

    #[tokio::test]
    async fn unreachable_carries_success_false() {
        let (status, body) = body_json(AppError::Unreachable("connection refused".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["detail"], "connection refused");
    }

    #[tokio::test]
    async fn synthesis_includes_backend_payload() {
        let err = AppError::Synthesis {
            detail: "upstream returned 502".into(),
            status: Some(502),
            backend: Some(serde_json::json!({"msg": "engine down"})),
        };
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["backend"]["msg"], "engine down");
        assert_eq!(body["code"], "SYNTHESIS_FAILED");
    }
}
