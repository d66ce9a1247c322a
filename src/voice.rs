use std::time::Duration;

use axum::body::{Body, Bytes};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const PING_TIMEOUT: Duration = Duration::from_millis(2000);
pub const DEFAULT_AUDIO_TYPE: &str = "audio/mpeg";

/// Synthesis parameters relayed to the voice service unchanged.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SynthesisParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

/// Audio relayed from the voice service, body still streaming.
pub struct SynthesizedAudio {
    pub content_type: String,
    pub body: Body,
}

#[derive(Clone, Default)]
pub struct VoiceClient {
    http: reqwest::Client,
}

impl VoiceClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Fetch the voice list as the raw JSON document the service sent.
    pub async fn list_voices(&self, base_url: &str) -> Result<Bytes, AppError> {
        tracing::info!("Voice service target: {}", base_url);

        let body = self
            .http
            .get(format!("{}/voices", base_url))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::VoiceList(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| AppError::VoiceList(e.to_string()))?;

        Ok(json_document(body))
    }

    pub async fn synthesize(
        &self,
        base_url: &str,
        params: &SynthesisParams,
    ) -> Result<SynthesizedAudio, AppError> {
        tracing::debug!("Forwarding synthesis to {}: {:?}", base_url, params);

        let response = self
            .http
            .get(format!("{}/forward", base_url))
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::Synthesis {
                detail: e.to_string(),
                status: None,
                backend: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(AppError::Synthesis {
                detail: format!("Voice service returned status {}", status),
                status: Some(status.as_u16()),
                backend: decode_backend_body(&body),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_AUDIO_TYPE)
            .to_string();

        Ok(SynthesizedAudio {
            content_type,
            body: Body::from_stream(response.bytes_stream()),
        })
    }

    pub async fn ping(&self, base_url: &str) -> Result<(), AppError> {
        self.http
            .get(format!("{}/voices", base_url))
            .timeout(PING_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map(|_| ())
            .map_err(|e| AppError::Unreachable(e.to_string()))
    }
}

/// Valid JSON passes through byte for byte; anything else becomes a JSON string.
fn json_document(body: Bytes) -> Bytes {
    if serde_json::from_slice::<serde::de::IgnoredAny>(&body).is_ok() {
        return body;
    }
    let text = String::from_utf8_lossy(&body).into_owned();
    serde_json::to_vec(&text).map(Bytes::from).unwrap_or(body)
}

/// Upstream error bodies are kept as JSON when they parse, text otherwise.
fn decode_backend_body(body: &[u8]) -> Option<serde_json::Value> {
    if body.is_empty() {
        return None;
    }
    serde_json::from_slice(body)
        .ok()
        .or_else(|| Some(serde_json::Value::String(String::from_utf8_lossy(body).into_owned())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_backend_body_is_omitted() {
        assert_eq!(decode_backend_body(b""), None);
    }

    #[test]
    fn json_backend_body_is_structured() {
        let value = decode_backend_body(br#"{"error":"bad voice"}"#).unwrap();
        assert_eq!(value["error"], "bad voice");
    }

    #[test]
    fn text_backend_body_is_a_string() {
        let value = decode_backend_body(b"Internal Server Error").unwrap();
        assert_eq!(value, serde_json::json!("Internal Server Error"));
    }

    #[test]
    fn json_document_keeps_bytes_verbatim() {
        let raw = Bytes::from_static(b"[ {\"zeta\": 1, \"alpha\": 2} ]");
        assert_eq!(json_document(raw.clone()), raw);
    }

    #[test]
    fn non_json_document_becomes_a_string() {
        let doc = json_document(Bytes::from_static(b"voice-a,voice-b"));
        assert_eq!(&doc[..], br#""voice-a,voice-b""#);
    }

    #[test]
    fn absent_params_are_not_serialized() {
        let params = SynthesisParams {
            text: Some("hi".into()),
            voice: Some("alba".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, serde_json::json!({"text": "hi", "voice": "alba"}));
    }
}
