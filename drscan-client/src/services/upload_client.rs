//! Inference service HTTP client
//!
//! Owns the HTTP contract with the remote classification service:
//! - `POST {base}/predict` with a multipart body (one part named `file`)
//! - `GET {base}/health`
//!
//! One attempt per call. No retries and no timeout beyond reqwest's default;
//! the user re-submits after a failure.

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::AnalysisError;
use crate::models::{CandidateFile, ClassificationResponse};

const USER_AGENT: &str = concat!("drscan/", env!("CARGO_PKG_VERSION"));

/// Multipart field carrying the image
pub const FILE_FIELD: &str = "file";

/// Health payload used when the service cannot be reached
pub const UNREACHABLE_STATUS: &str = "unhealthy";
pub const UNREACHABLE_MESSAGE: &str = "Could not connect to server";

/// `GET /health` payload
///
/// Only `status` is required. `message` is kept as whatever JSON the server
/// sent; other fields land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl HealthStatus {
    /// Fixed payload for transport failures
    pub fn unreachable() -> Self {
        Self {
            status: UNREACHABLE_STATUS.to_string(),
            message: Some(Value::String(UNREACHABLE_MESSAGE.to_string())),
            extra: serde_json::Map::new(),
        }
    }

    /// `message` as display text; non-string messages are rendered as JSON
    pub fn message_text(&self) -> Option<String> {
        match self.message.as_ref()? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

/// Inference service client
#[derive(Debug, Clone)]
pub struct UploadClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl UploadClient {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: &str) -> Result<Self, AnalysisError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: drscan_common::config::normalize_base_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload an image and return the normalized classification
    pub async fn analyze(&self, file: &CandidateFile) -> Result<ClassificationResponse, AnalysisError> {
        let url = format!("{}/predict", self.base_url);

        // Content-Type (with boundary) is computed by reqwest
        let part = Part::bytes(file.content().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())?;
        let form = Form::new().part(FILE_FIELD, part);

        debug!(
            url = %url,
            file_name = %file.name(),
            size = file.size(),
            "Submitting image for analysis"
        );

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Analysis request failed");
                AnalysisError::Transport(e.to_string())
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = server_error_message(status.as_u16(), &body);
            warn!(
                status_code = status.as_u16(),
                message = %message,
                "Inference service returned an error"
            );
            return Err(AnalysisError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;

        let classification = ClassificationResponse::from_slice(&body).map_err(|e| {
            warn!(status_code = status.as_u16(), error = %e, "Failed to parse classification response");
            AnalysisError::MalformedResponse(e.to_string())
        })?;

        info!(
            highest = %classification.highest_probability_class,
            grades = classification.detailed_classification.len(),
            "Image analysis successful"
        );

        Ok(classification)
    }

    /// Query service health
    ///
    /// Never fails: any transport or decoding failure yields
    /// [`HealthStatus::unreachable`].
    pub async fn check_health(&self) -> HealthStatus {
        let url = format!("{}/health", self.base_url);

        let response = match self.http_client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "Health check failed");
                return HealthStatus::unreachable();
            }
        };

        match response.json::<HealthStatus>().await {
            Ok(health) => {
                debug!(status = %health.status, "Health check completed");
                health
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Health check returned an unreadable body");
                HealthStatus::unreachable()
            }
        }
    }
}

/// Message for a non-2xx response
///
/// Uses the JSON `detail` string when present and non-empty, otherwise
/// "Server error: {status}".
pub fn server_error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
        .filter(|detail| !detail.trim().is_empty())
        .unwrap_or_else(|| format!("Server error: {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_message_prefers_detail() {
        let body = br#"{"detail": "invalid image format"}"#;
        assert_eq!(server_error_message(400, body), "invalid image format");
    }

    #[test]
    fn test_server_error_message_falls_back_to_status() {
        assert_eq!(server_error_message(500, b""), "Server error: 500");
        assert_eq!(server_error_message(502, b"<html>bad gateway</html>"), "Server error: 502");
        assert_eq!(server_error_message(500, br#"{"detail": ""}"#), "Server error: 500");
        assert_eq!(server_error_message(422, br#"{"detail": [{"msg": "field required"}]}"#), "Server error: 422");
    }

    #[test]
    fn test_client_trims_base_url() {
        let client = UploadClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_unreachable_payload() {
        let health = HealthStatus::unreachable();
        assert_eq!(health.status, "unhealthy");
        assert_eq!(health.message_text().as_deref(), Some("Could not connect to server"));
        assert!(!health.is_healthy());
    }

    #[test]
    fn test_health_keeps_extra_fields() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status": "healthy", "model_loaded": true}"#).unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.message, None);
        assert_eq!(health.extra.get("model_loaded"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_health_accepts_structured_message() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status": "healthy", "message": {"model": "ok"}}"#).unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.message_text().as_deref(), Some(r#"{"model":"ok"}"#));

        let health: HealthStatus =
            serde_json::from_str(r#"{"status": "healthy", "message": null}"#).unwrap();
        assert_eq!(health.message_text(), None);
    }

    #[test]
    fn test_health_requires_string_status() {
        assert!(serde_json::from_str::<HealthStatus>(r#"{"message": "up"}"#).is_err());
        assert!(serde_json::from_str::<HealthStatus>(r#"{"status": 1}"#).is_err());
    }
}
