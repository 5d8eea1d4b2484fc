//! Error types for drscan-client
//!
//! [`AnalysisError`] classifies everything that can go wrong talking to the
//! inference service. [`ControllerError`] covers misuse of the upload state
//! machine by the caller.

use drscan_common::events::UploadPhase;
use thiserror::Error;

use crate::services::image_validator::Rejection;

/// Generic failure text, also used for the failure notification
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze image. Please try again.";

/// Text shown when the service answered 2xx with an unusable body
pub const MALFORMED_RESPONSE_MESSAGE: &str = "Server returned an invalid response";

/// Upload client errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Network unreachable, DNS failure, timeout or a request that could not be built
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-2xx HTTP response
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// 2xx response whose body is not valid JSON or lacks required fields
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl AnalysisError {
    /// Message surfaced in the controller's `Failed` state
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Transport(_) => ANALYSIS_FAILED_MESSAGE.to_string(),
            AnalysisError::Server { message, .. } => message.clone(),
            AnalysisError::MalformedResponse(_) => MALFORMED_RESPONSE_MESSAGE.to_string(),
        }
    }

    /// Malformed bodies are reported as server-side failures
    pub fn is_server_side(&self) -> bool {
        matches!(
            self,
            AnalysisError::Server { .. } | AnalysisError::MalformedResponse(_)
        )
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(e: reqwest::Error) -> Self {
        AnalysisError::Transport(e.to_string())
    }
}

/// Upload controller errors
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Candidate file failed validation
    #[error("{0}")]
    Rejected(Rejection),

    /// Preview copy could not be written
    #[error("Preview error: {0}")]
    Preview(#[from] std::io::Error),

    /// Action not allowed in the current phase
    #[error("Cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: UploadPhase,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_per_kind() {
        let transport = AnalysisError::Transport("connection refused".to_string());
        assert_eq!(transport.user_message(), ANALYSIS_FAILED_MESSAGE);
        assert!(!transport.is_server_side());

        let server = AnalysisError::Server {
            status: 422,
            message: "invalid image format".to_string(),
        };
        assert_eq!(server.user_message(), "invalid image format");
        assert!(server.is_server_side());

        let malformed = AnalysisError::MalformedResponse("missing field".to_string());
        assert_eq!(malformed.user_message(), MALFORMED_RESPONSE_MESSAGE);
        assert!(malformed.is_server_side());
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = ControllerError::InvalidTransition {
            action: "clear",
            phase: UploadPhase::Submitting,
        };
        assert_eq!(err.to_string(), "Cannot clear while submitting");
    }
}
