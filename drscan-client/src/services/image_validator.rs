//! Client-side image validation
//!
//! Checks the declared MIME type and the byte size only. Whether the bytes
//! decode as a real image is decided by the inference service.

use crate::models::CandidateFile;

/// Largest accepted upload (10 MiB)
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Why a candidate was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// MIME type does not start with `image/`
    NotAnImage,
    /// Larger than [`MAX_IMAGE_BYTES`]
    FileTooLarge,
}

impl RejectionReason {
    /// Text shown next to the upload control
    pub fn user_message(&self) -> &'static str {
        match self {
            RejectionReason::NotAnImage => "File must be an image",
            RejectionReason::FileTooLarge => "Image must be less than 10MB",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::NotAnImage => f.write_str("not an image"),
            RejectionReason::FileTooLarge => f.write_str("file too large"),
        }
    }
}

/// Every rule a candidate failed, in rule order (type, then size)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    reasons: Vec<RejectionReason>,
}

impl Rejection {
    pub fn reasons(&self) -> &[RejectionReason] {
        &self.reasons
    }

    pub fn contains(&self, reason: RejectionReason) -> bool {
        self.reasons.contains(&reason)
    }

    /// First failing rule
    pub fn primary(&self) -> RejectionReason {
        // Never empty: only `ImageValidator::validate` constructs a Rejection
        self.reasons[0]
    }

    /// User-facing messages joined for inline display
    pub fn user_message(&self) -> String {
        self.reasons
            .iter()
            .map(|r| r.user_message())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reasons: Vec<String> = self.reasons.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", reasons.join(", "))
    }
}

/// Stateless candidate file validator
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageValidator;

impl ImageValidator {
    pub fn new() -> Self {
        Self
    }

    /// Accept or reject a candidate file
    ///
    /// Collects all failing rules instead of stopping at the first one.
    pub fn validate(&self, candidate: &CandidateFile) -> Result<(), Rejection> {
        let mut reasons = Vec::new();

        if !candidate.mime_type().starts_with("image/") {
            reasons.push(RejectionReason::NotAnImage);
        }

        if candidate.size() > MAX_IMAGE_BYTES {
            reasons.push(RejectionReason::FileTooLarge);
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            tracing::debug!(
                file_name = %candidate.name(),
                mime_type = %candidate.mime_type(),
                size = candidate.size(),
                "Candidate rejected"
            );
            Err(Rejection { reasons })
        }
    }
}
