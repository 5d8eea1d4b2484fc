//! drscan client library
//!
//! Image-analysis pipeline for the diabetic retinopathy inference service:
//! validation → upload → response normalization → display model.
//!
//! Exposes public APIs for the `drscan` binary and integration testing.

pub mod controller;
pub mod error;
pub mod models;
pub mod report;
pub mod services;

pub use crate::controller::{SkipReason, SubmitOutcome, UploadController};
pub use crate::error::{AnalysisError, ControllerError};
pub use crate::models::{CandidateFile, ClassificationResponse, DisplayModel, SeverityGrade};
pub use crate::services::{HealthStatus, ImageValidator, UploadClient};
