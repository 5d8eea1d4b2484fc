//! Data models for drscan-client
//!
//! - Candidate files and their preview lifecycle
//! - Classification response normalization
//! - Severity tables and the derived display model
//! - Upload widget state machine

pub mod candidate_file;
pub mod classification;
pub mod display_model;
pub mod severity;
pub mod upload_state;

pub use candidate_file::CandidateFile;
pub use classification::{ClassificationResponse, GradeProbability};
pub use display_model::{DisplayEntry, DisplayModel, DISCLAIMER};
pub use severity::{SeverityGrade, SeverityInfo, NEUTRAL_COLOR};
pub use upload_state::{UploadState, UploadStatus};
