//! Upload widget state machine states
//!
//! Idle → Selected → Submitting → Succeeded | Failed → Idle
//!
//! One [`UploadState`] is owned by each [`crate::UploadController`].

use drscan_common::events::UploadPhase;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use super::candidate_file::CandidateFile;
use super::display_model::DisplayModel;
use crate::services::preview::PreviewHandle;

/// Current state of one upload widget
///
/// Owns the preview resource while a file is selected; dropping the state
/// releases it.
#[derive(Debug, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Selected {
        file: Arc<CandidateFile>,
        preview: PreviewHandle,
    },
    Submitting {
        file: Arc<CandidateFile>,
    },
    Succeeded(DisplayModel),
    Failed {
        message: String,
    },
}

impl UploadState {
    pub fn phase(&self) -> UploadPhase {
        match self {
            UploadState::Idle => UploadPhase::Idle,
            UploadState::Selected { .. } => UploadPhase::Selected,
            UploadState::Submitting { .. } => UploadPhase::Submitting,
            UploadState::Succeeded(_) => UploadPhase::Succeeded,
            UploadState::Failed { .. } => UploadPhase::Failed,
        }
    }

    /// Read-only snapshot for rendering
    pub fn status(&self) -> UploadStatus {
        match self {
            UploadState::Idle => UploadStatus::Idle,
            UploadState::Selected { file, preview } => UploadStatus::Selected {
                file_name: file.name().to_string(),
                size: file.size(),
                preview_path: preview.path().to_path_buf(),
            },
            UploadState::Submitting { file } => UploadStatus::Submitting {
                file_name: file.name().to_string(),
            },
            UploadState::Succeeded(model) => UploadStatus::Succeeded(model.clone()),
            UploadState::Failed { message } => UploadStatus::Failed {
                message: message.clone(),
            },
        }
    }
}

/// Cloneable view of an [`UploadState`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum UploadStatus {
    Idle,
    Selected {
        file_name: String,
        size: u64,
        preview_path: PathBuf,
    },
    Submitting {
        file_name: String,
    },
    Succeeded(DisplayModel),
    Failed {
        message: String,
    },
}

impl UploadStatus {
    pub fn phase(&self) -> UploadPhase {
        match self {
            UploadStatus::Idle => UploadPhase::Idle,
            UploadStatus::Selected { .. } => UploadPhase::Selected,
            UploadStatus::Submitting { .. } => UploadPhase::Submitting,
            UploadStatus::Succeeded(_) => UploadPhase::Succeeded,
            UploadStatus::Failed { .. } => UploadPhase::Failed,
        }
    }
}
