//! Upload widget controller
//!
//! Drives one widget through its state machine:
//!
//! ```text
//! Idle ──select──▶ Selected ──submit──▶ Submitting ──▶ Succeeded | Failed
//!  ▲                  │ clear                              │ reset
//!  └──────────────────┴────────────────────────────────────┘
//! ```
//!
//! The `Submitting` state is the single-flight guard: a submit issued while a
//! request is outstanding is skipped, so each controller has at most one
//! analysis call in flight. Failures from the upload client stop here and
//! become the `Failed` state plus a notification.

use chrono::Utc;
use drscan_common::events::{EventBus, NotificationLevel, UploadEvent, UploadPhase};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{ControllerError, ANALYSIS_FAILED_MESSAGE};
use crate::models::{CandidateFile, DisplayModel, UploadState, UploadStatus};
use crate::services::{ImageValidator, PreviewHandle, UploadClient};

/// Success notification text
pub const ANALYSIS_COMPLETE_MESSAGE: &str = "Image analysis complete!";

/// Why a submit did not issue a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No file selected
    NothingSelected,
    /// A request from this controller is still in flight
    AlreadySubmitting,
    /// Result is showing; `reset()` first
    AwaitingReset(UploadPhase),
}

/// Result of [`UploadController::submit`]
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Completed(DisplayModel),
    /// User-facing failure message
    Failed(String),
    Skipped(SkipReason),
}

/// Per-widget upload state machine
pub struct UploadController {
    widget_id: Uuid,
    client: UploadClient,
    validator: ImageValidator,
    state: Mutex<UploadState>,
    event_bus: EventBus,
}

impl UploadController {
    pub fn new(client: UploadClient, event_bus: EventBus) -> Self {
        Self {
            widget_id: Uuid::new_v4(),
            client,
            validator: ImageValidator::new(),
            state: Mutex::new(UploadState::Idle),
            event_bus,
        }
    }

    pub fn widget_id(&self) -> Uuid {
        self.widget_id
    }

    pub async fn phase(&self) -> UploadPhase {
        self.state.lock().await.phase()
    }

    /// Snapshot of the current state
    pub async fn status(&self) -> UploadStatus {
        self.state.lock().await.status()
    }

    /// Submit is enabled only with a selected file
    pub async fn can_submit(&self) -> bool {
        self.phase().await == UploadPhase::Selected
    }

    /// Select (or replace) the candidate file
    ///
    /// Allowed from `Idle` and `Selected`. A rejected file leaves the state
    /// unchanged and raises an error notification with the reasons. The
    /// preview is written on the blocking pool without holding the state lock.
    pub async fn select(&self, file: CandidateFile) -> Result<(), ControllerError> {
        Self::check_selectable(self.phase().await)?;

        if let Err(rejection) = self.validator.validate(&file) {
            info!(
                widget_id = %self.widget_id,
                file_name = %file.name(),
                reasons = %rejection,
                "File rejected"
            );
            self.notify(NotificationLevel::Error, rejection.user_message());
            return Err(ControllerError::Rejected(rejection));
        }

        let file = Arc::new(file);
        let preview = PreviewHandle::create_blocking(Arc::clone(&file)).await?;

        let mut state = self.state.lock().await;

        // A submit may have started while the preview was written
        Self::check_selectable(state.phase())?;

        info!(
            widget_id = %self.widget_id,
            file_name = %file.name(),
            size = file.size(),
            "File selected"
        );

        self.transition(&mut state, UploadState::Selected { file, preview });
        Ok(())
    }

    fn check_selectable(phase: UploadPhase) -> Result<(), ControllerError> {
        match phase {
            UploadPhase::Idle | UploadPhase::Selected => Ok(()),
            phase => Err(ControllerError::InvalidTransition {
                action: "select",
                phase,
            }),
        }
    }

    /// Drop the selection and its preview
    pub async fn clear(&self) -> Result<(), ControllerError> {
        let mut state = self.state.lock().await;

        match state.phase() {
            UploadPhase::Idle => Ok(()),
            UploadPhase::Selected => {
                self.transition(&mut state, UploadState::Idle);
                Ok(())
            }
            phase => Err(ControllerError::InvalidTransition {
                action: "clear",
                phase,
            }),
        }
    }

    /// Return to `Idle` after a result or failure
    pub async fn reset(&self) -> Result<(), ControllerError> {
        let mut state = self.state.lock().await;

        match state.phase() {
            UploadPhase::Idle => Ok(()),
            UploadPhase::Succeeded | UploadPhase::Failed => {
                self.transition(&mut state, UploadState::Idle);
                Ok(())
            }
            phase => Err(ControllerError::InvalidTransition {
                action: "reset",
                phase,
            }),
        }
    }

    /// Analyze the selected file
    ///
    /// Issues at most one request; never returns an error. The state lock is
    /// not held while the request is in flight.
    pub async fn submit(&self) -> SubmitOutcome {
        let file = {
            let mut state = self.state.lock().await;

            let file = match &*state {
                UploadState::Selected { file, .. } => Arc::clone(file),
                UploadState::Idle => return SubmitOutcome::Skipped(SkipReason::NothingSelected),
                UploadState::Submitting { .. } => {
                    debug!(widget_id = %self.widget_id, "Submit ignored, request in flight");
                    return SubmitOutcome::Skipped(SkipReason::AlreadySubmitting);
                }
                other => return SubmitOutcome::Skipped(SkipReason::AwaitingReset(other.phase())),
            };

            self.transition(
                &mut state,
                UploadState::Submitting {
                    file: Arc::clone(&file),
                },
            );
            file
        };

        let result = self.client.analyze(&file).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(response) => {
                let model = DisplayModel::derive(&response);
                self.transition(&mut state, UploadState::Succeeded(model.clone()));
                self.notify(NotificationLevel::Success, ANALYSIS_COMPLETE_MESSAGE.to_string());
                SubmitOutcome::Completed(model)
            }
            Err(e) => {
                if e.is_server_side() {
                    warn!(widget_id = %self.widget_id, error = %e, "Inference service rejected the analysis");
                } else {
                    error!(widget_id = %self.widget_id, error = %e, "Analysis request failed");
                }
                let message = e.user_message();
                self.transition(
                    &mut state,
                    UploadState::Failed {
                        message: message.clone(),
                    },
                );
                self.notify(NotificationLevel::Error, ANALYSIS_FAILED_MESSAGE.to_string());
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Replace the state, releasing whatever the old state owned
    fn transition(&self, state: &mut UploadState, new_state: UploadState) {
        let old_phase = state.phase();
        let new_phase = new_state.phase();
        let old_state = std::mem::replace(state, new_state);
        drop(old_state);

        debug!(
            widget_id = %self.widget_id,
            from = %old_phase,
            to = %new_phase,
            "Upload state transition"
        );

        self.event_bus.emit_lossy(UploadEvent::StateChanged {
            widget_id: self.widget_id,
            old_phase,
            new_phase,
            timestamp: Utc::now(),
        });
    }

    fn notify(&self, level: NotificationLevel, message: String) {
        self.event_bus.emit_lossy(UploadEvent::Notification {
            widget_id: self.widget_id,
            level,
            message,
            timestamp: Utc::now(),
        });
    }
}
