//! Event system for drscan
//!
//! Upload controllers publish state transitions and user-facing notifications
//! on an [`EventBus`]. Front ends subscribe to render toasts and progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Phase of a single upload widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    /// Nothing selected
    Idle,
    /// Accepted file selected, preview available
    Selected,
    /// Analysis request in flight
    Submitting,
    /// Analysis finished, display model ready
    Succeeded,
    /// Analysis failed with a user-facing message
    Failed,
}

impl UploadPhase {
    /// Terminal phases require `reset()` before the next selection
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadPhase::Succeeded | UploadPhase::Failed)
    }
}

impl std::fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UploadPhase::Idle => "idle",
            UploadPhase::Selected => "selected",
            UploadPhase::Submitting => "submitting",
            UploadPhase::Succeeded => "succeeded",
            UploadPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Notification severity, mirrors a toast style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Upload widget events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UploadEvent {
    /// Widget moved between phases
    StateChanged {
        widget_id: Uuid,
        old_phase: UploadPhase,
        new_phase: UploadPhase,
        timestamp: DateTime<Utc>,
    },

    /// Transient message for the user
    Notification {
        widget_id: Uuid,
        level: NotificationLevel,
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl UploadEvent {
    pub fn widget_id(&self) -> Uuid {
        match self {
            UploadEvent::StateChanged { widget_id, .. } => *widget_id,
            UploadEvent::Notification { widget_id, .. } => *widget_id,
        }
    }
}

/// Broadcast channel for [`UploadEvent`]s
///
/// Cloning the bus shares the underlying channel. Events emitted before a
/// subscription are not delivered to it.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<UploadEvent>,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<UploadEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(&self, event: UploadEvent) -> Result<usize, broadcast::error::SendError<UploadEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: UploadEvent) {
        let _ = self.tx.send(event);
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}
