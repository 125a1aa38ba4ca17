use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dispenser::{ConnectionStatus, DispensedItem};

/// Every state change in the dispenser produces an Event.
/// The CLI prints them; the presentation layer may log or render them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// `disconnected -> scanning`
    ScanStarted {
        delay_ms: u64,
        at: DateTime<Utc>,
    },
    /// `scanning -> connected`
    Connected {
        at: DateTime<Utc>,
    },
    /// `connected -> dispensing`
    DispenseStarted {
        delay_ms: u64,
        at: DateTime<Utc>,
    },
    /// `dispensing -> complete`
    DispenseCompleted {
        item: DispensedItem,
        at: DateTime<Utc>,
    },
    /// Any status back to `disconnected`.
    Reset {
        from: ConnectionStatus,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: ConnectionStatus,
        dispensed_item: Option<DispensedItem>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Status the dispenser is in right after this event.
    pub fn status_after(&self) -> ConnectionStatus {
        match self {
            Event::ScanStarted { .. } => ConnectionStatus::Scanning,
            Event::Connected { .. } => ConnectionStatus::Connected,
            Event::DispenseStarted { .. } => ConnectionStatus::Dispensing,
            Event::DispenseCompleted { .. } => ConnectionStatus::Complete,
            Event::Reset { .. } => ConnectionStatus::Disconnected,
            Event::StateSnapshot { status, .. } => *status,
        }
    }
}
