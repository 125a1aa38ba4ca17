//! Dispenser status model and supplement catalog.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Phase of the simulated device-connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Scanning,
    Connected,
    Dispensing,
    Complete,
}

impl ConnectionStatus {
    /// Label shown by the presentation layer.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "Dispenser Disconnected",
            ConnectionStatus::Scanning => "Scanning for Dispenser...",
            ConnectionStatus::Connected => "Dispenser Connected",
            ConnectionStatus::Dispensing => "Dispensing Supplement...",
            ConnectionStatus::Complete => "Supplement Dispensed!",
        }
    }

    /// True while a timed transition is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            ConnectionStatus::Scanning | ConnectionStatus::Dispensing
        )
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Scanning => "scanning",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Dispensing => "dispensing",
            ConnectionStatus::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// Supplement record produced at the end of a dispense cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DispensedItem {
    pub name: String,
    pub amount: String,
}

impl DispensedItem {
    pub fn new(name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
        }
    }
}

/// Supplements eligible for random selection, as `(name, amount)`.
pub const CATALOG: [(&str, &str); 4] = [
    ("Vitamin D", "1000 IU"),
    ("Magnesium", "250 mg"),
    ("Multivitamin", "1 tablet"),
    ("Omega-3", "500 mg"),
];

/// Owned copy of the whole catalog.
pub fn catalog() -> Vec<DispensedItem> {
    CATALOG
        .iter()
        .map(|(name, amount)| DispensedItem::new(*name, *amount))
        .collect()
}

/// Fixed delays for the two timed transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispenserTimings {
    /// `scanning -> connected`
    pub scan_delay: Duration,
    /// `dispensing -> complete`
    pub dispense_delay: Duration,
}

impl DispenserTimings {
    pub const DEFAULT_SCAN_DELAY_MS: u64 = 2000;
    pub const DEFAULT_DISPENSE_DELAY_MS: u64 = 3000;

    pub fn from_millis(scan_ms: u64, dispense_ms: u64) -> Self {
        Self {
            scan_delay: Duration::from_millis(scan_ms),
            dispense_delay: Duration::from_millis(dispense_ms),
        }
    }
}

impl Default for DispenserTimings {
    fn default() -> Self {
        Self::from_millis(Self::DEFAULT_SCAN_DELAY_MS, Self::DEFAULT_DISPENSE_DELAY_MS)
    }
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DispenserSnapshot {
    pub status: ConnectionStatus,
    pub dispensed_item: Option<DispensedItem>,
}
