use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed calculation kept for replay.
///
/// Stored as `{"operation": .., "result": .., "timestamp": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "operation")]
    pub operation_label: String,
    pub result: f64,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    #[must_use]
    pub fn new(operation_label: impl Into<String>, result: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            operation_label: operation_label.into(),
            result,
            timestamp,
        }
    }
}
