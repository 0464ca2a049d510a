//! The in-memory record of the most recent backup.
//!

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The outcome of one destination upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationResult {
    /// Display label for the destination.
    pub name: String,

    /// The transport kind used to reach the destination.
    #[serde(rename = "type")]
    pub kind: String,

    /// Whether the upload succeeded.
    pub status: DestinationStatus,

    /// The failure message, present iff `status` is [`DestinationStatus::Failed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DestinationResult {
    /// A successful upload.
    pub fn success(name: String, kind: String) -> Self {
        Self {
            name,
            kind,
            status: DestinationStatus::Success,
            error: None,
        }
    }

    /// A failed upload.
    pub fn failed(name: String, kind: String, error: String) -> Self {
        Self {
            name,
            kind,
            status: DestinationStatus::Failed,
            error: Some(error),
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationStatus {
    Success,
    Failed,
}

/// The record of one completed backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    /// When the snapshot was taken, UTC.
    pub timestamp: DateTime<Utc>,

    /// Size of the snapshot artifact in bytes.
    pub size: u64,

    /// Per-destination outcomes, in the same order as the requested URLs.
    pub destinations: Vec<DestinationResult>,
}

/// Holds the most recent [`BackupRecord`].
///
/// Holds at most one record, overwritten by every completed backup including
/// partially failed ones. Not persisted across restarts.
#[derive(Debug, Default)]
pub struct BackupStore {
    slot: RwLock<Option<BackupRecord>>,
}

impl BackupStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replaces the latest record.
    pub fn store(&self, record: BackupRecord) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(record);
    }

    /// The most recent record.
    pub fn latest(&self) -> Result<BackupRecord, NoBackupError> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.clone().ok_or(NoBackupError)
    }
}

/// No backup has completed since the process started.
#[derive(Debug, Error)]
#[error("No backups found.")]
pub struct NoBackupError;
