//! # backup-engine
//! Verifies backup-trigger credentials, snapshots the database, and replicates
//! the snapshot to a set of destinations in parallel.
//!

pub mod auth;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod snapshot;
pub mod store;
pub mod transport;

pub use auth::{AuthenticationError, Claims, TokenVerifier};
pub use coordinator::{BackupError, UploadCoordinator};
pub use store::{BackupRecord, BackupStore, DestinationResult, DestinationStatus, NoBackupError};
