//! Orchestrates one backup: snapshot, parallel fan-out upload, aggregation.
//!

use std::{
    fs::{self, File},
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    thread,
};

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    context::Context,
    snapshot::Snapshotter,
    store::{BackupRecord, BackupStore, DestinationResult},
    transport::Transport,
};

/// Distinguishes snapshot files created by backups racing within one
/// timestamp tick.
static SNAPSHOT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Coordinates snapshot creation and replication to a set of destinations.
pub struct UploadCoordinator<Snapshot, Upload> {
    snapshotter: Snapshot,
    transport: Upload,
    store: Arc<BackupStore>,
    service_name: String,
    temp_directory: PathBuf,
}

impl<Snapshot: Snapshotter + Sync, Upload: Transport> UploadCoordinator<Snapshot, Upload> {
    /// Creates a coordinator.
    pub fn new(
        snapshotter: Snapshot,
        transport: Upload,
        store: Arc<BackupStore>,
        service_name: String,
        temp_directory: PathBuf,
    ) -> Self {
        Self {
            snapshotter,
            transport,
            store,
            service_name,
            temp_directory,
        }
    }

    /// Snapshots the database and uploads the snapshot to every URL in
    /// parallel.
    ///
    /// Every destination is attempted exactly once, a failed upload neither
    /// cancels nor blocks its siblings. The returned record's destinations are
    /// in the same order as `urls` regardless of completion order. The record
    /// is placed in the store before this returns, including when some
    /// destinations failed and [`BackupError::DestinationsFailed`] is
    /// returned, so `latest` can still serve the partial record. The ephemeral
    /// snapshot file is removed on every exit path.
    pub fn perform(&self, urls: &[String]) -> Result<BackupRecord, BackupError> {
        let mut context = Context::new(self.service_name.clone());

        context.current_context = "Validate";
        if urls.is_empty() {
            warn!("{context}No URLs provided");
            return Err(BackupError::NoUrls);
        }

        let timestamp = Utc::now();

        // Removed on every exit path below, including the `?`s.
        let snapshot = TempFile {
            path: self.temp_directory.join(format!(
                "{}.{}.{}.sql.gz",
                timestamp.format("%Y-%m-%d_%H-%M-%S%.9f"),
                std::process::id(),
                SNAPSHOT_COUNTER.fetch_add(1, Ordering::Relaxed),
            )),
        };

        context.current_context = "Snapshot";
        self.snapshotter.dump(&snapshot.path).map_err(|snapshot_error| {
            error!("{context}Failed to create the snapshot: {snapshot_error}");
            BackupError::Snapshot(snapshot_error.to_string())
        })?;

        let size = fs::metadata(&snapshot.path)
            .inspect_err(|e| error!("{context}Could not read the snapshot metadata: {e}"))
            .map_err(BackupError::SnapshotMetadata)?
            .len();
        info!("{context}Created snapshot, {size} bytes");

        context.current_context = "Upload";
        let destinations: Vec<DestinationResult> = thread::scope(|scope| {
            let handles: Vec<_> = urls
                .iter()
                .map(|url| {
                    let url = url.as_str();
                    let path = snapshot.path.as_path();
                    scope.spawn(move || self.upload(url, path, size))
                })
                .collect();

            // Joining in spawn order keeps the results positionally aligned
            // with the input URLs.
            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        DestinationResult::failed(
                            self.service_name.clone(),
                            self.transport.kind().to_string(),
                            "Upload task panicked.".to_string(),
                        )
                    })
                })
                .collect()
        });

        drop(snapshot);

        let failures: Vec<String> = destinations
            .iter()
            .filter_map(|destination| destination.error.clone())
            .collect();

        let record = BackupRecord {
            timestamp,
            size,
            destinations,
        };

        // A partial success still replaces the latest record.
        self.store.store(record.clone());

        if !failures.is_empty() {
            warn!("{context}{} of {} destinations failed", failures.len(), urls.len());
            return Err(BackupError::DestinationsFailed(failures.join(", ")));
        }

        info!("{context}Backup complete");
        Ok(record)
    }

    /// Upload the snapshot to one destination.
    ///
    /// Transport failures are captured into the result, never propagated.
    fn upload(&self, url: &str, path: &Path, size: u64) -> DestinationResult {
        let name = self.service_name.clone();
        let kind = self.transport.kind().to_string();

        let file = match File::open(path) {
            Ok(file) => file,
            Err(open_error) => {
                error!("Could not open the snapshot for {url}: {open_error}");
                return DestinationResult::failed(
                    name,
                    kind,
                    format!("Failed to open the snapshot: {open_error}"),
                );
            }
        };

        match self.transport.put(url, Box::new(file), size) {
            Ok(status) if (200..300).contains(&status) => {
                info!("Uploaded snapshot to {url}");
                DestinationResult::success(name, kind)
            }
            Ok(status) => {
                warn!("Upload to {url} failed with status {status}");
                DestinationResult::failed(name, kind, format!("Upload failed with status {status}"))
            }
            Err(transport_error) => {
                warn!("Upload to {url} failed: {transport_error}");
                DestinationResult::failed(name, kind, format!("Upload failed: {transport_error}"))
            }
        }
    }
}

/// Deletes the file at `path` when dropped.
struct TempFile {
    path: PathBuf,
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if let Err(error) = fs::remove_file(&self.path) {
            if error.kind() != ErrorKind::NotFound {
                warn!("Could not remove the snapshot file {:?}: {error}", self.path);
            }
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("No URLs provided.")]
    NoUrls,

    #[error("Failed to create the snapshot:\n{0}")]
    Snapshot(String),

    #[error("Failed to read the snapshot metadata:\n{0}")]
    SnapshotMetadata(#[source] io::Error),

    #[error("Some destinations failed: {0}")]
    DestinationsFailed(String),
}
