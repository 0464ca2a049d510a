//! # common
//!

use core::time::Duration;
use std::{
    collections::HashMap,
    env, fs,
    io::Read,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread::sleep,
};

use backup_engine::{BackupStore, UploadCoordinator, snapshot::Snapshotter, transport::Transport};

/// A snapshot source that records how often it is invoked.
#[derive(Clone)]
pub struct ScriptedSnapshotter {
    pub payload_bytes: u64,
    pub fail: bool,
    pub dumps: Arc<AtomicUsize>,
}

impl ScriptedSnapshotter {
    pub fn new(payload_bytes: u64) -> Self {
        Self {
            payload_bytes,
            fail: false,
            dumps: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            payload_bytes: 0,
            fail: true,
            dumps: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn dump_count(&self) -> usize {
        self.dumps.load(Ordering::SeqCst)
    }
}

impl Snapshotter for ScriptedSnapshotter {
    type Error = String;

    fn dump(&self, path: &Path) -> Result<(), Self::Error> {
        self.dumps.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err("dump failed".to_string());
        }

        let payload_bytes = usize::try_from(self.payload_bytes).unwrap();
        fs::write(path, vec![0u8; payload_bytes]).map_err(|error| error.to_string())
    }
}

/// How a [`ScriptedTransport`] responds to an upload for a given URL.
#[derive(Clone)]
pub enum ScriptedResponse {
    Status(u16),
    DelayedStatus(Duration, u16),
    Error(String),
}

/// A transport that responds from a per-URL script and records every call.
///
/// URLs without a scripted response get a 200. Clones share the call log.
#[derive(Clone)]
pub struct ScriptedTransport {
    responses: HashMap<String, ScriptedResponse>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn respond(mut self, url: &str, response: ScriptedResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    type Error = String;

    fn put(
        &self,
        url: &str,
        mut body: Box<dyn Read + Send>,
        _content_length: u64,
    ) -> Result<u16, Self::Error> {
        // Drain the stream like a real upload would.
        let mut contents = Vec::new();
        body.read_to_end(&mut contents)
            .map_err(|error| error.to_string())?;

        self.calls.lock().unwrap().push(url.to_string());

        match self.responses.get(url) {
            Some(ScriptedResponse::Status(status)) => Ok(*status),
            Some(ScriptedResponse::DelayedStatus(delay, status)) => {
                sleep(*delay);
                Ok(*status)
            }
            Some(ScriptedResponse::Error(message)) => Err(message.clone()),
            None => Ok(200),
        }
    }

    fn kind(&self) -> &str {
        "http"
    }
}

/// A fresh empty directory for one test's ephemeral snapshot files.
pub fn test_directory(name: &str) -> PathBuf {
    let directory = env::temp_dir().join("backup-engine-tests").join(name);

    let _ = fs::remove_dir_all(&directory);
    fs::create_dir_all(&directory).unwrap();

    directory
}

/// True iff `directory` contains no entries.
pub fn directory_is_empty(directory: &Path) -> bool {
    fs::read_dir(directory).unwrap().next().is_none()
}

pub fn test_coordinator(
    snapshotter: ScriptedSnapshotter,
    transport: ScriptedTransport,
    temp_directory: PathBuf,
) -> (
    UploadCoordinator<ScriptedSnapshotter, ScriptedTransport>,
    Arc<BackupStore>,
) {
    let store = Arc::new(BackupStore::new());
    let coordinator = UploadCoordinator::new(
        snapshotter,
        transport,
        Arc::clone(&store),
        "test".to_string(),
        temp_directory,
    );

    (coordinator, store)
}
