use core::num::TryFromIntError;
use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Snapshotter;

/// Mock a snapshot source.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Mock {
    /// The number of zero bytes to write.
    pub payload_bytes: u64,
}

impl Default for Mock {
    fn default() -> Self {
        Self { payload_bytes: 512 }
    }
}

impl Snapshotter for Mock {
    type Error = MockError;

    fn dump(&self, path: &Path) -> Result<(), Self::Error> {
        let payload_bytes = usize::try_from(self.payload_bytes)?;
        fs::write(path, vec![0u8; payload_bytes]).map_err(MockError::WriteDump)?;

        Ok(())
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum MockError {
    #[error("Payload was larger than usize::MAX: {0}")]
    PayloadTooLarge(#[from] TryFromIntError),

    #[error("Failed to write the dump:\n{0}")]
    WriteDump(#[source] io::Error),
}
