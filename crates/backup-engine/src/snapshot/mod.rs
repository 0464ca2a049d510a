//! Snapshot sources that materialize a database dump at a path.
//!

use core::fmt::{Debug, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod docker_postgres;
mod mock;

pub use docker_postgres::{DockerPostgres, DockerPostgresError};
pub use mock::{Mock, MockError};

/// A source that can dump the database to a path.
///
/// On success a complete, fully flushed artifact exists at `path`. On failure
/// no partial file is guaranteed to exist.
pub trait Snapshotter {
    /// Error variants.
    type Error: Display;

    /// Materialize a dump at `path`.
    fn dump(&self, path: &Path) -> Result<(), Self::Error>;
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum Source {
    DockerPostgres(DockerPostgres),
    Mock(Mock),
}

impl Snapshotter for Source {
    type Error = SourceError;

    fn dump(&self, path: &Path) -> Result<(), Self::Error> {
        match self {
            Self::DockerPostgres(source) => source.dump(path).map_err(SourceError::from),
            Self::Mock(source) => source.dump(path).map_err(SourceError::from),
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    DockerPostgres(#[from] DockerPostgresError),

    #[error(transparent)]
    Mock(#[from] MockError),
}
