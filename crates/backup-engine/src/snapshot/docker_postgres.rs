use std::{fs, io, path::Path, process::Command};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Snapshotter;

/// Dump a database from a postgres docker container.
#[derive(Default, Debug, Clone, Deserialize, Serialize)]
pub struct DockerPostgres {
    /// The name of the container.
    pub container_name: String,
    /// The postgres username.
    pub postgres_username: String,
    /// The postgres database.
    pub postgres_database: String,
}

impl Snapshotter for DockerPostgres {
    type Error = DockerPostgresError;

    fn dump(&self, path: &Path) -> Result<(), Self::Error> {
        let output = Command::new("docker")
            .args([
                "exec",
                &self.container_name,
                "pg_dump",
                "-U",
                &self.postgres_username,
                "-d",
                &self.postgres_database,
            ])
            .output()
            .map_err(DockerPostgresError::RunCommand)?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(DockerPostgresError::CommandErrored(error));
        }

        fs::write(path, &output.stdout).map_err(DockerPostgresError::WriteDump)?;

        Ok(())
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum DockerPostgresError {
    #[error("Failed to run command:\n{0}")]
    RunCommand(#[source] io::Error),

    #[error("Command output was error:\n{0}")]
    CommandErrored(String),

    #[error("Failed to write the dump:\n{0}")]
    WriteDump(#[source] io::Error),
}
