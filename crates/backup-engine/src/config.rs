//! Backup engine config
//!

use core::time::Duration;
use std::{env, fs, io, path::PathBuf};

use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    auth::{CreateVerifierError, TokenVerifier},
    snapshot::{DockerPostgres, Source},
    transport::{CreateTransportError, HttpTransport},
};

/// The engine's config.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// The name recorded against each destination result.
    pub service_name: String,

    /// The directory ephemeral snapshot files are created in.
    pub temp_directory: PathBuf,

    /// The trust anchor for verifying trigger credentials.
    pub auth: AuthConfig,

    /// The upload transport config.
    pub transport: TransportConfig,

    /// The source to snapshot.
    pub source: Source,
}

impl Config {
    /// Tries to load a config from a toml file.
    pub fn load_toml(file_path: PathBuf) -> Result<Self, LoadConfigError> {
        if !file_path.exists() {
            return Err(LoadConfigError::NoFile);
        }

        let contents = fs::read_to_string(file_path).map_err(LoadConfigError::Read)?;
        let config = toml::from_str(&contents)?;

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "backup".to_string(),
            temp_directory: env::temp_dir(),
            auth: AuthConfig::default(),
            transport: TransportConfig::default(),
            source: Source::DockerPostgres(DockerPostgres::default()),
        }
    }
}

/// The trust anchor config.
///
/// The key lives in a file rather than the binary so it can be rotated
/// without a rebuild.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The path to the PEM encoded RSA public key.
    pub public_key_file: PathBuf,

    /// The single accepted signature algorithm.
    pub algorithm: Algorithm,
}

impl AuthConfig {
    /// Reads the public key and builds a verifier from it.
    pub fn load_verifier(&self) -> Result<TokenVerifier, LoadVerifierError> {
        let public_key = fs::read(&self.public_key_file).map_err(LoadVerifierError::Read)?;
        let verifier = TokenVerifier::from_pem(&public_key, self.algorithm)?;

        Ok(verifier)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            public_key_file: PathBuf::from("./public_key.pem"),
            algorithm: Algorithm::RS256,
        }
    }
}

/// The upload transport config.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransportConfig {
    /// The whole-request timeout for one upload, in seconds.
    pub timeout_seconds: u64,
}

impl TransportConfig {
    /// Builds the HTTP transport from this config.
    pub fn transport(&self) -> Result<HttpTransport, CreateTransportError> {
        HttpTransport::new(Duration::from_secs(self.timeout_seconds))
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 300,
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("The file does not exist.")]
    NoFile,

    #[error("Failed to read the file:\n{0}")]
    Read(#[source] io::Error),

    #[error("Failed to deserialize the file:\n{0}")]
    Deserialize(#[from] toml::de::Error),
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LoadVerifierError {
    #[error("Failed to read the public key file:\n{0}")]
    Read(#[source] io::Error),

    #[error("Failed to create the verifier:\n{0}")]
    CreateVerifier(#[from] CreateVerifierError),
}
