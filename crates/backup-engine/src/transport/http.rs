use core::time::Duration;
use std::io::Read;

use reqwest::blocking::{Body, Client};
use thiserror::Error;

use super::Transport;

/// Upload over HTTP(S) with a blocking PUT.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport whose requests are bounded by `timeout`.
    ///
    /// The timeout covers the whole request, an unresponsive destination fails
    /// that destination rather than stalling the backup forever.
    pub fn new(timeout: Duration) -> Result<Self, CreateTransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CreateTransportError::BuildClient)?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    type Error = reqwest::Error;

    fn put(
        &self,
        url: &str,
        body: Box<dyn Read + Send>,
        content_length: u64,
    ) -> Result<u16, Self::Error> {
        let response = self
            .client
            .put(url)
            .body(Body::sized(body, content_length))
            .send()?;

        Ok(response.status().as_u16())
    }

    fn kind(&self) -> &str {
        "http"
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum CreateTransportError {
    #[error("Failed to build the HTTP client:\n{0}")]
    BuildClient(#[source] reqwest::Error),
}
