//! Transports that write a snapshot stream to a destination URL.
//!

use core::fmt::Display;
use std::io::Read;

mod http;

pub use http::{CreateTransportError, HttpTransport};

/// A blocking upload mechanism.
pub trait Transport: Send + Sync {
    /// Error variants for transport-level failures.
    type Error: Display;

    /// Write `body` to `url`, returning the response status code.
    ///
    /// A non-2xx status is not an error at this boundary, the caller decides
    /// how to treat it.
    fn put(
        &self,
        url: &str,
        body: Box<dyn Read + Send>,
        content_length: u64,
    ) -> Result<u16, Self::Error>;

    /// The transport kind identifier, recorded against each destination.
    fn kind(&self) -> &str;
}
