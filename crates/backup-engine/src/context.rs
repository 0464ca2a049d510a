//! Context for the current backup. Used for prefixing logs.
//!

use core::fmt;

/// Holds the context for the current backup operation.
#[derive(Debug)]
pub struct Context {
    /// The service being backed up.
    pub service_name: String,

    /// The current stage of the operation.
    pub current_context: &'static str,
}

impl Context {
    /// Creates a context for a new operation.
    pub fn new(service_name: String) -> Self {
        Self {
            service_name,
            current_context: "",
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] [{}] ", self.service_name, self.current_context)
    }
}
