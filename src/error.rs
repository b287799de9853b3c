//! Error types

use std::io;
use thiserror::Error;

pub type RingResult<T> = Result<T, RingError>;

#[derive(Debug, Error)]
pub enum RingError {
    /// Operasi producer (push, hook, wait, close) setelah close diminta.
    #[error("ring buffer is closed")]
    Closed,

    #[error("{what} must be greater than zero")]
    ZeroCapacity { what: &'static str },

    #[error("failed to spawn ring worker thread: {0}")]
    Spawn(#[source] io::Error),
}

impl RingError {
    pub fn is_closed(&self) -> bool {
        matches!(self, RingError::Closed)
    }
}
