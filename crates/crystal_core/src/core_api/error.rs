use std::io;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CoreErrorCode {
    Io,
    Format,
    InvalidSlot,
    InvalidEncoding,
    PocketFull,
    UnknownField,
    ChecksumMismatch,
    BothBanksCorrupt,
    ChecksumsStale,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?}: {message}")]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Local errors reject one edit and leave the transaction untouched.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.code,
            CoreErrorCode::InvalidSlot
                | CoreErrorCode::InvalidEncoding
                | CoreErrorCode::PocketFull
                | CoreErrorCode::UnknownField
        )
    }
}

impl From<io::Error> for CoreError {
    fn from(err: io::Error) -> Self {
        Self::new(CoreErrorCode::Io, err.to_string())
    }
}
