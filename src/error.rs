//! Ошибки декодера. Три вида, все фатальные для текущей операции.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Structural violation: the bytes are not a file this decoder understands.
    #[error("format error: {0}")]
    Format(String),

    /// Short read or seek failure against the backing store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Exact-key lookup found nothing (or an unknown table/index name).
    #[error("not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }

    pub(crate) fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    #[inline]
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }

    #[inline]
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Bail out with a `Format` error (like `anyhow::bail!`).
macro_rules! bail_format {
    ($($arg:tt)*) => {
        return Err($crate::error::Error::Format(format!($($arg)*)))
    };
}
pub(crate) use bail_format;
