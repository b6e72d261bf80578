//! Error types for biolume_io.
//!
//! Transport failures keep the distinct classes a gene-transfer caller needs to
//! tell apart. An empty inbox is not among them: sources report it as
//! `Ok(None)`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    /// Reading from the transport failed.
    #[error("Read error: {0}")]
    Read(#[source] std::io::Error),

    /// Writing to the transport failed.
    #[error("Write error: {0}")]
    Write(#[source] std::io::Error),

    /// The transport ended partway through a packet.
    #[error("Short read: expected {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },

    /// The peer end of an in-process link was dropped.
    #[error("Peer disconnected")]
    Disconnected,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    #[must_use]
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::Serialization(msg.into())
    }

    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether the failure concerns the transport link rather than stored data.
    ///
    /// Transport failures are never fatal to a node; it keeps stepping its
    /// current genome.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Read(_) | Self::Write(_) | Self::ShortRead { .. } | Self::Disconnected => true,
            Self::Context { source, .. } => source.is_transport(),
            _ => false,
        }
    }
}
