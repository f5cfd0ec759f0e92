//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// MIME composition failed.
    #[error("MIME error: {0}")]
    Mime(#[from] groupsend_mime::Error),

    /// Mail transport failed.
    #[error("Transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    /// Archiving sent files failed.
    #[error("Archive error: {0}")]
    Archive(#[from] crate::archive::ArchiveError),

    /// Group table is malformed.
    #[error("Group table error: {0}")]
    Table(String),

    /// The operator declined the send confirmation; the run is aborted.
    #[error("Send declined by operator")]
    Declined,
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
