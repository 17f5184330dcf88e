//! Error types for the clause comparison engine.
//!
//! The pipeline recovers locally wherever output is still meaningful:
//! recoverable problems surface as [`crate::model::ExtractionIssue`] values
//! in the result, and only failures that leave nothing to work with are
//! reported through this module.

/// Result type alias for clause-diff operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while driving the extraction pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Requested page is past the end of the document.
    ///
    /// Page sources return this as the end-of-document sentinel; the
    /// extraction loop treats it as normal termination, never as a failure.
    #[error("page {0} is out of range")]
    PageOutOfRange(u32),

    /// A single page could not be read.
    ///
    /// The page is logged and skipped; extraction continues with the rest
    /// of the document.
    #[error("failed to read page {page}: {reason}")]
    Page {
        /// 1-based page number that failed
        page: u32,
        /// Reason for the failure
        reason: String,
    },

    /// The document could not be opened at all.
    #[error("document cannot be opened: {0}")]
    Fatal(String),
}

impl Error {
    /// Whether this error ends the page loop without signalling a failure.
    pub fn is_end_of_document(&self) -> bool {
        matches!(self, Error::PageOutOfRange(_))
    }
}
