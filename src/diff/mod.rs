//! Multi-granularity text diffing.
//!
//! Word, sentence and paragraph diffs share one pipeline: tokenize both
//! inputs, compute a shortest edit script over the token sequences, map it
//! to tagged tokens, then post-process. Post-processing is where the noise
//! control lives: whitespace-only churn is never reported as change.

pub mod engine;
mod myers;
mod tokenize;

pub use engine::{paragraph_diff, sentence_diff, word_diff};

use serde::{Deserialize, Serialize};

/// Classification of a diff token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    /// Present in both inputs
    Equal,
    /// Present only in the compared input
    Added,
    /// Present only in the base input
    Removed,
}

/// A run of text tagged with how it changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffToken {
    /// The text of the run
    pub value: String,
    /// How the run changed
    pub kind: TokenKind,
}

impl DiffToken {
    /// Create a token.
    pub fn new(value: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    /// Shorthand for an `Equal` token.
    pub fn equal(value: impl Into<String>) -> Self {
        Self::new(value, TokenKind::Equal)
    }

    /// Shorthand for an `Added` token.
    pub fn added(value: impl Into<String>) -> Self {
        Self::new(value, TokenKind::Added)
    }

    /// Shorthand for a `Removed` token.
    pub fn removed(value: impl Into<String>) -> Self {
        Self::new(value, TokenKind::Removed)
    }
}
