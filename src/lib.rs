#![warn(missing_docs)]

//! # clause-diff
//!
//! Comparison engine for numbered regulatory documents (IFRS/AASB-style
//! standards). Given two documents as streams of positioned text
//! fragments, the crate:
//!
//! 1. Reconstructs visual lines from positioned fragments and strips
//!    repeated page furniture and superscript noise.
//! 2. Segments the text into named sections and nested clauses
//!    (`1`, `2(a)`, `2(a)(i)`, `2(a)(i)(3)`), cutting appendices off.
//! 3. Aligns sections by header and clauses by normalized identifier.
//! 4. Produces word, sentence and paragraph diffs per clause, plus
//!    section-level coverage statistics and navigation anchors.
//!
//! PDF parsing itself is out of scope: the pipeline consumes fragments
//! through the [`source::PageSource`] trait, so any PDF text extractor
//! can feed it. Everything downstream is pure and deterministic; the two
//! extractions of a comparison can safely run in parallel since they
//! share nothing.
//!
//! ## Quick start
//!
//! ```
//! use clause_diff::config::CompareConfig;
//! use clause_diff::compare::compare;
//! use clause_diff::extract::extract_document;
//! use clause_diff::model::Side;
//! use clause_diff::source::{MemoryPageSource, PageText, PositionedFragment};
//!
//! # fn main() -> Result<(), clause_diff::error::Error> {
//! let page = PageText {
//!     number: 1,
//!     width: 595.0,
//!     height: 842.0,
//!     fragments: vec![PositionedFragment::new(
//!         "1. The entity shall disclose its targets.",
//!         40.0, 700.0, 210.0, 10.0,
//!     )],
//! };
//! let config = CompareConfig::default();
//! let mut source = MemoryPageSource::new(vec![page]);
//!
//! let base = extract_document(&mut source.clone(), Side::Base, &config)?;
//! let compared = extract_document(&mut source, Side::Compared, &config)?;
//! let result = compare(&base, &compared);
//! assert!(result.rows.iter().all(|row| {
//!     row.status == clause_diff::align::RowStatus::Unchanged
//! }));
//! # Ok(())
//! # }
//! ```

pub mod align;
pub mod compare;
pub mod config;
pub mod diff;
pub mod error;
pub mod extract;
pub mod layout;
pub mod model;
pub mod normalize;
pub mod parse;
pub mod source;

pub use align::{ComparisonRow, RowStatus, SectionStatus};
pub use compare::{compare, ComparisonResult};
pub use config::CompareConfig;
pub use diff::{DiffToken, TokenKind};
pub use error::{Error, Result};
pub use extract::extract_document;
pub use model::{ClauseNode, ExtractedDocument, ExtractedSection, Side};
pub use source::{MemoryPageSource, PageSource, PageText, PositionedFragment};
