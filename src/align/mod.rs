//! Cross-document alignment.
//!
//! Sections pair by normalized header, clauses pair by canonical id.
//! Alignment is purely structural: no fuzzy matching, no content
//! similarity. Anything structurally ambiguous is surfaced as such rather
//! than guessed at.

pub mod clauses;
pub mod sections;

pub use clauses::{align_clauses, ComparisonRow, RowStatus, AMBIGUOUS_EXPLANATION};
pub use sections::{align_sections, AlignedSection, SectionStatus};
