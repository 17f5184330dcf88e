//! Extraction data model.
//!
//! Everything here is computed from the input fragments on each invocation
//! of the pipeline and is immutable afterwards. Clauses are owned by their
//! section; comparison rows take value copies (see `compare`).

use serde::{Deserialize, Serialize};

/// Which of the two compared documents an extraction ran for.
///
/// The side only tags issue keys so a caller merging both sides keeps
/// them unique; it has no effect on extraction behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    /// The document diffs are computed against
    Base,
    /// The document being compared to the base
    Compared,
}

impl Side {
    /// Stable lowercase name used in issue keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Base => "base",
            Side::Compared => "compared",
        }
    }
}

/// A node in the extracted clause tree.
///
/// Levels: 1 = root numeric clause, 2 = letter marker under the root,
/// 3 = roman marker, 4 = numeric marker under a roman.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClauseNode {
    /// Canonical hierarchical identifier, e.g. `2(a)(i)`
    pub id: String,
    /// Label exactly as it appeared in the document, e.g. `2(a)` or `(i)`
    pub raw_label: String,
    /// Canonical id of the immediate parent; absent for roots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Nesting level, 1..=4
    pub level: u8,
    /// Full clause text; newlines and leading indent are significant
    pub text_preserved: String,
    /// First 1-based page the clause touches
    pub page_start: u32,
    /// Last 1-based page the clause touches
    pub page_end: u32,
    /// Page used to scroll to the clause
    pub anchor_page: u32,
    /// Y coordinate used to scroll to the clause
    pub anchor_y: f32,
    /// True when the node wraps text that had no recognisable label
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
    /// Number of visual lines that fed this clause
    pub source_line_count: usize,
}

/// Line coverage bookkeeping for one section of one document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionCoverage {
    /// Lines the section contained after noise filtering
    pub total_lines: usize,
    /// Lines consumed into some clause, synthetic clauses included
    pub mapped_lines: usize,
    /// Lines that never reached any clause
    pub unmatched_lines: usize,
    /// `round(1000 * mapped / total) / 10`, or 100.0 for an empty section
    pub percent: f32,
}

impl SectionCoverage {
    /// Build coverage from total and mapped counts.
    pub fn from_counts(total_lines: usize, mapped_lines: usize) -> Self {
        let mapped_lines = mapped_lines.min(total_lines);
        Self {
            total_lines,
            mapped_lines,
            unmatched_lines: total_lines - mapped_lines,
            percent: Self::percent_of(total_lines, mapped_lines),
        }
    }

    /// Merge coverage across sides: counts are summed, percent recomputed.
    pub fn merged_with(&self, other: &SectionCoverage) -> SectionCoverage {
        let total = self.total_lines + other.total_lines;
        let mapped = self.mapped_lines + other.mapped_lines;
        SectionCoverage {
            total_lines: total,
            mapped_lines: mapped,
            unmatched_lines: total - mapped,
            percent: Self::percent_of(total, mapped),
        }
    }

    fn percent_of(total: usize, mapped: usize) -> f32 {
        if total == 0 {
            return 100.0;
        }
        (1000.0 * mapped as f32 / total as f32).round() / 10.0
    }
}

/// A named top-level division of the document with its clause tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedSection {
    /// Header text as it appeared in the document
    pub header: String,
    /// Normalized header used for cross-document matching
    pub normalized_header: String,
    /// Clauses in document order
    pub clauses: Vec<ClauseNode>,
    /// Line coverage for this section
    pub coverage: SectionCoverage,
    /// Canonical id of the first non-synthetic root clause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_paragraph: Option<String>,
    /// Canonical id of the last non-synthetic root clause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_paragraph: Option<String>,
}

impl ExtractedSection {
    /// Whether the section carries any clause text at all.
    pub fn has_text(&self) -> bool {
        self.clauses.iter().any(|c| !c.text_preserved.trim().is_empty())
    }
}

/// Classification of a recoverable extraction problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    /// Two or more clauses share an id within one section
    Duplicate,
    /// A label failed normalization
    Malformed,
    /// A page's text content could not be read
    Unextractable,
    /// Lines that never attached to a clause
    Unmatched,
}

/// A recoverable problem surfaced alongside the extraction result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionIssue {
    /// Unique key, prefixed with the extraction side
    pub key: String,
    /// Label text involved, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_label: Option<String>,
    /// Snippet of the affected text
    pub text: String,
    /// First affected 1-based page
    pub page_start: u32,
    /// Last affected 1-based page
    pub page_end: u32,
    /// Flags describing the problem
    pub extraction_flags: Vec<IssueKind>,
}

/// The full extraction result for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDocument {
    /// Sections in document order
    pub sections: Vec<ExtractedSection>,
    /// Recoverable problems encountered during extraction
    pub issues: Vec<ExtractionIssue>,
}

impl ExtractedDocument {
    /// Whether nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
