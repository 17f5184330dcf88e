//! Comparison assembly.
//!
//! Joins the aligners' output into the final result: per-section rows,
//! page ranges for the viewer's scroll sync, navigation anchors with
//! change snippets, and coverage merged across the two sides.

use serde::{Deserialize, Serialize};

use crate::align::{align_clauses, align_sections, ComparisonRow, RowStatus, SectionStatus};
use crate::diff::TokenKind;
use crate::model::{ClauseNode, ExtractedDocument, SectionCoverage};

/// Longest snippet carried by a navigation anchor.
const SNIPPET_MAX_LEN: usize = 180;

/// Fallback Y for a compared-side anchor when a section has no clause to
/// borrow a position from (top of the page body in the calibrated corpus).
const FALLBACK_ANCHOR_Y: f32 = 780.0;

/// A 1-based page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRange {
    /// First page
    pub page_start: u32,
    /// Last page
    pub page_end: u32,
}

/// Per-side page ranges of one section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPageInfo {
    /// Section header the ranges belong to
    pub header: String,
    /// Pages the base-side section covers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<PageRange>,
    /// Pages the compared-side section covers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compared: Option<PageRange>,
}

/// A scroll position in one document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorPoint {
    /// 1-based page
    pub page: u32,
    /// Y coordinate on the page
    pub y: f32,
}

/// A navigation anchor for one comparison row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionAnchor {
    /// Header of the section the row belongs to
    pub section_header: String,
    /// Globally unique anchor id: `<header>::<row key>`
    pub anchor_id: String,
    /// Display label of the row
    pub label: String,
    /// Scroll position in the base document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<AnchorPoint>,
    /// Scroll position in the compared document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compared: Option<AnchorPoint>,
    /// Row status the anchor decorates
    pub status: RowStatus,
    /// Collapsed excerpt of the removed text, for changed/removed rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_snippet: Option<String>,
    /// Collapsed excerpt of the added text, for changed/added rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_snippet: Option<String>,
}

/// Summary entry for one compared section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSection {
    /// Section header
    pub header: String,
    /// Pairing outcome for the header
    pub status: SectionStatus,
    /// Coverage summed across both sides
    pub coverage: SectionCoverage,
}

/// The full output of comparing two extracted documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// Section summaries in alignment order
    pub sections: Vec<ComparisonSection>,
    /// Per-section page ranges for scroll sync
    pub section_page_map: Vec<SectionPageInfo>,
    /// Navigation anchors, one per row
    pub section_anchors: Vec<SectionAnchor>,
    /// All rows, keys prefixed `<header>::` for global uniqueness
    pub rows: Vec<ComparisonRow>,
    /// Header the viewer should open on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_section_default: Option<String>,
}

impl ComparisonResult {
    /// Whether the comparison produced nothing at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Find a row by its flat (prefixed) key.
    pub fn row(&self, key: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|row| row.key == key)
    }
}

/// Compare two extracted documents.
///
/// Pure: no I/O, deterministic for identical inputs.
pub fn compare(base: &ExtractedDocument, compared: &ExtractedDocument) -> ComparisonResult {
    let aligned = align_sections(base, compared);

    let mut sections = Vec::new();
    let mut section_page_map = Vec::new();
    let mut section_anchors = Vec::new();
    let mut flat_rows = Vec::new();

    for entry in &aligned {
        let base_empty = entry.base.map_or(true, |s| s.clauses.is_empty() && !s.has_text());
        let compared_empty = entry.compared.map_or(true, |s| s.clauses.is_empty() && !s.has_text());
        if base_empty && compared_empty {
            continue;
        }

        let rows = align_clauses(entry.base, entry.compared);

        section_page_map.push(SectionPageInfo {
            header: entry.header.clone(),
            base: entry.base.and_then(|s| clause_page_range(&s.clauses)),
            compared: entry.compared.and_then(|s| clause_page_range(&s.clauses)),
        });

        let compared_section_start = entry
            .compared
            .and_then(|s| clause_page_range(&s.clauses))
            .map(|range| AnchorPoint {
                page: range.page_start,
                y: FALLBACK_ANCHOR_Y,
            });
        for (index, row) in rows.iter().enumerate() {
            section_anchors.push(build_anchor(&entry.header, &rows, index, row, compared_section_start));
        }

        sections.push(ComparisonSection {
            header: entry.header.clone(),
            status: entry.status,
            coverage: merged_coverage(entry.base.map(|s| s.coverage), entry.compared.map(|s| s.coverage)),
        });

        flat_rows.extend(rows.into_iter().map(|mut row| {
            row.key = format!("{}::{}", entry.header, row.key);
            row
        }));
    }

    let selected_section_default = sections
        .iter()
        .find(|s| s.status == SectionStatus::Matched)
        .or_else(|| sections.first())
        .map(|s| s.header.clone());

    ComparisonResult {
        sections,
        section_page_map,
        section_anchors,
        rows: flat_rows,
        selected_section_default,
    }
}

fn merged_coverage(
    base: Option<SectionCoverage>,
    compared: Option<SectionCoverage>,
) -> SectionCoverage {
    let empty = SectionCoverage::from_counts(0, 0);
    match (base, compared) {
        (Some(b), Some(c)) => b.merged_with(&c),
        (Some(b), None) => b,
        (None, Some(c)) => c,
        (None, None) => empty,
    }
}

fn clause_page_range(clauses: &[ClauseNode]) -> Option<PageRange> {
    let page_start = clauses.iter().map(|c| c.page_start).min()?;
    let page_end = clauses.iter().map(|c| c.page_end).max()?;
    Some(PageRange { page_start, page_end })
}

fn build_anchor(
    header: &str,
    rows: &[ComparisonRow],
    index: usize,
    row: &ComparisonRow,
    compared_section_start: Option<AnchorPoint>,
) -> SectionAnchor {
    let compared = match anchor_of(row.compared.as_ref()) {
        Some(point) => Some(point),
        None => nearest_compared_anchor(rows, index).or(compared_section_start),
    };

    SectionAnchor {
        section_header: header.to_string(),
        anchor_id: format!("{}::{}", header, row.key),
        label: row.display_label.clone(),
        base: anchor_of(row.base.as_ref()),
        compared,
        status: row.status,
        removed_snippet: matches!(row.status, RowStatus::Changed | RowStatus::Removed)
            .then(|| snippet_of(&row.diff_word, TokenKind::Removed))
            .flatten(),
        added_snippet: matches!(row.status, RowStatus::Changed | RowStatus::Added)
            .then(|| snippet_of(&row.diff_word, TokenKind::Added))
            .flatten(),
    }
}

fn anchor_of(clause: Option<&ClauseNode>) -> Option<AnchorPoint> {
    clause.map(|c| AnchorPoint {
        page: c.anchor_page,
        y: c.anchor_y,
    })
}

/// Nearest row (by outward scan) that carries a compared-side clause.
fn nearest_compared_anchor(rows: &[ComparisonRow], index: usize) -> Option<AnchorPoint> {
    for distance in 1..rows.len() {
        if index >= distance {
            if let Some(point) = anchor_of(rows[index - distance].compared.as_ref()) {
                return Some(point);
            }
        }
        if let Some(neighbour) = rows.get(index + distance) {
            if let Some(point) = anchor_of(neighbour.compared.as_ref()) {
                return Some(point);
            }
        }
    }
    None
}

/// Concatenate one kind's token values, collapse whitespace, cap length.
fn snippet_of(tokens: &[crate::diff::DiffToken], kind: TokenKind) -> Option<String> {
    let joined: String = tokens
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.value.as_str())
        .collect();
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    if collapsed.chars().count() > SNIPPET_MAX_LEN {
        let truncated: String = collapsed.chars().take(SNIPPET_MAX_LEN).collect();
        Some(format!("{}\u{2026}", truncated))
    } else {
        Some(collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExtractedSection, ExtractionIssue};

    fn clause(id: &str, text: &str, page: u32, y: f32) -> ClauseNode {
        ClauseNode {
            id: id.to_string(),
            raw_label: id.to_string(),
            parent_id: None,
            level: 1,
            text_preserved: text.to_string(),
            page_start: page,
            page_end: page,
            anchor_page: page,
            anchor_y: y,
            synthetic: false,
            source_line_count: 1,
        }
    }

    fn section(header: &str, clauses: Vec<ClauseNode>) -> ExtractedSection {
        let count = clauses.len();
        ExtractedSection {
            header: header.to_string(),
            normalized_header: header.to_lowercase(),
            coverage: SectionCoverage::from_counts(count, count),
            clauses,
            start_paragraph: None,
            end_paragraph: None,
        }
    }

    fn document(sections: Vec<ExtractedSection>) -> ExtractedDocument {
        ExtractedDocument {
            sections,
            issues: Vec::<ExtractionIssue>::new(),
        }
    }

    #[test]
    fn test_empty_inputs_produce_empty_result() {
        let result = compare(&document(vec![]), &document(vec![]));
        assert!(result.is_empty());
        assert!(result.rows.is_empty());
        assert!(result.section_anchors.is_empty());
        assert!(result.selected_section_default.is_none());
    }

    #[test]
    fn test_self_compare_is_all_unchanged() {
        let doc = document(vec![section(
            "Scope",
            vec![clause("1", "1. First.", 1, 700.0), clause("2", "2. Second.", 1, 650.0)],
        )]);
        let result = compare(&doc, &doc);
        assert!(result.rows.iter().all(|r| r.status == RowStatus::Unchanged));
        assert_eq!(result.selected_section_default.as_deref(), Some("Scope"));
    }

    #[test]
    fn test_flat_keys_are_header_prefixed() {
        let doc = document(vec![section("Scope", vec![clause("1", "1. Text.", 1, 700.0)])]);
        let result = compare(&doc, &doc);
        assert_eq!(result.rows[0].key, "Scope::1");
        assert!(result.row("Scope::1").is_some());
    }

    #[test]
    fn test_anchor_ids_unique_and_prefixed() {
        let base = document(vec![
            section("Scope", vec![clause("1", "1. A.", 1, 700.0)]),
            section("Governance", vec![clause("1", "1. B.", 3, 700.0)]),
        ]);
        let result = compare(&base, &base);
        let mut ids: Vec<&str> = result.section_anchors.iter().map(|a| a.anchor_id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        ids.dedup();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"Scope::1"));
    }

    #[test]
    fn test_removed_row_borrows_nearest_compared_anchor() {
        let base = document(vec![section(
            "Scope",
            vec![clause("1", "1. Kept.", 1, 700.0), clause("2", "2. Gone.", 1, 650.0)],
        )]);
        let compared = document(vec![section("Scope", vec![clause("1", "1. Kept.", 2, 500.0)])]);
        let result = compare(&base, &compared);

        let removed_anchor = result
            .section_anchors
            .iter()
            .find(|a| a.status == RowStatus::Removed)
            .unwrap();
        // Borrowed from row "1", the nearest row with a compared clause
        assert_eq!(removed_anchor.compared, Some(AnchorPoint { page: 2, y: 500.0 }));
        assert!(removed_anchor.removed_snippet.is_some());
    }

    #[test]
    fn test_snippets_on_changed_rows() {
        let base = document(vec![section(
            "Scope",
            vec![clause("1", "1. Retain records for five years.", 1, 700.0)],
        )]);
        let compared = document(vec![section(
            "Scope",
            vec![clause("1", "1. Retain records for seven years.", 1, 700.0)],
        )]);
        let result = compare(&base, &compared);
        let anchor = &result.section_anchors[0];
        assert_eq!(anchor.status, RowStatus::Changed);
        assert_eq!(anchor.removed_snippet.as_deref(), Some("five"));
        assert_eq!(anchor.added_snippet.as_deref(), Some("seven"));
    }

    #[test]
    fn test_long_snippet_truncated_with_ellipsis() {
        let long_base = format!("1. {}", "old ".repeat(100));
        let long_compared = format!("1. {}", "new ".repeat(100));
        let base = document(vec![section("Scope", vec![clause("1", &long_base, 1, 700.0)])]);
        let compared = document(vec![section("Scope", vec![clause("1", &long_compared, 1, 700.0)])]);
        let result = compare(&base, &compared);
        let snippet = result.section_anchors[0].removed_snippet.as_deref().unwrap();
        assert!(snippet.chars().count() <= SNIPPET_MAX_LEN + 1);
        assert!(snippet.ends_with('\u{2026}'));
    }

    #[test]
    fn test_sections_with_no_content_on_either_side_dropped() {
        let base = document(vec![section("Scope", vec![])]);
        let compared = document(vec![section("Scope", vec![])]);
        let result = compare(&base, &compared);
        assert!(result.is_empty());
    }

    #[test]
    fn test_selected_section_prefers_matched() {
        let base = document(vec![
            section("Objective", vec![clause("1", "1. Base only.", 1, 700.0)]),
            section("Scope", vec![clause("2", "2. Both.", 2, 700.0)]),
        ]);
        let compared = document(vec![section("Scope", vec![clause("2", "2. Both.", 2, 700.0)])]);
        let result = compare(&base, &compared);
        assert_eq!(result.selected_section_default.as_deref(), Some("Scope"));
    }

    #[test]
    fn test_section_page_map_spans_clauses() {
        let base = document(vec![section(
            "Scope",
            vec![clause("1", "1. A.", 2, 700.0), clause("2", "2. B.", 5, 300.0)],
        )]);
        let result = compare(&base, &document(vec![]));
        let info = &result.section_page_map[0];
        assert_eq!(info.base, Some(PageRange { page_start: 2, page_end: 5 }));
        assert!(info.compared.is_none());
    }

    #[test]
    fn test_coverage_merged_across_sides() {
        let mut base_section = section("Scope", vec![clause("1", "1. A.", 1, 700.0)]);
        base_section.coverage = SectionCoverage::from_counts(10, 9);
        let mut compared_section = section("Scope", vec![clause("1", "1. A.", 1, 700.0)]);
        compared_section.coverage = SectionCoverage::from_counts(10, 10);
        let result = compare(&document(vec![base_section]), &document(vec![compared_section]));
        assert_eq!(result.sections[0].coverage.total_lines, 20);
        assert_eq!(result.sections[0].coverage.percent, 95.0);
    }
}
