//! Clause pairing and row construction within an aligned section.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::diff::{paragraph_diff, sentence_diff, word_diff, DiffToken};
use crate::model::{ClauseNode, ExtractedSection};

/// Fixed diff text for rows whose id maps to multiple clauses.
pub const AMBIGUOUS_EXPLANATION: &str =
    "This identifier appears more than once on at least one side; the diff is suppressed because no single pairing would be meaningful.";

/// Outcome of pairing one clause id across the two documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowStatus {
    /// Present on both sides with identical trimmed text
    Unchanged,
    /// Present on both sides with differing text
    Changed,
    /// Present only in the compared document
    Added,
    /// Present only in the base document
    Removed,
    /// The id maps to more than one clause on at least one side
    Ambiguous,
}

/// One clause id paired across the two documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    /// Canonical clause id; prefixed with the section header in flat lists
    pub key: String,
    /// Label shown to the reader
    pub display_label: String,
    /// Whether the id exists in the base document
    pub in_base: bool,
    /// Whether the id exists in the compared document
    pub in_compared: bool,
    /// Base-side clause, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<ClauseNode>,
    /// Compared-side clause, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compared: Option<ClauseNode>,
    /// Pairing outcome
    pub status: RowStatus,
    /// Word-granularity diff
    pub diff_word: Vec<DiffToken>,
    /// Sentence-granularity diff
    pub diff_sentence: Vec<DiffToken>,
    /// Paragraph-granularity diff
    pub diff_paragraph: Vec<DiffToken>,
}

/// Pair clauses by canonical id within one aligned section.
///
/// The row order is the base section's clause order with compared-only
/// ids appended in their own order. Either section may be absent.
pub fn align_clauses(
    base: Option<&ExtractedSection>,
    compared: Option<&ExtractedSection>,
) -> Vec<ComparisonRow> {
    let base_clauses = base.map(|s| s.clauses.as_slice()).unwrap_or_default();
    let compared_clauses = compared.map(|s| s.clauses.as_slice()).unwrap_or_default();

    let base_groups = group_by_id(base_clauses);
    let compared_groups = group_by_id(compared_clauses);

    let mut ordered_ids: Vec<&str> = Vec::new();
    for clause in base_clauses {
        if !ordered_ids.contains(&clause.id.as_str()) {
            ordered_ids.push(&clause.id);
        }
    }
    for clause in compared_clauses {
        if !ordered_ids.contains(&clause.id.as_str()) {
            ordered_ids.push(&clause.id);
        }
    }

    ordered_ids
        .into_iter()
        .map(|id| {
            build_row(
                id,
                base_groups.get(id).map(Vec::as_slice).unwrap_or_default(),
                compared_groups.get(id).map(Vec::as_slice).unwrap_or_default(),
            )
        })
        .collect()
}

fn group_by_id(clauses: &[ClauseNode]) -> HashMap<&str, Vec<&ClauseNode>> {
    let mut groups: HashMap<&str, Vec<&ClauseNode>> = HashMap::new();
    for clause in clauses {
        groups.entry(&clause.id).or_default().push(clause);
    }
    groups
}

fn build_row(id: &str, base: &[&ClauseNode], compared: &[&ClauseNode]) -> ComparisonRow {
    let in_base = !base.is_empty();
    let in_compared = !compared.is_empty();

    if base.len() > 1 || compared.len() > 1 {
        let note = vec![DiffToken::equal(AMBIGUOUS_EXPLANATION)];
        return ComparisonRow {
            key: id.to_string(),
            display_label: display_label(base.first().copied(), compared.first().copied()),
            in_base,
            in_compared,
            base: base.first().map(|c| (*c).clone()),
            compared: compared.first().map(|c| (*c).clone()),
            status: RowStatus::Ambiguous,
            diff_word: note.clone(),
            diff_sentence: note.clone(),
            diff_paragraph: note,
        };
    }

    let base_clause = base.first().copied();
    let compared_clause = compared.first().copied();

    let (status, diff_word, diff_sentence, diff_paragraph) = match (base_clause, compared_clause) {
        (Some(b), Some(c)) => {
            let status = if b.text_preserved.trim() == c.text_preserved.trim() {
                RowStatus::Unchanged
            } else {
                RowStatus::Changed
            };
            (
                status,
                word_diff(&b.text_preserved, &c.text_preserved),
                sentence_diff(&b.text_preserved, &c.text_preserved),
                paragraph_diff(&b.text_preserved, &c.text_preserved),
            )
        }
        (Some(b), None) => {
            let only = vec![DiffToken::removed(&b.text_preserved)];
            (RowStatus::Removed, only.clone(), only.clone(), only)
        }
        (None, Some(c)) => {
            let only = vec![DiffToken::added(&c.text_preserved)];
            (RowStatus::Added, only.clone(), only.clone(), only)
        }
        (None, None) => unreachable!("row id came from one of the two sides"),
    };

    ComparisonRow {
        key: id.to_string(),
        display_label: display_label(base_clause, compared_clause),
        in_base,
        in_compared,
        base: base_clause.cloned(),
        compared: compared_clause.cloned(),
        status,
        diff_word,
        diff_sentence,
        diff_paragraph,
    }
}

/// Base label when both sides agree, both joined with `|` when they
/// differ, the available one otherwise.
fn display_label(base: Option<&ClauseNode>, compared: Option<&ClauseNode>) -> String {
    match (base, compared) {
        (Some(b), Some(c)) if b.raw_label == c.raw_label => b.raw_label.clone(),
        (Some(b), Some(c)) => format!("{} | {}", b.raw_label, c.raw_label),
        (Some(b), None) => b.raw_label.clone(),
        (None, Some(c)) => c.raw_label.clone(),
        (None, None) => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::TokenKind;
    use crate::model::SectionCoverage;

    fn clause(id: &str, label: &str, text: &str) -> ClauseNode {
        ClauseNode {
            id: id.to_string(),
            raw_label: label.to_string(),
            parent_id: None,
            level: 1,
            text_preserved: text.to_string(),
            page_start: 1,
            page_end: 1,
            anchor_page: 1,
            anchor_y: 700.0,
            synthetic: false,
            source_line_count: 1,
        }
    }

    fn section(clauses: Vec<ClauseNode>) -> ExtractedSection {
        ExtractedSection {
            header: "Scope".to_string(),
            normalized_header: "scope".to_string(),
            coverage: SectionCoverage::from_counts(clauses.len(), clauses.len()),
            clauses,
            start_paragraph: None,
            end_paragraph: None,
        }
    }

    #[test]
    fn test_unchanged_and_changed_rows() {
        let base = section(vec![
            clause("1", "1", "1. Same text."),
            clause("2", "2", "2. Old wording."),
        ]);
        let compared = section(vec![
            clause("1", "1", "1. Same text."),
            clause("2", "2", "2. New wording."),
        ]);
        let rows = align_clauses(Some(&base), Some(&compared));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].status, RowStatus::Unchanged);
        assert_eq!(rows[1].status, RowStatus::Changed);
        assert!(rows[1].diff_word.iter().any(|t| t.kind == TokenKind::Added));
    }

    #[test]
    fn test_one_sided_rows() {
        let base = section(vec![clause("3", "3", "3. Removed clause.")]);
        let compared = section(vec![clause("4", "4", "4. Added clause.")]);
        let rows = align_clauses(Some(&base), Some(&compared));
        assert_eq!(rows[0].status, RowStatus::Removed);
        assert_eq!(rows[0].diff_word, vec![DiffToken::removed("3. Removed clause.")]);
        assert!(!rows[0].in_compared);
        assert_eq!(rows[1].status, RowStatus::Added);
        assert_eq!(rows[1].diff_paragraph, vec![DiffToken::added("4. Added clause.")]);
    }

    #[test]
    fn test_duplicate_id_is_ambiguous() {
        let base = section(vec![
            clause("1", "1", "1. First"),
            clause("1", "1", "1. Duplicate"),
        ]);
        let compared = section(vec![clause("1", "1", "1. Updated")]);
        let rows = align_clauses(Some(&base), Some(&compared));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, RowStatus::Ambiguous);
        assert_eq!(rows[0].diff_word, vec![DiffToken::equal(AMBIGUOUS_EXPLANATION)]);
        // Both sides point at the first occurrence
        assert_eq!(rows[0].base.as_ref().unwrap().text_preserved, "1. First");
        assert_eq!(rows[0].compared.as_ref().unwrap().text_preserved, "1. Updated");
    }

    #[test]
    fn test_absent_section_yields_all_added() {
        let compared = section(vec![clause("1", "1", "1. Only here.")]);
        let rows = align_clauses(None, Some(&compared));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, RowStatus::Added);
    }

    #[test]
    fn test_display_label_variants() {
        let b = clause("2(a)", "2(a)", "text");
        let c_same = clause("2(a)", "2(a)", "text");
        let c_other = clause("2(a)", "(a)", "text");
        assert_eq!(display_label(Some(&b), Some(&c_same)), "2(a)");
        assert_eq!(display_label(Some(&b), Some(&c_other)), "2(a) | (a)");
        assert_eq!(display_label(Some(&b), None), "2(a)");
        assert_eq!(display_label(None, None), "Unknown");
    }

    #[test]
    fn test_row_order_base_first_then_compared_only() {
        let base = section(vec![clause("1", "1", "a"), clause("3", "3", "c")]);
        let compared = section(vec![clause("2", "2", "b"), clause("3", "3", "c")]);
        let rows = align_clauses(Some(&base), Some(&compared));
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["1", "3", "2"]);
    }
}
