//! Section boundary detection and appendix cutoff.
//!
//! IFRS/AASB-style standards use a fixed vocabulary of section headers. A
//! header line only counts as a boundary when actual clause content
//! follows it within a short window, which keeps table-of-contents entries
//! and cross-references from splitting the document. Appendices are cut
//! off entirely: defined terms and application guidance are not clause
//! content and never reach the parser.

use lazy_static::lazy_static;
use regex::Regex;

use crate::layout::PageLine;
use crate::normalize::fold_lower;
use crate::parse::labels;

/// The ordered vocabulary of section headers this corpus uses.
pub const CANONICAL_HEADERS: [&str; 7] = [
    "Objective",
    "Scope",
    "Core content",
    "Governance",
    "Strategy",
    "Risk management",
    "Metrics and targets",
];

/// How many lines after a header candidate may hold the first root clause.
const BOUNDARY_LOOKAHEAD: usize = 20;

/// Limits a line must respect to be read as an appendix heading.
const APPENDIX_MAX_WORDS: usize = 10;
const APPENDIX_MAX_CHARS: usize = 90;

/// Root clauses that must precede an appendix heading when the document
/// has no section boundaries at all.
const APPENDIX_MIN_ROOTS: usize = 3;

lazy_static! {
    static ref APPENDIX: Regex = Regex::new(r"^appendix(?:es)?\b").unwrap();
}

/// Whether a line's normalized form equals one of the canonical headers.
pub fn is_canonical_header(text: &str) -> bool {
    let folded = fold_lower(text);
    CANONICAL_HEADERS.iter().any(|header| fold_lower(header) == folded)
}

/// A section header with the body lines that follow it.
#[derive(Debug, Clone)]
pub struct SectionSlice {
    /// Header text as it appeared, or `Unsectioned` for the virtual section
    pub header: String,
    /// Normalized header used for matching
    pub normalized_header: String,
    /// Body lines, header excluded
    pub lines: Vec<PageLine>,
}

/// Split the line stream into sections, discarding appendix content.
///
/// Returns an empty vector for an empty document. When no canonical
/// boundary qualifies, the whole document forms the `Unsectioned` virtual
/// section.
pub fn split_sections(lines: Vec<PageLine>) -> Vec<SectionSlice> {
    if lines.is_empty() {
        return Vec::new();
    }

    let boundaries = find_boundaries(&lines);
    let lines = match find_appendix_cutoff(&lines, &boundaries) {
        Some(cutoff) => {
            log::debug!("appendix cutoff at line {} ({:?})", cutoff, lines[cutoff].text);
            lines.into_iter().take(cutoff).collect()
        }
        None => lines,
    };
    if lines.is_empty() {
        return Vec::new();
    }

    if boundaries.is_empty() {
        return vec![SectionSlice {
            header: "Unsectioned".to_string(),
            normalized_header: "unsectioned".to_string(),
            lines,
        }];
    }

    if boundaries[0] > 0 {
        log::debug!("dropping {} front-matter lines before the first section", boundaries[0]);
    }

    let mut sections = Vec::with_capacity(boundaries.len());
    for (position, &start) in boundaries.iter().enumerate() {
        if start >= lines.len() {
            break;
        }
        let end = boundaries
            .get(position + 1)
            .copied()
            .unwrap_or(lines.len())
            .min(lines.len());
        let header = lines[start].text.trim().to_string();
        sections.push(SectionSlice {
            normalized_header: fold_lower(&header),
            header,
            lines: lines[start + 1..end].to_vec(),
        });
    }
    sections
}

/// Indices of qualifying section boundaries, in line order.
///
/// A line qualifies when its normalized form equals a canonical header and
/// a root-clause-looking line exists within the lookahead window. The
/// first qualifying line per header wins.
fn find_boundaries(lines: &[PageLine]) -> Vec<usize> {
    let mut found: Vec<(usize, usize)> = Vec::new(); // (line index, header rank)

    for (index, line) in lines.iter().enumerate() {
        let folded = fold_lower(&line.text);
        let Some(rank) = CANONICAL_HEADERS
            .iter()
            .position(|header| fold_lower(header) == folded)
        else {
            continue;
        };
        if found.iter().any(|&(_, r)| r == rank) {
            continue;
        }
        if !has_root_clause_ahead(lines, index) {
            continue;
        }
        found.push((index, rank));
    }

    found.sort_by_key(|&(index, _)| index);
    found.into_iter().map(|(index, _)| index).collect()
}

fn has_root_clause_ahead(lines: &[PageLine], index: usize) -> bool {
    lines
        .iter()
        .skip(index + 1)
        .take(BOUNDARY_LOOKAHEAD)
        .any(|line| labels::is_root_clause(line.text.trim()))
}

/// Index of the appendix heading, when one qualifies.
///
/// The heading must sit after the last section boundary, or, in a document
/// without boundaries, after at least three root clauses.
fn find_appendix_cutoff(lines: &[PageLine], boundaries: &[usize]) -> Option<usize> {
    let last_boundary = boundaries.last().copied();
    let mut roots_seen = 0usize;

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.text.trim();
        if labels::is_root_clause(trimmed) {
            roots_seen += 1;
            continue;
        }
        if !looks_like_appendix_heading(trimmed) {
            continue;
        }
        let qualifies = match last_boundary {
            Some(boundary) => index > boundary,
            None => roots_seen >= APPENDIX_MIN_ROOTS,
        };
        if qualifies {
            return Some(index);
        }
    }
    None
}

fn looks_like_appendix_heading(trimmed: &str) -> bool {
    if !APPENDIX.is_match(&fold_lower(trimmed)) {
        return false;
    }
    if trimmed.split_whitespace().count() > APPENDIX_MAX_WORDS {
        return false;
    }
    if trimmed.chars().count() > APPENDIX_MAX_CHARS {
        return false;
    }
    !trimmed.ends_with(['.', '!', '?'])
}
