//! Clause tree construction.
//!
//! The parser walks a section's lines once, carrying a stack of active
//! parents (root, letter, roman, numeric). Label lines open clauses and
//! truncate the stack to their level; everything else either extends the
//! current clause or joins the unmatched buffer, which is flushed into a
//! synthetic clause whenever a real clause starts.
//!
//! Whether a continuation line joins the current paragraph or opens a new
//! one is a spatial decision: page breaks, vertical gaps against the
//! page's median line spacing, and indent shifts all force a newline;
//! anything else joins with a single space, with hyphenated line endings
//! rejoined without one.

use std::collections::HashMap;

use crate::config::CompareConfig;
use crate::layout::PageLine;
use crate::model::{
    ClauseNode, ExtractedSection, ExtractionIssue, IssueKind, SectionCoverage, Side,
};
use crate::parse::labels::{self, LabelLine};
use crate::parse::sections::SectionSlice;

/// Indent shifts of at least this many indent steps break the paragraph.
const INDENT_BREAK_STEPS: f32 = 1.5;

/// Cap on reconstructed leading indent, in spaces.
const MAX_INDENT: usize = 24;

/// Fallback median line spacing when a page has no line pairs.
const DEFAULT_LINE_SPACING: f32 = 11.0;

/// Longest snippet copied into an extraction issue.
const ISSUE_SNIPPET_LEN: usize = 120;

/// Builds the clause tree for one section.
pub struct ClauseParser<'a> {
    config: &'a CompareConfig,
    side: Side,
}

/// A clause being accumulated.
struct OpenClause {
    id: String,
    raw_label: String,
    parent_id: Option<String>,
    level: u8,
    text: String,
    base_x: f32,
    last_line: PageLine,
    page_start: u32,
    page_end: u32,
    anchor_page: u32,
    anchor_y: f32,
    line_count: usize,
}

impl OpenClause {
    fn into_node(self) -> ClauseNode {
        ClauseNode {
            id: self.id,
            raw_label: self.raw_label,
            parent_id: self.parent_id,
            level: self.level,
            text_preserved: self.text,
            page_start: self.page_start,
            page_end: self.page_end,
            anchor_page: self.anchor_page,
            anchor_y: self.anchor_y,
            synthetic: false,
            source_line_count: self.line_count,
        }
    }
}

impl<'a> ClauseParser<'a> {
    /// Create a parser for one extraction side.
    pub fn new(config: &'a CompareConfig, side: Side) -> Self {
        Self { config, side }
    }

    /// Parse a section slice into its clause tree, surfacing recoverable
    /// problems as issues.
    pub fn parse_section(&self, slice: &SectionSlice) -> (ExtractedSection, Vec<ExtractionIssue>) {
        let spacing = page_spacing_medians(&slice.lines);
        let mut state = SectionState::new(self.side, &slice.normalized_header);

        for line in &slice.lines {
            let trimmed = line.text.trim();
            match labels::parse_label(trimmed) {
                Some(LabelLine::Root { label, .. }) => {
                    let id = labels::normalize_label(label);
                    if id.is_empty() {
                        state.divert_malformed(label, line);
                        continue;
                    }
                    state.open_clause(id.clone(), label, None, 1, line);
                    state.stack = vec![(1, id)];
                }
                Some(LabelLine::Marker { token, .. }) => {
                    let token_lower = token.to_lowercase();
                    match state.classify_marker(&token_lower) {
                        Some((level, parent_id)) => {
                            let id = format!("{}({})", parent_id, token_lower);
                            state.open_clause(
                                id.clone(),
                                &format!("({})", token),
                                Some(parent_id),
                                level,
                                line,
                            );
                            state.stack.truncate_to_level(level);
                            state.stack.push((level, id));
                        }
                        // A marker with no active root has nothing to hang from
                        None => state.buffer_unmatched(line),
                    }
                }
                None => match state.current.as_mut() {
                    Some(clause) => {
                        append_line_with_structure(clause, line, &spacing, self.config);
                        state.mapped += 1;
                    }
                    None => state.buffer_unmatched(line),
                },
            }
        }

        state.finish(slice)
    }
}

/// Per-section parse state.
struct SectionState<'a> {
    side: Side,
    section_key: &'a str,
    stack: Vec<(u8, String)>,
    current: Option<OpenClause>,
    clauses: Vec<ClauseNode>,
    unmatched: Vec<PageLine>,
    synthetic_count: usize,
    issues: Vec<ExtractionIssue>,
    mapped: usize,
}

trait ParentStack {
    fn truncate_to_level(&mut self, level: u8);
    fn id_at_level(&self, level: u8) -> Option<&str>;
}

impl ParentStack for Vec<(u8, String)> {
    /// Opening a level-N marker closes every active parent at level >= N.
    fn truncate_to_level(&mut self, level: u8) {
        self.retain(|(l, _)| *l < level);
    }

    fn id_at_level(&self, level: u8) -> Option<&str> {
        self.iter().find(|(l, _)| *l == level).map(|(_, id)| id.as_str())
    }
}

impl<'a> SectionState<'a> {
    fn new(side: Side, section_key: &'a str) -> Self {
        Self {
            side,
            section_key,
            stack: Vec::new(),
            current: None,
            clauses: Vec::new(),
            unmatched: Vec::new(),
            synthetic_count: 0,
            issues: Vec::new(),
            mapped: 0,
        }
    }

    /// Level and parent for a marker token against the active stack.
    ///
    /// Numeric tokens nest under an active roman (level 4); roman tokens
    /// nest under an active letter (level 3); anything else is a letter
    /// marker directly under the root. Without a root there is no home
    /// for the marker at all.
    fn classify_marker(&self, token_lower: &str) -> Option<(u8, String)> {
        self.stack.id_at_level(1)?;
        if token_lower.chars().all(|c| c.is_ascii_digit()) {
            if let Some(parent) = self.stack.id_at_level(3) {
                return Some((4, parent.to_string()));
            }
        }
        if labels::is_roman(token_lower) {
            if let Some(parent) = self.stack.id_at_level(2) {
                return Some((3, parent.to_string()));
            }
        }
        self.stack.id_at_level(1).map(|root| (2, root.to_string()))
    }

    fn open_clause(
        &mut self,
        id: String,
        raw_label: &str,
        parent_id: Option<String>,
        level: u8,
        line: &PageLine,
    ) {
        self.flush_unmatched();
        self.close_current();

        // The clause text starts as the line appeared, label included
        let text = line.text.trim().to_string();
        self.current = Some(OpenClause {
            id,
            raw_label: raw_label.to_string(),
            parent_id,
            level,
            text,
            base_x: line.x,
            last_line: line.clone(),
            page_start: line.page,
            page_end: line.page,
            anchor_page: line.page,
            anchor_y: line.y,
            line_count: 1,
        });
        self.mapped += 1;
    }

    fn close_current(&mut self) {
        if let Some(clause) = self.current.take() {
            self.clauses.push(clause.into_node());
        }
    }

    fn buffer_unmatched(&mut self, line: &PageLine) {
        self.unmatched.push(line.clone());
    }

    fn divert_malformed(&mut self, label: &str, line: &PageLine) {
        let key = format!(
            "{}:{}:malformed:{}",
            self.side.as_str(),
            self.section_key,
            self.issues.len()
        );
        self.issues.push(ExtractionIssue {
            key,
            original_label: Some(label.to_string()),
            text: snippet(line.text.trim()),
            page_start: line.page,
            page_end: line.page,
            extraction_flags: vec![IssueKind::Malformed],
        });
        self.buffer_unmatched(line);
    }

    /// Wrap the buffered run of unmatched lines into one synthetic clause
    /// and surface it as an issue.
    fn flush_unmatched(&mut self) {
        if self.unmatched.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.unmatched);
        let text = lines
            .iter()
            .map(|l| l.text.trim())
            .collect::<Vec<_>>()
            .join("\n");
        let first = &lines[0];
        let last = &lines[lines.len() - 1];
        let id = format!("__unmatched_{}", self.synthetic_count);

        self.issues.push(ExtractionIssue {
            key: format!(
                "{}:{}:unmatched:{}",
                self.side.as_str(),
                self.section_key,
                self.synthetic_count
            ),
            original_label: None,
            text: snippet(&text),
            page_start: first.page,
            page_end: last.page,
            extraction_flags: vec![IssueKind::Unmatched],
        });

        self.clauses.push(ClauseNode {
            id,
            raw_label: String::new(),
            parent_id: None,
            level: 1,
            text_preserved: text,
            page_start: first.page,
            page_end: last.page,
            anchor_page: first.page,
            anchor_y: first.y,
            synthetic: true,
            source_line_count: lines.len(),
        });
        self.synthetic_count += 1;
        self.mapped += lines.len();
    }

    fn finish(mut self, slice: &SectionSlice) -> (ExtractedSection, Vec<ExtractionIssue>) {
        self.close_current();
        self.flush_unmatched();
        self.record_duplicates();

        let start_paragraph = self
            .clauses
            .iter()
            .find(|c| c.level == 1 && !c.synthetic)
            .map(|c| c.id.clone());
        let end_paragraph = self
            .clauses
            .iter()
            .rev()
            .find(|c| c.level == 1 && !c.synthetic)
            .map(|c| c.id.clone());

        let section = ExtractedSection {
            header: slice.header.clone(),
            normalized_header: slice.normalized_header.clone(),
            coverage: SectionCoverage::from_counts(slice.lines.len(), self.mapped),
            clauses: self.clauses,
            start_paragraph,
            end_paragraph,
        };
        (section, self.issues)
    }

    /// One issue per occurrence of every id that appears more than once.
    fn record_duplicates(&mut self) {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for clause in self.clauses.iter().filter(|c| !c.synthetic) {
            *counts.entry(clause.id.as_str()).or_default() += 1;
        }
        // First-occurrence order keeps issue output deterministic
        let mut duplicated: Vec<String> = Vec::new();
        for clause in self.clauses.iter().filter(|c| !c.synthetic) {
            if counts[clause.id.as_str()] > 1 && !duplicated.contains(&clause.id) {
                duplicated.push(clause.id.clone());
            }
        }

        for id in duplicated {
            log::warn!("duplicate clause id {:?} in section {:?}", id, self.section_key);
            let occurrences: Vec<(usize, &ClauseNode)> = self
                .clauses
                .iter()
                .enumerate()
                .filter(|(_, c)| c.id == id && !c.synthetic)
                .collect();
            for (position, (_, clause)) in occurrences.iter().enumerate() {
                self.issues.push(ExtractionIssue {
                    key: format!(
                        "{}:{}:duplicate:{}:{}",
                        self.side.as_str(),
                        self.section_key,
                        id,
                        position
                    ),
                    original_label: Some(clause.raw_label.clone()),
                    text: snippet(&clause.text_preserved),
                    page_start: clause.page_start,
                    page_end: clause.page_end,
                    extraction_flags: vec![IssueKind::Duplicate],
                });
            }
        }
    }
}

/// Extend the current clause with a continuation line.
///
/// The separator decision, in order: page break, bare-label predecessor,
/// first-line continuation, vertical gap against the page's median
/// spacing, indent shift; otherwise a plain space. Newlines reconstruct
/// leading indent relative to the clause's first-line x; spaces after a
/// hyphenated ending rejoin the split word.
fn append_line_with_structure(
    clause: &mut OpenClause,
    line: &PageLine,
    spacing: &HashMap<u32, f32>,
    config: &CompareConfig,
) {
    let prev = &clause.last_line;
    let prev_trimmed = prev.text.trim();
    let next_text = line.text.trim();

    let newline = if prev.page != line.page {
        true
    } else if labels::is_bare_label(prev_trimmed) {
        true
    } else if labels::starts_clause_with_body(prev_trimmed) {
        false
    } else {
        let dy = prev.y - line.y;
        let median = spacing.get(&line.page).copied().unwrap_or(DEFAULT_LINE_SPACING);
        dy > config.paragraph_gap * median
            || (line.x - prev.x).abs() >= INDENT_BREAK_STEPS * config.indent_step
    };

    if newline {
        let steps = ((line.x - clause.base_x) / config.indent_step).round();
        let indent = (steps.max(0.0) as usize).min(MAX_INDENT);
        clause.text.push('\n');
        for _ in 0..indent {
            clause.text.push(' ');
        }
        clause.text.push_str(next_text);
    } else if clause
        .text
        .chars()
        .last()
        .is_some_and(is_soft_hyphen)
    {
        clause.text.pop();
        clause.text.push_str(next_text);
    } else {
        clause.text.push(' ');
        clause.text.push_str(next_text);
    }

    clause.last_line = line.clone();
    clause.page_end = clause.page_end.max(line.page);
    clause.line_count += 1;
}

fn is_soft_hyphen(c: char) -> bool {
    matches!(c, '-' | '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}')
}

/// Median vertical gap between consecutive same-page lines, per page.
fn page_spacing_medians(lines: &[PageLine]) -> HashMap<u32, f32> {
    let mut gaps: HashMap<u32, Vec<f32>> = HashMap::new();
    for pair in lines.windows(2) {
        if pair[0].page == pair[1].page {
            let dy = pair[0].y - pair[1].y;
            if dy > 0.0 {
                gaps.entry(pair[0].page).or_default().push(dy);
            }
        }
    }
    gaps.into_iter()
        .map(|(page, mut values)| {
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let mid = values.len() / 2;
            let median = if values.len() % 2 == 0 {
                (values[mid - 1] + values[mid]) / 2.0
            } else {
                values[mid]
            };
            (page, median)
        })
        .collect()
}

fn snippet(text: &str) -> String {
    if text.chars().count() <= ISSUE_SNIPPET_LEN {
        text.to_string()
    } else {
        text.chars().take(ISSUE_SNIPPET_LEN).collect()
    }
}
