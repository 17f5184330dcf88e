//! Visual line assembly from positioned fragments.
//!
//! Fragments that share a Y bucket belong to one visual line. Within a
//! line, fragments are composed left to right and the spacing between
//! them is inferred from the horizontal gap:
//!
//! ```text
//! attach            next starts with closing punctuation, either side is
//!                   hyphen-like, or the previous token ends with an
//!                   opening bracket
//! single space      gap > 1.2 and both sides are word characters
//! round(gap / 3.4)  wide gaps the rules above did not classify
//! ```
//!
//! The gap heuristic follows the pdfplumber school of position-only space
//! detection: no font metrics, no confidence scoring.

use crate::config::CompareConfig;
use crate::layout::PageLine;
use crate::source::{PageText, PositionedFragment};

/// Minimum horizontal gap (user-space units) that separates two words.
const WORD_GAP: f32 = 1.2;

/// Divisor converting a wide gap into a run of spaces.
const WIDE_GAP_DIVISOR: f32 = 3.4;

/// Groups fragments into visual lines by Y-bucketing.
#[derive(Debug, Clone, Copy)]
pub struct LineAssembler {
    y_bucket: f32,
}

impl LineAssembler {
    /// Create an assembler with the given configuration.
    pub fn new(config: &CompareConfig) -> Self {
        Self {
            y_bucket: config.y_bucket,
        }
    }

    /// Assemble one page's fragments into ordered visual lines.
    ///
    /// Lines are emitted top of page first (descending Y); fragments
    /// within a line are composed in ascending X. Fragments that are empty
    /// after trimming are discarded.
    pub fn assemble_page(&self, page: &PageText) -> Vec<PageLine> {
        let mut buckets: Vec<(i64, Vec<&PositionedFragment>)> = Vec::new();

        for fragment in &page.fragments {
            if fragment.text.trim().is_empty() {
                continue;
            }
            let key = (fragment.y / self.y_bucket).round() as i64;
            match buckets.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => members.push(fragment),
                None => buckets.push((key, vec![fragment])),
            }
        }

        // Top of page first
        buckets.sort_by(|a, b| b.0.cmp(&a.0));

        buckets
            .into_iter()
            .map(|(_, mut members)| {
                members.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
                compose_line(page, &members)
            })
            .collect()
    }

    /// Assemble every page and concatenate the results in page order.
    pub fn assemble(&self, pages: &[PageText]) -> Vec<PageLine> {
        pages.iter().flat_map(|page| self.assemble_page(page)).collect()
    }
}

/// Compose the text of one line from its x-ordered fragments.
fn compose_line(page: &PageText, members: &[&PositionedFragment]) -> PageLine {
    let mut text = String::new();
    let mut previous_right = 0.0_f32;

    for fragment in members {
        let piece = fragment.text.trim();
        if text.is_empty() {
            text.push_str(piece);
        } else {
            let gap = fragment.x - previous_right;
            push_separator(&mut text, piece, gap);
            text.push_str(piece);
        }
        previous_right = fragment.right();
    }

    let first = members[0];
    PageLine {
        page: page.number,
        text,
        x: first.x,
        y: first.y,
        height: members
            .iter()
            .map(|f| f.height)
            .fold(0.0_f32, f32::max),
        page_height: page.height,
    }
}

/// Append the inferred separator between the composed text and `next`.
fn push_separator(text: &mut String, next: &str, gap: f32) {
    let prev_last = text.chars().last();
    let next_first = next.chars().next();

    if should_attach(prev_last, next_first) {
        return;
    }

    let word_boundary = prev_last.is_some_and(is_word_char) && next_first.is_some_and(is_word_char);
    if gap > WORD_GAP && word_boundary {
        text.push(' ');
    } else if gap > WORD_GAP {
        let count = (gap / WIDE_GAP_DIVISOR).round().max(1.0) as usize;
        for _ in 0..count {
            text.push(' ');
        }
    }
}

/// Fragments glue together with no space at punctuation boundaries.
fn should_attach(prev_last: Option<char>, next_first: Option<char>) -> bool {
    let closing = [',', '.', ';', ':', '!', '?', ')', ']', '}', '%'];
    let opening = ['(', '[', '{'];

    match (prev_last, next_first) {
        (Some(prev), Some(next)) => {
            closing.contains(&next)
                || is_hyphen_like(prev)
                || is_hyphen_like(next)
                || opening.contains(&prev)
        }
        _ => false,
    }
}

fn is_hyphen_like(c: char) -> bool {
    matches!(c, '-' | '–' | '—' | '/')
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}
