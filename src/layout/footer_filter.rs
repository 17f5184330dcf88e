//! Repeated page-furniture removal.
//!
//! Standards PDFs stamp every page with issuer names, copyright lines and
//! page counters in the bottom band. Those must not reach the clause
//! parser, but body text that merely sits low on a page must survive. Two
//! signals gate removal, and both apply only inside the footer band:
//!
//! 1. a closed set of known footer phrases and page-number forms;
//! 2. a signature (lowercase, page tokens stripped, non-alphanumerics
//!    dropped) that repeats on at least two pages.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::CompareConfig;
use crate::layout::PageLine;
use crate::normalize::fold_lower;
use crate::parse::labels;
use crate::parse::sections::is_canonical_header;

/// Longest line (in chars) that can be a repeat-footer candidate.
const CANDIDATE_MAX_LEN: usize = 140;

/// Minimum signature length and token count for a repeat-footer candidate.
const SIGNATURE_MIN_LEN: usize = 12;
const SIGNATURE_MIN_TOKENS: usize = 2;

lazy_static! {
    static ref BARE_PAGE_NUMBER: Regex = Regex::new(r"^\d{1,4}$").unwrap();
    static ref PAGE_COUNTER: Regex =
        Regex::new(r"^(?:(?:page|p\.?)\s*\d+(?:\s+of\s+\d+)?|\d+\s+of\s+\d+|\d+\s*/\s*\d+)$")
            .unwrap();
    static ref ISSUER_PHRASE: Regex = Regex::new(
        r"\b(?:copyright|all rights reserved|ifrs foundation|issb|ifrs s2|climate-related disclosures|australian accounting standards board|aasb s2|aasb|exposure draft|issued)\b"
    )
    .unwrap();
}

/// Removes repeated page furniture from the bottom band of each page.
#[derive(Debug, Clone, Copy)]
pub struct FooterFilter {
    footer_band: f32,
}

impl FooterFilter {
    /// Create a filter with the given configuration.
    pub fn new(config: &CompareConfig) -> Self {
        Self {
            footer_band: config.footer_band,
        }
    }

    /// Drop footer lines, keeping everything outside the band untouched.
    pub fn filter(&self, lines: Vec<PageLine>) -> Vec<PageLine> {
        let repeated = self.repeated_signatures(&lines);
        let before = lines.len();

        let kept: Vec<PageLine> = lines
            .into_iter()
            .filter(|line| !self.is_footer(line, &repeated))
            .collect();

        let dropped = before - kept.len();
        if dropped > 0 {
            log::debug!("footer filter dropped {} of {} lines", dropped, before);
        }
        kept
    }

    /// Pass 1: signatures that occur in the footer band of two or more pages.
    fn repeated_signatures(&self, lines: &[PageLine]) -> HashSet<String> {
        let mut pages_by_signature: HashMap<String, HashSet<u32>> = HashMap::new();

        for line in lines {
            if !self.in_band(line) || !is_candidate(line) {
                continue;
            }
            if let Some(sig) = signature(&line.text) {
                pages_by_signature.entry(sig).or_default().insert(line.page);
            }
        }

        pages_by_signature
            .into_iter()
            .filter(|(_, pages)| pages.len() >= 2)
            .map(|(sig, _)| sig)
            .collect()
    }

    /// Pass 2 predicate: drop iff in band and recognisable as furniture.
    fn is_footer(&self, line: &PageLine, repeated: &HashSet<String>) -> bool {
        if !self.in_band(line) {
            return false;
        }
        if is_canonical_header(&line.text) {
            return false;
        }
        if is_known_phrase(&line.text) {
            return true;
        }
        signature(&line.text).is_some_and(|sig| repeated.contains(&sig))
    }

    fn in_band(&self, line: &PageLine) -> bool {
        line.y <= self.footer_band * line.page_height
    }
}

/// Whether a line's normalized form is a known footer phrase.
fn is_known_phrase(text: &str) -> bool {
    let folded = fold_lower(text);
    BARE_PAGE_NUMBER.is_match(&folded)
        || PAGE_COUNTER.is_match(&folded)
        || ISSUER_PHRASE.is_match(&folded)
}

/// Whether a line can participate in repeat detection at all.
fn is_candidate(line: &PageLine) -> bool {
    line.text.chars().count() <= CANDIDATE_MAX_LEN && !labels::is_clause_start(line.text.trim())
}

/// Repeat signature: lowercase, page tokens stripped, non-alphanumerics
/// dropped. `None` when the remainder is too short to be distinctive.
fn signature(text: &str) -> Option<String> {
    let folded = fold_lower(text);
    let mut tokens: Vec<String> = Vec::new();

    for raw in folded.split_whitespace() {
        let cleaned: String = raw.chars().filter(|c| c.is_alphanumeric()).collect();
        if cleaned.is_empty()
            || cleaned.chars().all(|c| c.is_ascii_digit())
            || matches!(cleaned.as_str(), "page" | "p" | "of")
        {
            continue;
        }
        tokens.push(cleaned);
    }

    let joined: String = tokens.concat();
    (tokens.len() >= SIGNATURE_MIN_TOKENS && joined.chars().count() >= SIGNATURE_MIN_LEN)
        .then_some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, page: u32, y: f32) -> PageLine {
        PageLine {
            page,
            text: text.to_string(),
            x: 40.0,
            y,
            height: 10.0,
            page_height: 842.0,
        }
    }

    fn filter() -> FooterFilter {
        FooterFilter::new(&CompareConfig::default())
    }

    // Footer band for the default config and a 842pt page is y <= 117.88.

    #[test]
    fn test_known_phrase_dropped_in_band() {
        let lines = vec![line("1. Body text stays.", 1, 700.0), line("\u{00a9} IFRS Foundation 2024", 1, 30.0)];
        let kept = filter().filter(lines);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "1. Body text stays.");
    }

    #[test]
    fn test_page_counter_forms_dropped() {
        let lines = vec![
            line("Page 3 of 42", 1, 30.0),
            line("7", 2, 30.0),
            line("12/80", 3, 30.0),
            line("p. 9", 4, 30.0),
        ];
        assert!(filter().filter(lines).is_empty());
    }

    #[test]
    fn test_known_phrase_kept_outside_band() {
        // Body text citing the issuer high on the page survives
        let lines = vec![line("as defined by the IFRS Foundation", 1, 400.0)];
        assert_eq!(filter().filter(lines).len(), 1);
    }

    #[test]
    fn test_repeat_dropped_only_when_on_two_pages() {
        let lines = vec![
            line("Exposure draft working copy", 1, 30.0),
            line("General disclosure requirements draft", 1, 30.0),
            line("General disclosure requirements draft", 2, 28.0),
        ];
        let kept = filter().filter(lines);
        // The repeated signature is dropped from both pages; the phrase
        // containing "exposure draft" is a known phrase.
        assert!(kept.is_empty());
    }

    #[test]
    fn test_single_page_footer_looking_line_retained() {
        let lines = vec![line("Printed for internal review only", 1, 30.0)];
        let kept = filter().filter(lines);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_clause_start_never_a_repeat_candidate() {
        let lines = vec![
            line("73. Transitional relief applies.", 1, 30.0),
            line("73. Transitional relief applies.", 2, 30.0),
        ];
        // Clause-start lines cannot form repeat signatures even in the band
        assert_eq!(filter().filter(lines).len(), 2);
    }

    #[test]
    fn test_section_header_always_kept() {
        let lines = vec![line("Metrics and targets", 1, 30.0), line("Metrics and targets", 2, 30.0)];
        assert_eq!(filter().filter(lines).len(), 2);
    }

    #[test]
    fn test_signature_strips_page_tokens() {
        assert_eq!(
            signature("IFRS Foundation  Page 3 of 42"),
            signature("IFRS Foundation  Page 17 of 42")
        );
        assert!(signature("IFRS Foundation  Page 3 of 42").is_some());
    }

    #[test]
    fn test_signature_rejects_short_lines() {
        assert!(signature("draft 3").is_none());
        assert!(signature("ok").is_none());
    }
}
