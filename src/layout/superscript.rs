//! Superscript glyph attachment.
//!
//! Footnote references and exponents are emitted by PDF extractors as
//! separate tiny text runs, which the Y-bucketing of line assembly turns
//! into stray one-or-two character lines. This stage detects those by
//! their reduced glyph height, folds them into the nearest plausible host
//! line as Unicode superscript characters, and removes them from the
//! stream.

use std::collections::{HashMap, HashSet};

use crate::config::CompareConfig;
use crate::layout::PageLine;

/// Maximum vertical distance between a superscript and its host line.
const MAX_HOST_DY: f32 = 9.0;

/// Weight of horizontal distance relative to vertical distance when
/// scoring host candidates.
const DX_WEIGHT: f32 = 140.0;

/// Neighbour offsets searched around a candidate, in the line sequence.
const NEIGHBOUR_OFFSETS: [i64; 4] = [-2, -1, 1, 2];

/// Detects and folds superscript glyph runs into their host lines.
#[derive(Debug, Clone, Copy)]
pub struct SuperscriptAttacher {
    height_ratio: f32,
}

impl SuperscriptAttacher {
    /// Create an attacher with the given configuration.
    pub fn new(config: &CompareConfig) -> Self {
        Self {
            height_ratio: config.superscript_height,
        }
    }

    /// Fold superscript candidates into their hosts and drop them from the
    /// line stream. Candidates with no qualifying host are kept as-is.
    pub fn attach(&self, lines: Vec<PageLine>) -> Vec<PageLine> {
        let candidates = self.candidate_indices(&lines);
        if candidates.is_empty() {
            return lines;
        }

        // host index -> superscript texts, in candidate order
        let mut attachments: HashMap<usize, Vec<String>> = HashMap::new();
        let mut consumed: HashSet<usize> = HashSet::new();

        for &index in &candidates {
            if let Some(host) = find_host(&lines, index, &candidates) {
                attachments
                    .entry(host)
                    .or_default()
                    .push(superscript_text(&lines[index].text));
                consumed.insert(index);
            }
        }

        log::debug!(
            "superscript attacher folded {} of {} candidates",
            consumed.len(),
            candidates.len()
        );

        lines
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !consumed.contains(index))
            .map(|(index, mut line)| {
                if let Some(texts) = attachments.get(&index) {
                    for text in texts {
                        line.text.push_str(text);
                    }
                }
                line
            })
            .collect()
    }

    /// Indices of superscript candidates, judged against the per-page
    /// median line height.
    fn candidate_indices(&self, lines: &[PageLine]) -> HashSet<usize> {
        let mut heights_by_page: HashMap<u32, Vec<f32>> = HashMap::new();
        for line in lines {
            heights_by_page.entry(line.page).or_default().push(line.height);
        }
        let median_by_page: HashMap<u32, f32> = heights_by_page
            .into_iter()
            .map(|(page, heights)| (page, median(heights)))
            .collect();

        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| {
                let median = median_by_page.get(&line.page).copied().unwrap_or(0.0);
                line.height > 0.0
                    && line.height < self.height_ratio * median
                    && is_superscript_text(&line.text)
            })
            .map(|(index, _)| index)
            .collect()
    }
}

/// Pick the host line for a candidate: nearest neighbour by
/// `|dy| + |dx| / 140`, same page, not itself a candidate, `|dy| <= 9`.
/// Ties resolve to the smaller vertical distance.
fn find_host(lines: &[PageLine], index: usize, candidates: &HashSet<usize>) -> Option<usize> {
    let candidate = &lines[index];
    let mut best: Option<(usize, f32, f32)> = None;

    for offset in NEIGHBOUR_OFFSETS {
        let neighbour_index = index as i64 + offset;
        if neighbour_index < 0 || neighbour_index as usize >= lines.len() {
            continue;
        }
        let neighbour_index = neighbour_index as usize;
        if candidates.contains(&neighbour_index) {
            continue;
        }
        let neighbour = &lines[neighbour_index];
        if neighbour.page != candidate.page {
            continue;
        }

        let dy = (neighbour.y - candidate.y).abs();
        if dy > MAX_HOST_DY {
            continue;
        }
        let score = dy + (neighbour.x - candidate.x).abs() / DX_WEIGHT;

        let better = match best {
            None => true,
            Some((_, best_score, best_dy)) => {
                score < best_score || (score == best_score && dy < best_dy)
            }
        };
        if better {
            best = Some((neighbour_index, score, dy));
        }
    }

    best.map(|(host, _, _)| host)
}

/// Whether a line's stripped text is short enough, and drawn from the
/// alphabet superscripts use.
fn is_superscript_text(text: &str) -> bool {
    let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    !stripped.is_empty()
        && stripped.chars().count() <= 2
        && stripped
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '(' | ')' | '+' | '-' | '\u{2212}' | '=' | 'n' | 'i'))
}

/// Render the stripped candidate text as Unicode superscript glyphs, or a
/// caret-prefixed literal when any character has no mapping.
fn superscript_text(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let mapped: Option<String> = stripped.chars().map(superscript_char).collect();
    mapped.unwrap_or_else(|| format!("^{}", stripped))
}

fn superscript_char(c: char) -> Option<char> {
    Some(match c {
        '0' => '\u{2070}',
        '1' => '\u{00B9}',
        '2' => '\u{00B2}',
        '3' => '\u{00B3}',
        '4' => '\u{2074}',
        '5' => '\u{2075}',
        '6' => '\u{2076}',
        '7' => '\u{2077}',
        '8' => '\u{2078}',
        '9' => '\u{2079}',
        '(' => '\u{207D}',
        ')' => '\u{207E}',
        '+' => '\u{207A}',
        '-' | '\u{2212}' => '\u{207B}',
        '=' => '\u{207C}',
        'n' => '\u{207F}',
        'i' => '\u{2071}',
        _ => return None,
    })
}

fn median(mut values: Vec<f32>) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, x: f32, y: f32, height: f32) -> PageLine {
        PageLine {
            page: 1,
            text: text.to_string(),
            x,
            y,
            height,
            page_height: 842.0,
        }
    }

    fn attacher() -> SuperscriptAttacher {
        SuperscriptAttacher::new(&CompareConfig::default())
    }

    #[test]
    fn test_footnote_digit_folds_into_host() {
        let lines = vec![
            line("emissions are reported in CO", 40.0, 700.0, 10.0),
            line("2", 180.0, 704.0, 5.0),
            line("next body line follows here", 40.0, 688.0, 10.0),
        ];
        let result = attacher().attach(lines);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "emissions are reported in CO\u{00B2}");
    }

    #[test]
    fn test_tie_breaks_on_smaller_dy() {
        // Equal scores: 3 + 0/140 = 3.0 above, 1 + 280/140 = 3.0 below.
        // The smaller vertical distance wins.
        let lines = vec![
            line("host above", 160.0, 703.0, 10.0),
            line("n", 160.0, 700.0, 5.0),
            line("host below", 440.0, 701.0, 10.0),
        ];
        let result = attacher().attach(lines);
        assert_eq!(result[0].text, "host above");
        assert_eq!(result[1].text, "host below\u{207F}");
    }

    #[test]
    fn test_distant_candidate_kept() {
        // No neighbour within |dy| <= 9: the line survives untouched.
        let lines = vec![
            line("body line", 40.0, 700.0, 10.0),
            line("7", 40.0, 650.0, 5.0),
        ];
        let result = attacher().attach(lines);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_normal_height_line_is_not_a_candidate() {
        let lines = vec![
            line("body line one", 40.0, 700.0, 10.0),
            line("2", 40.0, 696.0, 10.0),
            line("body line two", 40.0, 688.0, 10.0),
        ];
        let result = attacher().attach(lines);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_long_text_is_not_a_candidate() {
        let lines = vec![
            line("body line one goes here", 40.0, 700.0, 10.0),
            line("123", 40.0, 696.0, 5.0),
            line("body line two goes here", 40.0, 688.0, 10.0),
        ];
        let result = attacher().attach(lines);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_superscript_mapping() {
        assert_eq!(superscript_text("(2)"), "\u{207D}\u{00B2}\u{207E}");
        assert_eq!(superscript_text("n"), "\u{207F}");
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(vec![10.0, 5.0, 12.0]), 10.0);
        assert_eq!(median(vec![10.0, 12.0]), 11.0);
    }
}
