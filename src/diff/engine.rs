//! The three diff granularities and their noise suppression.
//!
//! PDF extraction jitters horizontal whitespace between otherwise
//! identical documents, so every granularity neutralises spacing-only
//! differences before anything is reported as a change:
//!
//! - word diffs collapse removed/added pairs whose values agree once
//!   horizontal whitespace is normalized, and relabel whitespace-only
//!   churn as equal;
//! - sentence diffs short-circuit to a single equal token for
//!   spacing-only inputs;
//! - paragraph diffs additionally treat trim-equal inputs as equal and
//!   diff trimmed lines.

use crate::diff::myers::{self, Step};
use crate::diff::tokenize;
use crate::diff::{DiffToken, TokenKind};

/// Word-granularity diff with whitespace-noise suppression.
pub fn word_diff(base: &str, compared: &str) -> Vec<DiffToken> {
    let base_tokens = tokenize::words_with_whitespace(base);
    let compared_tokens = tokenize::words_with_whitespace(compared);
    let steps = myers::diff(&base_tokens, &compared_tokens);

    let raw = to_tokens(&steps, &base_tokens, &compared_tokens, "");
    let collapsed = collapse_whitespace_noise(raw);
    merge_adjacent(collapsed)
}

/// Sentence-granularity diff.
pub fn sentence_diff(base: &str, compared: &str) -> Vec<DiffToken> {
    if whitespace_equal(base, compared) {
        return vec![DiffToken::equal(base)];
    }
    let base_tokens = tokenize::sentences(base);
    let compared_tokens = tokenize::sentences(compared);
    let steps = myers::diff(&base_tokens, &compared_tokens);
    merge_adjacent(to_tokens(&steps, &base_tokens, &compared_tokens, ""))
}

/// Paragraph-granularity diff over trimmed lines.
pub fn paragraph_diff(base: &str, compared: &str) -> Vec<DiffToken> {
    if whitespace_equal(base, compared) || base.trim() == compared.trim() {
        return vec![DiffToken::equal(base)];
    }
    let base_tokens = tokenize::trimmed_lines(base);
    let compared_tokens = tokenize::trimmed_lines(compared);
    let steps = myers::diff(&base_tokens, &compared_tokens);
    let tokens = merge_adjacent(to_tokens(&steps, &base_tokens, &compared_tokens, "\n"));

    // Degenerate script: report the whole texts rather than nothing
    if !tokens
        .iter()
        .any(|t| t.kind != TokenKind::Equal)
    {
        return vec![DiffToken::removed(base), DiffToken::added(compared)];
    }
    tokens
}

/// Whether two texts differ only in horizontal whitespace.
fn whitespace_equal(base: &str, compared: &str) -> bool {
    tokenize::collapse_horizontal_whitespace(base) == tokenize::collapse_horizontal_whitespace(compared)
}

/// Map an edit script onto tagged tokens, joining with `separator`.
fn to_tokens(
    steps: &[Step],
    base_tokens: &[&str],
    compared_tokens: &[&str],
    separator: &str,
) -> Vec<DiffToken> {
    steps
        .iter()
        .map(|step| match step {
            Step::Equal(i) => DiffToken::equal(format!("{}{}", base_tokens[*i], separator)),
            Step::Removed(i) => DiffToken::removed(format!("{}{}", base_tokens[*i], separator)),
            Step::Added(j) => DiffToken::added(format!("{}{}", compared_tokens[*j], separator)),
        })
        .collect()
}

/// Suppress whitespace-only churn in a word-level token stream.
///
/// Adjacent removed/added pairs (either order) whose values agree after
/// horizontal-whitespace normalization become one equal token carrying the
/// compared-side text; whitespace-only non-equal tokens are relabelled
/// equal.
fn collapse_whitespace_noise(tokens: Vec<DiffToken>) -> Vec<DiffToken> {
    let mut out: Vec<DiffToken> = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        let paired = matches!(
            (token.kind, iter.peek().map(|t| t.kind)),
            (TokenKind::Removed, Some(TokenKind::Added)) | (TokenKind::Added, Some(TokenKind::Removed))
        );
        if paired {
            let next = iter.peek().unwrap();
            if tokenize::collapse_horizontal_whitespace(&token.value)
                == tokenize::collapse_horizontal_whitespace(&next.value)
            {
                let next = iter.next().unwrap();
                let surviving = if next.kind == TokenKind::Added { next } else { token };
                out.push(DiffToken::equal(surviving.value));
                continue;
            }
        }

        if token.kind != TokenKind::Equal && token.value.chars().all(char::is_whitespace) {
            out.push(DiffToken::equal(token.value));
        } else {
            out.push(token);
        }
    }
    out
}

/// Merge runs of adjacent same-kind tokens.
fn merge_adjacent(tokens: Vec<DiffToken>) -> Vec<DiffToken> {
    let mut out: Vec<DiffToken> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match out.last_mut() {
            Some(last) if last.kind == token.kind => last.value.push_str(&token.value),
            _ => out.push(token),
        }
    }
    out
}
