//! Tokenizers for the three diff granularities.
//!
//! Tokens are borrowed slices of the input so diffing never copies text
//! until the final token list is built.

/// Split into words and whitespace runs, both kept as tokens.
///
/// Punctuation stays attached to its word; whitespace runs are preserved
/// verbatim so the script can reproduce the input exactly.
pub fn words_with_whitespace(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_whitespace = None::<bool>;

    for (index, c) in text.char_indices() {
        let ws = c.is_whitespace();
        match in_whitespace {
            None => in_whitespace = Some(ws),
            Some(previous) if previous != ws => {
                tokens.push(&text[start..index]);
                start = index;
                in_whitespace = Some(ws);
            }
            Some(_) => {}
        }
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Split into sentences.
///
/// A sentence ends after `.`, `!` or `?` followed by whitespace, or at a
/// newline; trailing whitespace stays with the sentence it follows.
pub fn sentences(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut after_terminal = false;

    for (index, c) in text.char_indices() {
        if c == '\n' {
            let end = index + c.len_utf8();
            tokens.push(&text[start..end]);
            start = end;
            after_terminal = false;
            continue;
        }
        if after_terminal && !c.is_whitespace() {
            tokens.push(&text[start..index]);
            start = index;
            after_terminal = false;
        }
        if matches!(c, '.' | '!' | '?') {
            after_terminal = true;
        } else if !c.is_whitespace() {
            after_terminal = false;
        }
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Split into trimmed lines.
pub fn trimmed_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).collect()
}

/// Collapse runs of horizontal whitespace to a single space.
///
/// Newlines survive: this is the equality used to decide whether two
/// texts differ only in spacing, not in line structure.
pub fn collapse_horizontal_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c == ' ' || c == '\t' {
            in_run = true;
        } else {
            if in_run {
                out.push(' ');
                in_run = false;
            }
            out.push(c);
        }
    }
    if in_run {
        out.push(' ');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_with_whitespace_round_trips() {
        let text = "retain  records for\tfive years.";
        let tokens = words_with_whitespace(text);
        assert_eq!(tokens.concat(), text);
        assert_eq!(tokens[0], "retain");
        assert_eq!(tokens[1], "  ");
    }

    #[test]
    fn test_words_empty_input() {
        assert!(words_with_whitespace("").is_empty());
    }

    #[test]
    fn test_sentences_split_after_terminal() {
        let text = "First rule applies. Second rule applies? Third.";
        let tokens = sentences(text);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], "First rule applies. ");
        assert_eq!(tokens[1], "Second rule applies? ");
        assert_eq!(tokens[2], "Third.");
    }

    #[test]
    fn test_sentences_split_at_newline() {
        let text = "first line\nsecond line";
        let tokens = sentences(text);
        assert_eq!(tokens, vec!["first line\n", "second line"]);
    }

    #[test]
    fn test_sentences_abbreviation_keeps_trailing_space() {
        let tokens = sentences("Records kept. See cl. 7 below.");
        // "cl. 7" splits too: sentence detection is deliberately simple
        assert_eq!(tokens.concat(), "Records kept. See cl. 7 below.");
    }

    #[test]
    fn test_trimmed_lines() {
        assert_eq!(trimmed_lines("  a \n   b\nc  "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_collapse_horizontal_whitespace() {
        assert_eq!(collapse_horizontal_whitespace("a  \t b\n  c"), "a b\n c");
        assert_eq!(collapse_horizontal_whitespace("a\nb"), "a\nb");
    }
}
