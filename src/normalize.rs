//! Text normalization for cross-document matching.
//!
//! PDF extractors emit typographic variants (curly quotes, en/em dashes,
//! ligatures, no-break spaces) that must not defeat header or footer
//! matching. Normalization maps those to plain ASCII equivalents and
//! collapses whitespace; it is a fixed character table, applied the same
//! way on both sides of a comparison.

/// Map typographic variants to ASCII and collapse runs of whitespace.
pub fn fold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        let replacement: &str = match c {
            '\u{2018}' | '\u{2019}' | '\u{02BC}' => "'",
            '\u{201C}' | '\u{201D}' => "\"",
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => "-",
            '\u{2044}' => "/",
            '\u{FB01}' => "fi",
            '\u{FB02}' => "fl",
            '\u{FB00}' => "ff",
            c if c.is_whitespace() => {
                pending_space = !out.is_empty();
                continue;
            }
            _ => {
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                out.push(c);
                continue;
            }
        };
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push_str(replacement);
    }
    out
}

/// [`fold`] plus ASCII lowercasing; the form used for header and footer
/// phrase matching.
pub fn fold_lower(text: &str) -> String {
    fold(text).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_unifies_quotes_and_dashes() {
        assert_eq!(fold("climate\u{2013}related \u{2018}terms\u{2019}"), "climate-related 'terms'");
    }

    #[test]
    fn test_fold_collapses_whitespace() {
        assert_eq!(fold("  Metrics   and \t targets  "), "Metrics and targets");
    }

    #[test]
    fn test_fold_expands_ligatures() {
        assert_eq!(fold("de\u{FB01}ned bene\u{FB01}ts"), "defined benefits");
    }

    #[test]
    fn test_fold_lower() {
        assert_eq!(fold_lower("IFRS  Foundation"), "ifrs foundation");
    }
}
