//! Clause label grammar.
//!
//! Four line forms start or continue the clause structure:
//!
//! ```text
//! 25. The entity shall…     root with text
//! 25                        root label only
//! (a) where applicable…     marker with text
//! (a)                       marker label only
//! ```
//!
//! Root labels allow dotted numerics and attached markers (`1.2`, `2(a)`);
//! marker tokens are single alphanumeric runs. Whether a token is read as
//! a roman numeral or a letter is decided by the parser from the active
//! parent stack, not by the grammar.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ROOT_WITH_TEXT: Regex =
        Regex::new(r"^(\d+(?:\.\d+)*(?:\([A-Za-z0-9]+\))*)[.)]?\s+(\S.*)$").unwrap();
    static ref ROOT_ONLY: Regex =
        Regex::new(r"^(\d+(?:\.\d+)*(?:\([A-Za-z0-9]+\))*)[.)]?$").unwrap();
    static ref MARKER_WITH_TEXT: Regex = Regex::new(r"^\(([A-Za-z0-9]+)\)\s+(\S.*)$").unwrap();
    static ref MARKER_ONLY: Regex = Regex::new(r"^\(([A-Za-z0-9]+)\)$").unwrap();
    static ref ROMAN: Regex = Regex::new(r"^[ivxlcdm]+$").unwrap();
}

/// A line classified by the label grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelLine<'a> {
    /// A root clause line, optionally carrying first body text
    Root {
        /// Label as written, e.g. `25` or `2(a)`
        label: &'a str,
        /// Body text following the label on the same line
        body: Option<&'a str>,
    },
    /// A marker line under some parent, optionally carrying body text
    Marker {
        /// Token between the parentheses, e.g. `a` or `ii`
        token: &'a str,
        /// Body text following the marker on the same line
        body: Option<&'a str>,
    },
}

/// Classify a trimmed line against the label grammar.
pub fn parse_label(line: &str) -> Option<LabelLine<'_>> {
    if let Some(caps) = ROOT_WITH_TEXT.captures(line) {
        return Some(LabelLine::Root {
            label: caps.get(1).unwrap().as_str(),
            body: Some(caps.get(2).unwrap().as_str()),
        });
    }
    if let Some(caps) = ROOT_ONLY.captures(line) {
        return Some(LabelLine::Root {
            label: caps.get(1).unwrap().as_str(),
            body: None,
        });
    }
    if let Some(caps) = MARKER_WITH_TEXT.captures(line) {
        return Some(LabelLine::Marker {
            token: caps.get(1).unwrap().as_str(),
            body: Some(caps.get(2).unwrap().as_str()),
        });
    }
    if let Some(caps) = MARKER_ONLY.captures(line) {
        return Some(LabelLine::Marker {
            token: caps.get(1).unwrap().as_str(),
            body: None,
        });
    }
    None
}

/// Whether a trimmed line starts a clause (root or marker, either form).
pub fn is_clause_start(line: &str) -> bool {
    parse_label(line).is_some()
}

/// Whether a trimmed line starts a root clause.
pub fn is_root_clause(line: &str) -> bool {
    matches!(parse_label(line), Some(LabelLine::Root { .. }))
}

/// Whether a trimmed line carries only a label with no body text.
pub fn is_bare_label(line: &str) -> bool {
    matches!(
        parse_label(line),
        Some(LabelLine::Root { body: None, .. }) | Some(LabelLine::Marker { body: None, .. })
    )
}

/// Whether a trimmed line is a clause start that also carries body text.
pub fn starts_clause_with_body(line: &str) -> bool {
    matches!(
        parse_label(line),
        Some(LabelLine::Root { body: Some(_), .. }) | Some(LabelLine::Marker { body: Some(_), .. })
    )
}

/// Canonical form of a label: whitespace stripped, trailing `.` removed,
/// lowercased.
pub fn normalize_label(label: &str) -> String {
    let stripped: String = label.trim().chars().filter(|c| !c.is_whitespace()).collect();
    stripped.trim_end_matches('.').to_lowercase()
}

/// Whether a lowercased token reads as a roman numeral.
pub fn is_roman(token: &str) -> bool {
    ROMAN.is_match(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_with_text() {
        assert_eq!(
            parse_label("25. The entity shall disclose"),
            Some(LabelLine::Root {
                label: "25",
                body: Some("The entity shall disclose"),
            })
        );
    }

    #[test]
    fn test_root_with_paren_separator() {
        assert_eq!(
            parse_label("2) Shared"),
            Some(LabelLine::Root {
                label: "2",
                body: Some("Shared"),
            })
        );
    }

    #[test]
    fn test_root_with_attached_marker() {
        assert_eq!(
            parse_label("2(a) Institutions must retain records"),
            Some(LabelLine::Root {
                label: "2(a)",
                body: Some("Institutions must retain records"),
            })
        );
    }

    #[test]
    fn test_dotted_root() {
        assert_eq!(
            parse_label("1.2 Application"),
            Some(LabelLine::Root {
                label: "1.2",
                body: Some("Application"),
            })
        );
    }

    #[test]
    fn test_root_label_only() {
        assert_eq!(parse_label("25"), Some(LabelLine::Root { label: "25", body: None }));
        assert_eq!(parse_label("25."), Some(LabelLine::Root { label: "25", body: None }));
    }

    #[test]
    fn test_marker_with_text() {
        assert_eq!(
            parse_label("(a) where applicable"),
            Some(LabelLine::Marker {
                token: "a",
                body: Some("where applicable"),
            })
        );
    }

    #[test]
    fn test_marker_label_only() {
        assert_eq!(parse_label("(ii)"), Some(LabelLine::Marker { token: "ii", body: None }));
    }

    #[test]
    fn test_plain_prose_is_not_a_label() {
        assert!(parse_label("The entity shall disclose").is_none());
        assert!(parse_label("").is_none());
        assert!(!is_clause_start("see paragraph 12 for details"));
    }

    #[test]
    fn test_bare_label_detection() {
        assert!(is_bare_label("25"));
        assert!(is_bare_label("(a)"));
        assert!(!is_bare_label("25. Text"));
        assert!(!is_bare_label("prose line"));
    }

    #[test]
    fn test_starts_clause_with_body() {
        assert!(starts_clause_with_body("25. Text"));
        assert!(starts_clause_with_body("(a) text"));
        assert!(!starts_clause_with_body("25"));
        assert!(!starts_clause_with_body("prose"));
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label(" 2(A). "), "2(a)");
        assert_eq!(normalize_label("25."), "25");
        assert_eq!(normalize_label("1 . 2"), "1.2");
    }

    #[test]
    fn test_is_roman() {
        assert!(is_roman("i"));
        assert!(is_roman("xiv"));
        assert!(!is_roman("a"));
        assert!(!is_roman("i1"));
    }
}
