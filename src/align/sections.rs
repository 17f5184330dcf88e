//! Section pairing across the two documents.

use serde::{Deserialize, Serialize};

use crate::model::{ExtractedDocument, ExtractedSection};

/// How a section header fared across the two documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionStatus {
    /// Present on both sides
    Matched,
    /// Present only in the compared document
    MissingInBase,
    /// Present only in the base document
    MissingInCompared,
}

/// A header paired with the sections that carry it on each side.
#[derive(Debug, Clone)]
pub struct AlignedSection<'a> {
    /// Header text, taken from the base side when available
    pub header: String,
    /// Normalized header both sides were matched on
    pub normalized_header: String,
    /// Pairing outcome
    pub status: SectionStatus,
    /// The base-side section, when present
    pub base: Option<&'a ExtractedSection>,
    /// The compared-side section, when present
    pub compared: Option<&'a ExtractedSection>,
}

/// Pair sections by normalized header.
///
/// The output order is the base document's section order with
/// compared-only headers appended in their own order. Appendix sections
/// never participate.
pub fn align_sections<'a>(
    base: &'a ExtractedDocument,
    compared: &'a ExtractedDocument,
) -> Vec<AlignedSection<'a>> {
    let base_sections: Vec<&ExtractedSection> =
        base.sections.iter().filter(|s| !is_appendix(s)).collect();
    let compared_sections: Vec<&ExtractedSection> =
        compared.sections.iter().filter(|s| !is_appendix(s)).collect();

    let mut ordered_headers: Vec<&str> = base_sections
        .iter()
        .map(|s| s.normalized_header.as_str())
        .collect();
    for section in &compared_sections {
        if !ordered_headers.contains(&section.normalized_header.as_str()) {
            ordered_headers.push(section.normalized_header.as_str());
        }
    }

    ordered_headers
        .into_iter()
        .map(|header| {
            let base_section = base_sections
                .iter()
                .find(|s| s.normalized_header == header)
                .copied();
            let compared_section = compared_sections
                .iter()
                .find(|s| s.normalized_header == header)
                .copied();
            let status = match (base_section.is_some(), compared_section.is_some()) {
                (true, true) => SectionStatus::Matched,
                (false, true) => SectionStatus::MissingInBase,
                (true, false) => SectionStatus::MissingInCompared,
                (false, false) => unreachable!("header came from one of the two sides"),
            };
            AlignedSection {
                header: base_section
                    .or(compared_section)
                    .map(|s| s.header.clone())
                    .unwrap_or_default(),
                normalized_header: header.to_string(),
                status,
                base: base_section,
                compared: compared_section,
            }
        })
        .collect()
}

fn is_appendix(section: &ExtractedSection) -> bool {
    section.normalized_header.starts_with("appendix")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SectionCoverage;

    fn section(header: &str) -> ExtractedSection {
        ExtractedSection {
            header: header.to_string(),
            normalized_header: header.to_lowercase(),
            clauses: Vec::new(),
            coverage: SectionCoverage::from_counts(0, 0),
            start_paragraph: None,
            end_paragraph: None,
        }
    }

    fn document(headers: &[&str]) -> ExtractedDocument {
        ExtractedDocument {
            sections: headers.iter().map(|h| section(h)).collect(),
            issues: Vec::new(),
        }
    }

    #[test]
    fn test_matched_and_one_sided_sections() {
        let base = document(&["Objective", "Scope"]);
        let compared = document(&["Scope", "Governance"]);
        let aligned = align_sections(&base, &compared);

        let headers: Vec<&str> = aligned.iter().map(|a| a.header.as_str()).collect();
        assert_eq!(headers, vec!["Objective", "Scope", "Governance"]);
        assert_eq!(aligned[0].status, SectionStatus::MissingInCompared);
        assert_eq!(aligned[1].status, SectionStatus::Matched);
        assert_eq!(aligned[2].status, SectionStatus::MissingInBase);
    }

    #[test]
    fn test_appendix_sections_discarded() {
        let base = document(&["Scope", "Appendix A"]);
        let compared = document(&["Scope"]);
        let aligned = align_sections(&base, &compared);
        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned[0].header, "Scope");
    }

    #[test]
    fn test_empty_documents_align_to_nothing() {
        let base = document(&[]);
        let compared = document(&[]);
        let aligned = align_sections(&base, &compared);
        assert!(aligned.is_empty());
    }
}
