//! The extraction pipeline.
//!
//! Drives a [`PageSource`] through the full chain: page loop, line
//! assembly, footer filtering, superscript attachment, section split and
//! clause parsing. Per-page failures are logged and skipped; only a
//! source that cannot produce anything at all fails the call.

use crate::config::CompareConfig;
use crate::error::{Error, Result};
use crate::layout::{FooterFilter, LineAssembler, SuperscriptAttacher};
use crate::model::{ExtractedDocument, ExtractionIssue, IssueKind, Side};
use crate::parse::{split_sections, ClauseParser};
use crate::source::{PageSource, PageText};

/// Extract the clause structure of one document.
///
/// The page loop requests pages until the source reports
/// [`Error::PageOutOfRange`]. A page that fails to read is skipped and
/// surfaced as an [`IssueKind::Unextractable`] issue; `side` tags issue
/// keys so both documents' issues can be merged by the caller.
pub fn extract_document(
    source: &mut dyn PageSource,
    side: Side,
    config: &CompareConfig,
) -> Result<ExtractedDocument> {
    let mut pages: Vec<PageText> = Vec::new();
    let mut issues: Vec<ExtractionIssue> = Vec::new();

    let mut number = 1u32;
    loop {
        match source.page(number) {
            Ok(page) => pages.push(page),
            Err(err) if err.is_end_of_document() => break,
            Err(Error::Fatal(reason)) => return Err(Error::Fatal(reason)),
            Err(err) => {
                log::warn!("skipping page {}: {}", number, err);
                issues.push(ExtractionIssue {
                    key: format!("{}:page:{}:unextractable", side.as_str(), number),
                    original_label: None,
                    text: err.to_string(),
                    page_start: number,
                    page_end: number,
                    extraction_flags: vec![IssueKind::Unextractable],
                });
            }
        }
        number += 1;
    }

    log::debug!("{}: read {} pages", side.as_str(), pages.len());

    let lines = LineAssembler::new(config).assemble(&pages);
    let lines = FooterFilter::new(config).filter(lines);
    let lines = SuperscriptAttacher::new(config).attach(lines);

    let mut sections = Vec::new();
    let parser = ClauseParser::new(config, side);
    for slice in split_sections(lines) {
        let (section, section_issues) = parser.parse_section(&slice);
        sections.push(section);
        issues.extend(section_issues);
    }

    Ok(ExtractedDocument { sections, issues })
}
