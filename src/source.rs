//! Page text providers.
//!
//! PDF parsing itself is not a concern of this crate. The pipeline consumes
//! positioned text fragments through the [`PageSource`] trait; a real PDF
//! text extractor plugs in behind it, and [`MemoryPageSource`] serves tests
//! and callers that already hold extracted fragments.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single positioned text run emitted by a PDF text extractor.
///
/// Coordinates are PDF user space: origin at the bottom-left corner of the
/// page, Y increasing upward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedFragment {
    /// Text content of the run
    pub text: String,
    /// Left edge
    pub x: f32,
    /// Baseline Y
    pub y: f32,
    /// Advance width of the run
    pub width: f32,
    /// Glyph height of the run
    pub height: f32,
}

impl PositionedFragment {
    /// Create a fragment.
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge of the fragment.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// The positioned text content of one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageText {
    /// 1-based page number
    pub number: u32,
    /// Page width in user-space units
    pub width: f32,
    /// Page height in user-space units
    pub height: f32,
    /// Unordered fragments on the page
    pub fragments: Vec<PositionedFragment>,
}

/// Provider of per-page positioned text.
///
/// The extraction loop requests pages 1, 2, 3, … until the provider returns
/// [`Error::PageOutOfRange`], which is the end-of-document sentinel. A
/// provider may fail an individual page with [`Error::Page`]; the loop logs
/// the failure, records an issue, and continues with the next page.
pub trait PageSource {
    /// Read the positioned text of the given 1-based page.
    fn page(&mut self, number: u32) -> Result<PageText>;
}

/// In-memory page source backed by a vector of pages.
///
/// This is the provider used by the test suite and by callers that perform
/// PDF text extraction elsewhere (e.g. in a browser worker) and hand the
/// fragments to the core.
#[derive(Debug, Clone, Default)]
pub struct MemoryPageSource {
    pages: Vec<PageText>,
}

impl MemoryPageSource {
    /// Create a source over the given pages.
    ///
    /// Page numbers are reassigned to 1..=n in vector order so callers
    /// cannot construct a source the page loop would disagree with.
    pub fn new(mut pages: Vec<PageText>) -> Self {
        for (index, page) in pages.iter_mut().enumerate() {
            page.number = index as u32 + 1;
        }
        Self { pages }
    }

    /// Number of pages in the source.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl PageSource for MemoryPageSource {
    fn page(&mut self, number: u32) -> Result<PageText> {
        if number == 0 {
            return Err(Error::Page {
                page: 0,
                reason: "page numbers are 1-based".to_string(),
            });
        }
        self.pages
            .get(number as usize - 1)
            .cloned()
            .ok_or(Error::PageOutOfRange(number))
    }
}
