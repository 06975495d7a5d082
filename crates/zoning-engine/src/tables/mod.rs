//! Dimensional table reconstruction
//!
//! Tables survive text extraction as one long run of words and numbers. Each
//! table heading opens a wide forward window; both orientations are tried on
//! every window and any structural mismatch skips the window.

pub mod criterion_rows;
pub mod district_rows;
pub mod layout;

use tracing::debug;

use crate::candidate::{NumericCandidate, PlausibilityBounds};
use crate::config::TableConfig;
use crate::deadline::Deadline;
use crate::error::Result;
use crate::normalize::NormalizedNumbers;
use crate::relevance::matcher::ceil_boundary;
use crate::vocab::VocabularySet;

pub use layout::SkipReason;

/// Everything an orientation needs besides the window text
#[derive(Debug, Clone, Copy)]
pub struct TableContext<'a> {
    pub vocab: &'a VocabularySet,
    pub config: &'a TableConfig,
    pub bounds: &'a PlausibilityBounds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableWindow {
    pub heading: String,
    pub start: usize,
    pub end: usize,
}

/// Forward windows of `width` characters from each table heading. Headings
/// closer than `heading_spacing` to an accepted one are skipped.
pub fn table_windows(text: &str, vocab: &VocabularySet, width: usize, heading_spacing: usize) -> Vec<TableWindow> {
    let mut windows: Vec<TableWindow> = Vec::new();
    for span in vocab.table_headings.spans(text) {
        if windows
            .last()
            .is_some_and(|prev| span.start - prev.start < heading_spacing)
        {
            continue;
        }
        windows.push(TableWindow {
            heading: span.term,
            start: span.start,
            end: ceil_boundary(text, span.start + width),
        });
    }
    windows
}

/// Run both orientations over every table window of the document
pub fn extract_tables(
    text: &str,
    width: usize,
    ctx: &TableContext,
    deadline: &Deadline,
) -> Result<Vec<NumericCandidate>> {
    let mut candidates = Vec::new();
    for window in table_windows(text, ctx.vocab, width, ctx.config.heading_spacing) {
        deadline.check()?;
        let window_text = NormalizedNumbers::new(&text[window.start..window.end]);
        let normalized = window_text.as_str();

        for (orientation, result) in [
            ("district_rows", district_rows::extract(normalized, 0, ctx)),
            ("criterion_rows", criterion_rows::extract(normalized, 0, ctx)),
        ] {
            match result {
                Ok(found) => {
                    debug!(
                        heading = %window.heading,
                        offset = window.start,
                        orientation,
                        candidates = found.len(),
                        "Read table window"
                    );
                    candidates.extend(
                        found
                            .into_iter()
                            .map(|c| c.with_offset(window.start + window_text.source_offset(c.offset()))),
                    );
                }
                Err(reason) => {
                    debug!(
                        heading = %window.heading,
                        offset = window.start,
                        orientation,
                        ?reason,
                        "Skipping table window"
                    );
                }
            }
        }
    }
    Ok(candidates)
}
