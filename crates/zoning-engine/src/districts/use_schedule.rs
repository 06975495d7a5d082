//! Multifamily share read from an explicit use-regulation grid
//!
//! Only consulted when no district could be classified from prose.
//!
//! ```text
//! schedule of use regulations   r-1  r-2  r-3
//! single family dwelling        yes  yes  yes
//! multifamily dwelling          no   no   yes
//! ```

use crate::relevance::matcher::ceil_boundary;
use crate::vocab::{Span, VocabularySet};

/// Characters read after a schedule heading
const SCHEDULE_WIDTH: usize = 2000;

/// Words a row label may span before its first cell
const MAX_LABEL_WORDS: usize = 6;

/// Leading run of district codes separated only by whitespace
fn column_header(window: &str, vocab: &VocabularySet) -> Vec<Span> {
    let mut header: Vec<Span> = Vec::new();
    for span in vocab.district_columns.spans(window) {
        if let Some(prev) = header.last() {
            if !window[prev.end..span.start].trim().is_empty() {
                break;
            }
        }
        header.push(span);
    }
    header
}

/// Cells of the row that starts at `from`
fn row_cells<'w>(window: &'w str, from: usize, columns: usize, vocab: &VocabularySet) -> Vec<&'w str> {
    let mut cells = Vec::new();
    let mut label_words = 0;
    for token in window[from..].split_whitespace() {
        let cell = token.trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '.' | '*'));
        let is_cell = !cell.is_empty()
            && (vocab.use_schedule_permitted.contains_term(cell) || vocab.use_schedule_denied.contains_term(cell));
        if is_cell {
            cells.push(cell);
            if cells.len() == columns {
                break;
            }
        } else if !cells.is_empty() {
            break;
        } else {
            label_words += 1;
            if label_words > MAX_LABEL_WORDS {
                break;
            }
        }
    }
    cells
}

fn schedule_fraction(window: &str, vocab: &VocabularySet) -> Option<f64> {
    let header = column_header(window, vocab);
    let header_end = header.last()?.end;
    let residential: Vec<bool> = header
        .iter()
        .map(|span| !vocab.nonresidential_districts.matches(&span.term))
        .collect();

    let row = vocab.multifamily_cues.first_span(&window[header_end..])?;
    let cells = row_cells(window, header_end + row.end, header.len(), vocab);

    let mut counted = 0usize;
    let mut permitted = 0usize;
    for (cell, is_residential) in cells.iter().zip(&residential) {
        if !is_residential {
            continue;
        }
        counted += 1;
        if vocab.use_schedule_permitted.contains_term(cell) {
            permitted += 1;
        }
    }
    (counted > 0).then(|| permitted as f64 / counted as f64)
}

/// Fraction of residential district columns marking multifamily as permitted,
/// from the first readable schedule in the document
pub fn fallback_fraction(text: &str, vocab: &VocabularySet) -> Option<f64> {
    vocab.use_schedule_headings.spans(text).into_iter().find_map(|heading| {
        let end = ceil_boundary(text, heading.end + SCHEDULE_WIDTH);
        schedule_fraction(&text[heading.end..end], vocab)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fraction(text: &str) -> Option<f64> {
        fallback_fraction(text, &VocabularySet::builtin().unwrap())
    }

    #[test]
    fn test_reads_multifamily_row() {
        let text = "schedule of use regulations r-1 r-2 r-3 single family dwelling yes yes yes \
                    two family dwelling no yes yes multifamily dwelling no no yes";
        assert_eq!(fraction(text), Some(1.0 / 3.0));
    }

    #[test]
    fn test_nonresidential_columns_ignored() {
        let text = "table of permitted uses r-1 r-2 c-1 multifamily - p p";
        assert_eq!(fraction(text), Some(0.5));
    }

    #[test]
    fn test_special_permit_is_not_permitted() {
        let text = "use table r-1 r-2 apartments sp sp";
        assert_eq!(fraction(text), Some(0.0));
    }

    #[test]
    fn test_no_schedule() {
        assert_eq!(fraction("multifamily dwellings are allowed in r-2"), None);
        assert_eq!(fraction("use table multifamily yes yes"), None);
    }
}
