//! Dimensional tables with one district per row
//!
//! ```text
//! district  minimum lot area (square feet)  front yard (feet)  maximum height (feet)
//! r-1       20000                           35                 35
//! r-2       10000                           30                 35
//! ```

use std::collections::BTreeSet;

use zoning_types::Provenance;

use super::layout::{
    category_for, classify_column, count_triggers, discover_rows, gate, header_cluster,
    subdivide_wide_rows, tokenize_cells, Cell, SkipReason, ValueColumn,
};
use super::TableContext;
use crate::candidate::NumericCandidate;

struct Column {
    kind: Option<ValueColumn>,
    /// Header text from this term up to the next
    header_text: String,
}

/// `base` is the window's offset in the document
pub fn extract(window: &str, base: usize, ctx: &TableContext) -> Result<Vec<NumericCandidate>, SkipReason> {
    gate(window, ctx.vocab, ctx.config)?;

    let triggers = count_triggers(window, ctx.vocab);
    if triggers < ctx.config.min_triggers {
        return Err(SkipReason::TooFewTriggers(triggers));
    }
    let row_starts = ctx.vocab.district_row_starts.spans(window);
    let trigger_spans = ctx.vocab.header_triggers.spans(window);
    let header = header_cluster(&trigger_spans, ctx.config.header_gap, &row_starts)
        .ok_or(SkipReason::NoHeaderCluster)?;
    let header_end = header.last().map_or(0, |span| span.end);

    let rows = discover_rows(window, &row_starts, header_end, ctx.config)?;
    let rows = subdivide_wide_rows(window, rows, ctx.config.wide_row_factor);

    let first_row = rows.first().map_or(window.len(), |row| row.start);
    let columns: Vec<Column> = header
        .iter()
        .enumerate()
        .map(|(i, span)| {
            let next = header.get(i + 1).map_or(first_row, |n| n.start);
            Column {
                kind: classify_column(&span.term, ctx.vocab),
                header_text: window[span.start..next.max(span.end)].to_string(),
            }
        })
        .collect();
    if columns.iter().all(|c| c.kind.is_none()) {
        return Err(SkipReason::NoValueColumns);
    }

    let mut candidates = Vec::new();
    let mut truncated = BTreeSet::new();
    for row in &rows {
        if truncated.contains(&row.origin) || ctx.vocab.nonresidential_districts.matches(&row.label) {
            continue;
        }
        let mut body = row.body(window);
        if let Some(cut) = ctx.vocab.nonresidential_districts.first_span(body) {
            body = &body[..cut.start];
            truncated.insert(row.origin);
        }

        let cells = tokenize_cells(body, base + row.label_end);
        for (cell, column) in cells.iter().zip(&columns) {
            let (Cell::Value { value, suffix, offset }, Some(kind)) = (cell, column.kind) else {
                continue;
            };
            let category = category_for(kind, &column.header_text, *suffix);
            if let Some(candidate) =
                ctx.bounds
                    .admit(category, *value, Provenance::TableDistrictRows, *offset, true)
            {
                candidates.push(candidate);
            }
        }
    }
    Ok(candidates)
}
