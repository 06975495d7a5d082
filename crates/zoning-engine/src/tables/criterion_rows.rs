//! Dimensional tables with one district per column
//!
//! ```text
//!                                  r-1    r-2    c-1
//! minimum lot area (square feet)   20000  10000  5000
//! maximum height (feet)            35     35     45
//! ```

use zoning_types::Provenance;

use super::layout::{
    category_for, classify_column, count_triggers, discover_rows, gate, header_cluster,
    subdivide_wide_rows, tokenize_cells, Cell, SkipReason,
};
use super::TableContext;
use crate::candidate::NumericCandidate;

pub fn extract(window: &str, base: usize, ctx: &TableContext) -> Result<Vec<NumericCandidate>, SkipReason> {
    gate(window, ctx.vocab, ctx.config)?;

    let triggers = count_triggers(window, ctx.vocab);
    if triggers < ctx.config.min_triggers {
        return Err(SkipReason::TooFewTriggers(triggers));
    }
    let row_starts = ctx.vocab.criterion_labels.spans(window);
    let district_spans = ctx.vocab.district_columns.spans(window);
    let header = header_cluster(&district_spans, ctx.config.header_gap, &row_starts)
        .ok_or(SkipReason::NoHeaderCluster)?;
    let header_end = header.last().map_or(0, |span| span.end);

    // column positions of residential districts
    let residential: Vec<bool> = header
        .iter()
        .map(|span| !ctx.vocab.nonresidential_districts.matches(&span.term))
        .collect();
    if !residential.iter().any(|r| *r) {
        return Err(SkipReason::NoValueColumns);
    }

    let rows = discover_rows(window, &row_starts, header_end, ctx.config)?;
    let rows = subdivide_wide_rows(window, rows, ctx.config.wide_row_factor);

    let mut candidates = Vec::new();
    for row in &rows {
        let Some(kind) = classify_column(&row.label, ctx.vocab) else {
            continue;
        };
        let body = row.body(window);
        let cells = tokenize_cells(body, base + row.label_end);
        let unit_text = match cells.first() {
            Some(Cell::Value { offset, .. }) => &window[row.start..offset - base],
            _ => &window[row.start..row.end],
        };

        for (cell, is_residential) in cells.iter().zip(&residential) {
            let Cell::Value { value, suffix, offset } = cell else {
                continue;
            };
            if !is_residential {
                continue;
            }
            let category = category_for(kind, unit_text, *suffix);
            if let Some(candidate) =
                ctx.bounds
                    .admit(category, *value, Provenance::TableCriterionRows, *offset, true)
            {
                candidates.push(candidate);
            }
        }
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::PlausibilityBounds;
    use crate::config::TableConfig;
    use crate::vocab::VocabularySet;
    use zoning_types::Category;

    const TABLE: &str = "table 2 dimensional requirements r-1 r-2 r-3 c-1 \
        minimum lot area (square feet) 20000 10000 7500 5000 \
        minimum lot width (feet) 100 80 60 50 \
        front yard (feet) 35 30 25 20 \
        maximum height (feet) 35 35 35 45";

    fn run(window: &str) -> Result<Vec<NumericCandidate>, SkipReason> {
        let vocab = VocabularySet::builtin().unwrap();
        let config = TableConfig::default();
        let bounds = PlausibilityBounds::default();
        let ctx = TableContext {
            vocab: &vocab,
            config: &config,
            bounds: &bounds,
        };
        extract(window, 0, &ctx)
    }

    fn values(candidates: &[NumericCandidate], category: Category) -> Vec<f64> {
        candidates
            .iter()
            .filter(|c| c.category() == category)
            .map(|c| c.value())
            .collect()
    }

    #[test]
    fn test_reads_residential_columns_only() {
        let candidates = run(TABLE).unwrap();
        assert_eq!(values(&candidates, Category::SquareFeet), vec![20000.0, 10000.0, 7500.0]);
        assert_eq!(values(&candidates, Category::HeightFeet), vec![35.0, 35.0, 35.0]);
        assert!(candidates.iter().all(|c| c.provenance() == Provenance::TableCriterionRows));
    }

    #[test]
    fn test_units_from_row_label() {
        let window = "lot standards r-1 r-2 r-3 minimum lot size (acres) 2 1 0.5 \
            maximum density 1 2 4 front yard 50 40 30 maximum height (stories) 2.5 2.5 3";
        let candidates = run(window).unwrap();
        assert_eq!(values(&candidates, Category::Acres), vec![2.0, 1.0, 0.5]);
        assert_eq!(values(&candidates, Category::UnitsPerAcre), vec![1.0, 2.0, 4.0]);
        assert_eq!(values(&candidates, Category::HeightStories), vec![2.5, 2.5, 3.0]);
    }

    #[test]
    fn test_placeholder_keeps_alignment() {
        let window = "dimensional requirements r-1 r-2 r-3 minimum lot area 20000 - 7500 \
            front yard 35 30 25 maximum height 35 35 35";
        let candidates = run(window).unwrap();
        let lots: Vec<_> = candidates
            .iter()
            .filter(|c| c.category() == Category::SquareFeet)
            .collect();
        assert_eq!(lots.len(), 2);
        assert_eq!(&window[lots[1].offset()..lots[1].offset() + 4], "7500");
    }

    #[test]
    fn test_district_rows_layout_is_not_read_as_columns() {
        let window = "dimensional requirements district minimum lot area front yard maximum height \
            r-1 20000 35 35 r-2 10000 30 35";
        assert!(matches!(run(window), Err(SkipReason::TooFewRows(0))));
    }
}
