//! Phases shared by both table orientations
//!
//! 1. [`gate`] rejects windows that read as prose
//! 2. [`count_triggers`] and [`header_cluster`] find the header row
//! 3. [`discover_rows`] and [`subdivide_wide_rows`] slice the body into rows
//! 4. [`tokenize_cells`] turns a row body into positional cells

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

use zoning_types::Category;

use crate::config::TableConfig;
use crate::normalize::parse_number;
use crate::relevance::matcher::ceil_boundary;
use crate::vocab::{Span, VocabularySet};

lazy_static! {
    static ref SENTENCE_BREAK: Regex = Regex::new(r"\.\s+[a-z]").unwrap();
    static ref TOKEN: Regex = Regex::new(r"\S+").unwrap();
    static ref GLUED_SUFFIX: Regex =
        Regex::new(r"^(\d+(?:\.\d+)?)(acres?|ac|stories|story|units?)$").unwrap();
}

/// Why a table window produced nothing
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Disqualified(String),
    TooManyTildes(usize),
    TooManySentences(usize),
    TooFewTriggers(usize),
    NoHeaderCluster,
    TooFewRows(usize),
    TooManyRows(usize),
    IrregularRows,
    NoValueColumns,
}

/// Phase 1
pub fn gate(window: &str, vocab: &VocabularySet, config: &TableConfig) -> Result<(), SkipReason> {
    if let Some(span) = vocab.table_disqualifiers.first_span(window) {
        return Err(SkipReason::Disqualified(span.term));
    }
    let tildes = window.matches('~').count();
    if tildes > config.max_tildes {
        return Err(SkipReason::TooManyTildes(tildes));
    }
    let sentences = SENTENCE_BREAK.find_iter(window).count();
    if sentences > config.max_sentences {
        return Err(SkipReason::TooManySentences(sentences));
    }
    Ok(())
}

/// Distinct dimensional trigger terms in the window
pub fn count_triggers(window: &str, vocab: &VocabularySet) -> usize {
    vocab.header_triggers.distinct(window).len()
}

/// The run of spans holding the most distinct terms. A run is split wherever
/// the gap reaches `max_gap` or one of `breaks` (row starts) lies between two
/// spans. Repeated terms are dropped so every returned span is one column slot.
pub fn header_cluster(spans: &[Span], max_gap: usize, breaks: &[Span]) -> Option<Vec<Span>> {
    let joins = |prev: &Span, span: &Span| {
        span.start.saturating_sub(prev.end) < max_gap
            && !breaks.iter().any(|b| b.start >= prev.end && b.start < span.start)
    };
    let mut clusters: Vec<Vec<Span>> = Vec::new();
    for span in spans {
        match clusters.last_mut() {
            Some(cluster) if cluster.last().is_some_and(|prev| joins(prev, span)) => {
                cluster.push(span.clone())
            }
            _ => clusters.push(vec![span.clone()]),
        }
    }

    let mut best: Option<Vec<Span>> = None;
    for cluster in clusters {
        let mut seen = BTreeSet::new();
        let slots: Vec<Span> = cluster
            .into_iter()
            .filter(|span| seen.insert(span.term.clone()))
            .collect();
        if slots.len() < 2 {
            continue;
        }
        if best.as_ref().map_or(true, |b| slots.len() > b.len()) {
            best = Some(slots);
        }
    }
    best
}

/// One logical table row, in window offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub label: String,
    pub start: usize,
    pub label_end: usize,
    pub end: usize,
    /// Start of the physical row this one was cut from
    pub origin: usize,
}

impl Row {
    pub fn width(&self) -> usize {
        self.end - self.start
    }

    pub fn body<'a>(&self, window: &'a str) -> &'a str {
        &window[self.label_end..self.end]
    }
}

pub fn median(values: &[usize]) -> usize {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted[sorted.len() / 2]
}

/// Phase 3. `starts` are every row-start match in the window; only those at
/// or after `after` become rows.
pub fn discover_rows(
    window: &str,
    starts: &[Span],
    after: usize,
    config: &TableConfig,
) -> Result<Vec<Row>, SkipReason> {
    if starts.len() > config.max_rows {
        return Err(SkipReason::TooManyRows(starts.len()));
    }
    let starts: Vec<&Span> = starts.iter().filter(|s| s.start >= after).collect();
    if starts.len() < config.min_rows {
        return Err(SkipReason::TooFewRows(starts.len()));
    }

    let gaps: Vec<usize> = starts.windows(2).map(|w| w[1].start - w[0].start).collect();
    let median_gap = median(&gaps);
    if median_gap == 0 {
        return Err(SkipReason::IrregularRows);
    }
    let m = median_gap as f64;
    let tolerance = config.spacing_tolerance;
    let irregular = gaps
        .iter()
        .filter(|&&gap| {
            let gap = gap as f64;
            gap > m * tolerance || gap * tolerance < m
        })
        .count();
    if irregular * 3 > gaps.len() {
        return Err(SkipReason::IrregularRows);
    }

    let rows = starts
        .iter()
        .enumerate()
        .map(|(i, span)| {
            let end = match starts.get(i + 1) {
                Some(next) => next.start,
                // at most one wide row past the last start
                None => ceil_boundary(
                    window,
                    span.start + (m * config.wide_row_factor) as usize,
                ),
            };
            Row {
                label: span.term.clone(),
                start: span.start,
                label_end: span.end,
                end: end.max(span.end),
                origin: span.start,
            }
        })
        .collect();
    Ok(rows)
}

/// Cut rows wider than `factor` times the median width into median-width
/// chunks, each ending on whitespace
pub fn subdivide_wide_rows(window: &str, rows: Vec<Row>, factor: f64) -> Vec<Row> {
    let widths: Vec<usize> = rows.iter().map(Row::width).collect();
    let chunk = median(&widths);
    if chunk == 0 {
        return rows;
    }

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if (row.width() as f64) <= factor * chunk as f64 {
            out.push(row);
            continue;
        }
        let mut start = row.start;
        while start < row.end {
            let mut end = (start + chunk).min(row.end);
            if start == row.start {
                end = end.max(row.label_end);
            }
            end = next_whitespace(window, end).min(row.end);
            out.push(Row {
                label: row.label.clone(),
                start,
                label_end: if start == row.start { row.label_end } else { start },
                end,
                origin: row.origin,
            });
            start = end;
        }
    }
    out
}

fn next_whitespace(window: &str, from: usize) -> usize {
    let from = ceil_boundary(window, from);
    window[from..]
        .find(char::is_whitespace)
        .map_or(window.len(), |i| from + i)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suffix {
    Acres,
    Stories,
    Units,
}

fn suffix_word(token: &str) -> Option<Suffix> {
    match token {
        "acre" | "acres" | "ac" => Some(Suffix::Acres),
        "stories" | "story" => Some(Suffix::Stories),
        "unit" | "units" => Some(Suffix::Units),
        _ => None,
    }
}

fn is_placeholder(token: &str) -> bool {
    matches!(token, "-" | "--" | "n/a" | "na" | "none" | "nr")
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Value {
        value: f64,
        suffix: Option<Suffix>,
        offset: usize,
    },
    /// A dash or "n/a" that still occupies a column slot
    Placeholder,
}

/// Phase 4. Numbers and placeholders in row order. Parenthesized tokens and
/// plain words are dropped; unit words are glued onto the preceding number.
pub fn tokenize_cells(body: &str, base: usize) -> Vec<Cell> {
    let mut cells: Vec<Cell> = Vec::new();
    let mut depth = 0usize;
    for token in TOKEN.find_iter(body) {
        let raw = token.as_str();
        let opens = raw.matches('(').count();
        let closes = raw.matches(')').count();
        if depth > 0 || raw.starts_with('(') {
            depth = (depth + opens).saturating_sub(closes);
            continue;
        }

        let cleaned = raw.trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '*' | '%'));
        if is_placeholder(cleaned) {
            cells.push(Cell::Placeholder);
            continue;
        }
        let cleaned = cleaned.trim_end_matches('.');
        if let Some(suffix) = suffix_word(cleaned) {
            if let Some(Cell::Value { suffix: slot @ None, .. }) = cells.last_mut() {
                *slot = Some(suffix);
            }
            continue;
        }

        let offset = base + token.start();
        if let Some(caps) = GLUED_SUFFIX.captures(cleaned) {
            if let Some(value) = parse_number(&caps[1]) {
                cells.push(Cell::Value {
                    value,
                    suffix: suffix_word(&caps[2]),
                    offset,
                });
            }
            continue;
        }
        if let Some(value) = parse_number(cleaned) {
            cells.push(Cell::Value {
                value,
                suffix: None,
                offset,
            });
        }
    }
    cells
}

/// Columns (or row labels) whose values are read off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueColumn {
    LotSize,
    LotPerUnit,
    Density,
    Height,
}

pub fn classify_column(term: &str, vocab: &VocabularySet) -> Option<ValueColumn> {
    if vocab.lot_per_unit_columns.matches(term) {
        Some(ValueColumn::LotPerUnit)
    } else if vocab.density_columns.matches(term) {
        Some(ValueColumn::Density)
    } else if vocab.lot_size_columns.matches(term) {
        Some(ValueColumn::LotSize)
    } else if vocab.height_columns.matches(term) {
        Some(ValueColumn::Height)
    } else {
        None
    }
}

/// Category of a cell, from its column, the column's header text and any
/// glued unit word
pub fn category_for(column: ValueColumn, header_text: &str, suffix: Option<Suffix>) -> Category {
    match column {
        ValueColumn::LotSize if suffix == Some(Suffix::Acres) || header_text.contains("acre") => {
            Category::Acres
        }
        ValueColumn::LotSize => Category::SquareFeet,
        ValueColumn::LotPerUnit => Category::SquareFeetPerUnit,
        ValueColumn::Density => Category::UnitsPerAcre,
        ValueColumn::Height if suffix == Some(Suffix::Stories) || header_text.contains("stories") => {
            Category::HeightStories
        }
        ValueColumn::Height => Category::HeightFeet,
    }
}
