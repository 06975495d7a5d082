//! Weighted keyword sums to presence flags

use zoning_types::{Measure, MeasureFlags, MEASURE_COUNT};

use super::matcher::{MatchRecord, MatchSet};
use crate::keywords::KeywordDictionary;

pub fn window_score(record: &MatchRecord, dictionary: &KeywordDictionary) -> f64 {
    record
        .keywords
        .iter()
        .filter_map(|keyword| dictionary.weight(record.measure, keyword))
        .sum()
}

/// Strictly greater than the threshold
pub fn is_hit(score: f64, threshold: f64) -> bool {
    score > threshold
}

/// Hit windows per measure index
pub fn hit_counts(matches: &MatchSet, dictionary: &KeywordDictionary, threshold: f64) -> [usize; MEASURE_COUNT] {
    let mut counts = [0usize; MEASURE_COUNT];
    for record in matches.iter() {
        if is_hit(window_score(record, dictionary), threshold) {
            counts[record.measure.index()] += 1;
        }
    }
    counts
}

pub fn score(matches: &MatchSet, dictionary: &KeywordDictionary, threshold: f64) -> MeasureFlags {
    let counts = hit_counts(matches, dictionary, threshold);
    let mut flags = MeasureFlags::default();
    for measure in Measure::ALL {
        flags.set(measure, counts[measure.index()] > 0);
    }
    flags
}
