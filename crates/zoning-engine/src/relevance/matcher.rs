//! Context windows per measure, re-scanned against the weighted keywords

use std::collections::BTreeSet;
use std::convert::Infallible;

use zoning_types::{Measure, MEASURE_COUNT};

use super::topics::{measure_phrases, TopicPhrase, WIDE_PHRASES};
use crate::config::WindowConfig;
use crate::deadline::Deadline;
use crate::error::Result;
use crate::keywords::KeywordDictionary;
use crate::vocab::find_phrase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusClass {
    Narrow,
    Medium,
    Wide,
}

impl RadiusClass {
    pub fn for_phrase(phrase: &str) -> Self {
        if WIDE_PHRASES.iter().any(|wide| *wide == phrase) {
            RadiusClass::Wide
        } else if phrase.contains("parking") {
            RadiusClass::Medium
        } else {
            RadiusClass::Narrow
        }
    }

    pub fn radius(self, config: &WindowConfig) -> usize {
        match self {
            RadiusClass::Narrow => config.narrow,
            RadiusClass::Medium => config.medium,
            RadiusClass::Wide => config.wide,
        }
    }
}

/// A slice of the normalized document around one phrase occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    pub measure: Measure,
    pub phrase: &'static str,
    pub anchor: usize,
    pub start: usize,
    pub end: usize,
}

impl ContextWindow {
    pub fn text<'a>(&self, document: &'a str) -> &'a str {
        &document[self.start..self.end]
    }
}

/// Keywords of one measure found inside one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub measure: Measure,
    pub phrase: &'static str,
    pub anchor: usize,
    pub keywords: Vec<String>,
}

/// Match records grouped by measure index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    records: Vec<Vec<MatchRecord>>,
}

impl MatchSet {
    pub fn records(&self, measure: Measure) -> &[MatchRecord] {
        self.records
            .get(measure.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchRecord> {
        self.records.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.records.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Largest char boundary not after `index`
pub(crate) fn floor_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Smallest char boundary not before `index`
pub(crate) fn ceil_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

/// Window of `radius` characters either side of `anchor..anchor_end`
pub(crate) fn window_bounds(text: &str, anchor: usize, anchor_end: usize, radius: usize) -> (usize, usize) {
    let start = floor_boundary(text, anchor.saturating_sub(radius));
    let end = ceil_boundary(text, anchor_end.saturating_add(radius));
    (start, end)
}

fn phrase_present(text: &str, groups: &[&[&str]]) -> bool {
    groups
        .iter()
        .flat_map(|group| group.iter())
        .any(|variant| !find_phrase(text, variant).is_empty())
}

pub fn find_windows(text: &str, measure: Measure, config: &WindowConfig) -> Vec<ContextWindow> {
    let mut windows = Vec::new();
    for topic in measure_phrases(measure) {
        if let TopicPhrase::Generic { unless_any, .. } = topic {
            if phrase_present(text, unless_any) {
                continue;
            }
        }
        let phrase = topic.phrase();
        let radius = RadiusClass::for_phrase(phrase).radius(config);
        let mut seen = BTreeSet::new();
        for anchor in find_phrase(text, phrase) {
            if !seen.insert(anchor) {
                continue;
            }
            let (start, end) = window_bounds(text, anchor, anchor + phrase.len(), radius);
            windows.push(ContextWindow {
                measure,
                phrase,
                anchor,
                start,
                end,
            });
        }
    }
    windows
}

/// Every dictionary keyword of the measure present in the window. Keywords
/// are checked independently so overlapping occurrences are all captured.
pub fn rescan(window: &str, measure: Measure, dictionary: &KeywordDictionary) -> Vec<String> {
    dictionary
        .keywords(measure)
        .filter(|keyword| !find_phrase(window, keyword).is_empty())
        .map(str::to_string)
        .collect()
}

pub fn match_document(text: &str, dictionary: &KeywordDictionary, config: &WindowConfig) -> MatchSet {
    match collect_matches(text, dictionary, config, || Ok::<(), Infallible>(())) {
        Ok(matches) => matches,
        Err(never) => match never {},
    }
}

/// As [`match_document`], checking the deadline before every window
pub fn match_document_within(
    text: &str,
    dictionary: &KeywordDictionary,
    config: &WindowConfig,
    deadline: &Deadline,
) -> Result<MatchSet> {
    collect_matches(text, dictionary, config, || deadline.check())
}

fn collect_matches<E>(
    text: &str,
    dictionary: &KeywordDictionary,
    config: &WindowConfig,
    mut poll: impl FnMut() -> std::result::Result<(), E>,
) -> std::result::Result<MatchSet, E> {
    let mut records = Vec::with_capacity(MEASURE_COUNT);
    for measure in Measure::ALL {
        let mut per_measure = Vec::new();
        for window in find_windows(text, measure, config) {
            poll()?;
            per_measure.push(MatchRecord {
                measure,
                phrase: window.phrase,
                anchor: window.anchor,
                keywords: rescan(window.text(text), measure, dictionary),
            });
        }
        records.push(per_measure);
    }
    Ok(MatchSet { records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ZoningError;
    use crate::keywords::tests::sample_dictionary;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn test_radius_classes() {
        let config = WindowConfig::default();
        assert_eq!(RadiusClass::for_phrase("minimum lot area").radius(&config), 2000);
        assert_eq!(RadiusClass::for_phrase("off street parking").radius(&config), 750);
        assert_eq!(RadiusClass::for_phrase("impact fee").radius(&config), 250);
    }

    #[test]
    fn test_windows_clamped_to_document() {
        let text = "impact fee of five hundred";
        let windows = find_windows(text, Measure::ImpactFee, &WindowConfig::default());
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].start, 0);
        assert_eq!(windows[0].end, text.len());
        assert_eq!(windows[0].anchor, 0);
    }

    #[test]
    fn test_windows_one_per_occurrence() {
        let text = format!("impact fee {} impact fee", "x ".repeat(400));
        let windows = find_windows(&text, Measure::ImpactFee, &WindowConfig::default());
        let anchors: Vec<_> = windows.iter().map(|w| w.anchor).collect();
        assert_eq!(anchors, vec![0, text.len() - "impact fee".len()]);
        assert!(windows[0].end < windows[1].start);
    }

    #[test]
    fn test_generic_district_only_without_variants() {
        let config = WindowConfig::default();
        let bare = find_windows("each district shall", Measure::ResidentialDistricts, &config);
        assert!(bare.iter().any(|w| w.phrase == "district"));

        let specific = find_windows(
            "the rural residential district and each district",
            Measure::ResidentialDistricts,
            &config,
        );
        assert!(specific.iter().all(|w| w.phrase != "district"));
        assert!(specific.iter().all(|w| w.phrase != "residential district"));
        assert!(specific.iter().any(|w| w.phrase == "rural residential district"));

        let residential = find_windows("in any residential district", Measure::ResidentialDistricts, &config);
        assert!(residential.iter().any(|w| w.phrase == "residential district"));
        assert!(residential.iter().all(|w| w.phrase != "district"));
    }

    #[test]
    fn test_rescan_captures_overlapping_keywords() {
        let dict = sample_dictionary();
        let keywords = rescan("minimum lot area 7500 square feet", Measure::MinimumLotSize, &dict);
        assert_eq!(keywords, vec!["lot area", "minimum", "square feet"]);

        let keywords = rescan("maximum height 35 feet", Measure::HeightLimit, &dict);
        assert_eq!(keywords, vec!["feet", "maximum height"]);
    }

    #[test]
    fn test_match_document_groups_by_measure() {
        let dict = sample_dictionary();
        let text = "minimum lot area 7500 square feet. maximum height 35 feet";
        let matches = match_document(text, &dict, &WindowConfig::default());
        assert!(!matches.records(Measure::MinimumLotSize).is_empty());
        assert!(!matches.records(Measure::HeightLimit).is_empty());
        assert!(matches.records(Measure::ImpactFee).is_empty());
        assert!(matches.iter().all(|r| {
            let unique: BTreeSet<_> = r.keywords.iter().collect();
            unique.len() == r.keywords.len()
        }));
    }

    #[test]
    fn test_match_document_within_deadline() {
        let dict = sample_dictionary();
        let text = "minimum lot area 7500 square feet. maximum height 35 feet";
        let config = WindowConfig::default();

        let generous = Deadline::start("a.txt", Duration::from_secs(60));
        assert_eq!(
            match_document_within(text, &dict, &config, &generous).unwrap(),
            match_document(text, &dict, &config)
        );
        let expired = Deadline::start("a.txt", Duration::ZERO);
        assert!(matches!(
            match_document_within(text, &dict, &config, &expired),
            Err(ZoningError::Timeout { .. })
        ));
    }
}
