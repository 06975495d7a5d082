//! Dimensional facts stated in prose
//!
//! Narrower and stricter than the table path: every anchor opens a small
//! symmetric window, a stop phrase anywhere in it discards the window, and at
//! most one value is kept per anchor.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use zoning_types::{Category, Provenance};

use crate::candidate::{NumericCandidate, PlausibilityBounds};
use crate::config::FreeTextConfig;
use crate::normalize::{parse_number, NormalizedNumbers};
use crate::relevance::matcher::window_bounds;
use crate::vocab::{Vocabulary, VocabularySet};

lazy_static! {
    /// Lot size, with an optional per-unit tail that turns it into density
    static ref LOT_VALUE: Regex = Regex::new(
        r"\b(\d+(?:\.\d+)?)\s*(square feet|acres?)\b((?:\s+of lot area)?\s+(?:per|for each)\s+(?:dwelling unit|unit|family))?"
    ).unwrap();

    static ref UNITS_PER_ACRE: Regex = Regex::new(
        r"\b(\d+(?:\.\d+)?)\s*(?:dwelling unit|units?|families)\s*per\s*(?:gross |net |buildable )?acre\b"
    ).unwrap();

    static ref ONE_UNIT_PER_AREA: Regex = Regex::new(
        r"\b1\s*(?:dwelling unit|unit|family)\s*(?:per|for each)\s*(\d+(?:\.\d+)?)\s*square feet\b"
    ).unwrap();

    static ref HEIGHT_FEET: Regex = Regex::new(r"\b(\d+(?:\.\d+)?)\s*feet\b").unwrap();

    static ref HEIGHT_STORIES: Regex = Regex::new(r"\b(\d+(?:\.\d+)?)\s*stories\b").unwrap();

    /// `n parking space per m dwelling unit`
    static ref PARKING_RATIO: Regex = Regex::new(
        r"\b(\d+(?:\.\d+)?)\s*(?:parking space|spaces?)\s*(?:per|for each)\s*(\d+(?:\.\d+)?)\s*(?:dwelling unit|units?)\b"
    ).unwrap();

    static ref PARKING_PER_UNIT: Regex = Regex::new(
        r"\b(\d+(?:\.\d+)?)\s*(?:parking space|spaces?)\s*(?:per|for each|for every)\s*(?:dwelling unit|unit|family)\b"
    ).unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    LotSize,
    Density,
    Height,
    Parking,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::LotSize, Topic::Density, Topic::Height, Topic::Parking];

    fn anchors(self, vocab: &VocabularySet) -> &Vocabulary {
        match self {
            Topic::LotSize => &vocab.lot_anchors,
            Topic::Density => &vocab.density_anchors,
            Topic::Height => &vocab.height_anchors,
            Topic::Parking => &vocab.parking_anchors,
        }
    }

    fn stop_phrases(self, vocab: &VocabularySet) -> &Vocabulary {
        match self {
            Topic::LotSize => &vocab.lot_stop_phrases,
            Topic::Density => &vocab.density_stop_phrases,
            Topic::Height => &vocab.height_stop_phrases,
            Topic::Parking => &vocab.parking_stop_phrases,
        }
    }
}

/// A value found in a normalized window
#[derive(Debug, Clone, Copy, PartialEq)]
struct Found {
    start: usize,
    end: usize,
    category: Category,
    value: f64,
}

fn number(caps: &Captures, group: usize) -> Option<f64> {
    caps.get(group).and_then(|m| parse_number(m.as_str()))
}

fn collect(regex: &Regex, window: &str, found: &mut Vec<Found>, read: impl Fn(&Captures) -> Option<(Category, f64)>) {
    for caps in regex.captures_iter(window) {
        let Some(whole) = caps.get(0) else { continue };
        if let Some((category, value)) = read(&caps) {
            found.push(Found {
                start: whole.start(),
                end: whole.end(),
                category,
                value,
            });
        }
    }
}

/// Every value of the topic in the window, in text order
fn scan(topic: Topic, window: &str) -> Vec<Found> {
    let mut found = Vec::new();
    match topic {
        Topic::LotSize => collect(&LOT_VALUE, window, &mut found, |caps| {
            if caps.get(3).is_some() {
                return None;
            }
            let category = if caps[2].starts_with("acre") {
                Category::Acres
            } else {
                Category::SquareFeet
            };
            number(caps, 1).map(|v| (category, v))
        }),
        Topic::Density => {
            collect(&UNITS_PER_ACRE, window, &mut found, |caps| {
                number(caps, 1).map(|v| (Category::UnitsPerAcre, v))
            });
            collect(&ONE_UNIT_PER_AREA, window, &mut found, |caps| {
                number(caps, 1).map(|v| (Category::SquareFeetPerUnit, v))
            });
            collect(&LOT_VALUE, window, &mut found, |caps| {
                let per_unit = caps.get(3).is_some() && &caps[2] == "square feet";
                if !per_unit {
                    return None;
                }
                number(caps, 1).map(|v| (Category::SquareFeetPerUnit, v))
            });
        }
        Topic::Height => {
            collect(&HEIGHT_FEET, window, &mut found, |caps| {
                number(caps, 1).map(|v| (Category::HeightFeet, v))
            });
            collect(&HEIGHT_STORIES, window, &mut found, |caps| {
                number(caps, 1).map(|v| (Category::HeightStories, v))
            });
        }
        Topic::Parking => {
            collect(&PARKING_RATIO, window, &mut found, |caps| {
                let spaces = number(caps, 1)?;
                let units = number(caps, 2)?;
                (units > 0.0).then(|| (Category::ParkingPerUnit, spaces / units))
            });
            collect(&PARKING_PER_UNIT, window, &mut found, |caps| {
                number(caps, 1).map(|v| (Category::ParkingPerUnit, v))
            });
        }
    }
    found.sort_by_key(|f| (f.start, f.end));
    found
}

pub struct FreeTextExtractor<'a> {
    vocab: &'a VocabularySet,
    config: &'a FreeTextConfig,
    bounds: &'a PlausibilityBounds,
}

impl<'a> FreeTextExtractor<'a> {
    pub fn new(vocab: &'a VocabularySet, config: &'a FreeTextConfig, bounds: &'a PlausibilityBounds) -> Self {
        Self { vocab, config, bounds }
    }

    fn residential(&self, window: &str) -> bool {
        self.vocab.residential_context.matches(window) || self.vocab.district_tokens.matches(window)
    }

    fn stopped(&self, topic: Topic, window: &str) -> bool {
        self.vocab.common_stop_phrases.matches(window) || topic.stop_phrases(self.vocab).matches(window)
    }

    /// At most one candidate per anchor. The first in-bound value reaching
    /// past the anchor wins, then the nearest one before it.
    pub fn extract_topic(&self, text: &str, topic: Topic) -> Vec<NumericCandidate> {
        let mut candidates = Vec::new();
        for anchor in topic.anchors(self.vocab).spans(text) {
            let (start, end) = window_bounds(text, anchor.start, anchor.end, self.config.window_radius);
            let raw = &text[start..end];
            if self.stopped(topic, raw) {
                continue;
            }
            let residential = self.residential(raw);
            let window = NormalizedNumbers::new(raw);
            let anchor_at = anchor.start - start;

            let admit = |f: &Found| {
                let offset = start + window.source_offset(f.start);
                self.bounds
                    .admit(f.category, f.value, Provenance::FreeText, offset, residential)
            };
            let found = scan(topic, window.as_str());
            let reaches_past = |f: &&Found| window.source_offset(f.end) > anchor_at;
            let after = found.iter().filter(reaches_past).find_map(admit);
            let chosen = after.or_else(|| found.iter().rev().filter(|f| !reaches_past(f)).find_map(admit));
            if let Some(candidate) = chosen {
                candidates.push(candidate);
            }
        }
        candidates
    }

    pub fn extract(&self, text: &str) -> Vec<NumericCandidate> {
        Topic::ALL
            .iter()
            .flat_map(|topic| self.extract_topic(text, *topic))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoundsConfig;

    fn run(text: &str) -> Vec<(Category, f64)> {
        let vocab = VocabularySet::builtin().unwrap();
        let config = FreeTextConfig::default();
        let bounds = PlausibilityBounds::new(BoundsConfig::default());
        FreeTextExtractor::new(&vocab, &config, &bounds)
            .extract(text)
            .into_iter()
            .map(|c| (c.category(), c.value()))
            .collect()
    }

    #[test]
    fn test_lot_area_and_height() {
        let found = run("r-1 single family district. minimum lot area 7500 square feet. maximum height 35 feet");
        assert!(found.contains(&(Category::SquareFeet, 7500.0)));
        assert!(found.contains(&(Category::HeightFeet, 35.0)));
        assert!(!found.iter().any(|(c, _)| *c == Category::HeightStories));
    }

    #[test]
    fn test_density_before_and_after_anchor() {
        let found = run("r-2 district permits multifamily dwellings, density shall not exceed 12 units per acre");
        assert!(!found.is_empty());
        assert!(found.iter().all(|f| *f == (Category::UnitsPerAcre, 12.0)));
    }

    #[test]
    fn test_square_feet_per_unit_is_density_not_lot_size() {
        let found = run("the lot area shall be at least 3000 square feet per dwelling unit in the r-3 district");
        assert!(found.contains(&(Category::SquareFeetPerUnit, 3000.0)));
        assert!(!found.contains(&(Category::SquareFeet, 3000.0)));

        let found = run("density shall not exceed 1 dwelling unit per 5000 square feet of residential land");
        assert!(found.contains(&(Category::SquareFeetPerUnit, 5000.0)));
    }

    #[test]
    fn test_word_numbers_and_fractions_resolved() {
        let found = run("no dwelling shall exceed a maximum height of thirty-five feet or two and a half stories");
        assert!(found.contains(&(Category::HeightFeet, 35.0)));

        let found = run("each residential lot shall have a minimum lot size of one and a half acres");
        assert!(found.contains(&(Category::Acres, 1.5)));
    }

    #[test]
    fn test_offsets_are_document_positions() {
        let vocab = VocabularySet::builtin().unwrap();
        let config = FreeTextConfig::default();
        let bounds = PlausibilityBounds::new(BoundsConfig::default());
        let text = format!(
            "lot width of one hundred twenty five feet {}no dwelling shall exceed a height of 35 feet in height",
            "x ".repeat(18)
        );
        let heights = FreeTextExtractor::new(&vocab, &config, &bounds).extract_topic(&text, Topic::Height);

        // both anchors read the same statement
        let at = text.find("35 feet").unwrap();
        assert!(heights.len() >= 2);
        assert!(heights.iter().all(|c| c.value() == 35.0 && c.offset() == at));
        assert_eq!(crate::aggregate::dedupe(heights).len(), 1);
    }

    #[test]
    fn test_parking_ratios() {
        let found = run("two parking space per dwelling unit shall be provided");
        assert_eq!(found, vec![(Category::ParkingPerUnit, 2.0)]);

        let found = run("3 parking space for each 2 dwelling unit in any residential district");
        assert_eq!(found, vec![(Category::ParkingPerUnit, 1.5)]);
    }

    #[test]
    fn test_stop_phrases_suppress_window() {
        assert!(run("the maximum height of any fence shall be 6 feet").is_empty());
        assert!(run("a fee of $500 per lot area review").is_empty());
        assert!(run("in the commercial district the minimum lot area is 20000 square feet").is_empty());
    }

    #[test]
    fn test_out_of_bound_values_dropped() {
        assert!(run("maximum height 400 feet for dwellings").is_empty());
        // acreage outside a residential context is capped at five
        assert!(run("minimum lot size 20 acres").is_empty());
        assert_eq!(run("minimum lot size 20 acres per residence"), vec![(Category::Acres, 20.0)]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: free-text values never violate their category bound
        #[test]
        fn values_within_bounds(value in 0u32..5_000_000, unit in prop::sample::select(vec![
            "square feet", "acres", "feet", "stories", "units per acre", "parking space per dwelling unit",
        ])) {
            let vocab = VocabularySet::builtin().unwrap();
            let config = FreeTextConfig::default();
            let bounds = PlausibilityBounds::default();
            let extractor = FreeTextExtractor::new(&vocab, &config, &bounds);
            let text = format!("minimum lot area maximum height density parking space {} {}", value, unit);
            for c in extractor.extract(&text) {
                let (min, max) = bounds.range(c.category(), true);
                prop_assert!(c.value() >= min && c.value() <= max);
            }
        }
    }
}
