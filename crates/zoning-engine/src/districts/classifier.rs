//! Per-occurrence district classification
//!
//! Each district token is judged from a bounded window around it. Rules in
//! order: a bad phrase vetoes the window, use-list boilerplate defers to the
//! next cue after it, a list of other districts without a family cue is an
//! enumeration, and otherwise the closest cue wins.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::convert::Infallible;
use tracing::debug;

use zoning_types::DistrictLabel;

use crate::config::DistrictConfig;
use crate::deadline::Deadline;
use crate::error::Result;
use crate::relevance::matcher::window_bounds;
use crate::vocab::{Span, VocabularySet};

lazy_static! {
    static ref CODE_PARTS: Regex = Regex::new(r"^([a-z]+)-?(\d.*)$").unwrap();
}

/// One occurrence of a district name in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictToken {
    /// Canonical name shared by every spelling of the district
    pub name: String,
    pub offset: usize,
    pub end: usize,
}

/// `r1`, `R-1` and `r-1` all name the same district
pub fn canonical_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    match CODE_PARTS.captures(&lowered) {
        Some(caps) => format!("{}-{}", &caps[1], &caps[2]),
        None => lowered,
    }
}

pub fn find_tokens(text: &str, vocab: &VocabularySet) -> Vec<DistrictToken> {
    vocab
        .district_tokens
        .spans(text)
        .into_iter()
        .map(|span| DistrictToken {
            name: canonical_name(&span.term),
            offset: span.start,
            end: span.end,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cue {
    label: DistrictLabel,
    start: usize,
    end: usize,
}

impl Cue {
    fn distance(&self, token: &DistrictToken) -> usize {
        if self.start >= token.end {
            self.start - token.end
        } else if self.end <= token.offset {
            token.offset - self.end
        } else {
            0
        }
    }
}

/// Nearest cue; equal distances go to the stronger label
fn closest<'c>(cues: impl Iterator<Item = &'c Cue>, distance: impl Fn(&Cue) -> usize) -> Option<DistrictLabel> {
    cues.min_by_key(|cue| (distance(cue), cue.label)).map(|cue| cue.label)
}

pub struct DistrictClassifier<'a> {
    vocab: &'a VocabularySet,
    config: &'a DistrictConfig,
}

impl<'a> DistrictClassifier<'a> {
    pub fn new(vocab: &'a VocabularySet, config: &'a DistrictConfig) -> Self {
        Self { vocab, config }
    }

    /// Family cues of the window in document offsets, minus multifamily and
    /// mixed-use cues that only describe a conditional use
    fn cues(&self, window: &str, base: usize) -> Vec<Cue> {
        let conditional: Vec<Span> = self.vocab.conditional_use.spans(window);
        let lookback = self.config.conditional_lookback;

        let mut cues = Vec::new();
        for (label, vocabulary) in [
            (DistrictLabel::Multifamily, &self.vocab.multifamily_cues),
            (DistrictLabel::MixedUse, &self.vocab.mixed_use_cues),
            (DistrictLabel::TwoFamily, &self.vocab.two_family_cues),
            (DistrictLabel::SingleFamily, &self.vocab.single_family_cues),
        ] {
            for span in vocabulary.spans(window) {
                let by_condition = label.allows_multifamily()
                    && conditional
                        .iter()
                        .any(|c| c.end <= span.start && span.start - c.end <= lookback);
                if by_condition {
                    continue;
                }
                cues.push(Cue {
                    label,
                    start: base + span.start,
                    end: base + span.end,
                });
            }
        }
        cues
    }

    /// Label of a single occurrence. `Unclassified` occurrences are left out
    /// of every count.
    pub fn classify_occurrence(&self, text: &str, token: &DistrictToken, tokens: &[DistrictToken]) -> DistrictLabel {
        let (start, end) = window_bounds(text, token.offset, token.end, self.config.window_radius);
        let window = &text[start..end];

        if let Some(bad) = self.vocab.district_bad_phrases.first_span(window) {
            debug!(district = %token.name, offset = token.offset, phrase = %bad.term, "Vetoed district window");
            return DistrictLabel::Unclassified;
        }

        let cues = self.cues(window, start);

        // use-list boilerplate: the first cue listed after it decides
        let boilerplate = self.vocab.district_boilerplate.spans(window);
        let anchor = boilerplate
            .iter()
            .find(|b| start + b.start >= token.offset)
            .or_else(|| boilerplate.last());
        if let Some(b) = anchor {
            let after = start + b.end;
            if let Some(label) = closest(cues.iter().filter(|c| c.start >= after), |c| c.start - after) {
                return label;
            }
        }

        // tokens are in text order
        let first = tokens.partition_point(|t| t.offset < start);
        let last = tokens.partition_point(|t| t.offset < end);
        let others: BTreeSet<&str> = tokens[first..last.max(first)]
            .iter()
            .filter(|t| t.end <= end && t.name != token.name)
            .map(|t| t.name.as_str())
            .collect();
        let family_cue_nearby = cues.iter().any(|c| {
            matches!(c.label, DistrictLabel::SingleFamily | DistrictLabel::Multifamily)
                && c.distance(token) <= self.config.cue_proximity
        });
        if others.len() >= self.config.enumeration_min && !family_cue_nearby {
            debug!(district = %token.name, offset = token.offset, others = others.len(), "District enumeration");
            return DistrictLabel::Unclassified;
        }

        closest(cues.iter(), |c| c.distance(token)).unwrap_or(DistrictLabel::Unclassified)
    }

    pub fn classify_document(&self, text: &str) -> DistrictSummary {
        match self.vote(text, || Ok::<(), Infallible>(())) {
            Ok(summary) => summary,
            Err(never) => match never {},
        }
    }

    /// As [`classify_document`](Self::classify_document), checking the
    /// deadline before every occurrence
    pub fn classify_document_within(&self, text: &str, deadline: &Deadline) -> Result<DistrictSummary> {
        self.vote(text, || deadline.check())
    }

    fn vote<E>(
        &self,
        text: &str,
        mut poll: impl FnMut() -> std::result::Result<(), E>,
    ) -> std::result::Result<DistrictSummary, E> {
        let tokens = find_tokens(text, self.vocab);
        let mut votes: BTreeMap<String, BTreeMap<DistrictLabel, usize>> = BTreeMap::new();
        for token in &tokens {
            poll()?;
            let label = self.classify_occurrence(text, token, &tokens);
            let tally = votes.entry(token.name.clone()).or_default();
            if label.is_classified() {
                *tally.entry(label).or_default() += 1;
            }
        }

        let labels = votes
            .into_iter()
            .map(|(name, tally)| {
                // majority vote; ties go to the stronger label
                let label = tally
                    .iter()
                    .max_by(|(la, ca), (lb, cb)| ca.cmp(cb).then_with(|| lb.cmp(la)))
                    .map_or(DistrictLabel::Unclassified, |(label, _)| *label);
                (name, label)
            })
            .collect();
        Ok(DistrictSummary { labels })
    }
}

/// Modal label per unique district of a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistrictSummary {
    pub labels: BTreeMap<String, DistrictLabel>,
}

impl DistrictSummary {
    pub fn label(&self, name: &str) -> Option<DistrictLabel> {
        self.labels.get(&canonical_name(name)).copied()
    }

    pub fn classified(&self) -> usize {
        self.labels.values().filter(|l| l.is_classified()).count()
    }

    /// Share of classified districts allowing multifamily housing by right
    pub fn multifamily_fraction(&self) -> Option<f64> {
        let classified = self.classified();
        if classified == 0 {
            return None;
        }
        let allowing = self.labels.values().filter(|l| l.allows_multifamily()).count();
        Some(allowing as f64 / classified as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ZoningError;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn summary(text: &str) -> DistrictSummary {
        let vocab = VocabularySet::builtin().unwrap();
        let config = DistrictConfig::default();
        DistrictClassifier::new(&vocab, &config).classify_document(text)
    }

    #[test]
    fn test_canonical_names() {
        assert_eq!(canonical_name("R1"), "r-1");
        assert_eq!(canonical_name("rs-7.5"), "rs-7.5");
        assert_eq!(canonical_name("rm2a"), "rm-2a");
        assert_eq!(canonical_name("rural residential"), "rural residential");
    }

    #[test]
    fn test_single_and_multifamily_by_proximity() {
        let s = summary("r-1 single family district. minimum lot area 7500 square feet. maximum height 35 feet");
        assert_eq!(s.label("r-1"), Some(DistrictLabel::SingleFamily));

        let s = summary("r-2 district permits multifamily dwellings, density shall not exceed 12 units per acre");
        assert_eq!(s.label("r2"), Some(DistrictLabel::Multifamily));
        assert_eq!(s.multifamily_fraction(), Some(1.0));
    }

    #[test]
    fn test_tie_goes_to_multifamily() {
        // both cues one character away
        let s = summary("duplex r-3 condominium");
        assert_eq!(s.label("r-3"), Some(DistrictLabel::Multifamily));
        let s = summary("duplex r-3 single family");
        assert_eq!(s.label("r-3"), Some(DistrictLabel::TwoFamily));
    }

    #[test]
    fn test_boilerplate_uses_next_cue() {
        let text = "single family homes border the r-4 district. permitted uses: apartments and accessory uses";
        assert_eq!(summary(text).label("r-4"), Some(DistrictLabel::Multifamily));
    }

    #[test]
    fn test_conditional_multifamily_is_not_by_right() {
        let text = "r-5 district. by special exception, townhouses. single family dwellings are permitted";
        assert_eq!(summary(text).label("r-5"), Some(DistrictLabel::SingleFamily));
    }

    #[test]
    fn test_enumeration_excluded() {
        let text = "this article applies to the r-1, r-2, r-3 and r-4 districts and to planned developments.";
        let s = summary(text);
        assert_eq!(s.classified(), 0);
        assert_eq!(s.multifamily_fraction(), None);
    }

    #[test]
    fn test_bad_phrase_vetoes() {
        let s = summary("the r-6 sewer district assessment covers single family lots");
        assert_eq!(s.label("r-6"), Some(DistrictLabel::Unclassified));
        assert_eq!(s.multifamily_fraction(), None);
    }

    #[test]
    fn test_dense_document_checks_deadline() {
        let vocab = VocabularySet::builtin().unwrap();
        let config = DistrictConfig::default();
        let classifier = DistrictClassifier::new(&vocab, &config);
        let text = (1..=500)
            .map(|i| format!("r-{} single family", i))
            .collect::<Vec<_>>()
            .join(" ");

        let expired = Deadline::start("dense.txt", Duration::ZERO);
        assert!(matches!(
            classifier.classify_document_within(&text, &expired),
            Err(ZoningError::Timeout { .. })
        ));

        let generous = Deadline::start("dense.txt", Duration::from_secs(60));
        let summary = classifier.classify_document_within(&text, &generous).unwrap();
        assert_eq!(summary, classifier.classify_document(&text));
        assert_eq!(summary.labels.len(), 500);
    }

    #[test]
    fn test_majority_vote_across_occurrences() {
        let gap = "lorem ipsum ".repeat(40);
        let text = format!(
            "r-1 single family. {gap} r-1 single family detached. {gap} r-1 apartments. {gap} r-7 apartments"
        );
        let s = summary(&text);
        assert_eq!(s.label("r-1"), Some(DistrictLabel::SingleFamily));
        assert_eq!(s.label("r-7"), Some(DistrictLabel::Multifamily));
        assert_eq!(s.multifamily_fraction(), Some(0.5));
    }
}
