//! Residential district classification

pub mod classifier;
pub mod use_schedule;

pub use classifier::{canonical_name, find_tokens, DistrictClassifier, DistrictSummary, DistrictToken};
pub use use_schedule::fallback_fraction;

use crate::config::DistrictConfig;
use crate::deadline::Deadline;
use crate::error::Result;
use crate::vocab::VocabularySet;

/// By-right multifamily share of a document's districts, falling back to an
/// explicit use schedule when no district could be classified
pub fn multifamily_fraction(
    text: &str,
    vocab: &VocabularySet,
    config: &DistrictConfig,
    deadline: &Deadline,
) -> Result<Option<f64>> {
    let summary = DistrictClassifier::new(vocab, config).classify_document_within(text, deadline)?;
    Ok(summary
        .multifamily_fraction()
        .or_else(|| fallback_fraction(text, vocab)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_schedule_used_only_without_classified_districts() {
        let vocab = VocabularySet::builtin().unwrap();
        let config = DistrictConfig::default();
        let deadline = Deadline::start("town", Duration::from_secs(60));
        let fraction = |text: &str| multifamily_fraction(text, &vocab, &config, &deadline).unwrap();

        // the fee note vetoes every district window
        let schedule = "schedule of uses (see fee schedule) r-1 r-2 r-3 r-4 multifamily dwelling no no yes yes";
        assert_eq!(fraction(schedule), Some(0.5));

        let prose = "the r-2 district allows apartments by right";
        assert_eq!(fraction(prose), Some(1.0));
    }
}
