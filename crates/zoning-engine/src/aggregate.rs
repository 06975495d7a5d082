//! Candidate aggregation into the result record
//!
//! Candidates from free text and both table orientations are pooled, exact
//! duplicates removed, then each metric is binned or summarized. A metric with
//! no surviving candidate stays `None`.

use std::cmp::Ordering;
use std::collections::HashSet;

use zoning_types::{Category, DensityTiers, LotSizeBins, MeasureFlags, ResultRecord, ValueSummary};

use crate::candidate::NumericCandidate;
use crate::document::Document;

pub const SQUARE_FEET_PER_ACRE: f64 = 43_560.0;

/// Drop candidates identical in category, value and offset, keeping the first
pub fn dedupe(candidates: Vec<NumericCandidate>) -> Vec<NumericCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert((c.category(), c.value().to_bits(), c.offset())))
        .collect()
}

fn values(candidates: &[NumericCandidate], category: Category) -> impl Iterator<Item = f64> + '_ {
    candidates
        .iter()
        .filter(move |c| c.category() == category)
        .map(|c| c.value())
}

/// Lot sizes in square feet
fn lot_sizes(candidates: &[NumericCandidate]) -> Vec<f64> {
    values(candidates, Category::SquareFeet)
        .chain(values(candidates, Category::Acres).map(|acres| acres * SQUARE_FEET_PER_ACRE))
        .collect()
}

pub fn lot_size_bins(candidates: &[NumericCandidate]) -> Option<LotSizeBins> {
    let sizes = lot_sizes(candidates);
    if sizes.is_empty() {
        return None;
    }
    let acre = SQUARE_FEET_PER_ACRE;
    let mut bins = LotSizeBins::default();
    for sqft in sizes {
        if sqft < 0.5 * acre {
            bins.under_half_acre = true;
        } else if sqft < acre {
            bins.half_to_one_acre = true;
        } else if sqft < 2.0 * acre {
            bins.one_to_two_acres = true;
        } else if sqft < 5.0 * acre {
            bins.two_to_five_acres = true;
        } else {
            bins.five_acres_or_more = true;
        }
    }
    Some(bins)
}

fn mark_tiers(tiers: &mut DensityTiers, units_per_acre: f64) {
    let d = units_per_acre;
    tiers.up_to_1 |= d <= 1.0;
    tiers.from_1_to_4 |= (1.0..=4.0).contains(&d);
    tiers.from_4_to_8 |= (4.0..=8.0).contains(&d);
    tiers.from_8_to_15 |= (8.0..=15.0).contains(&d);
    tiers.over_15 |= d >= 15.0;
}

/// Units per acre, stated directly or as land per unit. Without any density
/// value the lot sizes are read as one unit per lot.
pub fn density_tiers(candidates: &[NumericCandidate]) -> Option<DensityTiers> {
    let densities: Vec<f64> = values(candidates, Category::UnitsPerAcre)
        .chain(values(candidates, Category::SquareFeetPerUnit).map(|sqft| SQUARE_FEET_PER_ACRE / sqft))
        .collect();

    let mut tiers = DensityTiers::default();
    if densities.is_empty() {
        let sizes = lot_sizes(candidates);
        if sizes.is_empty() {
            return None;
        }
        tiers.inferred_from_lot_size = true;
        for sqft in sizes {
            mark_tiers(&mut tiers, SQUARE_FEET_PER_ACRE / sqft);
        }
    } else {
        for d in densities {
            mark_tiers(&mut tiers, d);
        }
    }
    Some(tiers)
}

/// Median and mode; the mode tie goes to the smallest value
pub fn summarize(values: &[f64]) -> Option<ValueSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };

    let mut mode = sorted[0];
    let mut best = 0;
    let mut i = 0;
    while i < n {
        let run = sorted[i..].iter().take_while(|v| v.total_cmp(&sorted[i]) == Ordering::Equal).count();
        if run > best {
            best = run;
            mode = sorted[i];
        }
        i += run;
    }

    Some(ValueSummary { median, mode, count: n })
}

fn summarize_category(candidates: &[NumericCandidate], category: Category) -> Option<ValueSummary> {
    summarize(&values(candidates, category).collect::<Vec<_>>())
}

pub fn assemble(
    document: &Document,
    measures: MeasureFlags,
    candidates: Vec<NumericCandidate>,
    multifamily_fraction: Option<f64>,
) -> ResultRecord {
    let candidates = dedupe(candidates);
    ResultRecord {
        source_id: document.source_id().to_string(),
        modified_at: document.modified_at(),
        measures,
        lot_size: lot_size_bins(&candidates),
        density: density_tiers(&candidates),
        height_feet: summarize_category(&candidates, Category::HeightFeet),
        height_stories: summarize_category(&candidates, Category::HeightStories),
        parking: summarize_category(&candidates, Category::ParkingPerUnit),
        multifamily_fraction: multifamily_fraction.map(|f| f.clamp(0.0, 1.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::PlausibilityBounds;
    use pretty_assertions::assert_eq;
    use zoning_types::{Provenance, RawDocument};

    fn candidate(category: Category, value: f64, offset: usize) -> NumericCandidate {
        PlausibilityBounds::default()
            .admit(category, value, Provenance::FreeText, offset, true)
            .unwrap()
    }

    #[test]
    fn test_dedupe_keeps_distinct_offsets() {
        let list = vec![
            candidate(Category::HeightFeet, 35.0, 10),
            candidate(Category::HeightFeet, 35.0, 10),
            candidate(Category::HeightFeet, 35.0, 90),
        ];
        assert_eq!(dedupe(list).len(), 2);
    }

    #[test]
    fn test_lot_size_bins() {
        let bins = lot_size_bins(&[
            candidate(Category::SquareFeet, 7500.0, 0),
            candidate(Category::Acres, 1.0, 1),
            candidate(Category::Acres, 5.0, 2),
        ])
        .unwrap();
        assert_eq!(
            bins,
            LotSizeBins {
                under_half_acre: true,
                one_to_two_acres: true,
                five_acres_or_more: true,
                ..Default::default()
            }
        );
        assert_eq!(lot_size_bins(&[candidate(Category::HeightFeet, 35.0, 0)]), None);
    }

    #[test]
    fn test_density_edges_set_both_tiers() {
        let tiers = density_tiers(&[candidate(Category::UnitsPerAcre, 4.0, 0)]).unwrap();
        assert!(tiers.from_1_to_4 && tiers.from_4_to_8);
        assert!(!tiers.up_to_1 && !tiers.over_15 && !tiers.inferred_from_lot_size);

        // 43560 / 2904 = 15 units per acre
        let tiers = density_tiers(&[candidate(Category::SquareFeetPerUnit, 2904.0, 0)]).unwrap();
        assert!(tiers.from_8_to_15 && tiers.over_15);
    }

    #[test]
    fn test_density_inferred_from_lot_size() {
        let tiers = density_tiers(&[candidate(Category::Acres, 2.0, 0)]).unwrap();
        assert!(tiers.inferred_from_lot_size);
        assert!(tiers.up_to_1);
        assert!(!tiers.from_1_to_4);

        let tiers = density_tiers(&[candidate(Category::SquareFeet, 7500.0, 0)]).unwrap();
        assert!(tiers.from_4_to_8);
        assert_eq!(density_tiers(&[]), None);
    }

    #[test]
    fn test_summaries() {
        assert_eq!(
            summarize(&[35.0, 40.0, 35.0, 45.0]),
            Some(ValueSummary {
                median: 37.5,
                mode: 35.0,
                count: 4
            })
        );
        // tie between 2.5 and 3 goes to the smaller
        assert_eq!(summarize(&[3.0, 2.5, 3.0, 2.5, 2.0]).map(|s| s.mode), Some(2.5));
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn test_assemble_absent_fields_are_none() {
        let document = Document::decode(RawDocument::new("empty.txt", b"nothing here".to_vec())).unwrap();
        let record = assemble(&document, MeasureFlags::default(), Vec::new(), None);
        assert_eq!(record.source_id, "empty.txt");
        assert_eq!(record.lot_size, None);
        assert_eq!(record.density, None);
        assert_eq!(record.height_feet, None);
        assert_eq!(record.parking, None);
        assert_eq!(record.multifamily_fraction, None);
    }
}
