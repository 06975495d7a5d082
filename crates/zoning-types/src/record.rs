//! Per-document result record handed to the reporter
//!
//! Every optional field is `None` when no candidate survived extraction;
//! zero is never used as a stand-in for "unknown".

use crate::measure::MeasureFlags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum lot size brackets, each set when any lot-size candidate falls in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LotSizeBins {
    pub under_half_acre: bool,
    pub half_to_one_acre: bool,
    pub one_to_two_acres: bool,
    pub two_to_five_acres: bool,
    pub five_acres_or_more: bool,
}

impl LotSizeBins {
    pub fn any(&self) -> bool {
        self.under_half_acre
            || self.half_to_one_acre
            || self.one_to_two_acres
            || self.two_to_five_acres
            || self.five_acres_or_more
    }
}

/// Density tiers in dwelling units per acre; boundaries are inclusive so a
/// value on an edge sets both neighbouring tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DensityTiers {
    pub up_to_1: bool,
    pub from_1_to_4: bool,
    pub from_4_to_8: bool,
    pub from_8_to_15: bool,
    pub over_15: bool,
    /// Set when the tiers were inferred from lot size rather than density text
    pub inferred_from_lot_size: bool,
}

impl DensityTiers {
    pub fn any(&self) -> bool {
        self.up_to_1 || self.from_1_to_4 || self.from_4_to_8 || self.from_8_to_15 || self.over_15
    }
}

/// Central tendency of one numeric metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueSummary {
    pub median: f64,
    pub mode: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub source_id: String,
    pub modified_at: Option<DateTime<Utc>>,
    pub measures: MeasureFlags,
    pub lot_size: Option<LotSizeBins>,
    pub density: Option<DensityTiers>,
    pub height_feet: Option<ValueSummary>,
    pub height_stories: Option<ValueSummary>,
    pub parking: Option<ValueSummary>,
    pub multifamily_fraction: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::Measure;

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let mut measures = MeasureFlags::default();
        measures.set(Measure::HeightLimit, true);
        let record = ResultRecord {
            source_id: "springfield.txt".to_string(),
            modified_at: None,
            measures,
            lot_size: None,
            density: None,
            height_feet: Some(ValueSummary {
                median: 35.0,
                mode: 35.0,
                count: 2,
            }),
            height_stories: None,
            parking: None,
            multifamily_fraction: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json["lot_size"].is_null());
        assert!(json["multifamily_fraction"].is_null());
        assert_eq!(json["height_feet"]["median"], 35.0);

        let back: ResultRecord = serde_json::from_value(json).unwrap();
        pretty_assertions::assert_eq!(back, record);
    }

    #[test]
    fn test_bins_any() {
        assert!(!LotSizeBins::default().any());
        let bins = LotSizeBins {
            one_to_two_acres: true,
            ..Default::default()
        };
        assert!(bins.any());
        assert!(!DensityTiers {
            inferred_from_lot_size: true,
            ..Default::default()
        }
        .any());
    }
}
