//! Weighted keyword dictionary, one map per measure

use std::collections::BTreeMap;

use zoning_types::{Measure, MEASURE_COUNT};

use crate::error::{Result, ZoningError};

/// 27 ordered `keyword -> weight` maps, loaded once per run and shared
/// read-only by every document
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordDictionary {
    maps: Vec<BTreeMap<String, f64>>,
}

impl KeywordDictionary {
    pub fn new(maps: Vec<BTreeMap<String, f64>>) -> Result<Self> {
        if maps.len() != MEASURE_COUNT {
            return Err(ZoningError::KeywordTable(format!(
                "expected {} keyword maps, got {}",
                MEASURE_COUNT,
                maps.len()
            )));
        }
        let mut normalized = Vec::with_capacity(MEASURE_COUNT);
        for (index, map) in maps.into_iter().enumerate() {
            let mut clean = BTreeMap::new();
            for (keyword, weight) in map {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(ZoningError::KeywordTable(format!(
                        "measure {} keyword '{}' has invalid weight {}",
                        index, keyword, weight
                    )));
                }
                let keyword = keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    return Err(ZoningError::KeywordTable(format!(
                        "measure {} has an empty keyword",
                        index
                    )));
                }
                clean.insert(keyword, weight);
            }
            normalized.push(clean);
        }
        Ok(Self { maps: normalized })
    }

    /// Parse a JSON array of 27 `{ keyword: weight }` objects
    pub fn from_json_str(json: &str) -> Result<Self> {
        let maps: Vec<BTreeMap<String, f64>> = serde_json::from_str(json)
            .map_err(|e| ZoningError::KeywordTable(format!("malformed JSON: {}", e)))?;
        Self::new(maps)
    }

    pub fn weight(&self, measure: Measure, keyword: &str) -> Option<f64> {
        self.maps[measure.index()].get(keyword).copied()
    }

    pub fn keywords(&self, measure: Measure) -> impl Iterator<Item = &str> {
        self.maps[measure.index()].keys().map(String::as_str)
    }

    pub fn map(&self, measure: Measure) -> &BTreeMap<String, f64> {
        &self.maps[measure.index()]
    }
}
