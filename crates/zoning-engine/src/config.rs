//! Engine configuration
//!
//! Every heuristic threshold of the pipeline lives here. The defaults are the
//! calibrated values of the extraction tool; they are exposed so that a run can
//! be re-calibrated against a shared corpus without touching the matchers.
//!
//! Configuration is read from TOML. Every section is optional and falls back
//! to its defaults.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, ZoningError};

/// Top-level configuration passed into [`crate::ZoningEngine::new`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub windows: WindowConfig,
    pub scoring: ScoringConfig,
    pub tables: TableConfig,
    pub free_text: FreeTextConfig,
    pub districts: DistrictConfig,
    pub bounds: BoundsConfig,
    pub budget: BudgetConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed or
    /// a value fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// ```
    /// use zoning_engine::config::EngineConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = EngineConfig::from_str("[scoring]\nhit_threshold = 4.0\n")?;
    /// assert_eq!(config.windows.wide, 2000);
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a stage meaningless
    pub fn validate(&self) -> Result<()> {
        let w = &self.windows;
        if w.narrow == 0 || w.narrow > w.medium || w.medium > w.wide {
            return Err(ZoningError::Config(format!(
                "window radii must satisfy 0 < narrow <= medium <= wide (got {}, {}, {})",
                w.narrow, w.medium, w.wide
            )));
        }
        if !self.scoring.hit_threshold.is_finite() {
            return Err(ZoningError::Config("hit_threshold must be finite".into()));
        }
        let t = &self.tables;
        if t.min_rows < 2 || t.min_rows > t.max_rows {
            return Err(ZoningError::Config(format!(
                "table row limits must satisfy 2 <= min_rows <= max_rows (got {}, {})",
                t.min_rows, t.max_rows
            )));
        }
        if t.spacing_tolerance <= 1.0 || t.wide_row_factor <= 1.0 {
            return Err(ZoningError::Config(
                "spacing_tolerance and wide_row_factor must exceed 1.0".into(),
            ));
        }
        let b = &self.bounds;
        if b.min_square_feet >= b.max_square_feet || b.min_height_feet >= b.max_height_feet {
            return Err(ZoningError::Config("plausibility bounds are inverted".into()));
        }
        if self.budget.per_document_ms == 0 {
            return Err(ZoningError::Config("per_document_ms must be positive".into()));
        }
        Ok(())
    }
}

/// Context window radii in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub narrow: usize,
    /// Parking phrases
    pub medium: usize,
    /// Phrases associated with dense regulatory tables
    pub wide: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            narrow: 250,
            medium: 750,
            wide: 2000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// A window is a hit when its weight sum is strictly greater than this
    pub hit_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { hit_threshold: 5.0 }
    }
}

/// Structural preconditions of the dimensional table extractors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Distinct dimensional trigger words required in a window
    pub min_triggers: usize,
    /// Largest gap in characters between neighbouring header terms
    pub header_gap: usize,
    pub min_rows: usize,
    /// Windows with more row starts than this are rejected outright
    pub max_rows: usize,
    /// Sentence boundaries above this count mark the window as prose
    pub max_sentences: usize,
    pub max_tildes: usize,
    /// A row gap further than this factor from the median gap is irregular
    pub spacing_tolerance: f64,
    /// Rows wider than this multiple of the median width are subdivided
    pub wide_row_factor: f64,
    /// Table headings closer than this to an accepted heading are skipped
    pub heading_spacing: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_triggers: 3,
            header_gap: 55,
            min_rows: 2,
            max_rows: 50,
            max_sentences: 25,
            max_tildes: 10,
            spacing_tolerance: 3.0,
            wide_row_factor: 2.0,
            heading_spacing: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeTextConfig {
    /// Symmetric radius around each anchor phrase
    pub window_radius: usize,
}

impl Default for FreeTextConfig {
    fn default() -> Self {
        Self { window_radius: 120 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistrictConfig {
    /// Characters inspected before and after a district token
    pub window_radius: usize,
    /// Other distinct district tokens that make a window an enumeration
    pub enumeration_min: usize,
    /// A family cue closer than this disables the enumeration rule
    pub cue_proximity: usize,
    /// Conditional-use phrases this close before a cue cancel it
    pub conditional_lookback: usize,
}

impl Default for DistrictConfig {
    fn default() -> Self {
        Self {
            window_radius: 200,
            enumeration_min: 3,
            cue_proximity: 80,
            conditional_lookback: 40,
        }
    }
}

/// Plausibility bounds per numeric category; values outside are discarded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsConfig {
    pub max_acres_residential: f64,
    pub max_acres_other: f64,
    pub min_square_feet: f64,
    pub max_square_feet: f64,
    pub max_units_per_acre: f64,
    pub min_height_feet: f64,
    pub max_height_feet: f64,
    pub max_stories: f64,
    pub max_parking_ratio: f64,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            max_acres_residential: 50.0,
            max_acres_other: 5.0,
            min_square_feet: 500.0,
            max_square_feet: 2_178_000.0,
            max_units_per_acre: 100.0,
            min_height_feet: 8.0,
            max_height_feet: 165.0,
            max_stories: 40.0,
            max_parking_ratio: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Wall-clock budget per document in milliseconds
    pub per_document_ms: u64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            per_document_ms: 30_000,
        }
    }
}

impl BudgetConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.per_document_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_calibrated_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.windows.narrow, 250);
        assert_eq!(config.windows.medium, 750);
        assert_eq!(config.windows.wide, 2000);
        assert_eq!(config.scoring.hit_threshold, 5.0);
        assert_eq!(config.tables.max_rows, 50);
        assert_eq!(config.tables.header_gap, 55);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = EngineConfig::from_str(
            r#"
            [tables]
            max_rows = 40

            [bounds]
            max_height_feet = 120.0
            "#,
        )
        .unwrap();
        assert_eq!(config.tables.max_rows, 40);
        assert_eq!(config.tables.min_triggers, 3);
        assert_eq!(config.bounds.max_height_feet, 120.0);
        assert_eq!(config.bounds.max_parking_ratio, 10.0);
    }

    #[test]
    fn test_rejects_inverted_radii() {
        let result = EngineConfig::from_str("[windows]\nnarrow = 900\nmedium = 750\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_zero_budget() {
        assert!(EngineConfig::from_str("[budget]\nper_document_ms = 0\n").is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(EngineConfig::from_str("[scoring\nhit_threshold = ").is_err());
    }
}
