//! Bounded numeric candidates
//!
//! A [`NumericCandidate`] can only be built through [`PlausibilityBounds::admit`],
//! so a value outside its category bound never exists past extraction.

use zoning_types::{Category, Provenance};

use crate::config::BoundsConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericCandidate {
    category: Category,
    value: f64,
    provenance: Provenance,
    /// Offset of the source number in the normalized document
    offset: usize,
}

impl NumericCandidate {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn with_offset(self, offset: usize) -> Self {
        Self { offset, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlausibilityBounds {
    bounds: BoundsConfig,
}

impl PlausibilityBounds {
    pub fn new(bounds: BoundsConfig) -> Self {
        Self { bounds }
    }

    /// Inclusive `(min, max)` for a category. Acreage depends on whether the
    /// value was found in a residential context.
    pub fn range(&self, category: Category, residential: bool) -> (f64, f64) {
        let b = &self.bounds;
        match category {
            Category::Acres if residential => (0.0, b.max_acres_residential),
            Category::Acres => (0.0, b.max_acres_other),
            Category::SquareFeet => (b.min_square_feet, b.max_square_feet),
            Category::UnitsPerAcre => (0.0, b.max_units_per_acre),
            // the least land per unit still consistent with the density cap
            Category::SquareFeetPerUnit => (
                crate::aggregate::SQUARE_FEET_PER_ACRE / b.max_units_per_acre,
                b.max_square_feet,
            ),
            Category::HeightFeet => (b.min_height_feet, b.max_height_feet),
            Category::HeightStories => (0.0, b.max_stories),
            Category::ParkingPerUnit => (0.0, b.max_parking_ratio),
        }
    }

    /// Build a candidate when the value is finite, positive and in range
    pub fn admit(
        &self,
        category: Category,
        value: f64,
        provenance: Provenance,
        offset: usize,
        residential: bool,
    ) -> Option<NumericCandidate> {
        if !value.is_finite() || value <= 0.0 {
            return None;
        }
        let (min, max) = self.range(category, residential);
        if value < min || value > max {
            return None;
        }
        Some(NumericCandidate {
            category,
            value,
            provenance,
            offset,
        })
    }
}

impl Default for PlausibilityBounds {
    fn default() -> Self {
        Self::new(BoundsConfig::default())
    }
}
