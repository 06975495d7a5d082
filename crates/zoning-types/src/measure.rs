//! The 27 land-use regulation measures tested for presence in every ordinance

use serde::{Deserialize, Serialize};

/// Number of measures scored per document
pub const MEASURE_COUNT: usize = 27;

/// A zoning-regulation category whose presence is scored independently.
///
/// The discriminant is the measure index used by the keyword dictionary, so
/// the order here must match the order of the weight tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    GrowthCap,
    GrowthMoratorium,
    InclusionaryZoning,
    DensityBonus,
    ImpactFee,
    MinimumLotSize,
    MaximumDensity,
    HeightLimit,
    ParkingMinimum,
    AccessoryDwellingUnit,
    PlanningCommission,
    ZoningBoardOfAppeals,
    GoverningBodyApproval,
    DesignReview,
    HistoricPreservation,
    EnvironmentalReview,
    OpenSpace,
    ClusterDevelopment,
    PlannedUnitDevelopment,
    Setback,
    LotCoverage,
    FloorAreaRatio,
    MultifamilyRestriction,
    ManufacturedHousing,
    SitePlanReview,
    SpecialPermit,
    ResidentialDistricts,
}

impl Measure {
    /// All measures in index order
    pub const ALL: [Measure; MEASURE_COUNT] = [
        Measure::GrowthCap,
        Measure::GrowthMoratorium,
        Measure::InclusionaryZoning,
        Measure::DensityBonus,
        Measure::ImpactFee,
        Measure::MinimumLotSize,
        Measure::MaximumDensity,
        Measure::HeightLimit,
        Measure::ParkingMinimum,
        Measure::AccessoryDwellingUnit,
        Measure::PlanningCommission,
        Measure::ZoningBoardOfAppeals,
        Measure::GoverningBodyApproval,
        Measure::DesignReview,
        Measure::HistoricPreservation,
        Measure::EnvironmentalReview,
        Measure::OpenSpace,
        Measure::ClusterDevelopment,
        Measure::PlannedUnitDevelopment,
        Measure::Setback,
        Measure::LotCoverage,
        Measure::FloorAreaRatio,
        Measure::MultifamilyRestriction,
        Measure::ManufacturedHousing,
        Measure::SitePlanReview,
        Measure::SpecialPermit,
        Measure::ResidentialDistricts,
    ];

    /// Position of this measure in the keyword dictionary
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Short column name used by reporters
    pub fn name(self) -> &'static str {
        match self {
            Measure::GrowthCap => "growth_cap",
            Measure::GrowthMoratorium => "growth_moratorium",
            Measure::InclusionaryZoning => "inclusionary_zoning",
            Measure::DensityBonus => "density_bonus",
            Measure::ImpactFee => "impact_fee",
            Measure::MinimumLotSize => "minimum_lot_size",
            Measure::MaximumDensity => "maximum_density",
            Measure::HeightLimit => "height_limit",
            Measure::ParkingMinimum => "parking_minimum",
            Measure::AccessoryDwellingUnit => "accessory_dwelling_unit",
            Measure::PlanningCommission => "planning_commission",
            Measure::ZoningBoardOfAppeals => "zoning_board_of_appeals",
            Measure::GoverningBodyApproval => "governing_body_approval",
            Measure::DesignReview => "design_review",
            Measure::HistoricPreservation => "historic_preservation",
            Measure::EnvironmentalReview => "environmental_review",
            Measure::OpenSpace => "open_space",
            Measure::ClusterDevelopment => "cluster_development",
            Measure::PlannedUnitDevelopment => "planned_unit_development",
            Measure::Setback => "setback",
            Measure::LotCoverage => "lot_coverage",
            Measure::FloorAreaRatio => "floor_area_ratio",
            Measure::MultifamilyRestriction => "multifamily_restriction",
            Measure::ManufacturedHousing => "manufactured_housing",
            Measure::SitePlanReview => "site_plan_review",
            Measure::SpecialPermit => "special_permit",
            Measure::ResidentialDistricts => "residential_districts",
        }
    }
}

/// Presence flags for every measure, indexed by [`Measure::index`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MeasureFlags([bool; MEASURE_COUNT]);

impl MeasureFlags {
    pub fn new(flags: [bool; MEASURE_COUNT]) -> Self {
        Self(flags)
    }

    pub fn get(&self, measure: Measure) -> bool {
        self.0[measure.index()]
    }

    pub fn set(&mut self, measure: Measure, present: bool) {
        self.0[measure.index()] = present;
    }

    /// Measures flagged present, in index order
    pub fn present(&self) -> impl Iterator<Item = Measure> + '_ {
        Measure::ALL.iter().copied().filter(|m| self.get(*m))
    }

    pub fn as_array(&self) -> &[bool; MEASURE_COUNT] {
        &self.0
    }
}
