//! Topical phrases searched for each measure

use zoning_types::Measure;

/// A phrase that anchors context windows for one measure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicPhrase {
    Specific(&'static str),
    /// Searched only when none of the listed variants occurs in the document
    Generic {
        phrase: &'static str,
        unless_any: &'static [&'static [&'static str]],
    },
}

impl TopicPhrase {
    pub fn phrase(&self) -> &'static str {
        match self {
            TopicPhrase::Specific(phrase) => phrase,
            TopicPhrase::Generic { phrase, .. } => phrase,
        }
    }
}

use TopicPhrase::Specific;

/// Residential district names qualified beyond "residential district"
pub const QUALIFIED_RESIDENTIAL_DISTRICTS: &[&str] = &[
    "single family district",
    "single family residential district",
    "two family district",
    "two family residential district",
    "multifamily district",
    "multifamily residential district",
    "rural residential district",
    "suburban residential district",
    "urban residential district",
    "village residential district",
    "low density residential district",
    "medium density residential district",
    "high density residential district",
    "estate residential district",
    "agricultural residential district",
    "planned residential district",
    "cluster residential district",
    "residential overlay district",
];

/// Other district names that make the bare word "district" redundant
pub const OTHER_DISTRICT_VARIANTS: &[&str] = &[
    "residence district",
    "residential zone",
    "residential zoning district",
    "mixed use district",
    "planned unit development district",
    "townhouse district",
    "apartment district",
    "garden apartment district",
    "manufactured home district",
    "mobile home district",
    "historic district",
    "village center district",
    "town center district",
    "downtown district",
    "neighborhood district",
    "neighborhood business district",
    "conservation district",
    "open space district",
    "agricultural district",
    "rural district",
    "zoning district",
    "overlay district",
];

const BARE_RESIDENTIAL_DISTRICT: &[&str] = &["residential district"];

/// Phrases whose context is usually a dense regulatory table
pub const WIDE_PHRASES: &[&str] = &[
    "dimensional requirements",
    "area and bulk",
    "minimum lot area",
    "minimum lot size",
    "lot area",
    "maximum density",
    "lot area per dwelling unit",
    "maximum height",
    "building height",
    "front yard",
    "side yard",
    "rear yard",
    "lot coverage",
    "floor area ratio",
];

static GROWTH_CAP: &[TopicPhrase] = &[
    Specific("growth cap"),
    Specific("growth management"),
    Specific("building permit cap"),
    Specific("permit cap"),
    Specific("permits per year"),
    Specific("annual permit limit"),
    Specific("rate of development"),
    Specific("phased growth"),
    Specific("growth limitation"),
    Specific("dwelling unit allocation"),
];

static GROWTH_MORATORIUM: &[TopicPhrase] = &[
    Specific("moratorium"),
    Specific("building moratorium"),
    Specific("development moratorium"),
    Specific("temporary moratorium"),
];

static INCLUSIONARY_ZONING: &[TopicPhrase] = &[
    Specific("inclusionary"),
    Specific("affordable housing"),
    Specific("affordable units"),
    Specific("affordable dwelling unit"),
    Specific("low and moderate income"),
    Specific("workforce housing"),
];

static DENSITY_BONUS: &[TopicPhrase] = &[
    Specific("density bonus"),
    Specific("bonus density"),
    Specific("additional density"),
    Specific("incentive zoning"),
    Specific("increase in density"),
];

static IMPACT_FEE: &[TopicPhrase] = &[
    Specific("impact fee"),
    Specific("impact fees"),
    Specific("development fee"),
    Specific("capital facilities fee"),
    Specific("fee in lieu"),
    Specific("linkage fee"),
];

static MINIMUM_LOT_SIZE: &[TopicPhrase] = &[
    Specific("dimensional requirements"),
    Specific("area and bulk"),
    Specific("minimum lot area"),
    Specific("minimum lot size"),
    Specific("lot area"),
    Specific("lot size"),
];

static MAXIMUM_DENSITY: &[TopicPhrase] = &[
    Specific("maximum density"),
    Specific("lot area per dwelling unit"),
    Specific("dwelling unit per acre"),
    Specific("units per acre"),
    Specific("density"),
];

static HEIGHT_LIMIT: &[TopicPhrase] = &[
    Specific("maximum height"),
    Specific("building height"),
    Specific("height limit"),
    Specific("height of buildings"),
    Specific("stories in height"),
];

static PARKING_MINIMUM: &[TopicPhrase] = &[
    Specific("off street parking"),
    Specific("parking space"),
    Specific("parking requirements"),
    Specific("minimum parking"),
];

static ACCESSORY_DWELLING_UNIT: &[TopicPhrase] = &[
    Specific("accessory dwelling unit"),
    Specific("in law apartment"),
    Specific("accessory unit"),
    Specific("secondary dwelling unit"),
];

static PLANNING_COMMISSION: &[TopicPhrase] = &[
    Specific("planning commission"),
    Specific("planning board"),
    Specific("plan commission"),
];

static ZONING_BOARD_OF_APPEALS: &[TopicPhrase] = &[
    Specific("zoning board of appeals"),
    Specific("board of adjustment"),
    Specific("zoning hearing board"),
];

static GOVERNING_BODY_APPROVAL: &[TopicPhrase] = &[
    Specific("city council"),
    Specific("town council"),
    Specific("board of selectmen"),
    Specific("select board"),
    Specific("board of commissioners"),
    Specific("village board"),
    Specific("board of trustees"),
    Specific("governing body"),
    Specific("town meeting"),
];

static DESIGN_REVIEW: &[TopicPhrase] = &[
    Specific("design review"),
    Specific("architectural review"),
    Specific("design standards"),
    Specific("design guidelines"),
    Specific("appearance review"),
];

static HISTORIC_PRESERVATION: &[TopicPhrase] = &[
    Specific("historic preservation"),
    Specific("historic district commission"),
    Specific("historic commission"),
    Specific("landmark"),
    Specific("historic district"),
];

static ENVIRONMENTAL_REVIEW: &[TopicPhrase] = &[
    Specific("environmental review"),
    Specific("environmental impact"),
    Specific("wetland"),
    Specific("wetlands"),
    Specific("floodplain"),
    Specific("stormwater"),
    Specific("conservation commission"),
];

static OPEN_SPACE: &[TopicPhrase] = &[
    Specific("open space"),
    Specific("recreation land"),
    Specific("parkland dedication"),
];

static CLUSTER_DEVELOPMENT: &[TopicPhrase] = &[
    Specific("cluster development"),
    Specific("cluster subdivision"),
    Specific("conservation subdivision"),
    Specific("open space development"),
    Specific("cluster residential"),
];

static PLANNED_UNIT_DEVELOPMENT: &[TopicPhrase] = &[
    Specific("planned unit development"),
    Specific("planned development"),
    Specific("planned residential development"),
];

static SETBACK: &[TopicPhrase] = &[
    Specific("front yard"),
    Specific("side yard"),
    Specific("rear yard"),
    Specific("setback"),
];

static LOT_COVERAGE: &[TopicPhrase] = &[
    Specific("lot coverage"),
    Specific("building coverage"),
    Specific("impervious surface"),
    Specific("maximum coverage"),
];

static FLOOR_AREA_RATIO: &[TopicPhrase] = &[Specific("floor area ratio")];

static MULTIFAMILY_RESTRICTION: &[TopicPhrase] = &[
    Specific("multifamily"),
    Specific("multifamily dwelling"),
    Specific("apartment"),
    Specific("apartments"),
    Specific("townhouse"),
];

static MANUFACTURED_HOUSING: &[TopicPhrase] = &[
    Specific("manufactured home"),
    Specific("manufactured housing"),
    Specific("mobile home"),
    Specific("mobile home park"),
    Specific("trailer"),
];

static SITE_PLAN_REVIEW: &[TopicPhrase] = &[
    Specific("site plan review"),
    Specific("site plan approval"),
    Specific("site plan"),
];

static SPECIAL_PERMIT: &[TopicPhrase] = &[
    Specific("special permit"),
    Specific("special exception"),
    Specific("conditional use"),
    Specific("special use permit"),
];

static RESIDENTIAL_DISTRICTS: &[TopicPhrase] = &[
    Specific("single family district"),
    Specific("single family residential district"),
    Specific("two family district"),
    Specific("two family residential district"),
    Specific("multifamily district"),
    Specific("multifamily residential district"),
    Specific("rural residential district"),
    Specific("suburban residential district"),
    Specific("urban residential district"),
    Specific("village residential district"),
    Specific("low density residential district"),
    Specific("medium density residential district"),
    Specific("high density residential district"),
    Specific("estate residential district"),
    Specific("agricultural residential district"),
    Specific("planned residential district"),
    Specific("cluster residential district"),
    Specific("residential overlay district"),
    Specific("residence district"),
    Specific("residential zone"),
    Specific("residential zoning district"),
    Specific("mixed use district"),
    Specific("planned unit development district"),
    Specific("townhouse district"),
    Specific("apartment district"),
    Specific("garden apartment district"),
    Specific("manufactured home district"),
    Specific("mobile home district"),
    Specific("historic district"),
    Specific("village center district"),
    Specific("town center district"),
    Specific("downtown district"),
    Specific("neighborhood district"),
    Specific("neighborhood business district"),
    Specific("conservation district"),
    Specific("open space district"),
    Specific("agricultural district"),
    Specific("rural district"),
    Specific("zoning district"),
    Specific("overlay district"),
    TopicPhrase::Generic {
        phrase: "residential district",
        unless_any: &[QUALIFIED_RESIDENTIAL_DISTRICTS],
    },
    TopicPhrase::Generic {
        phrase: "district",
        unless_any: &[
            QUALIFIED_RESIDENTIAL_DISTRICTS,
            OTHER_DISTRICT_VARIANTS,
            BARE_RESIDENTIAL_DISTRICT,
        ],
    },
];

pub fn measure_phrases(measure: Measure) -> &'static [TopicPhrase] {
    match measure {
        Measure::GrowthCap => GROWTH_CAP,
        Measure::GrowthMoratorium => GROWTH_MORATORIUM,
        Measure::InclusionaryZoning => INCLUSIONARY_ZONING,
        Measure::DensityBonus => DENSITY_BONUS,
        Measure::ImpactFee => IMPACT_FEE,
        Measure::MinimumLotSize => MINIMUM_LOT_SIZE,
        Measure::MaximumDensity => MAXIMUM_DENSITY,
        Measure::HeightLimit => HEIGHT_LIMIT,
        Measure::ParkingMinimum => PARKING_MINIMUM,
        Measure::AccessoryDwellingUnit => ACCESSORY_DWELLING_UNIT,
        Measure::PlanningCommission => PLANNING_COMMISSION,
        Measure::ZoningBoardOfAppeals => ZONING_BOARD_OF_APPEALS,
        Measure::GoverningBodyApproval => GOVERNING_BODY_APPROVAL,
        Measure::DesignReview => DESIGN_REVIEW,
        Measure::HistoricPreservation => HISTORIC_PRESERVATION,
        Measure::EnvironmentalReview => ENVIRONMENTAL_REVIEW,
        Measure::OpenSpace => OPEN_SPACE,
        Measure::ClusterDevelopment => CLUSTER_DEVELOPMENT,
        Measure::PlannedUnitDevelopment => PLANNED_UNIT_DEVELOPMENT,
        Measure::Setback => SETBACK,
        Measure::LotCoverage => LOT_COVERAGE,
        Measure::FloorAreaRatio => FLOOR_AREA_RATIO,
        Measure::MultifamilyRestriction => MULTIFAMILY_RESTRICTION,
        Measure::ManufacturedHousing => MANUFACTURED_HOUSING,
        Measure::SitePlanReview => SITE_PLAN_REVIEW,
        Measure::SpecialPermit => SPECIAL_PERMIT,
        Measure::ResidentialDistricts => RESIDENTIAL_DISTRICTS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_measure_has_phrases() {
        for measure in Measure::ALL {
            assert!(!measure_phrases(measure).is_empty(), "{:?}", measure);
        }
    }

    #[test]
    fn test_district_variants_cover_the_specific_list() {
        let specific: Vec<&str> = RESIDENTIAL_DISTRICTS
            .iter()
            .filter_map(|p| match p {
                TopicPhrase::Specific(phrase) => Some(*phrase),
                TopicPhrase::Generic { .. } => None,
            })
            .collect();
        assert_eq!(
            specific.len(),
            QUALIFIED_RESIDENTIAL_DISTRICTS.len() + OTHER_DISTRICT_VARIANTS.len()
        );
        for phrase in QUALIFIED_RESIDENTIAL_DISTRICTS.iter().chain(OTHER_DISTRICT_VARIANTS) {
            assert!(specific.contains(phrase), "{}", phrase);
        }
    }
}
