//! Built-in vocabulary tables
//!
//! All phrases are written in normalized form: lower case, single spaces, and
//! the canonical spellings produced by the synonym table (`square feet`,
//! `dwelling unit`, `single family`, `stories`).

pub const BUILTIN_VERSION: u32 = 1;

/// Headings that introduce a dimensional table
pub const TABLE_HEADINGS: &[&str] = &[
    "dimensional requirements",
    "dimensional regulations",
    "dimensional standards",
    "dimensional schedule",
    "dimensional table",
    "table of dimensional",
    "schedule of dimensional",
    "area and bulk",
    "bulk and area",
    "bulk regulations",
    "area regulations",
    "height and area",
    "area, yard and height",
    "lot and yard requirements",
    "lot, yard and bulk",
    "yard and bulk",
    "density and dimensional",
    "lot requirements",
    "lot standards",
    "development standards",
    "schedule of district regulations",
    "intensity of use",
    "lot dimensions",
];

/// Language that marks a window as prose rather than a table
pub const TABLE_DISQUALIFIERS: &[&str] = &[
    "for example",
    "e.g.",
    "illustration",
    "illustrative",
    "as shown in figure",
    "shall mean",
    "is defined as",
    "is hereby amended",
    "refer to",
    "whereas",
    "be it ordained",
];

/// Dimensional terms that make up table headers
pub const HEADER_TRIGGERS: &[&str] = &[
    "minimum lot area",
    "minimum lot size",
    "lot area per dwelling unit",
    "lot area",
    "lot size",
    "minimum lot width",
    "lot width",
    "lot depth",
    "lot frontage",
    "frontage",
    "front yard",
    "side yard",
    "rear yard",
    "front setback",
    "side setback",
    "rear setback",
    "setback",
    "maximum height",
    "building height",
    "height",
    "stories",
    "lot coverage",
    "building coverage",
    "coverage",
    "floor area ratio",
    "maximum density",
    "density",
    "units per acre",
    "dwelling unit per acre",
    "open space",
    "impervious surface",
    "minimum floor area",
    "width",
    "depth",
    "area",
];

const RESIDENTIAL_CODE: &str =
    r"\b(?:r|rs|rm|ra|re|rr|rh|rmf|rmh|sf|sfr|mf|mfr|ar|mu|mx)-?\d{1,2}(?:\.\d)?[a-z]?\b";

const NONRESIDENTIAL_CODE: &str =
    r"\b(?:c|cb|cc|cg|cn|ch|b|bg|bn|i|li|hi|gi|m|ml|mh|o|op|oi|p|os)-?\d{1,2}[a-z]?\b";

/// Row starts for district-as-row tables
pub const DISTRICT_ROW_STARTS: &[&str] = &[
    RESIDENTIAL_CODE,
    r"\bsingle family (?:detached|attached) dwelling\b",
    r"\bsingle family dwelling\b",
    r"\btwo family dwelling\b",
    r"\bmultifamily dwelling\b",
    r"\btownhouse dwelling\b",
];

/// District codes that can head the columns of a district-as-column table
pub const DISTRICT_COLUMNS: &[&str] = &[RESIDENTIAL_CODE, NONRESIDENTIAL_CODE];

/// Row labels for district-as-column tables
pub const CRITERION_LABELS: &[&str] = &[
    "minimum lot area",
    "minimum lot size",
    "lot area per dwelling unit",
    "lot area",
    "lot size",
    "minimum lot width",
    "lot width",
    "lot depth",
    "lot frontage",
    "front yard",
    "side yard",
    "rear yard",
    "maximum height",
    "building height",
    "maximum density",
    "density",
    "lot coverage",
    "floor area ratio",
    "minimum floor area",
    "open space",
];

pub const LOT_SIZE_COLUMNS: &[&str] = &[
    "minimum lot area",
    "minimum lot size",
    "lot area",
    "lot size",
];

pub const LOT_PER_UNIT_COLUMNS: &[&str] = &[
    "lot area per dwelling unit",
    "area per dwelling unit",
    "lot area per unit",
];

pub const DENSITY_COLUMNS: &[&str] = &[
    "maximum density",
    "density",
    "units per acre",
    "dwelling unit per acre",
];

pub const HEIGHT_COLUMNS: &[&str] = &["maximum height", "building height", "height", "stories"];

/// Districts and uses that are not residential
pub const NONRESIDENTIAL_DISTRICTS: &[&str] = &[
    NONRESIDENTIAL_CODE,
    r"\b(?:commercial|industrial|business|office|manufacturing|institutional|park|recreation)\b",
];

pub const LOT_ANCHORS: &[&str] = &[
    "minimum lot area",
    "minimum lot size",
    "minimum area",
    "lot area",
    "lot size",
];

pub const DENSITY_ANCHORS: &[&str] = &[
    "dwelling unit per acre",
    "units per acre",
    "units per gross acre",
    "units per net acre",
    "maximum density",
    "density",
    "per dwelling unit",
];

pub const HEIGHT_ANCHORS: &[&str] = &[
    "maximum height",
    "building height",
    "height of",
    "in height",
    "height",
];

pub const PARKING_ANCHORS: &[&str] = &["parking space", "off street parking"];

/// Stop phrases shared by every free-text category
pub const COMMON_STOP_PHRASES: &[&str] = &[
    "$",
    "fee",
    "fees",
    "footnote",
    "nonconforming",
    "commercial",
    "industrial",
    "business district",
    "office",
    "sign",
    "signs",
    "billboard",
    "penalty",
    "fine",
];

pub const LOT_STOP_PHRASES: &[&str] = &[
    "floor area",
    "sign area",
    "accessory",
    "garage",
    "parking lot",
    "mobile home park",
    "manufactured home park",
    "cemetery",
    "kennel",
    "stable",
];

pub const DENSITY_STOP_PHRASES: &[&str] = &[
    "hotel",
    "motel",
    "rooms per acre",
    "beds",
    "nursing",
    "campground",
    "mobile home park",
    "density bonus",
];

pub const HEIGHT_STOP_PHRASES: &[&str] = &[
    "fence",
    "wall",
    "hedge",
    "antenna",
    "tower",
    "flagpole",
    "chimney",
    "accessory building",
    "accessory structure",
    "telecommunication",
    "wireless",
    "light pole",
    "lighting",
    "spire",
    "silo",
    "windmill",
    "solar",
];

pub const PARKING_STOP_PHRASES: &[&str] = &[
    "bicycle",
    "loading",
    "employee",
    "employees",
    "seat",
    "seats",
    "bed",
    "square feet of",
    "gross floor area",
    "retail",
    "restaurant",
];

/// Words that put a value in a residential context
pub const RESIDENTIAL_CONTEXT: &[&str] = &[
    "residential",
    "residence",
    "dwelling",
    "dwelling unit",
    "single family",
    "two family",
    "multifamily",
    "house",
    "home",
];

/// Residential district names, by code or by phrase
pub const DISTRICT_TOKENS: &[&str] = &[
    RESIDENTIAL_CODE,
    r"\b(?:rural|suburban|urban|village|estate|agricultural|low density|medium density|high density) residential\b",
    r"\bresidence [a-e]\b",
    r"\bresidential [a-e]\b",
];

pub const SINGLE_FAMILY_CUES: &[&str] = &[
    "single family",
    "detached dwelling",
    "one dwelling unit per lot",
    "one dwelling per lot",
];

pub const MULTIFAMILY_CUES: &[&str] = &[
    "multifamily",
    "apartment",
    "apartments",
    "townhouse",
    "townhouses",
    "multiple dwelling",
    "multiple dwellings",
    "row house",
    "rowhouse",
    "three family",
    "condominium",
    "condominiums",
    "garden apartment",
];

pub const MIXED_USE_CUES: &[&str] = &[
    "mixed use",
    "live work",
    "residential above",
    "dwelling unit above",
    "upper story residential",
    "upper floor residential",
];

pub const TWO_FAMILY_CUES: &[&str] = &["two family", "duplex", "duplexes", "semi detached"];

/// Boilerplate that introduces a district's use list
pub const DISTRICT_BOILERPLATE: &[&str] = &[
    "permitted uses",
    "uses permitted",
    "permitted by right",
    "principal permitted uses",
    "the following uses are permitted",
    "purpose of this district",
    "purpose of the district",
    "intent of this district",
];

/// Phrases that make a following use conditional rather than by-right
pub const CONDITIONAL_USE: &[&str] = &[
    "conditional use",
    "conditional uses",
    "special permit",
    "special use permit",
    "special exception",
    "by special",
    "conditional permit",
];

/// Window vetoes for the district classifier
pub const DISTRICT_BAD_PHRASES: &[&str] = &[
    "$",
    "annex",
    "annexed",
    "annexation",
    "fee",
    "fees",
    "water district",
    "sewer district",
    "school district",
    "fire district",
    "utility district",
    "taxing district",
    "hospital",
    "cemetery",
    "landfill",
    "treatment plant",
    "assessment",
];

pub const USE_SCHEDULE_HEADINGS: &[&str] = &[
    "schedule of use regulations",
    "schedule of uses",
    "schedule of permitted uses",
    "table of permitted uses",
    "table of uses",
    "permitted use table",
    "land use table",
    "use regulations schedule",
    "use schedule",
    "use table",
];

/// Use-grid cells meaning permitted by right
pub const USE_SCHEDULE_PERMITTED: &[&str] = &["yes", "y", "p", "x", "permitted", "r"];

/// Use-grid cells meaning prohibited or only conditionally allowed
pub const USE_SCHEDULE_DENIED: &[&str] = &[
    "no", "n", "-", "sp", "se", "c", "cu", "sup", "pb", "ba", "za", "special", "prohibited",
];
