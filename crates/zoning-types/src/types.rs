use chrono::{DateTime, Utc};

/// A document as supplied by the document source, before decoding
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RawDocument {
    pub source_id: String,      // e.g. file name relative to the input root
    pub bytes: Vec<u8>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl RawDocument {
    pub fn new(source_id: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            source_id: source_id.into(),
            bytes,
            modified_at: None,
        }
    }

    pub fn with_modified_at(mut self, modified_at: DateTime<Utc>) -> Self {
        self.modified_at = Some(modified_at);
        self
    }
}

/// Why a document produced no result record
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    Decode,
    Timeout,
}

/// Marker handed to the reporter for a document that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Unresolved {
    pub source_id: String,
    pub reason: UnresolvedReason,
    pub detail: String,
}

/// Semantic category of an extracted number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Acres,
    SquareFeet,
    UnitsPerAcre,
    /// Square feet of lot area required per dwelling unit
    SquareFeetPerUnit,
    HeightFeet,
    HeightStories,
    ParkingPerUnit,
}

/// Which extractor produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    FreeText,
    /// Dimensional table with one district per row
    TableDistrictRows,
    /// Dimensional table with one district per column
    TableCriterionRows,
}

/// Residential district classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistrictLabel {
    Multifamily,
    MixedUse,
    TwoFamily,
    SingleFamily,
    Unclassified,
}

impl DistrictLabel {
    /// Labels in tie-break priority order, strongest first
    pub const PRIORITY: [DistrictLabel; 4] = [
        DistrictLabel::Multifamily,
        DistrictLabel::MixedUse,
        DistrictLabel::TwoFamily,
        DistrictLabel::SingleFamily,
    ];

    /// Multifamily housing allowed by right
    pub fn allows_multifamily(self) -> bool {
        matches!(self, DistrictLabel::Multifamily | DistrictLabel::MixedUse)
    }

    pub fn is_classified(self) -> bool {
        self != DistrictLabel::Unclassified
    }
}
