pub mod measure;
pub mod record;
pub mod types;

pub use measure::{Measure, MeasureFlags, MEASURE_COUNT};
pub use record::{DensityTiers, LotSizeBins, ResultRecord, ValueSummary};
pub use types::{Category, DistrictLabel, Provenance, RawDocument, Unresolved, UnresolvedReason};
