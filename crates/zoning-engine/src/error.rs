use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZoningError {
    #[error("Failed to decode {source_id}: {reason}")]
    Decode { source_id: String, reason: String },

    #[error("Extraction of {source_id} exceeded its {budget_ms} ms budget")]
    Timeout { source_id: String, budget_ms: u64 },

    #[error("Invalid keyword table: {0}")]
    KeywordTable(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid vocabulary: {0}")]
    Vocabulary(String),
}

pub type Result<T> = std::result::Result<T, ZoningError>;
