//! Keyword-weighted relevance matching and threshold scoring

pub mod matcher;
pub mod scorer;
pub mod topics;

pub use matcher::{find_windows, match_document, match_document_within, ContextWindow, MatchRecord, MatchSet, RadiusClass};
pub use scorer::{hit_counts, is_hit, score, window_score};
pub use topics::{measure_phrases, TopicPhrase};
