//! Land-use signal extraction from zoning ordinance text
//!
//! A document is normalized once, then read by independent stages: keyword
//! relevance scoring for the 27 measures, dimensional table reconstruction,
//! free-text numeric extraction and residential district classification. Their
//! output is merged into one [`ResultRecord`] per document.
//!
//! ```no_run
//! use std::sync::Arc;
//! use zoning_engine::{EngineConfig, KeywordDictionary, ZoningEngine};
//! use zoning_types::RawDocument;
//!
//! # fn example(json: &str, bytes: Vec<u8>) -> zoning_engine::Result<()> {
//! let dictionary = Arc::new(KeywordDictionary::from_json_str(json)?);
//! let engine = ZoningEngine::new(dictionary, EngineConfig::default())?;
//! let batch = engine.run_batch(vec![RawDocument::new("springfield.txt", bytes)]);
//! println!("{} resolved, {} unresolved", batch.records.len(), batch.unresolved.len());
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod candidate;
pub mod config;
pub mod deadline;
pub mod districts;
pub mod document;
pub mod error;
pub mod extractors;
pub mod keywords;
pub mod normalize;
pub mod pipeline;
pub mod relevance;
pub mod tables;
pub mod vocab;

pub use candidate::{NumericCandidate, PlausibilityBounds};
pub use config::EngineConfig;
pub use deadline::Deadline;
pub use document::Document;
pub use error::{Result, ZoningError};
pub use keywords::KeywordDictionary;
pub use pipeline::{BatchOutcome, Outcome, ZoningEngine};
pub use vocab::{Vocabulary, VocabularySet};

pub use zoning_types::ResultRecord;
