//! Per-document pipeline and the parallel batch driver

use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use zoning_types::{RawDocument, ResultRecord, Unresolved, UnresolvedReason};

use crate::aggregate::assemble;
use crate::candidate::PlausibilityBounds;
use crate::config::EngineConfig;
use crate::deadline::Deadline;
use crate::districts;
use crate::document::Document;
use crate::error::{Result, ZoningError};
use crate::extractors::FreeTextExtractor;
use crate::keywords::KeywordDictionary;
use crate::relevance;
use crate::tables::{extract_tables, TableContext};
use crate::vocab::VocabularySet;

/// What became of one document
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Resolved(ResultRecord),
    Unresolved(Unresolved),
}

/// Merged results of a batch, each list sorted by source id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub records: Vec<ResultRecord>,
    pub unresolved: Vec<Unresolved>,
}

/// Shared, read-only extraction state. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct ZoningEngine {
    dictionary: Arc<KeywordDictionary>,
    vocab: Arc<VocabularySet>,
    config: Arc<EngineConfig>,
    bounds: PlausibilityBounds,
}

impl ZoningEngine {
    /// Engine with the built-in vocabularies
    pub fn new(dictionary: Arc<KeywordDictionary>, config: EngineConfig) -> Result<Self> {
        Ok(Self::with_vocabularies(dictionary, config, Arc::new(VocabularySet::builtin()?)))
    }

    pub fn with_vocabularies(dictionary: Arc<KeywordDictionary>, config: EngineConfig, vocab: Arc<VocabularySet>) -> Self {
        let bounds = PlausibilityBounds::new(config.bounds);
        Self {
            dictionary,
            vocab,
            config: Arc::new(config),
            bounds,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn vocabularies(&self) -> &VocabularySet {
        &self.vocab
    }

    /// Run every stage over a decoded document within the configured budget
    pub fn extract(&self, document: &Document) -> Result<ResultRecord> {
        let deadline = Deadline::start(document.source_id(), self.config.budget.duration());
        self.extract_within(document, &deadline)
    }

    pub fn extract_within(&self, document: &Document, deadline: &Deadline) -> Result<ResultRecord> {
        let text = document.normalized();

        let matches = relevance::match_document_within(text, &self.dictionary, &self.config.windows, deadline)?;
        let measures = relevance::score(&matches, &self.dictionary, self.config.scoring.hit_threshold);
        deadline.check()?;

        let ctx = TableContext {
            vocab: &self.vocab,
            config: &self.config.tables,
            bounds: &self.bounds,
        };
        let mut candidates = extract_tables(text, self.config.windows.wide, &ctx, deadline)?;
        deadline.check()?;

        candidates.extend(FreeTextExtractor::new(&self.vocab, &self.config.free_text, &self.bounds).extract(text));
        deadline.check()?;

        let fraction = districts::multifamily_fraction(text, &self.vocab, &self.config.districts, deadline)?;

        debug!(
            source_id = %document.source_id(),
            windows = matches.len(),
            candidates = candidates.len(),
            "Extracted document"
        );
        Ok(assemble(document, measures, candidates, fraction))
    }

    /// Decode and extract; failures become an unresolved marker
    pub fn process(&self, raw: RawDocument) -> Outcome {
        let source_id = raw.source_id.clone();
        let result = Document::decode(raw).and_then(|document| self.extract(&document));
        match result {
            Ok(record) => Outcome::Resolved(record),
            Err(err) => {
                warn!(source_id = %source_id, error = %err, "Document unresolved");
                Outcome::Unresolved(unresolved(source_id, &err))
            }
        }
    }

    /// Process documents in parallel. No document can fail the batch.
    pub fn run_batch(&self, documents: Vec<RawDocument>) -> BatchOutcome {
        let started = Instant::now();
        let total = documents.len();
        info!(documents = total, "Starting batch");

        let outcomes: Vec<Outcome> = documents.into_par_iter().map(|raw| self.process(raw)).collect();

        let mut batch = BatchOutcome::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Resolved(record) => batch.records.push(record),
                Outcome::Unresolved(marker) => batch.unresolved.push(marker),
            }
        }
        batch.records.sort_by(|a, b| a.source_id.cmp(&b.source_id));
        batch.unresolved.sort_by(|a, b| a.source_id.cmp(&b.source_id));

        info!(
            documents = total,
            resolved = batch.records.len(),
            unresolved = batch.unresolved.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Finished batch"
        );
        batch
    }
}

fn unresolved(source_id: String, err: &ZoningError) -> Unresolved {
    let reason = match err {
        ZoningError::Timeout { .. } => UnresolvedReason::Timeout,
        _ => UnresolvedReason::Decode,
    };
    Unresolved {
        source_id,
        reason,
        detail: err.to_string(),
    }
}
