//! Cooperative per-document time budget

use std::time::{Duration, Instant};

use crate::error::{Result, ZoningError};

/// Checked between stages and between table windows; a stage already running
/// is never interrupted
#[derive(Debug, Clone)]
pub struct Deadline {
    source_id: String,
    budget: Duration,
    expires_at: Instant,
}

impl Deadline {
    pub fn start(source_id: impl Into<String>, budget: Duration) -> Self {
        Self {
            source_id: source_id.into(),
            budget,
            expires_at: Instant::now() + budget,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    pub fn check(&self) -> Result<()> {
        if self.expired() {
            return Err(ZoningError::Timeout {
                source_id: self.source_id.clone(),
                budget_ms: self.budget.as_millis() as u64,
            });
        }
        Ok(())
    }
}
