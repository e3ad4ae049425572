use serde::{Deserialize, Serialize};

use super::super::domain::Category;

pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 5.0;
pub const DEFAULT_DETAILED_THRESHOLD: f64 = 15.0;

/// Ranking dials: percentage floors and the zero-signal fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Entries below this share are dropped from the ranking.
    pub relevance_threshold: f64,
    /// Entries at or above this share are flagged for a detailed recommendation.
    pub detailed_threshold: f64,
    pub fallback_category: Category,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
            detailed_threshold: DEFAULT_DETAILED_THRESHOLD,
            fallback_category: Category::ordered()[0],
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        if !is_percentage(self.relevance_threshold) {
            return Err(ScoringConfigError::RelevanceOutOfRange(
                self.relevance_threshold,
            ));
        }
        if !is_percentage(self.detailed_threshold) {
            return Err(ScoringConfigError::DetailedOutOfRange(
                self.detailed_threshold,
            ));
        }
        if self.relevance_threshold > self.detailed_threshold {
            return Err(ScoringConfigError::ThresholdOrder {
                relevance: self.relevance_threshold,
                detailed: self.detailed_threshold,
            });
        }
        Ok(())
    }
}

fn is_percentage(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("relevance threshold {0} must be a percentage between 0 and 100")]
    RelevanceOutOfRange(f64),
    #[error("detailed threshold {0} must be a percentage between 0 and 100")]
    DetailedOutOfRange(f64),
    #[error("relevance threshold {relevance} exceeds detailed threshold {detailed}")]
    ThresholdOrder { relevance: f64, detailed: f64 },
}
