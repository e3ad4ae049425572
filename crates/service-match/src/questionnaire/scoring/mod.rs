mod config;
mod ranking;
mod rules;

pub use config::{
    ScoringConfig, ScoringConfigError, DEFAULT_DETAILED_THRESHOLD, DEFAULT_RELEVANCE_THRESHOLD,
};
pub use ranking::{percentages, RecommendationEntry, RecommendationResult};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::bank::QuestionBank;
use super::domain::{AnswerMap, Category, CategoryWeights, QuestionId};

/// Scores answers against a bank and ranks the outcome with one configuration.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, bank: &QuestionBank, answers: &AnswerMap) -> ScoreVector {
        rules::aggregate(bank, answers).0
    }

    pub fn score_breakdown(&self, bank: &QuestionBank, answers: &AnswerMap) -> ScoreBreakdown {
        let (scores, contributions) = rules::aggregate(bank, answers);
        ScoreBreakdown {
            scores,
            contributions,
        }
    }

    pub fn rank(&self, scores: &ScoreVector) -> RecommendationResult {
        ranking::rank(scores, &self.config)
    }

    /// Full pipeline: score the answers, then rank the resulting vector.
    pub fn evaluate(&self, bank: &QuestionBank, answers: &AnswerMap) -> RecommendationResult {
        self.rank(&self.score(bank, answers))
    }
}

/// Accumulated per-category totals for one scoring run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreVector(BTreeMap<Category, f64>);

impl ScoreVector {
    pub fn get(&self, category: Category) -> f64 {
        self.0.get(&category).copied().unwrap_or(0.0)
    }

    pub fn add(&mut self, category: Category, amount: f64) {
        *self.0.entry(category).or_insert(0.0) += amount;
    }

    pub fn add_weights(&mut self, weights: &CategoryWeights, multiplier: f64) {
        for (category, weight) in weights {
            self.add(*category, weight * multiplier);
        }
    }

    pub fn merge(&mut self, other: &ScoreVector) {
        for (category, amount) in &other.0 {
            self.add(*category, *amount);
        }
    }

    pub fn scaled(&self, multiplier: f64) -> ScoreVector {
        self.0
            .iter()
            .map(|(category, amount)| (*category, amount * multiplier))
            .collect()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn is_zero(&self) -> bool {
        self.total() <= 0.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.0.iter().map(|(category, amount)| (*category, *amount))
    }
}

impl FromIterator<(Category, f64)> for ScoreVector {
    fn from_iter<T: IntoIterator<Item = (Category, f64)>>(iter: T) -> Self {
        let mut vector = ScoreVector::default();
        for (category, amount) in iter {
            vector.add(category, amount);
        }
        vector
    }
}

/// What a single answered question added to the score, for audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub question: QuestionId,
    pub selected: Vec<String>,
    /// Answer values the question does not offer; they add nothing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
    pub multiplier: f64,
    pub weighted: ScoreVector,
    pub notes: String,
}

/// Score vector together with the per-question contributions behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub scores: ScoreVector,
    pub contributions: Vec<ScoreContribution>,
}
