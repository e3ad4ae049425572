use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::Category;
use super::config::ScoringConfig;
use super::ScoreVector;

/// One ranked category with its share of the total score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub category: Category,
    pub raw_score: f64,
    pub percentage: f64,
    /// Share reached the detailed-recommendation threshold.
    pub detailed: bool,
}

impl RecommendationEntry {
    pub fn rounded_percentage(&self) -> u8 {
        self.percentage.round().clamp(0.0, 100.0) as u8
    }
}

/// Ranked recommendations plus the category callers should lead with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub entries: Vec<RecommendationEntry>,
    pub primary: Category,
    /// No category carried enough signal; `primary` is the configured default.
    pub fallback: bool,
}

impl RecommendationResult {
    pub fn without_signal(fallback_category: Category) -> Self {
        Self {
            entries: Vec::new(),
            primary: fallback_category,
            fallback: true,
        }
    }

    pub fn primary_entry(&self) -> Option<&RecommendationEntry> {
        self.entries
            .first()
            .filter(|entry| entry.category == self.primary)
    }

    pub fn entry(&self, category: Category) -> Option<&RecommendationEntry> {
        self.entries.iter().find(|entry| entry.category == category)
    }

    pub fn detailed_entries(&self) -> impl Iterator<Item = &RecommendationEntry> {
        self.entries.iter().filter(|entry| entry.detailed)
    }

    pub fn summary(&self) -> String {
        match self.primary_entry() {
            Some(entry) => format!(
                "{} leads with a {}% match",
                entry.category.label(),
                entry.rounded_percentage()
            ),
            None => format!(
                "no clear match; defaulting to {}",
                self.primary.label()
            ),
        }
    }
}

/// Share of the total per category, before any threshold is applied.
///
/// Empty when the vector carries no signal.
pub fn percentages(scores: &ScoreVector) -> BTreeMap<Category, f64> {
    let total = scores.total();
    if total <= 0.0 {
        return BTreeMap::new();
    }

    Category::ordered()
        .into_iter()
        .map(|category| (category, scores.get(category) / total * 100.0))
        .collect()
}

pub(crate) fn rank(scores: &ScoreVector, config: &ScoringConfig) -> RecommendationResult {
    let shares = percentages(scores);
    if shares.is_empty() {
        return RecommendationResult::without_signal(config.fallback_category);
    }

    let mut entries: Vec<RecommendationEntry> = shares
        .into_iter()
        .filter(|(_, percentage)| *percentage >= config.relevance_threshold)
        .map(|(category, percentage)| RecommendationEntry {
            category,
            raw_score: scores.get(category),
            percentage,
            detailed: percentage >= config.detailed_threshold,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.percentage
            .total_cmp(&a.percentage)
            .then_with(|| a.category.cmp(&b.category))
    });

    match entries.first().map(|entry| entry.category) {
        Some(primary) => RecommendationResult {
            entries,
            primary,
            fallback: false,
        },
        None => RecommendationResult::without_signal(config.fallback_category),
    }
}
