use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::applicability::Applicability;

/// Recommendation labels the engine scores against, in enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Web,
    Photo,
    Cinema,
    Automation,
    Ai,
    Tech,
}

impl Category {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Web,
            Self::Photo,
            Self::Cinema,
            Self::Automation,
            Self::Ai,
            Self::Tech,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Photo => "photo",
            Self::Cinema => "cinema",
            Self::Automation => "automation",
            Self::Ai => "ai",
            Self::Tech => "tech",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Web => "Web Development",
            Self::Photo => "Photography",
            Self::Cinema => "Cinematography",
            Self::Automation => "Process Automation",
            Self::Ai => "AI Solutions",
            Self::Tech => "Tech Consulting",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|category| category.key() == normalized)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Stable identifier of a question inside the bank.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for QuestionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    Single,
    Multiple,
}

impl SelectionMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "single choice",
            Self::Multiple => "multiple choice",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Partial category weighting; absent categories weigh zero.
pub type CategoryWeights = BTreeMap<Category, f64>;

/// Selectable answer belonging to a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub weights: CategoryWeights,
}

impl AnswerOption {
    pub fn new(
        value: impl Into<String>,
        label: impl Into<String>,
        weights: &[(Category, f64)],
    ) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            weights: weights.iter().copied().collect(),
        }
    }

    pub fn weight(&self, category: Category) -> f64 {
        self.weights.get(&category).copied().unwrap_or(0.0)
    }

    pub(crate) fn carries_weight(&self) -> bool {
        self.weights.values().any(|weight| *weight > 0.0)
    }
}

/// Authored question with its options and optional applicability predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub mode: SelectionMode,
    pub options: Vec<AnswerOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicability: Option<Applicability>,
    /// Marks the wrap-up question (e.g. timeline) for progress estimation.
    #[serde(default)]
    pub final_stage: bool,
}

impl Question {
    pub fn single(
        id: impl Into<String>,
        prompt: impl Into<String>,
        options: Vec<AnswerOption>,
    ) -> Self {
        Self::with_mode(id, prompt, SelectionMode::Single, options)
    }

    pub fn multiple(
        id: impl Into<String>,
        prompt: impl Into<String>,
        options: Vec<AnswerOption>,
    ) -> Self {
        Self::with_mode(id, prompt, SelectionMode::Multiple, options)
    }

    fn with_mode(
        id: impl Into<String>,
        prompt: impl Into<String>,
        mode: SelectionMode,
        options: Vec<AnswerOption>,
    ) -> Self {
        Self {
            id: QuestionId::new(id),
            prompt: prompt.into(),
            mode,
            options,
            applicability: None,
            final_stage: false,
        }
    }

    pub fn shown_when(mut self, applicability: Applicability) -> Self {
        self.applicability = Some(applicability);
        self
    }

    pub fn marked_final_stage(mut self) -> Self {
        self.final_stage = true;
        self
    }

    pub fn option(&self, value: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.value == value)
    }

    pub fn is_applicable(&self, answers: &AnswerMap) -> bool {
        self.applicability
            .as_ref()
            .map(|predicate| predicate.holds(answers))
            .unwrap_or(true)
    }
}

/// Recorded answer: one option token or a set of tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Multiple(BTreeSet<String>),
}

impl AnswerValue {
    pub fn single(value: impl Into<String>) -> Self {
        Self::Single(value.into())
    }

    pub fn multiple<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Multiple(values.into_iter().map(Into::into).collect())
    }

    pub fn mode(&self) -> SelectionMode {
        match self {
            Self::Single(_) => SelectionMode::Single,
            Self::Multiple(_) => SelectionMode::Multiple,
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        match self {
            Self::Single(selected) => selected == value,
            Self::Multiple(selected) => selected.contains(value),
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(selected) => vec![selected.as_str()],
            Self::Multiple(selected) => selected.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::Multiple(selected) => selected.is_empty(),
        }
    }
}

/// Answers keyed by question. Re-answering overwrites in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<QuestionId, AnswerValue>);

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.0.get(question_id)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    /// Stores the answer and returns the value it replaced, if any.
    pub fn record(&mut self, question_id: QuestionId, value: AnswerValue) -> Option<AnswerValue> {
        self.0.insert(question_id, value)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &AnswerValue)> {
        self.0.iter()
    }
}

impl FromIterator<(QuestionId, AnswerValue)> for AnswerMap {
    fn from_iter<T: IntoIterator<Item = (QuestionId, AnswerValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
