use serde::{Deserialize, Serialize};

use super::domain::{AnswerMap, QuestionId};

/// Pure predicate over prior answers deciding whether a question is shown.
///
/// Predicates only read the answer map; they never see later questions or mutate state,
/// so the bank can be filtered in a single forward pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Applicability {
    /// The answer equals `value` (single) or contains it (multiple).
    Equals { question: QuestionId, value: String },
    /// The answer matches at least one of `values`.
    AnyOf {
        question: QuestionId,
        values: Vec<String>,
    },
    /// The question has a non-empty answer.
    Answered { question: QuestionId },
    Not { condition: Box<Applicability> },
    All { conditions: Vec<Applicability> },
    Any { conditions: Vec<Applicability> },
}

/// Question (and option values) a predicate reads, used by bank validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PredicateReference<'a> {
    pub question: &'a QuestionId,
    pub values: &'a [String],
}

impl Applicability {
    pub fn equals(question: &str, value: &str) -> Self {
        Self::Equals {
            question: QuestionId::from(question),
            value: value.to_string(),
        }
    }

    pub fn any_of(question: &str, values: &[&str]) -> Self {
        Self::AnyOf {
            question: QuestionId::from(question),
            values: values.iter().map(|value| value.to_string()).collect(),
        }
    }

    pub fn answered(question: &str) -> Self {
        Self::Answered {
            question: QuestionId::from(question),
        }
    }

    pub fn negate(self) -> Self {
        Self::Not {
            condition: Box::new(self),
        }
    }

    pub fn all(conditions: Vec<Applicability>) -> Self {
        Self::All { conditions }
    }

    pub fn any(conditions: Vec<Applicability>) -> Self {
        Self::Any { conditions }
    }

    pub fn holds(&self, answers: &AnswerMap) -> bool {
        match self {
            Self::Equals { question, value } => answers
                .get(question.as_str())
                .map(|answer| answer.contains(value))
                .unwrap_or(false),
            Self::AnyOf { question, values } => answers
                .get(question.as_str())
                .map(|answer| values.iter().any(|value| answer.contains(value)))
                .unwrap_or(false),
            Self::Answered { question } => answers
                .get(question.as_str())
                .map(|answer| !answer.is_empty())
                .unwrap_or(false),
            Self::Not { condition } => !condition.holds(answers),
            Self::All { conditions } => conditions.iter().all(|condition| condition.holds(answers)),
            Self::Any { conditions } => conditions.iter().any(|condition| condition.holds(answers)),
        }
    }

    pub(crate) fn references(&self) -> Vec<PredicateReference<'_>> {
        let mut references = Vec::new();
        self.collect_references(&mut references);
        references
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<PredicateReference<'a>>) {
        match self {
            Self::Equals { question, value } => out.push(PredicateReference {
                question,
                values: std::slice::from_ref(value),
            }),
            Self::AnyOf { question, values } => out.push(PredicateReference { question, values }),
            Self::Answered { question } => out.push(PredicateReference {
                question,
                values: &[],
            }),
            Self::Not { condition } => condition.collect_references(out),
            Self::All { conditions } | Self::Any { conditions } => {
                for condition in conditions {
                    condition.collect_references(out);
                }
            }
        }
    }
}
