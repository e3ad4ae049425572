use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::{standard_importance, standard_questions};
use super::domain::{Category, Question, QuestionId};

/// Multiplier applied to questions missing from the importance table.
pub const DEFAULT_IMPORTANCE: f64 = 1.0;

/// Authoring errors detected while loading a bank. Any of them halts startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BankError {
    #[error("question id '{0}' is defined more than once")]
    DuplicateQuestion(QuestionId),
    #[error("question '{0}' has no options")]
    NoOptions(QuestionId),
    #[error("question '{question}' defines option '{value}' more than once")]
    DuplicateOption { question: QuestionId, value: String },
    #[error("option '{value}' of question '{question}' carries no category weight")]
    EmptyWeights { question: QuestionId, value: String },
    #[error("option '{value}' of question '{question}' has invalid {category} weight {weight}")]
    InvalidWeight {
        question: QuestionId,
        value: String,
        category: Category,
        weight: f64,
    },
    #[error("question '{question}' has a predicate referencing itself")]
    SelfReference { question: QuestionId },
    #[error("question '{question}' has a predicate referencing later question '{target}'")]
    ForwardReference {
        question: QuestionId,
        target: QuestionId,
    },
    #[error("question '{question}' has a predicate referencing unknown question '{target}'")]
    UnknownReference {
        question: QuestionId,
        target: QuestionId,
    },
    #[error("question '{question}' expects '{value}' from '{target}', which offers no such option")]
    UnknownPredicateValue {
        question: QuestionId,
        target: QuestionId,
        value: String,
    },
    #[error("importance table references unknown question '{0}'")]
    UnknownImportance(QuestionId),
    #[error("importance multiplier {multiplier} for question '{question}' must be finite and non-negative")]
    InvalidImportance { question: QuestionId, multiplier: f64 },
}

/// Failure to read or parse a bank document.
#[derive(Debug, thiserror::Error)]
pub enum BankLoadError {
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid question bank document: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] BankError),
}

/// On-disk representation of a bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankDocument {
    pub questions: Vec<Question>,
    #[serde(default)]
    pub importance: BTreeMap<QuestionId, f64>,
}

/// Immutable, validated catalog of questions and their importance multipliers.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionBank {
    questions: Vec<Question>,
    importance: BTreeMap<QuestionId, f64>,
}

impl QuestionBank {
    pub fn new(
        questions: Vec<Question>,
        importance: BTreeMap<QuestionId, f64>,
    ) -> Result<Self, BankError> {
        validate(&questions, &importance)?;
        debug!(
            questions = questions.len(),
            weighted = importance.len(),
            "question bank validated"
        );
        Ok(Self {
            questions,
            importance,
        })
    }

    /// Built-in catalog covering every category.
    pub fn standard() -> Self {
        Self {
            questions: standard_questions(),
            importance: standard_importance(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BankLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, BankLoadError> {
        let document: BankDocument = serde_json::from_reader(reader)?;
        Ok(Self::new(document.questions, document.importance)?)
    }

    pub fn to_document(&self) -> BankDocument {
        BankDocument {
            questions: self.questions.clone(),
            importance: self.importance.clone(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, question_id: &str) -> Option<&Question> {
        self.questions
            .iter()
            .find(|question| question.id.as_str() == question_id)
    }

    pub fn importance_of(&self, question_id: &str) -> f64 {
        self.importance
            .get(question_id)
            .copied()
            .unwrap_or(DEFAULT_IMPORTANCE)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn validate(
    questions: &[Question],
    importance: &BTreeMap<QuestionId, f64>,
) -> Result<(), BankError> {
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (index, question) in questions.iter().enumerate() {
        if seen.insert(question.id.as_str(), index).is_some() {
            return Err(BankError::DuplicateQuestion(question.id.clone()));
        }

        if question.options.is_empty() {
            return Err(BankError::NoOptions(question.id.clone()));
        }

        let mut values = HashSet::new();
        for option in &question.options {
            if !values.insert(option.value.as_str()) {
                return Err(BankError::DuplicateOption {
                    question: question.id.clone(),
                    value: option.value.clone(),
                });
            }

            for (category, weight) in &option.weights {
                if !weight.is_finite() || *weight < 0.0 {
                    return Err(BankError::InvalidWeight {
                        question: question.id.clone(),
                        value: option.value.clone(),
                        category: *category,
                        weight: *weight,
                    });
                }
            }

            if !option.carries_weight() {
                return Err(BankError::EmptyWeights {
                    question: question.id.clone(),
                    value: option.value.clone(),
                });
            }
        }

        let Some(predicate) = &question.applicability else {
            continue;
        };

        for reference in predicate.references() {
            if reference.question == &question.id {
                return Err(BankError::SelfReference {
                    question: question.id.clone(),
                });
            }

            let target = match seen.get(reference.question.as_str()) {
                Some(&target_index) => &questions[target_index],
                None if questions.iter().any(|later| &later.id == reference.question) => {
                    return Err(BankError::ForwardReference {
                        question: question.id.clone(),
                        target: reference.question.clone(),
                    });
                }
                None => {
                    return Err(BankError::UnknownReference {
                        question: question.id.clone(),
                        target: reference.question.clone(),
                    });
                }
            };

            if let Some(value) = reference
                .values
                .iter()
                .find(|value| target.option(value).is_none())
            {
                return Err(BankError::UnknownPredicateValue {
                    question: question.id.clone(),
                    target: target.id.clone(),
                    value: value.clone(),
                });
            }
        }
    }

    for (question, multiplier) in importance {
        if !seen.contains_key(question.as_str()) {
            return Err(BankError::UnknownImportance(question.clone()));
        }
        if !multiplier.is_finite() || *multiplier < 0.0 {
            return Err(BankError::InvalidImportance {
                question: question.clone(),
                multiplier: *multiplier,
            });
        }
    }

    Ok(())
}
