//! Adaptive questionnaire: conditional questions, weighted answers and a ranked
//! recommendation across the service categories.
//!
//! The engine is pure and synchronous. [`QuestionnaireSession`] owns one respondent's
//! answers and position; [`QuestionnaireService`] and [`questionnaire_router`] wire
//! sessions to storage, the consultation handoff and HTTP.

pub mod applicability;
pub mod bank;
mod catalog;
pub mod domain;
pub mod filter;
pub mod progress;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;
pub mod views;

#[cfg(test)]
mod tests;

pub use applicability::Applicability;
pub use bank::{BankDocument, BankError, BankLoadError, QuestionBank, DEFAULT_IMPORTANCE};
pub use domain::{
    AnswerMap, AnswerOption, AnswerValue, Category, CategoryWeights, Question, QuestionId,
    SelectionMode,
};
pub use filter::{visible_position, visible_questions};
pub use progress::ProgressTracker;
pub use repository::{
    ConsultationHandoff, HandoffError, HandoffRequest, RepositoryError, SessionId, SessionRecord,
    SessionRepository,
};
pub use router::{questionnaire_router, AnswerRequest};
pub use scoring::{
    percentages, RecommendationEntry, RecommendationResult, ScoreBreakdown, ScoreContribution,
    ScoreVector, ScoringConfig, ScoringConfigError, ScoringEngine,
};
pub use service::{QuestionnaireService, QuestionnaireServiceError};
pub use session::{AnswerError, QuestionnaireSession, SessionState, Transition};
pub use views::{
    BankOutlineView, QuestionView, RecommendationEntryView, RecommendationView, SessionStatus,
    SessionView,
};
