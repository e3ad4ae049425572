use serde::Serialize;

use super::bank::QuestionBank;
use super::domain::{AnswerValue, Category, Question, QuestionId, SelectionMode};
use super::repository::SessionId;
use super::scoring::{RecommendationEntry, RecommendationResult};
use super::session::QuestionnaireSession;

#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
    pub value: String,
    pub label: String,
}

/// Client-facing question; option weights are never exposed.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub prompt: String,
    pub mode: SelectionMode,
    pub mode_label: &'static str,
    pub final_stage: bool,
    pub options: Vec<OptionView>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.clone(),
            prompt: question.prompt.clone(),
            mode: question.mode,
            mode_label: question.mode.label(),
            final_stage: question.final_stage,
            options: question
                .options
                .iter()
                .map(|option| OptionView {
                    value: option.value.clone(),
                    label: option.label.clone(),
                })
                .collect(),
        }
    }
}

/// Outline of a bank for the question listing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BankOutlineView {
    pub question_count: usize,
    pub questions: Vec<QuestionView>,
}

impl From<&QuestionBank> for BankOutlineView {
    fn from(bank: &QuestionBank) -> Self {
        Self {
            question_count: bank.len(),
            questions: bank.questions().iter().map(QuestionView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationEntryView {
    pub category: Category,
    pub label: &'static str,
    pub percentage: u8,
    pub detailed: bool,
}

impl From<&RecommendationEntry> for RecommendationEntryView {
    fn from(entry: &RecommendationEntry) -> Self {
        Self {
            category: entry.category,
            label: entry.category.label(),
            percentage: entry.rounded_percentage(),
            detailed: entry.detailed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationView {
    pub primary: Category,
    pub primary_label: &'static str,
    pub fallback: bool,
    pub summary: String,
    pub entries: Vec<RecommendationEntryView>,
}

impl From<&RecommendationResult> for RecommendationView {
    fn from(result: &RecommendationResult) -> Self {
        Self {
            primary: result.primary,
            primary_label: result.primary.label(),
            fallback: result.fallback,
            summary: result.summary(),
            entries: result
                .entries
                .iter()
                .map(RecommendationEntryView::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    pub visible_count: usize,
    pub answered_count: usize,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<AnswerValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RecommendationView>,
}

impl SessionView {
    pub fn from_session(session_id: &SessionId, session: &QuestionnaireSession) -> Self {
        let status = if session.is_completed() {
            SessionStatus::Completed
        } else {
            SessionStatus::InProgress
        };

        Self {
            session_id: session_id.clone(),
            status,
            position: session.position(),
            visible_count: session.visible_questions().len(),
            answered_count: session.answers().len(),
            progress: session.progress().round().clamp(0.0, 100.0) as u8,
            question: session.current_question().map(QuestionView::from),
            answer: session.current_answer().cloned(),
            result: session.result().map(RecommendationView::from),
        }
    }
}
