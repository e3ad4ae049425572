use std::sync::Arc;

use tracing::{debug, info, warn};

use super::bank::QuestionBank;
use super::domain::{AnswerMap, AnswerValue, Question, QuestionId, SelectionMode};
use super::filter::{visible_position, visible_questions};
use super::progress::{self, ProgressTracker, COMPLETED_PROGRESS};
use super::scoring::{RecommendationResult, ScoringEngine};

/// Rejected answer; the answer map is left untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnswerError {
    #[error("unknown question '{0}'")]
    UnknownQuestion(String),
    #[error("question '{0}' is not part of the current questionnaire path")]
    NotVisible(QuestionId),
    #[error("question '{question}' expects a {expected} answer")]
    ModeMismatch {
        question: QuestionId,
        expected: SelectionMode,
    },
    #[error("'{value}' is not an option of question '{question}'")]
    UnknownOption { question: QuestionId, value: String },
    #[error("questionnaire already completed; step back before changing answers")]
    SessionCompleted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// `position` indexes the current visible-question list.
    InProgress { position: usize },
    Completed(RecommendationResult),
}

/// Effect of a navigation call, so hosts can react to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Advanced,
    SteppedBack,
    Completed,
    /// Left the results state for the last visible question.
    Reopened,
    Reset,
    Unchanged,
}

/// One respondent's walk through the questionnaire.
#[derive(Debug, Clone)]
pub struct QuestionnaireSession {
    bank: Arc<QuestionBank>,
    engine: Arc<ScoringEngine>,
    answers: AnswerMap,
    state: SessionState,
    progress: ProgressTracker,
}

impl QuestionnaireSession {
    pub fn new(bank: Arc<QuestionBank>, engine: Arc<ScoringEngine>) -> Self {
        let mut session = Self {
            bank,
            engine,
            answers: AnswerMap::new(),
            state: SessionState::InProgress { position: 0 },
            progress: ProgressTracker::default(),
        };
        session.reconcile();
        session
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, SessionState::Completed(_))
    }

    pub fn position(&self) -> Option<usize> {
        match self.state {
            SessionState::InProgress { position } => Some(position),
            SessionState::Completed(_) => None,
        }
    }

    pub fn result(&self) -> Option<&RecommendationResult> {
        match &self.state {
            SessionState::Completed(result) => Some(result),
            SessionState::InProgress { .. } => None,
        }
    }

    pub fn visible_questions(&self) -> Vec<&Question> {
        visible_questions(&self.bank, &self.answers)
    }

    /// Question to render, or `None` when results should be shown.
    pub fn current_question(&self) -> Option<&Question> {
        let position = self.position()?;
        visible_questions(&self.bank, &self.answers)
            .get(position)
            .copied()
    }

    pub fn current_answer(&self) -> Option<&AnswerValue> {
        let question = self.current_question()?;
        self.answers.get(question.id.as_str())
    }

    /// Highest progress percentage reported so far.
    pub fn progress(&self) -> f64 {
        self.progress.current()
    }

    pub fn answer(&mut self, question_id: &str, value: AnswerValue) -> Result<(), AnswerError> {
        if self.is_completed() {
            return Err(AnswerError::SessionCompleted);
        }

        let bank = Arc::clone(&self.bank);
        let question = bank
            .get(question_id)
            .ok_or_else(|| AnswerError::UnknownQuestion(question_id.to_string()))?;

        if visible_position(&bank, &self.answers, question_id).is_none() {
            debug!(question = question_id, "answer rejected for hidden question");
            return Err(AnswerError::NotVisible(question.id.clone()));
        }

        validate_value(question, &value)?;

        let replaced = self.answers.record(question.id.clone(), value);
        debug!(
            question = question_id,
            overwritten = replaced.is_some(),
            "answer recorded"
        );

        self.reconcile();
        Ok(())
    }

    pub fn next(&mut self) -> Transition {
        let SessionState::InProgress { position } = self.state else {
            return Transition::Unchanged;
        };

        let visible_len = self.visible_len();
        if position + 1 < visible_len {
            self.state = SessionState::InProgress {
                position: position + 1,
            };
            self.refresh_progress();
            debug!(position = position + 1, visible_len, "advanced");
            Transition::Advanced
        } else {
            self.complete();
            Transition::Completed
        }
    }

    pub fn previous(&mut self) -> Transition {
        match self.state {
            SessionState::InProgress { position } if position > 0 => {
                self.state = SessionState::InProgress {
                    position: position - 1,
                };
                self.refresh_progress();
                debug!(position = position - 1, "stepped back");
                Transition::SteppedBack
            }
            SessionState::InProgress { .. } => Transition::Unchanged,
            SessionState::Completed(_) => {
                let visible_len = self.visible_len();
                if visible_len == 0 {
                    return Transition::Unchanged;
                }
                self.state = SessionState::InProgress {
                    position: visible_len - 1,
                };
                self.refresh_progress();
                debug!(position = visible_len - 1, "reopened from results");
                Transition::Reopened
            }
        }
    }

    pub fn reset(&mut self) -> Transition {
        self.answers.clear();
        self.progress.reset();
        self.state = SessionState::InProgress { position: 0 };
        self.reconcile();
        debug!("session reset");
        Transition::Reset
    }

    fn visible_len(&self) -> usize {
        visible_questions(&self.bank, &self.answers).len()
    }

    /// Re-applies the visible list after answers changed: completes an empty
    /// questionnaire and clamps a dangling position.
    fn reconcile(&mut self) {
        let visible_len = self.visible_len();

        if let SessionState::InProgress { position } = &mut self.state {
            if visible_len == 0 {
                self.complete();
                return;
            }
            if *position >= visible_len {
                debug!(
                    from = *position,
                    to = visible_len - 1,
                    "clamped position after visible list shrank"
                );
                *position = visible_len - 1;
            }
        }

        self.refresh_progress();
    }

    fn complete(&mut self) {
        let result = self.engine.evaluate(&self.bank, &self.answers);
        if result.fallback {
            warn!(
                fallback = %result.primary,
                answered = self.answers.len(),
                "questionnaire completed without scoring signal"
            );
        } else {
            info!(
                primary = %result.primary,
                ranked = result.entries.len(),
                "questionnaire completed"
            );
        }
        self.state = SessionState::Completed(result);
        self.progress.complete();
    }

    fn refresh_progress(&mut self) -> f64 {
        let estimate = match self.state {
            SessionState::Completed(_) => COMPLETED_PROGRESS,
            SessionState::InProgress { position } => {
                let visible = visible_questions(&self.bank, &self.answers);
                let final_stage = visible
                    .get(position)
                    .map(|question| question.final_stage)
                    .unwrap_or(false);
                let is_last = position + 1 == visible.len();
                progress::estimate(position, visible.len(), final_stage, is_last)
            }
        };
        self.progress.observe(estimate)
    }
}

fn validate_value(question: &Question, value: &AnswerValue) -> Result<(), AnswerError> {
    if value.mode() != question.mode {
        return Err(AnswerError::ModeMismatch {
            question: question.id.clone(),
            expected: question.mode,
        });
    }

    match value
        .values()
        .into_iter()
        .find(|candidate| question.option(candidate).is_none())
    {
        Some(unknown) => Err(AnswerError::UnknownOption {
            question: question.id.clone(),
            value: unknown.to_string(),
        }),
        None => Ok(()),
    }
}
