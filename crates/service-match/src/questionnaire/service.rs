use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{debug, info};

use super::bank::QuestionBank;
use super::domain::AnswerValue;
use super::repository::{
    ConsultationHandoff, HandoffError, HandoffRequest, RepositoryError, SessionId, SessionRecord,
    SessionRepository,
};
use super::scoring::ScoringEngine;
use super::session::{AnswerError, QuestionnaireSession};
use super::views::SessionView;

/// Service composing the question bank, scoring engine, session store and handoff hook.
pub struct QuestionnaireService<R, H> {
    bank: Arc<QuestionBank>,
    engine: Arc<ScoringEngine>,
    repository: Arc<R>,
    handoff: Arc<H>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{id:06}"))
}

impl<R, H> QuestionnaireService<R, H>
where
    R: SessionRepository + 'static,
    H: ConsultationHandoff + 'static,
{
    pub fn new(
        bank: Arc<QuestionBank>,
        engine: Arc<ScoringEngine>,
        repository: Arc<R>,
        handoff: Arc<H>,
    ) -> Self {
        Self {
            bank,
            engine,
            repository,
            handoff,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Open a new session positioned on the first visible question.
    pub fn start(&self) -> Result<SessionRecord, QuestionnaireServiceError> {
        let session = QuestionnaireSession::new(Arc::clone(&self.bank), Arc::clone(&self.engine));
        let record = SessionRecord::new(next_session_id(), session);

        let stored = self.repository.insert(record)?;
        info!(
            session_id = %stored.session_id,
            visible = stored.session.visible_questions().len(),
            "questionnaire session started"
        );

        if stored.session.is_completed() {
            self.publish_handoff(&stored)?;
        }
        Ok(stored)
    }

    pub fn answer(
        &self,
        session_id: &SessionId,
        question_id: &str,
        value: AnswerValue,
    ) -> Result<SessionView, QuestionnaireServiceError> {
        self.apply(session_id, |session| {
            session.answer(question_id, value).map_err(|error| {
                debug!(question = question_id, %error, "answer rejected");
                error
            })
        })
    }

    pub fn next(&self, session_id: &SessionId) -> Result<SessionView, QuestionnaireServiceError> {
        self.apply(session_id, |session| Ok(session.next()))
    }

    pub fn previous(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionView, QuestionnaireServiceError> {
        self.apply(session_id, |session| Ok(session.previous()))
    }

    pub fn reset(&self, session_id: &SessionId) -> Result<SessionView, QuestionnaireServiceError> {
        self.apply(session_id, |session| Ok(session.reset()))
    }

    pub fn get(&self, session_id: &SessionId) -> Result<SessionView, QuestionnaireServiceError> {
        let record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record.view())
    }

    /// Loads the record, runs one session operation, persists it and fires the handoff
    /// when the operation moved the session into the results state.
    fn apply<T, F>(
        &self,
        session_id: &SessionId,
        operation: F,
    ) -> Result<SessionView, QuestionnaireServiceError>
    where
        F: FnOnce(&mut QuestionnaireSession) -> Result<T, AnswerError>,
    {
        let mut record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;

        let was_completed = record.session.is_completed();
        operation(&mut record.session)?;
        let completed_now = !was_completed && record.session.is_completed();

        record.touch();
        let view = record.view();
        self.repository.update(record.clone())?;

        if completed_now {
            self.publish_handoff(&record)?;
        }
        Ok(view)
    }

    fn publish_handoff(&self, record: &SessionRecord) -> Result<(), QuestionnaireServiceError> {
        let Some(result) = record.session.result() else {
            return Ok(());
        };

        self.handoff.publish(HandoffRequest {
            session_id: record.session_id.clone(),
            primary_category: result.primary,
            fallback: result.fallback,
            result: result.clone(),
        })?;
        debug!(session_id = %record.session_id, "consultation handoff published");
        Ok(())
    }
}

/// Error raised by the questionnaire service.
#[derive(Debug, thiserror::Error)]
pub enum QuestionnaireServiceError {
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Handoff(#[from] HandoffError),
}

impl QuestionnaireServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Answer(AnswerError::UnknownQuestion(_)) => StatusCode::NOT_FOUND,
            Self::Answer(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            Self::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Handoff(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
