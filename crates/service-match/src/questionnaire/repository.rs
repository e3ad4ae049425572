use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::Category;
use super::scoring::RecommendationResult;
use super::session::QuestionnaireSession;
use super::views::SessionView;

/// Identifier handed to clients when a session starts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository record wrapping a live session with bookkeeping timestamps.
///
/// `version` counts committed writes. Repositories only accept an update whose version
/// matches the stored one, so two writers that read the same copy cannot both win.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub session: QuestionnaireSession,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(session_id: SessionId, session: QuestionnaireSession) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            session,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Checks this record was read from `stored` and returns it with the next version.
    pub fn commit_over(
        mut self,
        stored: &SessionRecord,
    ) -> Result<SessionRecord, RepositoryError> {
        if self.version != stored.version {
            return Err(RepositoryError::Conflict);
        }
        self.version += 1;
        Ok(self)
    }

    pub fn view(&self) -> SessionView {
        SessionView::from_session(&self.session_id, &self.session)
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError>;
    /// Replaces the stored record. Fails with `Conflict` when another write landed since
    /// the record was fetched.
    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session was changed by another request")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook fired when a respondent reaches the results screen.
pub trait ConsultationHandoff: Send + Sync {
    fn publish(&self, request: HandoffRequest) -> Result<(), HandoffError>;
}

/// Payload passed to the consultation/booking collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandoffRequest {
    pub session_id: SessionId,
    pub primary_category: Category,
    pub fallback: bool,
    pub result: RecommendationResult,
}

#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error("handoff transport unavailable: {0}")]
    Transport(String),
}
