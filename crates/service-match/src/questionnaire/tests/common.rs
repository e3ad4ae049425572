use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::questionnaire::applicability::Applicability;
use crate::questionnaire::bank::QuestionBank;
use crate::questionnaire::domain::{AnswerOption, Category, Question, QuestionId};
use crate::questionnaire::questionnaire_router;
use crate::questionnaire::repository::{
    ConsultationHandoff, HandoffError, HandoffRequest, RepositoryError, SessionId, SessionRecord,
    SessionRepository,
};
use crate::questionnaire::scoring::{ScoringConfig, ScoringEngine};
use crate::questionnaire::service::QuestionnaireService;
use crate::questionnaire::session::QuestionnaireSession;

use Category::{Cinema, Photo, Web};

/// `q1` always shown; `q2` only when `q1 == "x"`.
pub(super) fn branching_bank() -> QuestionBank {
    QuestionBank::new(
        vec![
            Question::single(
                "q1",
                "Pick a branch",
                vec![
                    AnswerOption::new("x", "Branch x", &[(Web, 1.0)]),
                    AnswerOption::new("y", "Branch y", &[(Photo, 1.0)]),
                ],
            ),
            Question::single(
                "q2",
                "Only for x",
                vec![AnswerOption::new("z", "Follow-up", &[(Cinema, 1.0)])],
            )
            .shown_when(Applicability::equals("q1", "x")),
        ],
        BTreeMap::new(),
    )
    .expect("branching bank is valid")
}

/// Three always-visible questions followed by a final-stage wrap-up.
pub(super) fn linear_bank() -> QuestionBank {
    let mut questions: Vec<Question> = ["first", "second", "third"]
        .into_iter()
        .map(|id| {
            Question::single(
                id,
                format!("Question {id}"),
                vec![
                    AnswerOption::new("web", "Web", &[(Web, 2.0)]),
                    AnswerOption::new("photo", "Photo", &[(Photo, 2.0)]),
                ],
            )
        })
        .collect();
    questions.push(
        Question::single(
            "wrap_up",
            "When do you need it?",
            vec![AnswerOption::new("soon", "Soon", &[(Web, 0.5)])],
        )
        .marked_final_stage(),
    );
    QuestionBank::new(questions, BTreeMap::new()).expect("linear bank is valid")
}

/// One single-choice and one multiple-choice question with explicit weights.
pub(super) fn weighted_bank(multiplier: f64) -> QuestionBank {
    let mut importance = BTreeMap::new();
    importance.insert(QuestionId::from("focus"), multiplier);

    QuestionBank::new(
        vec![
            Question::single(
                "focus",
                "Main focus",
                vec![
                    AnswerOption::new("site", "Website", &[(Web, 4.0), (Photo, 1.0)]),
                    AnswerOption::new("film", "Film", &[(Cinema, 3.0)]),
                ],
            ),
            Question::multiple(
                "extras",
                "Extras",
                vec![
                    AnswerOption::new("a", "Option a", &[(Web, 2.0)]),
                    AnswerOption::new("b", "Option b", &[(Web, 3.0), (Photo, 1.0)]),
                    AnswerOption::new("c", "Option c", &[(Cinema, 1.0)]),
                ],
            ),
        ],
        importance,
    )
    .expect("weighted bank is valid")
}

pub(super) fn session_for(bank: QuestionBank) -> QuestionnaireSession {
    QuestionnaireSession::new(Arc::new(bank), Arc::new(ScoringEngine::default()))
}

pub(super) fn build_service() -> (
    QuestionnaireService<MemoryRepository, MemoryHandoff>,
    Arc<MemoryRepository>,
    Arc<MemoryHandoff>,
) {
    build_service_with_bank(QuestionBank::standard())
}

pub(super) fn build_service_with_bank(
    bank: QuestionBank,
) -> (
    QuestionnaireService<MemoryRepository, MemoryHandoff>,
    Arc<MemoryRepository>,
    Arc<MemoryHandoff>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let handoff = Arc::new(MemoryHandoff::default());
    let engine = ScoringEngine::new(ScoringConfig::default()).expect("default config is valid");
    let service = QuestionnaireService::new(
        Arc::new(bank),
        Arc::new(engine),
        repository.clone(),
        handoff.clone(),
    );
    (service, repository, handoff)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard
            .get(&record.session_id)
            .ok_or(RepositoryError::NotFound)?;
        let committed = record.commit_over(stored)?;
        guard.insert(committed.session_id.clone(), committed);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryHandoff {
    requests: Arc<Mutex<Vec<HandoffRequest>>>,
}

impl MemoryHandoff {
    pub(super) fn requests(&self) -> Vec<HandoffRequest> {
        self.requests.lock().expect("handoff mutex poisoned").clone()
    }
}

impl ConsultationHandoff for MemoryHandoff {
    fn publish(&self, request: HandoffRequest) -> Result<(), HandoffError> {
        self.requests
            .lock()
            .expect("handoff mutex poisoned")
            .push(request);
        Ok(())
    }
}

pub(super) struct OfflineHandoff;

impl ConsultationHandoff for OfflineHandoff {
    fn publish(&self, _request: HandoffRequest) -> Result<(), HandoffError> {
        Err(HandoffError::Transport("booking service offline".to_string()))
    }
}

pub(super) struct ConflictRepository;

impl SessionRepository for ConflictRepository {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: SessionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Ok(None)
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn update(&self, _record: SessionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

pub(super) fn service_with<R, H>(repository: R, handoff: H) -> Arc<QuestionnaireService<R, H>>
where
    R: SessionRepository + 'static,
    H: ConsultationHandoff + 'static,
{
    Arc::new(QuestionnaireService::new(
        Arc::new(QuestionBank::standard()),
        Arc::new(ScoringEngine::default()),
        Arc::new(repository),
        Arc::new(handoff),
    ))
}

pub(super) fn router_with_service(
    service: QuestionnaireService<MemoryRepository, MemoryHandoff>,
) -> axum::Router {
    questionnaire_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
