use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use service_match::config::DEFAULT_SESSION_IDLE_MINUTES;
use service_match::questionnaire::{
    AnswerValue, ConsultationHandoff, HandoffError, HandoffRequest, RepositoryError, SelectionMode,
    SessionId, SessionRecord, SessionRepository,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Session store for a single process. Sessions idle for longer than `idle_limit` are
/// dropped on the next insert or when fetched.
#[derive(Clone)]
pub(crate) struct InMemorySessionRepository {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
    idle_limit: Duration,
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::with_idle_limit(Duration::minutes(i64::from(DEFAULT_SESSION_IDLE_MINUTES)))
    }
}

impl InMemorySessionRepository {
    pub(crate) fn with_idle_limit(idle_limit: Duration) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            idle_limit,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SessionRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session store poisoned".to_string()))
    }

    fn is_idle(&self, record: &SessionRecord, now: DateTime<Utc>) -> bool {
        now - record.updated_at > self.idle_limit
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.lock()?;

        let now = Utc::now();
        let before = guard.len();
        guard.retain(|_, stored| !self.is_idle(stored, now));
        let evicted = before - guard.len();
        if evicted > 0 {
            debug!(evicted, remaining = guard.len(), "idle sessions evicted");
        }

        if guard.contains_key(&record.session_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let stored = guard
            .get(&record.session_id)
            .ok_or(RepositoryError::NotFound)?;
        let committed = record.commit_over(stored)?;
        guard.insert(committed.session_id.clone(), committed);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let mut guard = self.lock()?;
        let expired = match guard.get(id) {
            Some(record) => self.is_idle(record, Utc::now()),
            None => return Ok(None),
        };
        if expired {
            guard.remove(id);
            debug!(session_id = %id, "idle session expired");
            return Ok(None);
        }
        Ok(guard.get(id).cloned())
    }
}

/// Hands completed sessions to the consultation desk by logging them.
#[derive(Default, Clone)]
pub(crate) struct TracingHandoff;

impl ConsultationHandoff for TracingHandoff {
    fn publish(&self, request: HandoffRequest) -> Result<(), HandoffError> {
        let ranked: Vec<&str> = request
            .result
            .entries
            .iter()
            .map(|entry| entry.category.key())
            .collect();
        info!(
            session_id = %request.session_id,
            primary = %request.primary_category,
            fallback = request.fallback,
            ranked = ?ranked,
            "consultation handoff"
        );
        Ok(())
    }
}

/// `--answer question=value[,value]` as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScriptedAnswer {
    pub(crate) question: String,
    pub(crate) values: Vec<String>,
}

impl ScriptedAnswer {
    pub(crate) fn to_value(&self, mode: SelectionMode) -> AnswerValue {
        match mode {
            SelectionMode::Multiple => AnswerValue::multiple(self.values.iter().cloned()),
            SelectionMode::Single => match self.values.as_slice() {
                [single] => AnswerValue::single(single.clone()),
                _ => AnswerValue::multiple(self.values.iter().cloned()),
            },
        }
    }
}

pub(crate) fn parse_scripted_answer(raw: &str) -> Result<ScriptedAnswer, String> {
    let (question, values) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected question=value, got '{raw}'"))?;

    let question = question.trim();
    if question.is_empty() {
        return Err(format!("missing question id in '{raw}'"));
    }

    let values: Vec<String> = values
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    if values.is_empty() {
        return Err(format!("missing answer value in '{raw}'"));
    }

    Ok(ScriptedAnswer {
        question: question.to_string(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_and_multiple_values() {
        let single = parse_scripted_answer("budget=growth").expect("parses");
        assert_eq!(single.question, "budget");
        assert_eq!(
            single.to_value(SelectionMode::Single),
            AnswerValue::single("growth")
        );

        let multiple = parse_scripted_answer(" visual_needs = drone, portraits ").expect("parses");
        assert_eq!(
            multiple.to_value(SelectionMode::Multiple),
            AnswerValue::multiple(["drone", "portraits"])
        );
    }

    #[test]
    fn several_values_for_single_choice_stay_a_set() {
        let answer = parse_scripted_answer("budget=starter,growth").expect("parses");
        assert_eq!(
            answer.to_value(SelectionMode::Single).mode(),
            SelectionMode::Multiple
        );
    }

    #[test]
    fn rejects_malformed_answers() {
        assert!(parse_scripted_answer("budget").is_err());
        assert!(parse_scripted_answer("=growth").is_err());
        assert!(parse_scripted_answer("budget= , ").is_err());
    }

    #[test]
    fn update_requires_existing_session() {
        use service_match::questionnaire::{QuestionBank, QuestionnaireSession, ScoringEngine};

        let repository = InMemorySessionRepository::default();
        let session = QuestionnaireSession::new(
            Arc::new(QuestionBank::standard()),
            Arc::new(ScoringEngine::default()),
        );
        let record = SessionRecord::new(SessionId("session-test".to_string()), session);

        assert!(matches!(
            repository.update(record.clone()),
            Err(RepositoryError::NotFound)
        ));
        repository.insert(record.clone()).expect("insert succeeds");
        assert!(matches!(
            repository.insert(record.clone()),
            Err(RepositoryError::Conflict)
        ));
        repository.update(record).expect("update succeeds");
    }

    fn standard_record(id: &str) -> SessionRecord {
        use service_match::questionnaire::{QuestionBank, QuestionnaireSession, ScoringEngine};

        let session = QuestionnaireSession::new(
            Arc::new(QuestionBank::standard()),
            Arc::new(ScoringEngine::default()),
        );
        SessionRecord::new(SessionId(id.to_string()), session)
    }

    #[test]
    fn stale_update_is_rejected_after_a_concurrent_write() {
        let repository = InMemorySessionRepository::default();
        let record = repository
            .insert(standard_record("session-stale"))
            .expect("insert succeeds");

        let first = record.clone();
        let second = record;
        repository.update(first).expect("first writer wins");
        assert!(matches!(
            repository.update(second),
            Err(RepositoryError::Conflict)
        ));

        let stored = repository
            .fetch(&SessionId("session-stale".to_string()))
            .expect("fetch works")
            .expect("record kept");
        assert_eq!(stored.version, 1);
    }

    #[test]
    fn idle_sessions_expire() {
        let repository = InMemorySessionRepository::with_idle_limit(Duration::minutes(30));

        let mut idle = standard_record("session-idle");
        idle.updated_at = Utc::now() - Duration::hours(2);
        repository.insert(idle).expect("insert succeeds");
        repository
            .insert(standard_record("session-active"))
            .expect("insert succeeds");

        assert_eq!(repository.records.lock().expect("lock").len(), 1);
        assert!(repository
            .fetch(&SessionId("session-idle".to_string()))
            .expect("fetch works")
            .is_none());

        let mut aging = repository
            .fetch(&SessionId("session-active".to_string()))
            .expect("fetch works")
            .expect("active session kept");
        aging.updated_at = Utc::now() - Duration::hours(1);
        repository
            .records
            .lock()
            .expect("lock")
            .insert(aging.session_id.clone(), aging);
        assert!(repository
            .fetch(&SessionId("session-active".to_string()))
            .expect("fetch works")
            .is_none());
        assert!(repository.records.lock().expect("lock").is_empty());
    }
}
