use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::AnswerValue;
use super::repository::{ConsultationHandoff, SessionId, SessionRepository};
use super::service::{QuestionnaireService, QuestionnaireServiceError};
use super::views::{BankOutlineView, SessionView};

/// Body of the answer endpoint: a string for single choice, an array for multiple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub value: AnswerValue,
}

/// Router builder exposing the questionnaire session endpoints.
pub fn questionnaire_router<R, H>(service: Arc<QuestionnaireService<R, H>>) -> Router
where
    R: SessionRepository + 'static,
    H: ConsultationHandoff + 'static,
{
    Router::new()
        .route("/api/v1/questionnaire/questions", get(questions_handler::<R, H>))
        .route("/api/v1/questionnaire/sessions", post(start_handler::<R, H>))
        .route(
            "/api/v1/questionnaire/sessions/:session_id",
            get(session_handler::<R, H>),
        )
        .route(
            "/api/v1/questionnaire/sessions/:session_id/answers/:question_id",
            put(answer_handler::<R, H>),
        )
        .route(
            "/api/v1/questionnaire/sessions/:session_id/next",
            post(next_handler::<R, H>),
        )
        .route(
            "/api/v1/questionnaire/sessions/:session_id/previous",
            post(previous_handler::<R, H>),
        )
        .route(
            "/api/v1/questionnaire/sessions/:session_id/reset",
            post(reset_handler::<R, H>),
        )
        .with_state(service)
}

pub(crate) async fn questions_handler<R, H>(
    State(service): State<Arc<QuestionnaireService<R, H>>>,
) -> Response
where
    R: SessionRepository + 'static,
    H: ConsultationHandoff + 'static,
{
    let outline = BankOutlineView::from(service.bank());
    (StatusCode::OK, axum::Json(outline)).into_response()
}

pub(crate) async fn start_handler<R, H>(
    State(service): State<Arc<QuestionnaireService<R, H>>>,
) -> Response
where
    R: SessionRepository + 'static,
    H: ConsultationHandoff + 'static,
{
    match service.start() {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn session_handler<R, H>(
    State(service): State<Arc<QuestionnaireService<R, H>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    H: ConsultationHandoff + 'static,
{
    view_response(service.get(&SessionId(session_id)))
}

pub(crate) async fn answer_handler<R, H>(
    State(service): State<Arc<QuestionnaireService<R, H>>>,
    Path((session_id, question_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<AnswerRequest>,
) -> Response
where
    R: SessionRepository + 'static,
    H: ConsultationHandoff + 'static,
{
    view_response(service.answer(&SessionId(session_id), &question_id, request.value))
}

pub(crate) async fn next_handler<R, H>(
    State(service): State<Arc<QuestionnaireService<R, H>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    H: ConsultationHandoff + 'static,
{
    view_response(service.next(&SessionId(session_id)))
}

pub(crate) async fn previous_handler<R, H>(
    State(service): State<Arc<QuestionnaireService<R, H>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    H: ConsultationHandoff + 'static,
{
    view_response(service.previous(&SessionId(session_id)))
}

pub(crate) async fn reset_handler<R, H>(
    State(service): State<Arc<QuestionnaireService<R, H>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    H: ConsultationHandoff + 'static,
{
    view_response(service.reset(&SessionId(session_id)))
}

fn view_response(result: Result<SessionView, QuestionnaireServiceError>) -> Response {
    match result {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: QuestionnaireServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error.status_code(), axum::Json(payload)).into_response()
}
