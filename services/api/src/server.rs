use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionRepository, TracingHandoff};
use crate::routes::with_questionnaire_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Duration;
use service_match::config::AppConfig;
use service_match::error::AppError;
use service_match::questionnaire::{QuestionnaireService, ScoringEngine};
use service_match::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let bank = config.questionnaire.load_bank()?;
    let engine = ScoringEngine::new(config.questionnaire.scoring_config()?)?;
    info!(
        questions = bank.len(),
        source = config
            .questionnaire
            .bank_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "built-in".to_string()),
        "question bank loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let questionnaire_service = Arc::new(QuestionnaireService::new(
        Arc::new(bank),
        Arc::new(engine),
        Arc::new(InMemorySessionRepository::with_idle_limit(Duration::minutes(
            i64::from(config.questionnaire.session_idle_minutes),
        ))),
        Arc::new(TracingHandoff),
    ));

    let app = with_questionnaire_routes(questionnaire_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        session_idle_minutes = config.questionnaire.session_idle_minutes,
        "service match questionnaire ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
