use crate::cli::ServeArgs;
use crate::infra::{
    load_catalog, AppState, InMemoryAssessmentRepository, InMemoryNotificationPublisher,
};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use vitalcheck::assessment::{AssessmentEngine, AssessmentService};
use vitalcheck::config::AppConfig;
use vitalcheck::error::AppError;
use vitalcheck::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = load_catalog(&config.assessment)?;
    let engine = Arc::new(AssessmentEngine::new(catalog, &config.assessment));
    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let assessment_service = Arc::new(
        AssessmentService::new(engine, repository, notifications)
            .with_default_language(config.assessment.default_language),
    );

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_language = %config.assessment.default_language,
        recommendation_limit = config.assessment.recommendation_limit,
        "vitalcheck assessment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
