use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryEventRepository};
use crate::routes::with_event_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use event_schedule::config::AppConfig;
use event_schedule::error::AppError;
use event_schedule::telemetry;
use event_schedule::workflows::create_event::{EventSubmissionService, ScheduleSessions};
use std::sync::atomic::{AtomicBool, Ordering};
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryEventRepository::default());
    let service = Arc::new(EventSubmissionService::new(
        repository,
        config.schedule.max_capacity,
    ));
    let sessions = Arc::new(ScheduleSessions::new());
    let max_capacity = service.max_capacity();

    let app = with_event_routes(service, sessions)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_capacity,
        "event schedule service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
