use crate::cli::ServeArgs;
use crate::infra::{load_repository, AppState};
use crate::routes::with_poll_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use polls::config::AppConfig;
use polls::error::AppError;
use polls::polls::PollService;
use polls::telemetry;
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
    if let Some(fixture) = args.fixture.take() {
        config.store.fixture_path = Some(fixture);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(load_repository(config.store.fixture_path.as_deref())?);
    let poll_service = Arc::new(PollService::new(repository));

    let app = with_poll_routes(poll_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "polls service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
