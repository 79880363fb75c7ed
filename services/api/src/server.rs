use crate::cli::ServeArgs;
use crate::infra::{bootstrap_store, AppState};
use crate::routes::with_kpi_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mentor_kpi::config::AppConfig;
use mentor_kpi::error::AppError;
use mentor_kpi::telemetry;
use mentor_kpi::workflows::kpi::KpiService;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(bootstrap_store(&config.store)?);
    let kpi_service = Arc::new(KpiService::new(store));

    let app = with_kpi_routes(kpi_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "mentor kpi service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
