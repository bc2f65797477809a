use crate::cli::ServeArgs;
use crate::infra::{load_engine, load_repository, AppState};
use crate::routes::with_credit_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use sewa_credit::config::AppConfig;
use sewa_credit::error::AppError;
use sewa_credit::renters::RenterCreditService;
use sewa_credit::telemetry;
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

    let engine = load_engine(config.scoring.policy_path.as_deref())?;
    let repository = Arc::new(load_repository(config.scoring.history_csv.as_deref())?);
    let credit_service = Arc::new(RenterCreditService::new(repository, engine));

    let app = with_credit_routes(credit_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "renter credit service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
