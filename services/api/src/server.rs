use crate::cli::ServeArgs;
use crate::infra::{seed_fixture_accounts, AppState};
use crate::routes::with_partnership_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use das::config::AppConfig;
use das::error::AppError;
use das::partnership::PartnershipRequestService;
use das::store::memory::{
    InMemoryAccountDirectory, InMemoryBlacklistRegistry, InMemoryPartnershipRepository,
    InMemoryPartnershipRequestRepository,
};
use das::telemetry;
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

    let accounts = Arc::new(InMemoryAccountDirectory::default());
    if config.fixtures.seed_accounts {
        let seeded = seed_fixture_accounts(&accounts)?;
        info!(seeded, "fixture accounts loaded");
    }
    let partnership_service = Arc::new(PartnershipRequestService::new(
        accounts,
        Arc::new(InMemoryBlacklistRegistry::default()),
        Arc::new(InMemoryPartnershipRepository::default()),
        Arc::new(InMemoryPartnershipRequestRepository::default()),
    ));

    let app = with_partnership_routes(partnership_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "partnership request service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
