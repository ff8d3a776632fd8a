use std::net::SocketAddr;
use std::sync::Arc;
use tourhub_api::{app, AppState};
use tourhub_core::identity::RosterNameSampler;
use tourhub_core::session::StaticSessionProvider;
use tourhub_orders::SandboxOrderGateway;
use tourhub_store::{DbClient, StoreTourRepository};
use tourhub_workflow::WorkflowOrchestrator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tourhub_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = tourhub_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Tourhub API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");

    let repository = Arc::new(StoreTourRepository::new(db.pool.clone()));
    let status_writer = Arc::new(StoreTourRepository::new(db.pool.clone()));
    let sessions = Arc::new(StaticSessionProvider::new(
        config.order_api.refresh_credential.clone(),
    ));
    // The sandbox gateway stands in for the external order API transport.
    let gateway = Arc::new(SandboxOrderGateway::new());

    let mut orchestrator = WorkflowOrchestrator::new(
        repository,
        status_writer,
        gateway,
        sessions,
        Arc::new(RosterNameSampler::new()),
    );
    if let Some(seed) = config.demo.seed {
        orchestrator = orchestrator.with_seed(seed);
    }

    let app_state = AppState {
        orchestrator: Arc::new(orchestrator),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
