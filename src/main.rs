//! gym-billing server entry point.
//!
//! Loads configuration, connects to PostgreSQL, wires adapters into the
//! application handlers and serves the HTTP API. The subscription sweep
//! runs alongside the server when automation is enabled.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use gym_billing::adapters::auth::RoleAccessPolicy;
use gym_billing::adapters::http::{build_app, AppState};
use gym_billing::adapters::invoice::FileInvoiceRenderer;
use gym_billing::adapters::notifications::TracingNotificationSink;
use gym_billing::adapters::payment::gateway_from_name;
use gym_billing::adapters::postgres::PgUnitOfWorkFactory;
use gym_billing::adapters::scheduler::{SubscriptionScheduler, SubscriptionSchedulerConfig};
use gym_billing::application::handlers::automation::RunSubscriptionSweepHandler;
use gym_billing::application::SideEffects;
use gym_billing::config::AppConfig;
use gym_billing::ports::{PaymentGateway, UnitOfWorkFactory};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone()));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal(tx: watch::Sender<bool>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
    let _ = tx.send(true);
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    // Persistence
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;
    tracing::info!("Connected to PostgreSQL");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations applied");
    }

    // Adapters
    let uow_factory: Arc<dyn UnitOfWorkFactory> = Arc::new(PgUnitOfWorkFactory::new(pool));
    let gateway: Arc<dyn PaymentGateway> = Arc::from(gateway_from_name(&config.payment.gateway)?);
    let effects = SideEffects::new(
        uow_factory.clone(),
        Arc::new(TracingNotificationSink::new()),
        Arc::new(FileInvoiceRenderer::new(config.invoices.output_dir.clone())),
    );
    tracing::info!(gateway = gateway.name(), "Payment gateway selected");

    let sweep = Arc::new(RunSubscriptionSweepHandler::new(
        uow_factory.clone(),
        effects.clone(),
        config.automation.expiry_warning_days,
    ));

    // Background sweep
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_task = if config.automation.enabled {
        let scheduler = SubscriptionScheduler::with_config(
            sweep.clone(),
            SubscriptionSchedulerConfig::from(&config.automation),
        );
        Some(tokio::spawn(async move { scheduler.run(shutdown_rx).await }))
    } else {
        tracing::info!("Subscription automation disabled");
        None
    };

    // HTTP
    let state = AppState::new(
        uow_factory,
        Arc::new(RoleAccessPolicy::new()),
        gateway,
        effects,
        sweep,
    );
    let app = build_app(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "gym-billing listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await?;

    if let Some(task) = scheduler_task {
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Subscription scheduler task failed");
        }
    }

    tracing::info!("gym-billing stopped");
    Ok(())
}
