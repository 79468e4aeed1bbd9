//! Feriado API Server
//!
//! Main entry point for the Feriado backend service. Besides the HTTP
//! listener it runs the two scheduled maintenance jobs: the time-driven
//! approved/taken sweep and the balance recalculation.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Utc};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feriado_api::{AppState, create_router};
use feriado_db::{connect, BalanceRepository, RequestRepository};
use feriado_shared::{AppConfig, EmailService, HolidayService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feriado=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // External collaborators
    let holidays = HolidayService::new(&config.holidays);
    let notifier = EmailService::new(config.email.clone());
    info!(
        smtp_host = %config.email.smtp_host,
        holiday_provider = %config.holidays.base_url,
        "External services configured"
    );

    // Create application state
    let state = AppState {
        db: Arc::new(db.clone()),
        holidays,
        notifier: Arc::new(notifier),
    };

    // Scheduled jobs: the approved/taken sweep and the balance
    // recalculation. Both are idempotent, so overlapping runs or restarts
    // are harmless.
    let sweep_repo = RequestRepository::new(db.clone());
    let sweep_interval = config.jobs.sweep_interval_secs;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(sweep_interval));
        loop {
            ticker.tick().await;
            let today = Utc::now().date_naive();
            if let Err(e) = sweep_repo.sweep_time_transitions(today).await {
                error!(error = %e, "Time-driven sweep failed");
            }
        }
    });

    let balance_repo = BalanceRepository::new(db.clone());
    let recalculation_interval = config.jobs.recalculation_interval_secs;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(recalculation_interval));
        loop {
            ticker.tick().await;
            let year = Utc::now().date_naive().year();
            if let Err(e) = balance_repo.recalculate_all(year).await {
                error!(error = %e, "Balance recalculation failed");
            }
        }
    });

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
