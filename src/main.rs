//! Server entry point.

use eventhub::auth::TokenIssuer;
use eventhub::config::{Config, DEV_JWT_SECRET};
use eventhub::providers::{ConsoleMailer, Mailer, SmtpMailer, SvgQrGenerator};
use eventhub::{AppState, api, store};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventhub=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    if config.auth.jwt_secret == DEV_JWT_SECRET {
        warn!("JWT_SECRET not set; using the development secret");
    }

    info!(url = %config.database.url, "connecting to database");
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    info!("running migrations");
    store::migrate(&pool).await?;

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => {
            info!(server = %smtp.server, "using SMTP mailer");
            Arc::new(SmtpMailer::new(smtp))
        }
        None => {
            info!("no SMTP configuration; emails go to the log");
            Arc::new(ConsoleMailer::new())
        }
    };

    let tokens = TokenIssuer::new(&config.auth.jwt_secret, config.auth.access_token_ttl_hours);
    let state = AppState::new(pool, tokens, mailer, Arc::new(SvgQrGenerator::new()));
    let router = api::build_router(state, &config.server.cors_origin);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(addr = %addr, "listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to install shutdown handler");
        return;
    }
    info!("shutdown signal received");
}
