#[macro_use]
extern crate rocket;

use dotenv::dotenv;
use time::Duration;
use tracing_subscriber::EnvFilter;

use crate::{
    api::AppState,
    auth::{InMemoryAuthGate, PgAuthGate},
    config::AppConfig,
    store::{InMemoryResourceStore, PgResourceStore},
};

mod api;
mod auth;
mod config;
mod database;
mod models;
mod store;
mod utils;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let session_ttl = Duration::days(config.session_ttl_days);

    let state = match &config.database_url {
        Some(url) => {
            let pool = database::connection::connect(url, config.max_connections).await?;
            database::connection::migrate(&pool).await?;
            tracing::info!("Connected to PostgreSQL");
            AppState::new(
                Box::new(PgResourceStore::new(pool.clone())),
                Box::new(PgAuthGate::new(pool, session_ttl)),
                config.min_password_length,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, using in-memory storage");
            AppState::new(
                Box::new(InMemoryResourceStore::new()),
                Box::new(InMemoryAuthGate::new(session_ttl, &config.admin_emails)),
                config.min_password_length,
            )
        }
    };
    let cors = api::cors(&config.allowed_origins)?;

    api::rocket(state).attach(cors).launch().await?;
    Ok(())
}
