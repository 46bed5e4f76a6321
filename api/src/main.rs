use actix_web::{web, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

use tw_api::app::create_app;
use tw_api::config::load_config;
use tw_api::routes::auth::AppState;
use tw_api::telemetry;
use tw_core::repositories::RevocationStore;
use tw_core::services::{Authenticator, JwtAuthenticator, SigningConfig};
use tw_infra::cache::RedisRevocationStore;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = load_config().context("Failed to load configuration")?;
    telemetry::init(&config.logging);

    tracing::info!(environment = %config.environment, "Starting Tokenward API server");

    let signing = SigningConfig::from_jwt_config(&config.auth.jwt)
        .context("Invalid signing configuration")?;

    let store: Option<Arc<dyn RevocationStore>> = if config.cache.enabled {
        let store = RedisRevocationStore::connect(config.cache.clone())
            .await
            .context("Failed to connect to the revocation store")?;
        Some(Arc::new(store))
    } else {
        tracing::warn!("Revocation store disabled; logout only discards the token client-side");
        None
    };

    let authenticator = Arc::new(JwtAuthenticator::new(signing, store)?);
    let state = web::Data::new(AppState::new(
        authenticator.clone(),
        Duration::from_millis(config.auth.store_timeout_ms),
    ));

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "Binding HTTP server");

    let mut server = HttpServer::new(move || create_app(state.clone()))
        .shutdown_timeout(config.server.shutdown_timeout);
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    let result = server.bind(&bind_address)?.run().await;

    if let Err(e) = authenticator.release().await {
        tracing::warn!(error = %e, "Failed to release the revocation store");
    }
    tracing::info!("Server stopped");

    result.context("HTTP server failed")
}
