//! HTTP entry point: wires config, the engine context and the oracle
//! together, mounts rate limiting and OpenAPI docs, and serves the routes.

mod catalog;
mod dto;
mod envelope;
mod errors;
mod health;
mod openapi;
mod rate_limit;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use affectus_config::AffectusConfig;
use affectus_engine::EngineContext;
use affectus_oracle::{MockAffectOracle, RetryingOracle};

use openapi::ApiDoc;
use routes::SharedEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AffectusConfig::from_env();
    let oracle = Arc::new(RetryingOracle::wrap(MockAffectOracle));
    let ctx: SharedEngine = Arc::new(EngineContext::new(config.clone(), oracle));

    if let Ok(path) = std::env::var("CATALOG_PATH") {
        if let Err(err) = catalog::load_from_file(&ctx, &path).await {
            tracing::warn!(%path, error = %err, "failed to load catalog, starting with an empty one");
        }
    } else {
        info!("CATALOG_PATH not set, starting with an empty catalog");
    }

    let recommend_limiter = rate_limit::build_limiter(config.recommend_rate_per_minute);
    let analyze_limiter = rate_limit::build_limiter(config.analyze_rate_per_minute);

    let recommend_routes = Router::new()
        .route("/recommend", post(routes::recommend))
        .route_layer(middleware::from_fn_with_state(recommend_limiter, rate_limit::enforce));

    let analyze_routes = Router::new()
        .route("/emotion/analyze", post(routes::analyze))
        .route_layer(middleware::from_fn_with_state(analyze_limiter, rate_limit::enforce));

    let app = Router::new()
        .merge(recommend_routes)
        .merge(analyze_routes)
        .route("/feedback", post(routes::feedback))
        .route("/progress/:user_id", get(routes::progress))
        .route("/healthz", get(routes::healthz))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(ctx)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8080);
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    info!(%addr, "affectus-server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
