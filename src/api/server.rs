//! Router assembly and server lifecycle

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, Method, Request},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::{Level, Span};

use crate::{
    api::{animals, health, AppState},
    config::Config,
    db::AnimalRepository,
    error::{Error, Result},
};

const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(30);

fn animal_routes() -> Router<AppState> {
    Router::new()
        .route("/animals", get(animals::list_animals).post(animals::create_animal))
        .route("/animals/:id", get(animals::get_animal))
}

fn probe_routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/readyz", get(health::ready_check))
        .route("/build", get(health::build_info))
}

fn request_span(request: &Request<Body>) -> Span {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or_else(|| request.uri().path());
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!("http", method = %request.method(), route, request_id)
}

/// Routes plus the request id, tracing, CORS and timeout middleware
pub fn create_router(config: Arc<Config>, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(DefaultOnResponse::new().level(Level::INFO).latency_unit(LatencyUnit::Millis)),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(cors)
        .layer(TimeoutLayer::new(config.server.request_timeout()));

    animal_routes().merge(probe_routes()).with_state(state).layer(middleware)
}

/// Serve the registry until a shutdown signal arrives
pub async fn create_server(config: Arc<Config>, animals: Arc<dyn AnimalRepository>) -> Result<()> {
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| Error::config(format!("Invalid server address {}: {}", config.server.address(), e)))?;

    let state = AppState::new(&config, Arc::clone(&animals));
    tokio::spawn(health::health_monitor(
        Arc::clone(&state.health),
        animals,
        HEALTH_CHECK_INTERVAL,
    ));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::internal(format!("Failed to bind to {}: {}", addr, e)))?;
    tracing::info!(address = %addr, environment = %config.server.environment, "Zoo registry listening");

    axum::serve(listener, create_router(config, state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::internal(format!("Server error: {}", e)))
}

/// Resolves on Ctrl+C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
