use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::State,
    http::{self, HeaderName, HeaderValue, Method},
    routing::get,
};
use entity::EmployeeCollection;
use platform_api::{ApiError, ApiResult};
use platform_db::Store;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{config::AppConfig, referral};

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<AppConfig>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "staffdesk server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/employees",
            get(employees_handler).post(replace_employees_handler),
        )
        .merge(referral::router())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_ok = state.store.ping().is_ok();
    Json(HealthResponse {
        ok: store_ok,
        store_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    store_ok: bool,
    version: &'static str,
}

/// `GET /employees`: the full roster, active and terminated intermixed.
async fn employees_handler(State(state): State<AppState>) -> ApiResult<Json<EmployeeCollection>> {
    let employees = state
        .store
        .load_employees()
        .map_err(|err| ApiError::internal(err.into()))?;
    Ok(Json(EmployeeCollection { employees }))
}

#[derive(Serialize)]
struct SaveReceipt {
    saved: usize,
}

/// `POST /employees`: replace the entire stored collection. No partial
/// update, no version check; the last writer wins.
async fn replace_employees_handler(
    State(state): State<AppState>,
    Json(collection): Json<EmployeeCollection>,
) -> ApiResult<Json<SaveReceipt>> {
    let count = collection.employees.len();
    state
        .store
        .replace_employees(&collection.employees)
        .map_err(|err| ApiError::internal(err.into()))?;
    info!(count, "roster replaced");
    Ok(Json(SaveReceipt { saved: count }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
