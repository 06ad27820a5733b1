pub mod decision;
pub mod error;
pub mod response;

use std::{sync::Arc, time::Duration};

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{config::ServerConfig, optimizer::MdpSolver};

/// Shared handler state. The solver carries parameters only.
#[derive(Clone)]
pub struct AppState {
    pub solver: Arc<MdpSolver>,
}

impl AppState {
    pub fn new(solver: MdpSolver) -> Self {
        Self {
            solver: Arc::new(solver),
        }
    }
}

pub fn router(state: AppState, server: &ServerConfig) -> Router {
    let v1 = Router::new()
        .route("/decision", post(decision::solve_decision))
        .route("/solver", get(decision::get_solver))
        .route("/healthz", get(healthz))
        .with_state(state);

    let mut router = Router::new().nest("/api/v1", v1);

    if server.enable_cors {
        use tower_http::cors::{AllowOrigin, Any};
        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::any())
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(64 * 1024))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    server.request_timeout_secs,
                ))),
        )
        .layer(TraceLayer::new_for_http())
}

pub async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
