pub mod appresult;
pub mod auth;
pub mod config;
pub mod db;
pub mod events;
pub mod logging;
pub mod patch;
pub mod profiles;
pub mod rooms;
pub mod session;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRef, Request, State},
    http::{Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::SameSite};

pub use appresult::{AppError, AppResult};
pub use config::Config;
pub use db::Store;

use db::UpdateOutcome;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<Config>,
}

/// The whole HTTP surface: the JSON API under `/api/v1` and the realtime socket.
pub fn app(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(state.config.session_idle));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE]);

    let api = Router::new()
        .merge(auth::router())
        .merge(profiles::router())
        .merge(events::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), deadline));

    Router::new()
        .nest("/api/v1", api)
        .merge(rooms::router())
        .fallback(not_found)
        .with_state(state)
        .layer(session_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bounds a whole API request, store round-trips included. Dropping the
/// handler future rolls back any transaction it had open.
async fn deadline(State(config): State<Arc<Config>>, request: Request, next: Next) -> Response {
    match tokio::time::timeout(config.request_timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(timeout = ?config.request_timeout, "request timed out");
            AppError::Timeout(config.request_timeout).into_response()
        }
    }
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "code": "PAGE_NOT_FOUND", "message": "Page not found" })),
    )
}

pub(crate) fn update_response(outcome: UpdateOutcome) -> Json<Value> {
    Json(match outcome {
        UpdateOutcome::Matched => json!({ "message": "update success" }),
        UpdateOutcome::NoMatch => json!({ "message": "update fail" }),
    })
}
