use axum::{Json, debug_handler};
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::{AppResult, session::USER_EMAIL};

#[debug_handler]
pub(crate) async fn logout(session: Session) -> AppResult<Json<Value>> {
    if let Some(email) = session.get::<String>(USER_EMAIL).await? {
        tracing::info!(%email, "logged out");
    }
    session.clear().await;
    Ok(Json(json!({ "message": "success" })))
}
