use axum::{Json, debug_handler, extract::{State, rejection::JsonRejection}};
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::{AppResult, Store, session::USER_EMAIL};

use super::{Credentials, check_credentials};

#[debug_handler]
pub(crate) async fn login(
    State(store): State<Store>,
    session: Session,
    form: Result<Json<Credentials>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(form) = form?;
    form.validate()?;

    check_credentials(&store, &form.username, &form.password).await?;
    session.cycle_id().await?;
    session.insert(USER_EMAIL, &form.username).await?;

    tracing::info!(email = %form.username, "logged in");
    Ok(Json(json!({ "message": "success" })))
}
