use axum::{Json, debug_handler, extract::{Query, State, rejection::QueryRejection}};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::{AppResult, Store, session::USER_EMAIL};

#[derive(Deserialize)]
pub(crate) struct ProfileQuery {
    email: Option<String>,
}

/// Looks up `?email=`, falling back to the logged-in account.
#[debug_handler]
pub(crate) async fn profile(
    State(store): State<Store>,
    session: Session,
    query: Result<Query<ProfileQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(ProfileQuery { email }) = query?;
    let email = match email.filter(|e| !e.is_empty()) {
        Some(email) => email,
        None => match session.get::<String>(USER_EMAIL).await? {
            Some(email) => email,
            None => return Err("no email param specified".into()),
        },
    };

    let profile = store.profile_by_email(&email).await?;
    Ok(Json(json!({ "data": profile })))
}
