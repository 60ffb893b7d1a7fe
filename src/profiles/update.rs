use axum::{Json, debug_handler, extract::{State, rejection::JsonRejection}};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{AppResult, Store, patch::ProfilePatch, update_response};

#[derive(Deserialize)]
pub(crate) struct ProfileUpdateForm {
    email: String,
    #[serde(default)]
    query: Map<String, Value>,
}

#[debug_handler]
pub(crate) async fn update_profile(
    State(store): State<Store>,
    form: Result<Json<ProfileUpdateForm>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(ProfileUpdateForm { email, query }) = form?;
    let patch = ProfilePatch::try_from(query)?;

    Ok(update_response(store.update_profile(&email, &patch).await?))
}
