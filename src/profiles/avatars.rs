use axum::{Json, debug_handler, extract::{Query, State, rejection::QueryRejection}};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppResult, Store};

#[derive(Deserialize)]
pub(crate) struct AvatarsQuery {
    /// Comma-separated emails.
    #[serde(default)]
    email: String,
}

#[debug_handler]
pub(crate) async fn avatars(
    State(store): State<Store>,
    query: Result<Query<AvatarsQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(AvatarsQuery { email }) = query?;
    let avatars = store.avatars(email.split(',').map(str::trim)).await?;

    Ok(Json(json!({ "msg": "success", "data": avatars })))
}
