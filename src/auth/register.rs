use axum::{Json, debug_handler, extract::{State, rejection::JsonRejection}};
use serde_json::{Value, json};

use crate::{AppResult, Store};

use super::{Credentials, register_user};

#[debug_handler]
pub(crate) async fn register(
    State(store): State<Store>,
    form: Result<Json<Credentials>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(form) = form?;

    let profile = register_user(&store, &form.username, &form.password).await?;
    Ok(Json(json!({ "data": profile })))
}
