use axum::{Json, debug_handler, extract::{State, rejection::JsonRejection}};
use serde_json::{Value, json};
use time::OffsetDateTime;

use crate::{AppResult, Store, db::NewEvent};

#[debug_handler]
pub(crate) async fn new_event(
    State(store): State<Store>,
    form: Result<Json<NewEvent>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(form) = form?;
    let event = form.into_event(OffsetDateTime::now_utc())?;
    store.insert_event(&event).await?;

    Ok(Json(json!({ "msg": "success", "data": event })))
}
