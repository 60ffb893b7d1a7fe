use axum::{Json, debug_handler, extract::{State, rejection::JsonRejection}};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppResult, Store, db::DocId};

#[derive(Deserialize)]
pub(crate) struct EventDeleteForm {
    event_id: String,
}

#[debug_handler]
pub(crate) async fn delete_event(
    State(store): State<Store>,
    form: Result<Json<EventDeleteForm>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(EventDeleteForm { event_id }) = form?;
    let id: DocId = event_id.parse()?;

    let report = store.delete_event_cascade(&id).await?;
    Ok(Json(json!({ "message": "delete success", "data": report.event_id })))
}
