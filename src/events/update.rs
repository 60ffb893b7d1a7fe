use axum::{Json, debug_handler, extract::{State, rejection::JsonRejection}};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{AppResult, Store, db::DocId, patch::EventPatch, update_response};

#[derive(Deserialize)]
pub(crate) struct EventUpdateForm {
    event_id: String,
    #[serde(default)]
    query: Map<String, Value>,
}

#[debug_handler]
pub(crate) async fn update_event(
    State(store): State<Store>,
    form: Result<Json<EventUpdateForm>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(EventUpdateForm { event_id, query }) = form?;
    let id: DocId = event_id.parse()?;
    let patch = EventPatch::try_from(query)?;

    Ok(update_response(store.update_event(&id, &patch).await?))
}

