use axum::{Json, debug_handler, extract::{Query, State, rejection::QueryRejection}};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppResult, Store, db::DocId};

#[derive(Deserialize)]
pub(crate) struct EventQuery {
    event_id: Option<String>,
}

/// Every event, or just `?event_id=` when given.
#[debug_handler]
pub(crate) async fn events(
    State(store): State<Store>,
    query: Result<Query<EventQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(EventQuery { event_id }) = query?;

    let data = match event_id.filter(|id| !id.is_empty()) {
        None => json!(store.list_events().await?),
        Some(id) => {
            let id: DocId = id.parse()?;
            json!(store.event_by_id(&id).await?)
        }
    };
    Ok(Json(json!({ "msg": "success", "data": data })))
}
