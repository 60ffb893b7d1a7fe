use axum::{Form, Json, debug_handler, extract::{State, rejection::FormRejection}};
use serde::Deserialize;
use serde_json::Value;

use crate::{AppResult, Store, db::DocId, patch::{EventField, EventPatch}, update_response};

#[derive(Deserialize)]
pub(crate) struct ChatForm {
    event_id: String,
    #[serde(default)]
    chat_info: String,
}

/// Replaces the event's chat blob. Form-encoded, unlike the JSON routes.
#[debug_handler]
pub(crate) async fn update_chat(
    State(store): State<Store>,
    form: Result<Form<ChatForm>, FormRejection>,
) -> AppResult<Json<Value>> {
    let Form(ChatForm { event_id, chat_info }) = form?;
    let id: DocId = event_id.parse()?;

    let patch = EventPatch::single(EventField::Chat(chat_info));
    Ok(update_response(store.update_event(&id, &patch).await?))
}
