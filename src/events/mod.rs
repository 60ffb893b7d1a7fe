mod chat;
mod delete;
mod list;
mod new;
mod update;

use axum::{Router, routing::{get, post}};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list::events).post(new::new_event).patch(update::update_event))
        .route("/events/chats", post(chat::update_chat))
        .route("/events/delete", post(delete::delete_event))
}
