//! Realtime side channel. Stateless apart from the rooms each socket joined,
//! and shares nothing with the event store.

mod msg;
mod room;
mod ws;

use axum::{Router, routing::get};

use crate::AppState;

pub use msg::{ClientFrame, ServerFrame};
pub use room::Connection;

pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(ws::upgrade))
}
