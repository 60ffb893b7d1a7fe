use std::collections::BTreeSet;

use uuid::Uuid;

use super::msg::{ClientFrame, ServerFrame};

/// Per-socket state: an id for the logs and the rooms it joined.
#[derive(Debug)]
pub struct Connection {
    pub id: Uuid,
    rooms: BTreeSet<String>,
}

impl Connection {
    pub fn new() -> Connection {
        Connection {
            id: Uuid::now_v7(),
            rooms: BTreeSet::new(),
        }
    }

    pub fn rooms(&self) -> impl Iterator<Item = &str> {
        self.rooms.iter().map(String::as_str)
    }

    /// Reacts to one raw text frame; `None` means nothing goes back.
    pub fn handle_text(&mut self, text: &str) -> Option<ServerFrame> {
        match serde_json::from_str::<ClientFrame>(text) {
            Ok(frame) => self.handle(frame),
            Err(e) => {
                tracing::warn!(conn = %self.id, error = %e, "undecodable frame");
                Some(ServerFrame::Error(format!("invalid frame: {e}")))
            }
        }
    }

    pub fn handle(&mut self, ClientFrame { event, data }: ClientFrame) -> Option<ServerFrame> {
        match event.as_str() {
            "join" => {
                tracing::debug!(conn = %self.id, room = %data, "joined room");
                self.rooms.insert(data);
                None
            }
            "ping" => Some(ServerFrame::Pong(data)),
            other => {
                tracing::warn!(conn = %self.id, event = other, "unknown event");
                Some(ServerFrame::Error(format!("unknown event `{other}`")))
            }
        }
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}
