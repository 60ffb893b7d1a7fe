use axum::{
    debug_handler,
    extract::{WebSocketUpgrade, ws::{Message, WebSocket}},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};

use super::{msg::ServerFrame, room::Connection};

#[debug_handler]
pub(crate) async fn upgrade(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(serve)
}

async fn serve(socket: WebSocket) {
    let mut conn = Connection::new();
    let (mut sender, mut receiver) = socket.split();
    tracing::info!(conn = %conn.id, "connected");

    if sender.send(Message::Text(ServerFrame::greeting().to_text().into())).await.is_err() {
        tracing::info!(conn = %conn.id, "closed before greeting");
        return;
    }

    let reason = loop {
        let reply = match receiver.next().await {
            Some(Ok(Message::Text(text))) => conn.handle_text(text.as_str()),
            Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                Ok(text) => conn.handle_text(text),
                Err(_) => Some(ServerFrame::Error("binary frames must be utf-8 json".to_owned())),
            },
            Some(Ok(Message::Close(frame))) => {
                break frame.map(|f| f.reason.as_str().to_owned()).unwrap_or_else(|| "client closed".to_owned());
            }
            // ping/pong are answered by the transport
            Some(Ok(_)) => None,
            Some(Err(e)) => {
                tracing::warn!(conn = %conn.id, error = %e, "socket error");
                break e.to_string();
            }
            None => break "stream ended".to_owned(),
        };

        if let Some(reply) = reply {
            if sender.send(Message::Text(reply.to_text().into())).await.is_err() {
                break "send failed".to_owned();
            }
        }
    };

    tracing::info!(conn = %conn.id, rooms = ?conn.rooms().collect::<Vec<_>>(), %reason, "closed");
}
