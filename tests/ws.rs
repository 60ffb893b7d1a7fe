use std::{net::SocketAddr, sync::Arc};

use eventhub::{AppState, Config, Store, app};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server() -> SocketAddr {
    let config = Config::from_lookup(|key| (key == "DATABASE_URL").then(|| "sqlite::memory:".to_owned())).unwrap();
    let store = Store::in_memory().await.unwrap();
    let router = app(AppState { store, config: Arc::new(config) });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    addr
}

async fn next_frame(client: &mut Client) -> Value {
    match client.next().await {
        Some(Ok(Message::Text(text))) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("expected a text frame, got {other:?}"),
    }
}

async fn send_json(client: &mut Client, frame: Value) {
    client.send(Message::text(frame.to_string())).await.unwrap();
}

#[tokio::test]
async fn socket_session() {
    let addr = spawn_server().await;
    let (mut client, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();

    assert_eq!(next_frame(&mut client).await, json!({"event": "connect", "data": "connected"}));

    // join gets no reply, so the next frame is the pong
    send_json(&mut client, json!({"event": "join", "data": "board-games"})).await;
    send_json(&mut client, json!({"event": "ping", "data": "42"})).await;
    assert_eq!(next_frame(&mut client).await, json!({"event": "pong", "data": "42"}));

    client.send(Message::text("not json")).await.unwrap();
    assert_eq!(next_frame(&mut client).await["event"], "error");

    send_json(&mut client, json!({"event": "dance", "data": ""})).await;
    let frame = next_frame(&mut client).await;
    assert_eq!(frame["event"], "error");
    assert!(frame["data"].as_str().unwrap().contains("dance"));

    // still open after errors
    send_json(&mut client, json!({"event": "ping", "data": "again"})).await;
    assert_eq!(next_frame(&mut client).await, json!({"event": "pong", "data": "again"}));
}

#[tokio::test]
async fn binary_frames_and_close() {
    let addr = spawn_server().await;
    let (mut client, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    assert_eq!(next_frame(&mut client).await["event"], "connect");

    let ping = json!({"event": "ping", "data": "bin"}).to_string();
    client.send(Message::binary(ping.into_bytes())).await.unwrap();
    assert_eq!(next_frame(&mut client).await, json!({"event": "pong", "data": "bin"}));

    client.send(Message::binary(vec![0xff, 0xfe])).await.unwrap();
    let frame = next_frame(&mut client).await;
    assert_eq!(frame["event"], "error");
    assert_eq!(frame["data"], "binary frames must be utf-8 json");

    client.close(None).await.unwrap();
    loop {
        match client.next().await {
            Some(Ok(Message::Close(_))) | None => break,
            Some(Ok(other)) => panic!("unexpected frame after close: {other:?}"),
            Some(Err(_)) => break,
        }
    }
}
