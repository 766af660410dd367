use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::broker::{BrokerHandle, TopicKind};
use crate::persistence::test_support::seeded_store;
use crate::resolvers::Context;
use crate::transport::message::{ClientMessage, ServerMessage, SubscriptionRequest};
use crate::transport::websocket::serve;

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn setup_server() -> (String, Context) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = format!("ws://{}", listener.local_addr().unwrap());
    let ctx = Context::new(Arc::new(seeded_store()), BrokerHandle::new());
    tokio::spawn(serve(listener, ctx.clone()));
    (addr, ctx)
}

async fn connect(addr: &str) -> Ws {
    let (ws_stream, _) = tokio_tungstenite::connect_async(addr)
        .await
        .expect("WebSocket handshake failed");
    ws_stream
}

async fn send(ws: &mut Ws, msg: &ClientMessage) {
    ws.send(WsMessage::text(serde_json::to_string(msg).unwrap()))
        .await
        .expect("Failed to send message");
}

async fn next_message(ws: &mut Ws) -> ServerMessage {
    let frame = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("timed out waiting for a frame")
        .expect("Did not receive response")
        .unwrap();
    let raw_data = frame.into_data();
    serde_json::from_slice(&raw_data).unwrap_or_else(|e| {
        panic!(
            "Failed to deserialize ServerMessage from '{:?}': {}",
            raw_data, e
        );
    })
}

async fn wait_for_subscribers(ctx: &Context, topic: &str, expected: usize) {
    for _ in 0..100 {
        if ctx.broker.subscriber_count(topic) == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!(
        "expected {expected} subscribers on {topic}, found {}",
        ctx.broker.subscriber_count(topic)
    );
}

fn subscribe_class(id: &str, class_id: i64) -> ClientMessage {
    ClientMessage::Subscribe {
        id: id.to_string(),
        payload: SubscriptionRequest::CompetitorsByClassUpdated { class_id },
    }
}

#[tokio::test]
async fn test_update_reaches_other_client() {
    let (addr, ctx) = setup_server().await;
    let mut watcher = connect(&addr).await;
    let mut editor = connect(&addr).await;

    send(&mut watcher, &subscribe_class("s1", 7)).await;
    match next_message(&mut watcher).await {
        ServerMessage::Next { id, payload } => {
            assert_eq!(id, "s1");
            let list = payload["competitorsByClassUpdated"].as_array().unwrap();
            assert_eq!(list.len(), 2);
        }
        other => panic!("Expected Next, got {other:?}"),
    }

    let mutation: ClientMessage = serde_json::from_value(json!({
        "type": "mutation",
        "id": "m1",
        "payload": { "operation": "updateCompetitor", "id": 43, "data": { "status": "DidNotStart" } }
    }))
    .unwrap();
    send(&mut editor, &mutation).await;

    match next_message(&mut editor).await {
        ServerMessage::Reply { id, payload } => {
            assert_eq!(id, "m1");
            assert_eq!(payload["status"], "DidNotStart");
        }
        other => panic!("Expected Reply, got {other:?}"),
    }

    match next_message(&mut watcher).await {
        ServerMessage::Next { id, payload } => {
            assert_eq!(id, "s1");
            let list = payload["competitorsByClassUpdated"].as_array().unwrap();
            let nils = list.iter().find(|c| c["id"] == 43).unwrap();
            assert_eq!(nils["status"], "DidNotStart");
        }
        other => panic!("Expected Next, got {other:?}"),
    }

    ctx.shutdown();
}

#[tokio::test]
async fn test_disconnect_releases_subscriptions() {
    let (addr, ctx) = setup_server().await;
    let topic = TopicKind::CompetitorsByClassUpdated.topic(7);
    let mut ws = connect(&addr).await;

    send(&mut ws, &subscribe_class("s1", 7)).await;
    let _snapshot = next_message(&mut ws).await;
    assert_eq!(ctx.broker.subscriber_count(&topic), 1);

    ws.close(None).await.expect("Failed to close");
    drop(ws);

    wait_for_subscribers(&ctx, &topic, 0).await;
    assert_eq!(ctx.broker.topic_count(), 0);
    ctx.shutdown();
}

#[tokio::test]
async fn test_binary_frame_is_rejected() {
    let (addr, ctx) = setup_server().await;
    let mut ws = connect(&addr).await;

    ws.send(WsMessage::binary(vec![1u8, 2, 3]))
        .await
        .expect("Failed to send binary frame");

    match next_message(&mut ws).await {
        ServerMessage::Error { id: None, message } => {
            assert_eq!(message, "binary frames are not supported");
        }
        other => panic!("Expected Error, got {other:?}"),
    }
    ctx.shutdown();
}

#[tokio::test]
async fn test_shutdown_closes_connections() {
    let (addr, ctx) = setup_server().await;
    let topic = TopicKind::CompetitorsByClassUpdated.topic(8);
    let mut ws = connect(&addr).await;

    send(&mut ws, &subscribe_class("s1", 8)).await;
    let _snapshot = next_message(&mut ws).await;

    ctx.shutdown();

    // the subscription is completed before the socket goes away
    let mut completed = false;
    while let Ok(Some(Ok(frame))) =
        tokio::time::timeout(Duration::from_secs(2), ws.next()).await
    {
        if let WsMessage::Text(text) = frame {
            if let Ok(ServerMessage::Complete { id }) = serde_json::from_str(text.as_str()) {
                assert_eq!(id, "s1");
                completed = true;
            }
        }
    }
    assert!(completed);
    wait_for_subscribers(&ctx, &topic, 0).await;
}
