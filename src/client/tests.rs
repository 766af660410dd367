use super::Client;
use crate::transport::message::ServerMessage;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tungstenite::protocol::Message as WsMessage;

#[test]
fn test_client_new() {
    let (tx, _) = mpsc::unbounded_channel::<WsMessage>();
    let client = Client::new(tx);
    assert!(!client.id.is_empty());
    assert!(client.subscriptions.is_empty());
}

#[test]
fn test_send_serializes_text_frame() {
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
    let client = Client::new(tx);
    assert!(client.send(&ServerMessage::Pong));

    let frame = rx.try_recv().unwrap();
    assert_eq!(frame.to_text().unwrap(), r#"{"type":"pong"}"#);
}

#[test]
fn test_send_after_disconnect() {
    let (tx, rx) = mpsc::unbounded_channel::<WsMessage>();
    let client = Client::new(tx);
    drop(rx);
    assert!(!client.send(&ServerMessage::Pong));
}

#[test]
fn test_track_rejects_running_duplicate() {
    let (tx, _rx) = mpsc::unbounded_channel::<WsMessage>();
    let mut client = Client::new(tx);
    let token = CancellationToken::new();

    assert!(client.track("s1".to_string(), token.clone()));
    assert!(client.is_active("s1"));
    assert!(!client.track("s1".to_string(), CancellationToken::new()));

    // once ended the id is free again
    token.cancel();
    assert!(!client.is_active("s1"));
    assert!(client.track("s1".to_string(), CancellationToken::new()));
}

#[test]
fn test_complete_and_cancel_all() {
    let (tx, _rx) = mpsc::unbounded_channel::<WsMessage>();
    let mut client = Client::new(tx);
    let a = CancellationToken::new();
    let b = CancellationToken::new();
    client.track("a".to_string(), a.clone());
    client.track("b".to_string(), b.clone());

    assert!(client.complete("a"));
    assert!(a.is_cancelled());
    assert!(!client.complete("a"));

    client.cancel_all();
    assert!(b.is_cancelled());
    assert!(client.subscriptions.is_empty());
}
