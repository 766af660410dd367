//! WebSocket transport
//!
//! This file implements the WebSocket server. Responsibilities:
//! - Accept TCP/WebSocket connections
//! - Create a `Client` and a connection-scoped `Context` for each connection
//! - Feed text frames to `handle_message`
//! - On disconnect, cancel the connection token so every subscription of the
//!   connection ends and leaves the broker
//!
//! The server stops accepting when the root context is shut down.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::spawn;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

use super::handler::handle_message;
use super::message::ServerMessage;
use crate::client::Client;
use crate::resolvers::Context;

/// Bind `addr` and serve until `ctx` is shut down.
pub async fn start_websocket_server(addr: &str, ctx: Context) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("WebSocket server listening on ws://{}", listener.local_addr()?);
    serve(listener, ctx).await;
    Ok(())
}

/// Accept connections on an already bound listener until `ctx` is shut down.
pub async fn serve(listener: TcpListener, ctx: Context) {
    loop {
        let accepted = tokio::select! {
            _ = ctx.cancel.cancelled() => {
                info!("WebSocket server shutting down");
                return;
            }
            accepted = listener.accept() => accepted,
        };

        match accepted {
            Ok((stream, peer)) => {
                spawn(handle_connection(stream, peer, ctx.child()));
            }
            Err(e) => warn!("Failed to accept connection: {e}"),
        }
    }
}

async fn handle_connection(stream: TcpStream, peer: SocketAddr, ctx: Context) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake error from {peer}: {e}");
            return;
        }
    };
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
    let mut client = Client::new(tx);
    let client_id = client.id.clone();
    info!(client = %client_id, %peer, "client connected");

    let writer = {
        let client_id = client_id.clone();
        spawn(async move {
            while let Some(msg) = rx.recv().await {
                if let Err(e) = ws_sender.send(msg).await {
                    debug!("Failed to send message to {client_id}: {e}");
                    break;
                }
            }
            debug!("Send loop closed for {client_id}");
        })
    };

    loop {
        let frame = tokio::select! {
            _ = ctx.cancel.cancelled() => break,
            frame = ws_receiver.next() => frame,
        };

        match frame {
            Some(Ok(WsMessage::Text(text))) => handle_message(&mut client, &ctx, text.as_str()),
            Some(Ok(WsMessage::Binary(_))) => {
                client.send(&ServerMessage::error(None, "binary frames are not supported"));
            }
            Some(Ok(WsMessage::Close(_))) | None => break,
            // ping/pong are answered by tungstenite
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                warn!("WebSocket error from {client_id}: {e}");
                break;
            }
        }
    }

    ctx.shutdown();
    client.cancel_all();
    drop(client);
    let _ = writer.await;

    info!(client = %client_id, "client disconnected");
}
