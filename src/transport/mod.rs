//! The `transport` module is responsible for network communication with
//! clients over WebSockets.
//!
//! It defines the JSON protocol spoken with clients, dispatches frames to the
//! resolvers and runs the WebSocket server itself.

pub mod handler;
pub mod message;
pub mod websocket;

pub use handler::handle_message;
pub use message::{ClientMessage, MutationRequest, QueryRequest, ServerMessage, SubscriptionRequest};
pub use websocket::{serve, start_websocket_server};

#[cfg(test)]
mod websocket_tests;
