//! The `client` module defines the server-side state of one connected client.
//!
//! It provides the `Client` struct, which encapsulates the connection's
//! identifier, the channel for sending frames to it and the subscriptions
//! it currently runs.

pub mod connection;
pub use connection::{Client, send_frame};

#[cfg(test)]
mod tests;
