//! # splitsub
//!
//! `splitsub` serves live competitor updates for orienteering meets. It keeps
//! events, classes and competitors in an embedded store and pushes every
//! competitor change to WebSocket subscribers through an in-process topic
//! broker.
//!
//! ## Core Modules
//!
//! - `broker`: topic naming, the publish/subscribe router and cancellable subscriptions.
//! - `client`: per-connection state (outbound channel, active subscriptions).
//! - `config`: loading and merging server configuration.
//! - `model`: events, classes, competitors and their update inputs.
//! - `persistence`: the `Repository` trait, its `sled` implementation and fixture seeding.
//! - `resolvers`: queries, mutations and subscriptions over the repository and broker.
//! - `transport`: the WebSocket protocol and server.
//! - `utils`: error types and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod model;
pub mod persistence;
pub mod resolvers;
pub mod transport;
pub mod utils;
