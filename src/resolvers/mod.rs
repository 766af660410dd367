//! Client-facing operations.
//!
//! - queries read the repository
//! - mutations write through the repository, then publish on the broker
//! - subscriptions turn broker registrations into payload streams
//!
//! Every resolver takes an explicit `Context`; none of them touch global state.

mod context;
pub mod mutation;
pub mod payload;
pub mod query;
pub mod subscription;

pub use context::Context;
pub use subscription::LiveStream;
