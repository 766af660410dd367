//! The `broker` module routes named notifications from publishers to live
//! subscribers inside one process.

pub mod engine;
pub mod message;
pub mod subscription;
pub mod topic;

pub use engine::Broker;
pub use message::Message;
pub use subscription::{BrokerHandle, Subscription};
pub use topic::{SubscriberId, TopicKind, topic_name};
