//! Message definitions for the broker
//!
//! `Message` is what subscribers receive. Notes on fields:
//! - `topic`: topic name used for routing
//! - `payload`: the JSON body exactly as the publisher handed it over
//! - `timestamp`: milliseconds since UNIX epoch; set by the broker upon publish

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub topic: String,
    pub payload: Value,
    pub timestamp: i64,
}

impl Message {
    pub fn new(topic: &str, payload: Value) -> Self {
        Self {
            topic: topic.to_string(),
            payload,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
