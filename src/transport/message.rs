//! Wire protocol.
//!
//! Every frame is a JSON text frame tagged by `type`. Operations carry a
//! client-chosen `id` that the server echoes on every related reply:
//!
//! ```text
//! -> {"type":"subscribe","id":"s1","payload":{"operation":"competitorsByClassUpdated","classId":7}}
//! <- {"type":"next","id":"s1","payload":{"competitorsByClassUpdated":[...]}}
//! -> {"type":"complete","id":"s1"}
//! <- {"type":"complete","id":"s1"}
//! -> {"type":"mutation","id":"m1","payload":{"operation":"updateCompetitor","id":42,"data":{"status":"Finished"}}}
//! <- {"type":"result","id":"m1","payload":{...}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{CompetitorUpdate, NewCompetitor};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe {
        id: String,
        payload: SubscriptionRequest,
    },
    /// Stop the subscription with this id.
    Complete {
        id: String,
    },
    Query {
        id: String,
        payload: QueryRequest,
    },
    Mutation {
        id: String,
        payload: MutationRequest,
    },
    Ping,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(
    tag = "operation",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum SubscriptionRequest {
    CompetitorsByClassUpdated { class_id: i64 },
    CompetitorUpdated { event_id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(
    tag = "operation",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum QueryRequest {
    Events,
    ClassesByEvent { event_id: i64 },
    CompetitorsByClass { class_id: i64 },
    Competitor { id: i64 },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(
    tag = "operation",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum MutationRequest {
    UpdateCompetitor { id: i64, data: CompetitorUpdate },
    CreateCompetitor { data: NewCompetitor },
    DeleteCompetitor { id: i64 },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// One item of a subscription.
    Next { id: String, payload: Value },
    /// Answer to a query or mutation.
    #[serde(rename = "result")]
    Reply { id: String, payload: Value },
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        message: String,
    },
    /// The subscription with this id has ended.
    Complete { id: String },
    Pong,
}

impl ServerMessage {
    pub fn error(id: Option<String>, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            id,
            message: message.into(),
        }
    }
}
