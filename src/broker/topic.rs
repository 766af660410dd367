//! Topic management
//!
//! Topic names are derived routing keys of the form `<KIND>_<entityId>`,
//! e.g. `COMPETITORS_BY_CLASS_UPDATED_7`. They are never persisted.
//!
//! A `Topic` holds the live subscribers registered under one name. Callers
//! must synchronize access (the broker lock does).

use std::collections::HashMap;
use std::fmt;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use super::message::Message;

pub type SubscriberId = String;

/// The notification channels the resolvers publish on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicKind {
    /// Keyed by class id; carries the full competitor list of the class.
    CompetitorsByClassUpdated,
    /// Keyed by event id; carries the single changed competitor.
    CompetitorUpdated,
}

impl TopicKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicKind::CompetitorsByClassUpdated => "COMPETITORS_BY_CLASS_UPDATED",
            TopicKind::CompetitorUpdated => "COMPETITOR_UPDATED",
        }
    }

    pub fn topic(&self, entity_id: i64) -> String {
        topic_name(*self, entity_id)
    }
}

impl fmt::Display for TopicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `"<kind>_<entityId>"`
pub fn topic_name(kind: TopicKind, entity_id: i64) -> String {
    format!("{}_{}", kind.as_str(), entity_id)
}

/// A registered listener: where to push messages and how to tell it is gone.
#[derive(Debug)]
pub struct Subscriber {
    pub sender: UnboundedSender<Message>,
    pub token: CancellationToken,
}

impl Subscriber {
    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled() && !self.sender.is_closed()
    }
}

#[derive(Debug, Default)]
pub struct Topic {
    pub name: String,
    pub subscribers: HashMap<SubscriberId, Subscriber>,
}

impl Topic {
    /// Create a new topic with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: HashMap::new(),
        }
    }

    /// Add a subscriber to the topic. Re-using an id replaces the old entry.
    pub fn subscribe(&mut self, id: SubscriberId, subscriber: Subscriber) {
        self.subscribers.insert(id, subscriber);
    }

    /// Remove a subscriber from the topic.
    pub fn unsubscribe(&mut self, id: &SubscriberId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
