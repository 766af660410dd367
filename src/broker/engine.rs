//! Broker engine
//!
//! This module contains the in-memory broker responsible for:
//! - managing topics and their subscriber maps
//! - fanning published messages out to every live subscriber of a topic
//!
//! Concurrency and usage notes:
//! - The API here is synchronous and designed to be held behind a lock
//!   (`BrokerHandle` wraps it in `Arc<Mutex<_>>`). Nothing in here awaits,
//!   so the lock is never held across a suspension point.
//! - Delivery is best effort and in-process only. Nothing is stored for
//!   subscribers that register after a publish.
//! - Send failures and cancelled listeners are not reported to the publisher;
//!   they are pruned during `publish`.

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use uuid::Uuid;

use super::message::Message;
use super::topic::{Subscriber, SubscriberId, Topic};

#[derive(Debug, Default)]
pub struct Broker {
    pub topics: HashMap<String, Topic>,
}

impl Broker {
    pub fn new() -> Self {
        Self {
            topics: HashMap::new(),
        }
    }

    /// Register a listener on `topic`, creating the topic if needed.
    ///
    /// The listener stays registered until `unsubscribe`, until `token` is
    /// cancelled, or until the receiver is dropped; the last two are noticed
    /// on the next publish.
    pub fn subscribe(
        &mut self,
        topic: &str,
        token: CancellationToken,
    ) -> (SubscriberId, UnboundedReceiver<Message>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id: SubscriberId = Uuid::new_v4().to_string();

        self.topics
            .entry(topic.to_string())
            .or_insert_with(|| Topic::new(topic))
            .subscribe(id.clone(), Subscriber { sender, token });

        debug!(topic, subscriber = %id, "subscribed");
        (id, receiver)
    }

    /// Remove a listener. Topics left without listeners are dropped.
    pub fn unsubscribe(&mut self, topic: &str, subscriber: &SubscriberId) -> bool {
        let Some(t) = self.topics.get_mut(topic) else {
            return false;
        };
        let removed = t.unsubscribe(subscriber);
        if t.is_empty() {
            self.topics.remove(topic);
        }
        if removed {
            debug!(topic, subscriber = %subscriber, "unsubscribed");
        }
        removed
    }

    /// Deliver `payload` to every live subscriber of `topic`.
    ///
    /// Returns how many subscribers received it.
    pub fn publish(&mut self, topic: &str, payload: Value) -> usize {
        let Some(t) = self.topics.get_mut(topic) else {
            trace!(topic, "publish without subscribers");
            return 0;
        };

        let msg = Message::new(topic, payload);
        let mut delivered = 0;
        let mut stale = Vec::new();

        for (id, sub) in &t.subscribers {
            if !sub.is_live() {
                stale.push(id.clone());
                continue;
            }
            match sub.sender.send(msg.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => stale.push(id.clone()),
            }
        }

        for id in &stale {
            t.unsubscribe(id);
            debug!(topic, subscriber = %id, "pruned stale subscriber");
        }
        if t.is_empty() {
            self.topics.remove(topic);
        }

        trace!(topic, delivered, "published");
        delivered
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .get(topic)
            .map(|t| t.subscribers.len())
            .unwrap_or(0)
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}
