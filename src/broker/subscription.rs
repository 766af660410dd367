//! Shared broker handle and cancellable subscriptions.
//!
//! `BrokerHandle` is constructed once at startup and handed to whoever needs
//! to publish or subscribe; there is no process-wide instance.
//!
//! A `Subscription` is the receiving end of one registration. It yields
//! messages in publish order and ends when its `CancellationToken` fires or
//! it is cancelled directly. Ending, cancelling and dropping all remove the
//! registration from the broker. A finished subscription cannot be restarted.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use futures::Stream;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

use super::engine::Broker;
use super::message::Message;
use super::topic::SubscriberId;

#[derive(Debug, Clone, Default)]
pub struct BrokerHandle {
    inner: Arc<Mutex<Broker>>,
}

impl BrokerHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, topic: &str, payload: Value) -> usize {
        self.inner.lock().publish(topic, payload)
    }

    /// Build a payload and publish it while holding the broker lock.
    ///
    /// Publishes on one handle are serialized, so a payload built later is
    /// never delivered before one built earlier. `build` must not call back
    /// into this handle. Nothing is published when `build` fails.
    pub fn publish_with<E>(
        &self,
        topic: &str,
        build: impl FnOnce() -> Result<Value, E>,
    ) -> Result<usize, E> {
        let mut broker = self.inner.lock();
        let payload = build()?;
        Ok(broker.publish(topic, payload))
    }

    /// Register on `topic`. The subscription ends once `token` is cancelled.
    pub fn subscribe(&self, topic: &str, token: CancellationToken) -> Subscription {
        let (id, receiver) = self.inner.lock().subscribe(topic, token.clone());

        Subscription {
            id,
            topic: topic.to_string(),
            cancelled: Box::pin(token.clone().cancelled_owned()),
            token,
            receiver,
            broker: Arc::downgrade(&self.inner),
            released: false,
        }
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.inner.lock().subscriber_count(topic)
    }

    pub fn topic_count(&self) -> usize {
        self.inner.lock().topic_count()
    }
}

pub struct Subscription {
    id: SubscriberId,
    topic: String,
    token: CancellationToken,
    cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
    receiver: UnboundedReceiver<Message>,
    broker: Weak<Mutex<Broker>>,
    released: bool,
}

impl Subscription {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Stop listening now. Pending messages are discarded.
    pub fn cancel(&mut self) {
        self.token.cancel();
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.receiver.close();
        if let Some(broker) = self.broker.upgrade() {
            broker.lock().unsubscribe(&self.topic, &self.id);
        }
    }
}

impl Stream for Subscription {
    type Item = Message;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Message>> {
        let this = self.get_mut();
        if this.released {
            return Poll::Ready(None);
        }
        if this.cancelled.as_mut().poll(cx).is_ready() {
            this.release();
            return Poll::Ready(None);
        }
        match this.receiver.poll_recv(cx) {
            Poll::Ready(Some(msg)) => Poll::Ready(Some(msg)),
            Poll::Ready(None) => {
                this.release();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .field("released", &self.released)
            .finish()
    }
}
