//! Subscription resolvers.
//!
//! Both resolvers return a `LiveStream` of JSON payloads bound to a child of
//! the context's cancellation token. `competitors_by_class_updated` starts
//! with a snapshot of the class; `competitor_updated` only relays what is
//! published after it registered.

use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt, future};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::Context;
use super::payload;
use crate::broker::TopicKind;
use crate::model::CompetitorFilter;
use crate::utils::error::ResolverError;

/// Payload stream of one subscription.
///
/// Ends when its token is cancelled (directly, or through the connection or
/// server token it descends from). Dropping it unregisters from the broker.
pub struct LiveStream {
    token: CancellationToken,
    inner: Option<BoxStream<'static, Value>>,
}

impl LiveStream {
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Stream for LiveStream {
    type Item = Value;

    fn poll_next(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Value>> {
        let this = self.get_mut();
        // dropping the inner stream releases the broker registration
        if this.token.is_cancelled() {
            this.inner = None;
            return Poll::Ready(None);
        }
        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };
        match inner.poll_next_unpin(cx) {
            Poll::Ready(None) => {
                this.inner = None;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl std::fmt::Debug for LiveStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveStream")
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

/// Snapshot of the class, then every update published for it.
///
/// The broker registration is taken before the snapshot is read, so an
/// update committed while the snapshot is being read is still delivered
/// after it. If the class is unknown or the read fails, the registration is
/// dropped again and the error returned.
pub fn competitors_by_class_updated(
    ctx: &Context,
    class_id: i64,
) -> Result<LiveStream, ResolverError> {
    let token = ctx.cancel.child_token();
    let topic = TopicKind::CompetitorsByClassUpdated.topic(class_id);
    let live = ctx.broker.subscribe(&topic, token.clone());

    ctx.store.find_class(class_id)?;
    let competitors = ctx
        .store
        .find_competitors(&CompetitorFilter::by_class(class_id))?;
    let snapshot = payload::competitors_by_class_updated(&competitors)?;
    debug!(%topic, competitors = competitors.len(), "class subscription opened");

    let inner = stream::once(future::ready(snapshot))
        .chain(live.map(|msg| msg.payload))
        .boxed();

    Ok(LiveStream {
        token,
        inner: Some(inner),
    })
}

/// Raw payloads published for the event, without an initial snapshot.
pub fn competitor_updated(ctx: &Context, event_id: i64) -> LiveStream {
    let token = ctx.cancel.child_token();
    let topic = TopicKind::CompetitorUpdated.topic(event_id);
    let live = ctx.broker.subscribe(&topic, token.clone());
    debug!(%topic, "event subscription opened");

    LiveStream {
        token,
        inner: Some(live.map(|msg| msg.payload).boxed()),
    }
}
