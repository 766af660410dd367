use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::broker::BrokerHandle;
use crate::persistence::Repository;

/// Everything a resolver needs, passed explicitly per connection.
///
/// `cancel` is the scope token: subscriptions opened through this context
/// end when it is cancelled. The server holds the root; each connection
/// works on a `child()`.
#[derive(Clone)]
pub struct Context {
    pub store: Arc<dyn Repository>,
    pub broker: BrokerHandle,
    pub cancel: CancellationToken,
}

impl Context {
    pub fn new(store: Arc<dyn Repository>, broker: BrokerHandle) -> Self {
        Self {
            store,
            broker,
            cancel: CancellationToken::new(),
        }
    }

    /// Same store and broker, with a token that is cancelled together with ours.
    pub fn child(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            broker: self.broker.clone(),
            cancel: self.cancel.child_token(),
        }
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("broker", &self.broker)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
