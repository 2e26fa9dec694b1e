//! Registry of connected real-time subscribers.
//!
//! Each subscriber is the sending half of an unbounded channel; the
//! connection task owns the receiving half as a [`Subscription`]. A
//! subscriber is "open" for as long as that receiver is alive, so a
//! connection that goes away is detected on the next broadcast and pruned.
//!
//! The registry lock is held for the whole of a broadcast. A concurrent
//! [`SubscriberRegistry::register`] or [`SubscriberRegistry::unregister`]
//! therefore lands either before or after it, never in the middle.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use proxwatch_types::SubscriberId;
use tokio::sync::mpsc;
use tracing::debug;

/// Sending handle for one connected client.
#[derive(Debug)]
pub struct Subscriber<M> {
    id: SubscriberId,
    tx: mpsc::UnboundedSender<M>,
}

impl<M> Subscriber<M> {
    /// Create a subscriber handle paired with the [`Subscription`] its
    /// connection task reads from.
    pub fn channel() -> (Self, Subscription<M>) {
        let id = SubscriberId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { id, tx }, Subscription { id, rx })
    }

    /// This subscriber's identifier.
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// Whether the receiving side is still alive.
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Queue `message` for delivery. Returns `false` if the connection is
    /// gone.
    pub fn deliver(&self, message: M) -> bool {
        self.tx.send(message).is_ok()
    }
}

/// Receiving side of a subscriber, owned by its connection task.
#[derive(Debug)]
pub struct Subscription<M> {
    id: SubscriberId,
    rx: mpsc::UnboundedReceiver<M>,
}

impl<M> Subscription<M> {
    /// Identifier of the matching [`Subscriber`].
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next message. Returns `None` once the subscriber has
    /// been unregistered and every queued message has been read.
    pub async fn recv(&mut self) -> Option<M> {
        self.rx.recv().await
    }

    /// Take the next queued message without waiting.
    pub fn try_recv(&mut self) -> Option<M> {
        self.rx.try_recv().ok()
    }
}

/// The set of currently connected subscribers.
#[derive(Debug)]
pub struct SubscriberRegistry<M> {
    subscribers: Mutex<BTreeMap<SubscriberId, Subscriber<M>>>,
}

impl<M: Clone> SubscriberRegistry<M> {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            subscribers: Mutex::new(BTreeMap::new()),
        }
    }

    /// Add a subscriber. Other subscribers are unaffected and nothing is
    /// sent.
    pub fn register(&self, subscriber: Subscriber<M>) {
        let id = subscriber.id();
        self.lock().insert(id, subscriber);
        debug!(subscriber = %id, "subscriber registered");
    }

    /// Remove a subscriber. Returns `false` if it was not registered (for
    /// example because a broadcast already pruned it).
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let removed = self.lock().remove(&id).is_some();
        if removed {
            debug!(subscriber = %id, "subscriber unregistered");
        }
        removed
    }

    /// Deliver `message` to every open subscriber.
    ///
    /// Closed subscribers are skipped and removed; a failed delivery never
    /// stops delivery to the rest. Returns the number of subscribers the
    /// message was delivered to (0 with nobody connected is not an error).
    pub fn broadcast(&self, message: &M) -> usize {
        let mut subscribers = self.lock();
        let mut delivered: usize = 0;

        subscribers.retain(|id, subscriber| {
            if subscriber.is_open() && subscriber.deliver(message.clone()) {
                delivered = delivered.saturating_add(1);
                true
            } else {
                debug!(subscriber = %id, "dropping closed subscriber");
                false
            }
        });

        delivered
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no subscriber is registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<SubscriberId, Subscriber<M>>> {
        // No code path panics while holding the lock, so a poisoned map is
        // still consistent.
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<M: Clone> Default for SubscriberRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}
