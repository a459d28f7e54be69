//! Change notification for containers and the registry.
//!
//! Subscribers implement [`ChangeListener`] (closures returning
//! `Result<(), ListenerError>` implement it automatically). Events are
//! delivered synchronously, after the mutation has committed, in
//! registration order. A subscriber that returns an error or panics is
//! logged and skipped; delivery continues with the next subscriber.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::warn;

/// What happened to a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Added { id: String },
    Updated { id: String },
    Removed { id: String },
    /// All entities were removed; carries the count before clearing
    Cleared { count: usize },
    /// A batch insert committed; carries the number actually inserted
    BulkLoaded { count: usize },
}

/// A change to a named container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub container: String,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(container: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            container: container.into(),
            kind,
        }
    }
}

/// Error reported by a subscriber. Logged, never propagated to the mutator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Observer for container changes.
pub trait ChangeListener: Send + Sync {
    /// Called once per committed change.
    fn on_change(&self, event: &ChangeEvent) -> Result<(), ListenerError>;
}

impl<F> ChangeListener for F
where
    F: Fn(&ChangeEvent) -> Result<(), ListenerError> + Send + Sync,
{
    fn on_change(&self, event: &ChangeEvent) -> Result<(), ListenerError> {
        self(event)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered set of subscribers with failure isolation.
#[derive(Default)]
pub(crate) struct ListenerSet {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(SubscriptionId, Arc<dyn ChangeListener>)>>,
}

impl ListenerSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(&self, listener: Arc<dyn ChangeListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        id
    }

    pub(crate) fn subscribe_fn<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(callback))
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Delivers `event` to every subscriber in registration order.
    ///
    /// Returns the number of subscribers that accepted the event.
    pub(crate) fn notify(&self, event: &ChangeEvent) -> usize {
        // Snapshot so subscribers may (un)subscribe from inside a callback.
        let snapshot: Vec<_> = self
            .listeners
            .read()
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        let mut delivered = 0;
        for (id, listener) in snapshot {
            match panic::catch_unwind(AssertUnwindSafe(|| listener.on_change(event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    warn!(
                        container = %event.container,
                        subscription = id.0,
                        error = %e,
                        "Change subscriber failed"
                    );
                }
                Err(payload) => {
                    warn!(
                        container = %event.container,
                        subscription = id.0,
                        panic = panic_message(payload.as_ref()),
                        "Change subscriber panicked"
                    );
                }
            }
        }
        delivered
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn added(id: &str) -> ChangeEvent {
        ChangeEvent::new(
            "east",
            ChangeKind::Added {
                id: id.to_string(),
            },
        )
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let set = ListenerSet::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            set.subscribe_fn(move |_| {
                order.lock().push(tag);
                Ok(())
            });
        }

        assert_eq!(set.notify(&added("p1")), 3);
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_failing_subscriber_does_not_block_others() {
        let set = ListenerSet::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        set.subscribe_fn(|_| Err(ListenerError::new("boom")));
        set.subscribe_fn(|_| panic!("subscriber exploded"));
        let sink = Arc::clone(&seen);
        set.subscribe_fn(move |event| {
            sink.lock().push(event.clone());
            Ok(())
        });

        assert_eq!(set.notify(&added("p1")), 1);
        assert_eq!(*seen.lock(), vec![added("p1")]);
    }

    #[test]
    fn test_unsubscribe() {
        let set = ListenerSet::new();
        let id = set.subscribe_fn(|_| Ok(()));
        assert_eq!(set.len(), 1);

        assert!(set.unsubscribe(id));
        assert!(!set.unsubscribe(id));
        assert_eq!(set.len(), 0);
        assert_eq!(set.notify(&added("p1")), 0);
    }

    #[test]
    fn test_subscriber_may_subscribe_during_notify() {
        let set = Arc::new(ListenerSet::new());
        let inner = Arc::clone(&set);
        set.subscribe_fn(move |_| {
            inner.subscribe_fn(|_| Ok(()));
            Ok(())
        });

        set.notify(&added("p1"));
        assert_eq!(set.len(), 2);
    }
}
