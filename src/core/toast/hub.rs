use super::reducer::ToastState;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;

pub type Observer = Arc<dyn Fn(&ToastState) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_key: u64,
    observers: Vec<(u64, Observer)>,
    last_published: Option<u64>,
}

impl Registry {
    fn is_newer_than(&self, state: &ToastState) -> bool {
        self.last_published
            .is_some_and(|last| last > state.revision)
    }
}

/// Synchronous fan-out of committed states to registered observers.
///
/// The observer list is copied before delivery, so observers may subscribe,
/// unsubscribe or dispatch while being notified.
#[derive(Default)]
pub struct SubscriptionHub {
    registry: Mutex<Registry>,
}

impl SubscriptionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer` and returns the key used to remove it again.
    pub fn add(&self, observer: Observer) -> u64 {
        let mut registry = self.lock();
        let key = registry.next_key;
        registry.next_key += 1;
        registry.observers.push((key, observer));
        key
    }

    /// Returns `false` when `key` was already removed.
    pub fn remove(&self, key: u64) -> bool {
        let mut registry = self.lock();
        let before = registry.observers.len();
        registry.observers.retain(|(existing, _)| *existing != key);
        registry.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.lock().observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `state` to every observer in registration order.
    ///
    /// Delivery stops as soon as a newer revision has gone out, whether
    /// before this call or from an observer dispatching mid-delivery, so
    /// every observer's last received snapshot is the latest one published.
    pub fn publish(&self, state: &ToastState) {
        let observers: Vec<Observer> = {
            let mut registry = self.lock();
            if registry.is_newer_than(state) {
                trace!(revision = state.revision, "skipping stale toast snapshot");
                return;
            }
            registry.last_published = Some(state.revision);
            registry
                .observers
                .iter()
                .map(|(_, observer)| Arc::clone(observer))
                .collect()
        };

        for observer in observers {
            if self.lock().is_newer_than(state) {
                trace!(
                    revision = state.revision,
                    "newer toast snapshot published mid-delivery"
                );
                return;
            }
            observer(state);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SubscriptionHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHub")
            .field("observers", &self.len())
            .finish()
    }
}
