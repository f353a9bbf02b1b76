use super::hub::{Observer, SubscriptionHub};
use super::model::{IdGenerator, OpenChangeHook, Toast, ToastContent, ToastId, ToastPatch};
use super::reducer::{closing_targets, reduce, Action, ToastState};
use super::scheduler::{Scheduler, TimerHandle};
use crate::core::constants::{DEFAULT_TOAST_LIMIT, DEFAULT_TOAST_REMOVE_DELAY_MS};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tracing::{debug, trace};

/// Tunables for a [`ToastStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastSettings {
    /// Maximum number of toasts kept in state. Values below one are raised to one.
    pub limit: usize,
    /// Delay between a dismiss and the eviction it schedules.
    pub remove_delay: Duration,
}

impl Default for ToastSettings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TOAST_LIMIT,
            remove_delay: Duration::from_millis(DEFAULT_TOAST_REMOVE_DELAY_MS),
        }
    }
}

impl ToastSettings {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_remove_delay(mut self, remove_delay: Duration) -> Self {
        self.remove_delay = remove_delay;
        self
    }
}

struct StoreInner {
    settings: ToastSettings,
    state: Mutex<ToastState>,
    removals: Mutex<HashMap<ToastId, TimerHandle>>,
    ids: IdGenerator,
    hub: SubscriptionHub,
    scheduler: Arc<dyn Scheduler>,
}

impl StoreInner {
    fn state(&self) -> MutexGuard<'_, ToastState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn removals(&self) -> MutexGuard<'_, HashMap<ToastId, TimerHandle>> {
        self.removals.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        for handle in self.removals().values() {
            handle.cancel();
        }
    }
}

/// Shared toast state plus the machinery that keeps it in sync with its
/// observers.
///
/// Cloning is cheap and every clone addresses the same store. Create one per
/// application, hand clones to whatever needs to raise or render toasts, and
/// call [`ToastStore::shutdown`] when the application exits.
#[derive(Clone)]
pub struct ToastStore {
    inner: Arc<StoreInner>,
}

impl ToastStore {
    pub fn new(scheduler: Arc<dyn Scheduler>, settings: ToastSettings) -> Self {
        let settings = ToastSettings {
            limit: settings.limit.max(1),
            ..settings
        };
        Self {
            inner: Arc::new(StoreInner {
                settings,
                state: Mutex::new(ToastState::default()),
                removals: Mutex::new(HashMap::new()),
                ids: IdGenerator::new(),
                hub: SubscriptionHub::new(),
                scheduler,
            }),
        }
    }

    pub fn settings(&self) -> ToastSettings {
        self.inner.settings
    }

    /// Latest committed state. Surfaces use it to render before their first
    /// notification arrives.
    pub fn current(&self) -> ToastState {
        self.inner.state().clone()
    }

    /// Applies `action`, schedules removal for every toast it closes, then
    /// notifies observers with the committed state.
    pub fn dispatch(&self, action: Action) {
        let kind = action.kind();
        let (snapshot, closing) = {
            let mut state = self.inner.state();
            let closing = closing_targets(&state, &action);
            let revision = state.revision + 1;
            let limit = self.inner.settings.limit;
            let mut next = reduce(std::mem::take(&mut *state), action, limit);
            next.revision = revision;
            *state = next.clone();
            (next, closing)
        };
        debug!(
            action = kind,
            revision = snapshot.revision,
            toasts = snapshot.len(),
            "toast action committed"
        );

        for id in closing {
            self.schedule_removal(id);
        }
        self.release_evicted();
        self.inner.hub.publish(&snapshot);
    }

    /// Registers the deferred eviction of `id`. Returns `false` without
    /// scheduling anything when a removal for `id` is already pending.
    pub fn schedule_removal(&self, id: ToastId) -> bool {
        let mut removals = self.inner.removals();
        if removals.contains_key(&id) {
            trace!(toast_id = %id, "removal already pending");
            return false;
        }

        let store = Arc::downgrade(&self.inner);
        let task_id = id.clone();
        let handle = self.inner.scheduler.schedule_after(
            self.inner.settings.remove_delay,
            Box::new(move || {
                let Some(inner) = store.upgrade() else {
                    return;
                };
                inner.removals().remove(&task_id);
                debug!(toast_id = %task_id, "removal timer fired");
                ToastStore { inner }.dispatch(Action::Remove(Some(task_id)));
            }),
        );
        debug!(
            toast_id = %id,
            delay_ms = self.inner.settings.remove_delay.as_millis() as u64,
            "removal scheduled"
        );
        removals.insert(id, handle);
        true
    }

    /// Number of removal timers that have not fired yet.
    pub fn pending_removals(&self) -> usize {
        self.inner.removals().len()
    }

    pub fn has_pending_removal(&self, id: &ToastId) -> bool {
        self.inner.removals().contains_key(id)
    }

    // Ids never come back once evicted, so their timers have nothing left to do.
    // Compared against live state, not the dispatch snapshot.
    fn release_evicted(&self) {
        let state = self.inner.state();
        self.inner.removals().retain(|id, handle| {
            let keep = state.contains(id);
            if !keep {
                trace!(toast_id = %id, "releasing removal timer of evicted toast");
                handle.cancel();
            }
            keep
        });
    }

    /// Raises a new toast and returns a handle bound to its id.
    pub fn notify(&self, content: ToastContent) -> ToastHandle {
        let id = self.inner.ids.next_id();
        let store = Arc::downgrade(&self.inner);
        let hook_id = id.clone();
        let hook = OpenChangeHook::new(move |open| {
            if open {
                return;
            }
            if let Some(inner) = store.upgrade() {
                ToastStore { inner }.dismiss(Some(&hook_id));
            }
        });

        self.dispatch(Action::Add(Toast::new(id.clone(), content).with_open_change(hook)));

        ToastHandle {
            id,
            store: self.clone(),
        }
    }

    /// Merges `patch` into the toast with `id`; unknown ids are ignored.
    pub fn update(&self, id: &ToastId, patch: ToastPatch) {
        self.dispatch(Action::Update {
            id: id.clone(),
            patch,
        });
    }

    /// Closes the toast with `id`, or every toast when `id` is `None`.
    pub fn dismiss(&self, id: Option<&ToastId>) {
        self.dispatch(Action::Dismiss(id.cloned()));
    }

    pub fn dismiss_all(&self) {
        self.dismiss(None);
    }

    /// Evicts immediately, bypassing the closing state.
    pub fn remove(&self, id: Option<&ToastId>) {
        self.dispatch(Action::Remove(id.cloned()));
    }

    pub fn subscribe(
        &self,
        observer: impl Fn(&ToastState) + Send + Sync + 'static,
    ) -> Subscription {
        let observer: Observer = Arc::new(observer);
        let key = self.inner.hub.add(observer);
        trace!(key, "toast observer subscribed");
        Subscription {
            key,
            store: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.hub.len()
    }

    /// Cancels every pending removal timer. State and observers are left as
    /// they are.
    pub fn shutdown(&self) {
        let mut removals = self.inner.removals();
        debug!(pending = removals.len(), "cancelling pending toast removals");
        for (_, handle) in removals.drain() {
            handle.cancel();
        }
    }
}

impl std::fmt::Debug for ToastStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastStore")
            .field("settings", &self.inner.settings)
            .field("toasts", &self.inner.state().len())
            .field("pending_removals", &self.pending_removals())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Control handle returned by [`ToastStore::notify`].
#[derive(Debug, Clone)]
pub struct ToastHandle {
    id: ToastId,
    store: ToastStore,
}

impl ToastHandle {
    pub fn id(&self) -> &ToastId {
        &self.id
    }

    pub fn dismiss(&self) {
        self.store.dismiss(Some(&self.id));
    }

    pub fn update(&self, patch: ToastPatch) {
        self.store.update(&self.id, patch);
    }
}

/// Registration of one observer. Dropping it keeps the observer registered;
/// call [`Subscription::unsubscribe`] to stop notifications.
#[derive(Debug)]
#[must_use = "the observer stays registered until `unsubscribe` is called"]
pub struct Subscription {
    key: u64,
    store: Weak<StoreInner>,
}

impl Subscription {
    /// Returns `false` when the store is gone or the observer was already removed.
    pub fn unsubscribe(self) -> bool {
        match self.store.upgrade() {
            Some(inner) => inner.hub.remove(self.key),
            None => false,
        }
    }
}
