//! Pure state transitions for the toast store.
//!
//! Nothing here touches timers or observers. Deferred work implied by an
//! action (removal timers for closed toasts) is the dispatcher's job; see
//! [`closing_targets`].

use super::model::{Toast, ToastId, ToastPatch};
use serde::Serialize;

/// Discrete transitions accepted by [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Prepend a toast, keeping only the newest `limit` entries.
    Add(Toast),
    /// Merge `patch` into the toast with `id`.
    Update { id: ToastId, patch: ToastPatch },
    /// Mark one toast (or all when `None`) as closed.
    Dismiss(Option<ToastId>),
    /// Drop one toast (or all when `None`) from the list.
    Remove(Option<ToastId>),
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Add(_) => "add",
            Action::Update { .. } => "update",
            Action::Dismiss(_) => "dismiss",
            Action::Remove(_) => "remove",
        }
    }
}

/// Snapshot of every active toast, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToastState {
    pub toasts: Vec<Toast>,
    /// Bumped once per committed dispatch.
    pub revision: u64,
}

impl ToastState {
    pub fn get(&self, id: &ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|toast| &toast.id == id)
    }

    pub fn contains(&self, id: &ToastId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ToastId> {
        self.toasts.iter().map(|toast| &toast.id)
    }
}

fn matches(target: Option<&ToastId>, toast: &Toast) -> bool {
    target.is_none_or(|id| &toast.id == id)
}

/// Applies `action` to `state`. `limit` caps the list length on insertion.
pub fn reduce(mut state: ToastState, action: Action, limit: usize) -> ToastState {
    match action {
        Action::Add(toast) => {
            state.toasts.insert(0, toast);
            state.toasts.truncate(limit);
        }
        Action::Update { id, patch } => {
            if let Some(toast) = state.toasts.iter_mut().find(|toast| toast.id == id) {
                toast.merge(patch);
            }
        }
        Action::Dismiss(target) => {
            for toast in state
                .toasts
                .iter_mut()
                .filter(|toast| matches(target.as_ref(), toast))
            {
                toast.open = false;
            }
        }
        Action::Remove(None) => state.toasts.clear(),
        Action::Remove(Some(id)) => state.toasts.retain(|toast| toast.id != id),
    }
    state
}

/// Ids `action` closes in `state`, each of which needs a removal timer once
/// the action commits: the matches of a `Dismiss`, or the target of an
/// `Update` whose patch sets `open` to `false`. Empty for everything else.
pub fn closing_targets(state: &ToastState, action: &Action) -> Vec<ToastId> {
    match action {
        Action::Dismiss(target) => state
            .toasts
            .iter()
            .filter(|toast| matches(target.as_ref(), toast))
            .map(|toast| toast.id.clone())
            .collect(),
        Action::Update { id, patch } if patch.open == Some(false) && state.contains(id) => {
            vec![id.clone()]
        }
        _ => Vec::new(),
    }
}
