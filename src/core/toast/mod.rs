//! Transient notification (toast) store.
//!
//! A [`ToastStore`] owns the list of active toasts. Every change goes through
//! [`ToastStore::dispatch`], which runs the pure [`reducer`], arranges any
//! deferred eviction through the injected [`Scheduler`], and then hands the
//! committed [`ToastState`] to each subscriber.
//!
//! A toast moves through `open → closing → gone`: dismissing only flags it,
//! and a removal timer (one per id, no matter how often it is dismissed)
//! evicts it later. The list is capped on insertion; the newest toasts win.
//!
//! ```ignore
//! use fonda::core::toast::{ManualScheduler, ToastContent, ToastSettings, ToastStore};
//! use std::sync::Arc;
//!
//! let store = ToastStore::new(Arc::new(ManualScheduler::new()), ToastSettings::default());
//! let _subscription = store.subscribe(|state| println!("{} toast(s)", state.len()));
//! let handle = store.notify(ToastContent::new().title("Saved"));
//! handle.dismiss();
//! ```

pub mod hub;
pub mod model;
pub mod reducer;
pub mod scheduler;
pub mod store;


pub use model::{
    IdGenerator, OpenChangeHook, Toast, ToastAction, ToastContent, ToastId, ToastPatch,
    ToastVariant, MAX_SAFE_INTEGER,
};
pub use reducer::{reduce, Action, ToastState};
pub use scheduler::{ManualScheduler, Scheduler, Task, TimerHandle, TokioScheduler};
pub use store::{Subscription, ToastHandle, ToastSettings, ToastStore};
