use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Largest integer a JavaScript number represents exactly. Ids wrap here so
/// they stay valid for web front ends that parse them back as numbers.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Opaque, unique toast identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ToastId(String);

impl ToastId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToastId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ToastId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Per-store monotonic id source.
#[derive(Debug, Default)]
pub struct IdGenerator {
    count: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next id; the counter wraps modulo [`MAX_SAFE_INTEGER`].
    pub fn next_id(&self) -> ToastId {
        let previous = self
            .count
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |count| {
                Some((count + 1) % MAX_SAFE_INTEGER)
            })
            .unwrap_or_default();
        ToastId(((previous + 1) % MAX_SAFE_INTEGER).to_string())
    }

    #[cfg(test)]
    pub(crate) fn starting_at(count: u64) -> Self {
        Self {
            count: AtomicU64::new(count),
        }
    }
}

/// Visual treatment requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

/// Interactive element attached to a toast. The store never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToastAction {
    pub label: String,
    /// Text announced by assistive technology in place of the label.
    pub alt_text: String,
}

impl ToastAction {
    pub fn new(label: impl Into<String>, alt_text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            alt_text: alt_text.into(),
        }
    }
}

type OpenChangeFn = dyn Fn(bool) + Send + Sync;

/// Callback invoked by the presentation layer when a toast's visibility flips.
#[derive(Clone)]
pub struct OpenChangeHook(Arc<OpenChangeFn>);

impl OpenChangeHook {
    pub fn new(hook: impl Fn(bool) + Send + Sync + 'static) -> Self {
        Self(Arc::new(hook))
    }

    pub fn call(&self, open: bool) {
        (self.0)(open);
    }
}

impl fmt::Debug for OpenChangeHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OpenChangeHook(..)")
    }
}

impl PartialEq for OpenChangeHook {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A transient notification as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub id: ToastId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ToastAction>,
    pub variant: ToastVariant,
    pub open: bool,
    #[serde(skip)]
    pub on_open_change: Option<OpenChangeHook>,
}

impl Toast {
    /// Builds an open toast from caller content.
    pub fn new(id: ToastId, content: ToastContent) -> Self {
        Self {
            id,
            title: content.title,
            description: content.description,
            action: content.action,
            variant: content.variant,
            open: true,
            on_open_change: None,
        }
    }

    pub fn with_open_change(mut self, hook: OpenChangeHook) -> Self {
        self.on_open_change = Some(hook);
        self
    }

    /// Entry point for the presentation layer to report a visibility change.
    pub fn notify_open_change(&self, open: bool) {
        if let Some(hook) = &self.on_open_change {
            hook.call(open);
        }
    }

    /// Whether the toast has been dismissed and is waiting for eviction.
    pub fn is_closing(&self) -> bool {
        !self.open
    }

    /// Applies the provided patch fields; absent fields are left untouched.
    pub(crate) fn merge(&mut self, patch: ToastPatch) {
        if let Some(title) = patch.title {
            self.title = Some(title);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(action) = patch.action {
            self.action = Some(action);
        }
        if let Some(variant) = patch.variant {
            self.variant = variant;
        }
        if let Some(open) = patch.open {
            self.open = open;
        }
    }
}

/// Payload supplied by callers of `notify`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub action: Option<ToastAction>,
    pub variant: ToastVariant,
}

impl ToastContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn variant(mut self, variant: ToastVariant) -> Self {
        self.variant = variant;
        self
    }
}

/// Partial update; `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub action: Option<ToastAction>,
    pub variant: Option<ToastVariant>,
    pub open: Option<bool>,
}

impl ToastPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn variant(mut self, variant: ToastVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn open(mut self, open: bool) -> Self {
        self.open = Some(open);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
