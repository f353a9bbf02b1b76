//! Shared constants used across the application

/// Toasts shown at once. The newest ones survive when the cap is hit.
pub const DEFAULT_TOAST_LIMIT: usize = 1;

/// Backstop delay between dismissing a toast and evicting it, in milliseconds.
/// Deliberately long: eviction is normally driven by the presentation layer.
pub const DEFAULT_TOAST_REMOVE_DELAY_MS: u64 = 1_000_000;

/// `EnvFilter` directive used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "warn";
