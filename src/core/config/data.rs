use crate::core::constants::{
    DEFAULT_LOG_FILTER, DEFAULT_TOAST_LIMIT, DEFAULT_TOAST_REMOVE_DELAY_MS,
};
use crate::core::toast::ToastSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of toasts shown at once (minimum 1)
    pub toast_limit: Option<usize>,
    /// Backstop delay, in milliseconds, between dismissing a toast and evicting it
    pub toast_remove_delay_ms: Option<u64>,
    /// `tracing` filter directive (e.g., "fonda=debug")
    pub log_filter: Option<String>,
}

impl Config {
    pub fn effective_toast_limit(&self) -> usize {
        self.toast_limit.unwrap_or(DEFAULT_TOAST_LIMIT).max(1)
    }

    pub fn effective_remove_delay(&self) -> Duration {
        Duration::from_millis(
            self.toast_remove_delay_ms
                .unwrap_or(DEFAULT_TOAST_REMOVE_DELAY_MS),
        )
    }

    pub fn effective_log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Store settings derived from this configuration.
    pub fn toast_settings(&self) -> ToastSettings {
        ToastSettings::default()
            .with_limit(self.effective_toast_limit())
            .with_remove_delay(self.effective_remove_delay())
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/fonda/config.toml` → `~/.config/fonda/config.toml`
/// - Windows paths are shown unchanged
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
