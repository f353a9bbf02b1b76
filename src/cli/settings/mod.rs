//! `fonda set` / `fonda unset`.
//!
//! One [`SettingHandler`] per config key, looked up through the
//! [`SettingRegistry`]. Handlers validate their input and persist through
//! [`SetContext::mutate_config`], so every successful call leaves a complete
//! config file behind.

pub mod error;
pub mod handlers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::data::Config;
use std::path::Path;

/// Where handlers read and write the configuration.
pub struct SetContext<'a> {
    pub config_path: &'a Path,
}

impl SetContext<'_> {
    pub fn mutate_config(&self, edit: impl FnOnce(&mut Config)) -> Result<(), SettingError> {
        Ok(Config::mutate_at(self.config_path, edit)?)
    }
}

pub trait SettingHandler: Send + Sync {
    /// Kebab-case key as typed on the command line.
    fn key(&self) -> &'static str;

    /// Validates `args` (the words after the key, possibly none), stores the
    /// value and returns the confirmation to print.
    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError>;

    /// Clears the value so the built-in default applies again.
    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError>;
}

pub fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

pub fn success_unset(key: &str) -> String {
    format!("✅ Unset {key}")
}
