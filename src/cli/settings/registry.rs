use std::collections::BTreeMap;

use super::handlers::{toast_limit_handler, toast_remove_delay_handler, LogFilterHandler};
use super::{SettingError, SettingHandler};

/// Every key `fonda set` understands, ordered by name.
pub struct SettingRegistry {
    handlers: BTreeMap<&'static str, Box<dyn SettingHandler>>,
}

impl SettingRegistry {
    pub fn new() -> Self {
        let handlers: [Box<dyn SettingHandler>; 3] = [
            Box::new(toast_limit_handler()),
            Box::new(toast_remove_delay_handler()),
            Box::new(LogFilterHandler),
        ];
        Self {
            handlers: handlers
                .into_iter()
                .map(|handler| (handler.key(), handler))
                .collect(),
        }
    }

    /// Looks up `key`, accepting the snake_case spelling used in the config
    /// file as well (`toast_limit` for `toast-limit`).
    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        let normalized = key.trim().to_ascii_lowercase().replace('_', "-");
        self.handlers.get(normalized.as_str()).map(|handler| handler.as_ref())
    }

    /// Like [`SettingRegistry::get`], reporting unknown keys as an error.
    pub fn resolve(&self, key: &str) -> Result<&dyn SettingHandler, SettingError> {
        self.get(key).ok_or_else(|| SettingError::UnknownKey {
            key: key.to_string(),
            known: self.keys(),
        })
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_knows_every_key() {
        let registry = SettingRegistry::new();
        assert_eq!(
            registry.keys(),
            vec!["log-filter", "toast-limit", "toast-remove-delay-ms"]
        );
        assert!(registry.get("theme").is_none());
    }

    #[test]
    fn config_file_spelling_is_accepted() {
        let registry = SettingRegistry::new();
        let handler = registry.get("toast_remove_delay_ms").expect("alias");
        assert_eq!(handler.key(), "toast-remove-delay-ms");
        assert_eq!(
            registry.get(" Toast-Limit ").map(|h| h.key()),
            Some("toast-limit")
        );
    }

    #[test]
    fn resolve_lists_known_keys_on_miss() {
        let registry = SettingRegistry::new();
        match registry.resolve("colour") {
            Err(SettingError::UnknownKey { key, known }) => {
                assert_eq!(key, "colour");
                assert_eq!(known.len(), 3);
            }
            _ => panic!("expected unknown key error"),
        }
    }
}
