use crate::core::config::ConfigError;
use std::fmt;

/// Why a `fonda set` / `fonda unset` invocation failed.
#[derive(Debug)]
pub enum SettingError {
    UnknownKey {
        key: String,
        known: Vec<&'static str>,
    },
    InvalidNumber {
        key: &'static str,
        input: String,
    },
    InvalidValue {
        key: &'static str,
        reason: String,
    },
    /// No value given; `example` shows a complete invocation.
    MissingArgs {
        hint: &'static str,
        example: &'static str,
    },
    Persist(ConfigError),
}

impl SettingError {
    /// Extra guidance printed after the message, if any.
    fn advice(&self) -> Option<String> {
        match self {
            SettingError::UnknownKey { known, .. } => {
                Some(format!("Available keys: {}", known.join(", ")))
            }
            SettingError::InvalidNumber { .. } => Some("Expected a whole number.".to_string()),
            SettingError::MissingArgs { example, .. } => Some(format!("Example: {example}")),
            SettingError::InvalidValue { .. } | SettingError::Persist(_) => None,
        }
    }

    /// Writes the message and any advice to stderr.
    pub fn print(&self) {
        let marker = if self.is_usage() { "⚠️ " } else { "❌" };
        eprintln!("{marker} {self}");
        if let Some(advice) = self.advice() {
            eprintln!("   {advice}");
        }
    }

    fn is_usage(&self) -> bool {
        matches!(self, SettingError::MissingArgs { .. })
    }

    /// Process exit status: 2 for incomplete invocations, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_usage() {
            2
        } else {
            1
        }
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey { key, .. } => write!(f, "Unknown config key: {key}"),
            SettingError::InvalidNumber { key, input } => {
                write!(f, "Invalid value for {key}: {input}")
            }
            SettingError::InvalidValue { key, reason } => {
                write!(f, "Invalid value for {key}: {reason}")
            }
            SettingError::MissingArgs { hint, .. } => f.write_str(hint),
            SettingError::Persist(err) => write!(f, "Configuration not updated: {err}"),
        }
    }
}

impl std::error::Error for SettingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingError::Persist(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SettingError {
    fn from(err: ConfigError) -> Self {
        SettingError::Persist(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_exit_with_two() {
        let missing = SettingError::MissingArgs {
            hint: "Specify a value:",
            example: "fonda set toast-limit 3",
        };
        assert_eq!(missing.exit_code(), 2);
        assert_eq!(missing.advice().as_deref(), Some("Example: fonda set toast-limit 3"));

        let unknown = SettingError::UnknownKey {
            key: "colour".to_string(),
            known: vec!["log-filter", "toast-limit"],
        };
        assert_eq!(unknown.exit_code(), 1);
        assert_eq!(unknown.to_string(), "Unknown config key: colour");
        assert_eq!(
            unknown.advice().as_deref(),
            Some("Available keys: log-filter, toast-limit")
        );
    }
}
