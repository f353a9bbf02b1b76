//! Handlers for the individual configuration keys.

use super::{success_set, success_unset, SetContext, SettingError, SettingHandler};
use crate::core::config::data::Config;
use tracing_subscriber::EnvFilter;

/// Whole-number setting stored as an `Option` field on [`Config`].
pub struct NumberHandler {
    key: &'static str,
    example: &'static str,
    minimum: u64,
    maximum: u64,
    apply: fn(&mut Config, Option<u64>),
}

impl NumberHandler {
    fn parse(&self, args: &[String]) -> Result<u64, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "Specify a whole number for this setting:",
                example: self.example,
            });
        };
        let value: u64 = input
            .trim()
            .replace('_', "")
            .parse()
            .map_err(|_| SettingError::InvalidNumber {
                key: self.key,
                input: input.clone(),
            })?;
        if value < self.minimum {
            return Err(SettingError::InvalidValue {
                key: self.key,
                reason: format!("must be at least {}", self.minimum),
            });
        }
        if value > self.maximum {
            return Err(SettingError::InvalidValue {
                key: self.key,
                reason: format!("must be at most {}", self.maximum),
            });
        }
        Ok(value)
    }
}

impl SettingHandler for NumberHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError> {
        let value = self.parse(args)?;
        let apply = self.apply;
        ctx.mutate_config(|config| apply(config, Some(value)))?;
        Ok(success_set(self.key, &value.to_string()))
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        let apply = self.apply;
        ctx.mutate_config(|config| apply(config, None))?;
        Ok(success_unset(self.key))
    }
}

pub fn toast_limit_handler() -> NumberHandler {
    NumberHandler {
        key: "toast-limit",
        example: "fonda set toast-limit 3",
        minimum: 1,
        maximum: u64::try_from(usize::MAX).unwrap_or(u64::MAX),
        // `parse` caps the value at `usize::MAX`, so the conversion holds.
        apply: |config, value| {
            config.toast_limit = value.and_then(|v| usize::try_from(v).ok());
        },
    }
}

pub fn toast_remove_delay_handler() -> NumberHandler {
    NumberHandler {
        key: "toast-remove-delay-ms",
        example: "fonda set toast-remove-delay-ms 5000",
        minimum: 0,
        maximum: u64::MAX,
        apply: |config, value| config.toast_remove_delay_ms = value,
    }
}

/// Handler for the `log-filter` setting.
pub struct LogFilterHandler;

impl SettingHandler for LogFilterHandler {
    fn key(&self) -> &'static str {
        "log-filter"
    }

    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To set a log filter, specify a tracing directive:",
                example: "fonda set log-filter fonda=debug",
            });
        }

        let filter = args.join(",");
        EnvFilter::try_new(&filter).map_err(|err| SettingError::InvalidValue {
            key: "log-filter",
            reason: err.to_string(),
        })?;

        let message = success_set("log-filter", &filter);
        ctx.mutate_config(move |config| config.log_filter = Some(filter))?;
        Ok(message)
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        ctx.mutate_config(|config| config.log_filter = None)?;
        Ok(success_unset("log-filter"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn toast_limit_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        let ctx = SetContext { config_path: &path };
        let handler = toast_limit_handler();

        let message = handler.set(&args(&["3"]), &ctx).expect("set toast-limit");
        assert_eq!(message, "✅ Set toast-limit to: 3");
        assert_eq!(Config::load_from_path(&path).unwrap().toast_limit, Some(3));

        handler.unset(&ctx).expect("unset toast-limit");
        assert_eq!(Config::load_from_path(&path).unwrap().toast_limit, None);
    }

    #[test]
    fn toast_limit_rejects_zero_and_garbage() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        let ctx = SetContext { config_path: &path };
        let handler = toast_limit_handler();

        assert!(matches!(
            handler.set(&args(&["0"]), &ctx),
            Err(SettingError::InvalidValue { .. })
        ));
        assert!(matches!(
            handler.set(&args(&["lots"]), &ctx),
            Err(SettingError::InvalidNumber { .. })
        ));
        assert!(matches!(
            handler.set(&[], &ctx),
            Err(SettingError::MissingArgs { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn values_above_the_maximum_are_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        let ctx = SetContext { config_path: &path };
        let handler = NumberHandler {
            key: "small",
            example: "fonda set small 3",
            minimum: 0,
            maximum: 10,
            apply: |config, value| config.toast_remove_delay_ms = value,
        };

        match handler.set(&args(&["11"]), &ctx) {
            Err(SettingError::InvalidValue { reason, .. }) => {
                assert_eq!(reason, "must be at most 10")
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
        assert!(!path.exists());
        handler.set(&args(&["10"]), &ctx).expect("maximum is inclusive");
    }

    #[test]
    fn toast_limit_is_capped_at_the_platform_word_size() {
        let handler = toast_limit_handler();
        assert_eq!(handler.maximum as u128, usize::MAX as u128);

        let input = handler.maximum.to_string();
        let limit = handler.parse(&args(&[input.as_str()])).expect("max limit");
        let mut config = Config::default();
        (handler.apply)(&mut config, Some(limit));
        assert_eq!(config.toast_limit, Some(usize::MAX));
    }

    #[test]
    fn remove_delay_accepts_underscores() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        let ctx = SetContext { config_path: &path };

        toast_remove_delay_handler()
            .set(&args(&["1_000_000"]), &ctx)
            .expect("set delay");
        assert_eq!(
            Config::load_from_path(&path).unwrap().toast_remove_delay_ms,
            Some(1_000_000)
        );
    }

    #[test]
    fn log_filter_is_validated() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        let ctx = SetContext { config_path: &path };

        LogFilterHandler
            .set(&args(&["fonda=debug"]), &ctx)
            .expect("set log-filter");
        assert_eq!(
            Config::load_from_path(&path).unwrap().log_filter.as_deref(),
            Some("fonda=debug")
        );
    }
}
