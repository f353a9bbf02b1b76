//! The `fonda` binary: argument parsing, config bootstrap and subcommands.

pub mod settings;
pub mod watch;


use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use crate::cli::settings::{SetContext, SettingError, SettingRegistry};
use crate::cli::watch::run_watch;
use crate::core::config::{data::path_display, Config, ConfigError};
use crate::core::constants::DEFAULT_LOG_FILTER;
use crate::utils::logging::init_tracing;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ")"
);

#[derive(Parser)]
#[command(name = "fonda")]
#[command(version = VERSION)]
#[command(about = "Transient notification (toast) store with an interactive console")]
#[command(
    long_about = "Fonda keeps a short, capped list of toasts. Dismissed toasts stay listed \
as closing until their removal timer fires, then disappear.\n\n\
Configuration:\n\
  fonda set                         Show the current configuration\n\
  fonda set toast-limit 3           Keep up to three toasts visible\n\
  fonda set toast-remove-delay-ms 5000\n\
  fonda set log-filter debug\n\n\
Environment Variables:\n\
  RUST_LOG          Overrides the configured log filter"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Append diagnostic logs to the specified file instead of stderr
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Use this config file instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the interactive toast console (default)
    Watch {
        /// Maximum number of toasts kept at once
        #[arg(long)]
        limit: Option<usize>,
        /// Milliseconds a dismissed toast stays listed before removal
        #[arg(long, value_name = "MS")]
        remove_delay_ms: Option<u64>,
        /// Print each state as one JSON line
        #[arg(long)]
        json: bool,
    },
    /// Set configuration values, or show them when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Watch {
            limit: None,
            remove_delay_ms: None,
            json: false,
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => Config::get_config_path()?,
    };
    // Only `watch` and `set` without a key need the parsed config. Edits go
    // through `Config::mutate_at`, which can repair a file this load rejects.
    let loaded = Config::load_from_path(&config_path);
    init_tracing(&startup_log_filter(&loaded), args.log.as_deref())?;
    match &loaded {
        Ok(_) => debug!(config = %path_display(&config_path), "configuration loaded"),
        Err(err) => warn!(error = %err, "configuration unusable; logging with defaults"),
    }

    match args.command.unwrap_or_default() {
        Commands::Watch {
            limit,
            remove_delay_ms,
            json,
        } => {
            let mut settings = loaded?.toast_settings();
            if let Some(limit) = limit {
                settings = settings.with_limit(limit);
            }
            if let Some(ms) = remove_delay_ms {
                settings = settings.with_remove_delay(Duration::from_millis(ms));
            }
            run_watch(settings, json).await
        }
        Commands::Set { key, value } => {
            let Some(key) = key else {
                loaded?.print_all();
                return Ok(());
            };
            exit_on_setting_error(apply_set(&config_path, &key, &value))
        }
        Commands::Unset { key } => exit_on_setting_error(apply_unset(&config_path, &key)),
    }
}

/// Log filter for startup; an unusable config falls back to the default.
fn startup_log_filter(loaded: &Result<Config, ConfigError>) -> String {
    match loaded {
        Ok(config) => config.effective_log_filter().to_string(),
        Err(_) => DEFAULT_LOG_FILTER.to_string(),
    }
}

fn apply_set(config_path: &Path, key: &str, value: &[String]) -> Result<String, SettingError> {
    SettingRegistry::new()
        .resolve(key)?
        .set(value, &SetContext { config_path })
}

fn apply_unset(config_path: &Path, key: &str) -> Result<String, SettingError> {
    SettingRegistry::new()
        .resolve(key)?
        .unset(&SetContext { config_path })
}

fn exit_on_setting_error(result: Result<String, SettingError>) -> Result<(), Box<dyn Error>> {
    match result {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(err) => {
            err.print();
            std::process::exit(err.exit_code());
        }
    }
}
