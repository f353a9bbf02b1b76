//! Diagnostic logging setup.
//!
//! `RUST_LOG` takes precedence over the configured filter so a single run can
//! be made verbose without touching the config file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Builds the filter from `RUST_LOG`, falling back to `configured`.
pub fn build_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new(crate::core::constants::DEFAULT_LOG_FILTER))
}

/// Installs the global `tracing` subscriber.
///
/// Output goes to `log_file` (appending) when given, stderr otherwise.
/// Calling this twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_tracing(
    configured_filter: &str,
    log_file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = build_filter(configured_filter);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    if let Err(err) = result {
        tracing::debug!(error = %err, "tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn configured_filter_applies_without_rust_log() {
        // Only meaningful when RUST_LOG is not set by the test environment.
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let filter = build_filter("debug");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn init_creates_log_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("fonda.log");

        init_tracing("info", Some(&path)).expect("init tracing");
        assert!(path.exists());
    }
}
