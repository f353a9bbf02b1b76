use crate::core::config::data::{path_display, Config};
use directories::ProjectDirs;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Failures while locating, reading or writing the config file.
#[derive(Debug)]
pub enum ConfigError {
    /// The platform exposes no per-user configuration directory.
    NoConfigDir,
    /// The file exists but could not be read.
    Unreadable { path: PathBuf, source: io::Error },
    /// The file is not valid TOML for [`Config`].
    Invalid {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// The configuration could not be rendered as TOML.
    Encode(toml::ser::Error),
    /// Creating the directory or replacing the file failed.
    Unwritable { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => f.write_str("No configuration directory on this platform"),
            ConfigError::Unreadable { path, source } => {
                write!(f, "Cannot read {}: {source}", path_display(path))
            }
            ConfigError::Invalid { path, source } => {
                write!(f, "Invalid config in {}: {source}", path_display(path))
            }
            ConfigError::Encode(source) => write!(f, "Cannot encode config: {source}"),
            ConfigError::Unwritable { path, source } => {
                write!(f, "Cannot write {}: {source}", path_display(path))
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::NoConfigDir => None,
            ConfigError::Unreadable { source, .. } | ConfigError::Unwritable { source, .. } => {
                Some(source)
            }
            ConfigError::Invalid { source, .. } => Some(source),
            ConfigError::Encode(source) => Some(source),
        }
    }
}

fn unwritable(path: &Path) -> impl FnOnce(io::Error) -> ConfigError + '_ {
    move |source| ConfigError::Unwritable {
        path: path.to_path_buf(),
        source,
    }
}

impl Config {
    /// Loads `config_path`; a missing file yields the defaults.
    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        let contents = match fs::read_to_string(config_path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path_display(config_path), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Unreadable {
                    path: config_path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&contents).map_err(|source| ConfigError::Invalid {
            path: config_path.to_path_buf(),
            source,
        })
    }

    /// Writes `config_path` by persisting a synced temporary file next to it,
    /// so readers never observe a half-written config.
    pub fn save_to_path(&self, config_path: &Path) -> Result<(), ConfigError> {
        let encoded = toml::to_string_pretty(self).map_err(ConfigError::Encode)?;
        let dir = match config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(unwritable(config_path))?;

        let mut staged = NamedTempFile::new_in(dir).map_err(unwritable(config_path))?;
        staged
            .write_all(encoded.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(unwritable(config_path))?;
        staged
            .persist(config_path)
            .map_err(|err| unwritable(config_path)(err.error))?;

        debug!(path = %path_display(config_path), "config saved");
        Ok(())
    }

    /// Like [`Config::load_from_path`], but a file that is valid TOML with
    /// some unusable entries loads with those entries dropped. Syntax errors
    /// are still reported.
    fn load_for_edit(config_path: &Path) -> Result<Config, ConfigError> {
        let err = match Self::load_from_path(config_path) {
            Ok(config) => return Ok(config),
            Err(err @ ConfigError::Invalid { .. }) => err,
            Err(err) => return Err(err),
        };
        let Some(table) = fs::read_to_string(config_path)
            .ok()
            .and_then(|contents| contents.parse::<toml::Table>().ok())
        else {
            return Err(err);
        };

        let usable: toml::Table = table
            .into_iter()
            .filter(|(key, value)| {
                let single: toml::Table = [(key.clone(), value.clone())].into_iter().collect();
                let usable = toml::Value::Table(single).try_into::<Config>().is_ok();
                if !usable {
                    warn!(key = %key, path = %path_display(config_path), "dropping invalid config entry");
                }
                usable
            })
            .collect();
        toml::Value::Table(usable).try_into::<Config>().map_err(|_| err)
    }

    /// Loads `config_path`, applies `edit`, and saves the result. Entries
    /// with unusable values are discarded on the way, so an edit can repair
    /// a file that [`Config::load_from_path`] rejects.
    pub fn mutate_at<T>(
        config_path: &Path,
        edit: impl FnOnce(&mut Config) -> T,
    ) -> Result<T, ConfigError> {
        let mut config = Self::load_for_edit(config_path)?;
        let result = edit(&mut config);
        config.save_to_path(config_path)?;
        Ok(result)
    }

    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("org", "fonda", "fonda").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}
