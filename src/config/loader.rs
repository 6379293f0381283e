// src/config/loader.rs
//! Layered configuration loader
//!
//! Defaults are merged with every existing configuration file in order (later files win),
//! then with `EMG_DATASET__SECTION__KEY` environment overrides.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{constants::paths, SystemConfig};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML syntax error, or a value of the wrong type
    #[error("Configuration parse error: {0}")]
    Parse(String),

    /// Configuration could not be rendered as TOML
    #[error("Configuration serialization error: {0}")]
    Serialize(String),

    /// Well-formed configuration with inconsistent values
    #[error("Configuration validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err.to_string())
    }
}

/// Configuration loader over a list of candidate files
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    use_environment: bool,
}

impl ConfigLoader {
    /// Loader over the default file locations, with environment overrides
    pub fn new() -> Self {
        Self {
            config_paths: Self::discover_config_paths(),
            use_environment: true,
        }
    }

    /// Loader over explicit files only; environment overrides disabled
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            use_environment: false,
        }
    }

    /// Loader over one explicitly requested file, which must exist
    ///
    /// Discovered files are optional and skipped when absent; a file named by the user
    /// is not.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("configuration file {} not found", path.display()),
            )));
        }
        Ok(Self::with_paths(vec![path.to_path_buf()]))
    }

    /// Enable or disable `EMG_DATASET__` overrides
    pub fn with_environment(mut self, enabled: bool) -> Self {
        self.use_environment = enabled;
        self
    }

    /// Candidate files, lowest precedence first
    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Load, merge and validate the configuration
    pub fn load_system_config(&self) -> Result<SystemConfig, ConfigError> {
        let overrides: Vec<(String, String)> = if self.use_environment {
            std::env::vars().collect()
        } else {
            Vec::new()
        };
        self.load_with_overrides(overrides)
    }

    /// Same as [`ConfigLoader::load_system_config`] with explicit `(name, value)` overrides
    pub fn load_with_overrides<I>(&self, overrides: I) -> Result<SystemConfig, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut merged = toml::Value::try_from(SystemConfig::default())?;

        for config_path in &self.config_paths {
            if !config_path.exists() {
                continue;
            }
            let file_config = load_config_file(config_path)?;
            debug!(path = %config_path.display(), "merging configuration file");
            merge_toml_values(&mut merged, file_config);
        }

        apply_overrides(&mut merged, overrides);

        let config: SystemConfig = merged.try_into()?;
        config
            .validate_consistency()
            .map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Validate a single file on top of the defaults without loading it
    pub fn validate_config_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let mut merged = toml::Value::try_from(SystemConfig::default())?;
        merge_toml_values(&mut merged, load_config_file(path)?);

        let config: SystemConfig = merged.try_into()?;
        config
            .validate_consistency()
            .map_err(ConfigError::Validation)
    }

    /// Write a configuration as pretty TOML
    pub fn export_config<P: AsRef<Path>>(
        config: &SystemConfig,
        path: P,
    ) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn discover_config_paths() -> Vec<PathBuf> {
        // In order of precedence
        vec![
            PathBuf::from(paths::CONFIG_DIR_FILE),
            PathBuf::from(paths::DEFAULT_CONFIG_FILE),
            PathBuf::from(paths::LOCAL_CONFIG_FILE),
        ]
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn load_config_file<P: AsRef<Path>>(path: P) -> Result<toml::Value, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

fn apply_overrides<I>(config: &mut toml::Value, overrides: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in overrides {
        let Some(path) = key.strip_prefix(paths::ENV_PREFIX) else {
            continue;
        };
        let parts: Vec<String> = path
            .split(paths::ENV_SEPARATOR)
            .map(|part| part.to_lowercase())
            .collect();
        if parts.iter().any(|part| part.is_empty()) {
            warn!(variable = %key, "ignoring malformed configuration override");
            continue;
        }
        let parsed = coerce_env_value(&value, get_nested_value(config, &parts));
        set_nested_value(config, &parts, parsed);
    }
}

/// Parse an override as the type of the value it replaces, guessing for new keys
fn coerce_env_value(value: &str, existing: Option<&toml::Value>) -> toml::Value {
    match existing {
        Some(toml::Value::String(_)) => toml::Value::String(value.to_string()),
        Some(toml::Value::Float(_)) => value
            .parse::<f64>()
            .map(toml::Value::Float)
            .unwrap_or_else(|_| toml::Value::String(value.to_string())),
        Some(toml::Value::Integer(_)) => value
            .parse::<i64>()
            .map(toml::Value::Integer)
            .unwrap_or_else(|_| toml::Value::String(value.to_string())),
        Some(toml::Value::Boolean(_)) => value
            .parse::<bool>()
            .map(toml::Value::Boolean)
            .unwrap_or_else(|_| toml::Value::String(value.to_string())),
        _ => parse_env_value(value),
    }
}

fn parse_env_value(value: &str) -> toml::Value {
    if let Ok(int_val) = value.parse::<i64>() {
        toml::Value::Integer(int_val)
    } else if let Ok(float_val) = value.parse::<f64>() {
        toml::Value::Float(float_val)
    } else if let Ok(bool_val) = value.parse::<bool>() {
        toml::Value::Boolean(bool_val)
    } else {
        toml::Value::String(value.to_string())
    }
}

fn get_nested_value<'a>(config: &'a toml::Value, parts: &[String]) -> Option<&'a toml::Value> {
    parts
        .iter()
        .try_fold(config, |current, part| current.as_table()?.get(part))
}

fn set_nested_value(config: &mut toml::Value, parts: &[String], value: toml::Value) {
    let Some((last, parents)) = parts.split_last() else {
        return;
    };

    let mut current = config;
    for part in parents {
        current = match current {
            toml::Value::Table(table) => table
                .entry(part.clone())
                .or_insert_with(|| toml::Value::Table(toml::value::Table::new())),
            _ => return,
        };
    }

    if let toml::Value::Table(table) = current {
        table.insert(last.clone(), value);
    }
}
