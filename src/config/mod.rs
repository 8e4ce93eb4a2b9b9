mod schema;

pub use schema::{Config, ThemeSetting};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_FLASH_DURATION: Duration = Duration::from_secs(3);

/// Get the config directory path (~/.config/thesis-grader/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("thesis-grader"))
}

/// Get the default config file path (~/.config/thesis-grader/config.yaml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path.
///
/// A missing default file yields the defaults. An explicitly given path must exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicit config path does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path.or_else(get_config_path) {
        Some(p) => p,
        None => {
            tracing::debug!("no home directory, using default config");
            return Ok(Config::default());
        }
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    parse_config_file(&config_path)
}

fn parse_config_file(config_path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref duration) = config.flash_duration {
        match humantime::parse_duration(duration) {
            Ok(d) if d.is_zero() => {
                errors.push("flash_duration: must be greater than zero".to_string());
            }
            Ok(_) => {}
            Err(e) => errors.push(format!("flash_duration: invalid '{}' - {}", duration, e)),
        }
    }

    if let Some(ref dir) = config.report_dir {
        if dir.exists() && !dir.is_dir() {
            errors.push(format!("report_dir: '{}' is not a directory", dir.display()));
        }
    }

    if let Some(ref institution) = config.institution {
        if institution.trim().is_empty() {
            errors.push("institution: must not be blank".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl Config {
    /// Status message lifetime; falls back to 3s when unset or invalid
    pub fn flash_duration(&self) -> Duration {
        self.flash_duration
            .as_deref()
            .and_then(|s| humantime::parse_duration(s).ok())
            .filter(|d| !d.is_zero())
            .unwrap_or(DEFAULT_FLASH_DURATION)
    }

    pub fn report_dir(&self) -> PathBuf {
        self.report_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
