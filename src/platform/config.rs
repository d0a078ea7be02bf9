// CollectLog - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for CollectLog configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/collectlog/ or %APPDATA%\CollectLog\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[collect]` section.
    pub collect: CollectSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[collect]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CollectSection {
    /// Directory specifier used when `--directory` is absent.
    pub directory: Option<String>,
    /// Time window used when `--timeWindow` is absent.
    pub time_window: Option<String>,
    /// Pattern set for a shallow search.
    pub shallow_patterns: Option<String>,
    /// Pattern set for a deep search.
    pub deep_patterns: Option<String>,
    /// Suffix of bypass copies.
    pub bypass_suffix: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub directory: String,
    pub time_window: String,
    pub shallow_patterns: String,
    pub deep_patterns: String,
    pub bypass_suffix: String,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            directory: constants::DEFAULT_DIRECTORY.to_string(),
            time_window: constants::DEFAULT_TIME_WINDOW.to_string(),
            shallow_patterns: constants::SHALLOW_PATTERNS.to_string(),
            deep_patterns: constants::DEEP_PATTERNS.to_string(),
            bypass_suffix: constants::BYPASS_COPY_SUFFIX.to_string(),
            log_level: None,
        }
    }
}

/// Load and validate config.toml.
///
/// Returns the validated config and a list of non-fatal warnings. Warnings
/// are returned rather than logged because this runs before logging is
/// initialised.
///
/// With `explicit` false (the platform default location), a missing file
/// yields defaults silently and an unreadable or unparseable file yields
/// defaults plus a warning. With `explicit` true (`--config`), any failure
/// to read or parse the file is an error.
pub fn load_config(path: &Path, explicit: bool) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let mut warnings: Vec<String> = Vec::new();

    if !explicit && !path.exists() {
        return Ok((AppConfig::default(), warnings));
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(source) if explicit => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
        Err(e) => {
            warnings.push(format!(
                "Could not read config file '{}': {e}. Using defaults.",
                path.display()
            ));
            return Ok((AppConfig::default(), warnings));
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(source) if explicit => {
            return Err(ConfigError::TomlParse {
                path: path.to_path_buf(),
                source,
            })
        }
        Err(e) => {
            warnings.push(format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                path.display()
            ));
            return Ok((AppConfig::default(), warnings));
        }
    };

    Ok(validate(raw, warnings))
}

/// Validate each field, accumulating all problems as warnings.
fn validate(raw: RawConfig, mut warnings: Vec<String>) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();

    let mut non_empty = |field: &str, value: Option<String>, target: &mut String| {
        if let Some(value) = value {
            if value.trim().is_empty() {
                warnings.push(format!(
                    "[collect] {field} is empty. Using default ({target})."
                ));
            } else {
                *target = value;
            }
        }
    };

    non_empty("directory", raw.collect.directory, &mut config.directory);
    non_empty("time_window", raw.collect.time_window, &mut config.time_window);
    non_empty(
        "shallow_patterns",
        raw.collect.shallow_patterns,
        &mut config.shallow_patterns,
    );
    non_empty("deep_patterns", raw.collect.deep_patterns, &mut config.deep_patterns);

    // -- Collect: bypass_suffix --
    if let Some(suffix) = raw.collect.bypass_suffix {
        if suffix.is_empty() || suffix.contains(['/', '\\']) {
            warnings.push(format!(
                "[collect] bypass_suffix = \"{suffix}\" must be non-empty and contain no path \
                 separators. Using default ({}).",
                constants::BYPASS_COPY_SUFFIX
            ));
        } else {
            config.bypass_suffix = suffix;
        }
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level);
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL
            ));
        }
    }

    (config, warnings)
}
