//! Configuration module for `degree-planner`

use crate::core::audit::AuditConfig;
use crate::core::error::PlannerError;
use crate::core::optimizer::{OptimizerConfig, MAX_CREDITS_PER_SEMESTER, MAX_EXTRA_SEMESTERS};
use crate::logger::Level;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory in path values
const DIR_VARIABLE: &str = "$DEGREE_PLANNER";

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

const fn default_max_credits() -> f32 {
    MAX_CREDITS_PER_SEMESTER
}

const fn default_max_extra_terms() -> usize {
    MAX_EXTRA_SEMESTERS
}

const fn default_estimate_credits() -> f32 {
    AuditConfig::ESTIMATE_CREDITS_PER_TERM
}

/// Engine limits and defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// Credit cap for each generated term
    #[serde(default = "default_max_credits")]
    pub max_credits_per_term: f32,
    /// Bound on optimizer passes
    #[serde(default = "default_max_extra_terms")]
    pub max_extra_terms: usize,
    /// Credits per term assumed by the audit's graduation estimate
    #[serde(default = "default_estimate_credits")]
    pub estimate_credits_per_term: f32,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            max_credits_per_term: default_max_credits(),
            max_extra_terms: default_max_extra_terms(),
            estimate_credits_per_term: default_estimate_credits(),
        }
    }
}

impl PlannerSettings {
    /// Optimizer limits from these settings
    #[must_use]
    pub const fn optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig::new(self.max_credits_per_term, self.max_extra_terms)
    }

    /// Audit settings from these settings
    #[must_use]
    pub const fn audit_config(&self) -> AuditConfig {
        AuditConfig {
            estimate_credits_per_term: self.estimate_credits_per_term,
        }
    }

    /// Reject settings the engine cannot run with
    ///
    /// # Errors
    /// Returns [`PlannerError::Configuration`] when the credit cap or the
    /// estimate rate is not a positive number, or the pass bound is zero.
    pub fn validate(&self) -> Result<(), PlannerError> {
        if !(self.max_credits_per_term.is_finite() && self.max_credits_per_term > 0.0) {
            return Err(PlannerError::Configuration(format!(
                "max_credits_per_term must be positive, got {}",
                self.max_credits_per_term
            )));
        }
        if self.max_extra_terms == 0 {
            return Err(PlannerError::Configuration(
                "max_extra_terms must be at least 1".to_string(),
            ));
        }
        if !(self.estimate_credits_per_term.is_finite() && self.estimate_credits_per_term > 0.0) {
            return Err(PlannerError::Configuration(format!(
                "estimate_credits_per_term must be positive, got {}",
                self.estimate_credits_per_term
            )));
        }
        Ok(())
    }
}

/// Paths configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory searched for dataset files given by name
    #[serde(default)]
    pub data_dir: String,
    /// Directory for report output files
    #[serde(default)]
    pub reports_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Engine settings
    #[serde(default)]
    pub planner: PlannerSettings,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override the per-term credit cap
    pub max_credits: Option<f32>,
    /// Override the dataset directory
    pub data_dir: Option<String>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
}

impl Config {
    /// Keys accepted by [`get`](Config::get), [`set`](Config::set) and
    /// [`unset`](Config::unset), grouped by section
    pub const KEYS: [(&'static str, &'static [&'static str]); 3] = [
        ("logging", &["level", "file", "verbose"]),
        (
            "planner",
            &[
                "max_credits_per_term",
                "max_extra_terms",
                "estimate_credits_per_term",
            ],
        ),
        ("paths", &["data_dir", "reports_dir"]),
    ];

    /// Check values a hand-edited file or `set` could leave unusable
    ///
    /// # Errors
    /// Returns [`PlannerError::Configuration`] for an unknown log level or
    /// invalid planner settings.
    pub fn validate(&self) -> Result<(), PlannerError> {
        let level = &self.logging.level;
        if !level.is_empty() && Level::parse(level).is_none() {
            return Err(PlannerError::Configuration(format!(
                "unknown log level '{level}' (expected error, warn, info or debug)"
            )));
        }
        self.planner.validate()
    }

    /// Get the `$DEGREE_PLANNER` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/degreeplanner`
    /// - macOS: `~/Library/Application Support/degreeplanner`
    /// - Windows: `%APPDATA%\degreeplanner`
    #[must_use]
    pub fn get_planner_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("degreeplanner")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Used when loading so that fields added in newer versions pick up their
    /// defaults. Only empty string fields are filled; numeric planner settings
    /// already receive serde defaults.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }

        if self.paths.data_dir.is_empty() && !defaults.paths.data_dir.is_empty() {
            self.paths.data_dir.clone_from(&defaults.paths.data_dir);
            changed = true;
        }
        if self.paths.reports_dir.is_empty() && !defaults.paths.reports_dir.is_empty() {
            self.paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides last for this run only; the config file is not modified.
    /// Only non-`None` values replace config values.
    ///
    /// # Arguments
    ///
    /// * `overrides` - A `ConfigOverrides` struct with optional override values
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(max_credits) = overrides.max_credits {
            self.planner.max_credits_per_term = max_credits;
        }

        if let Some(data_dir) = &overrides.data_dir {
            self.paths.data_dir.clone_from(data_dir);
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, in
    /// the directory returned by [`get_planner_dir`].
    ///
    /// [`get_planner_dir`]: Self::get_planner_dir
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_planner_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$DEGREE_PLANNER` to the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_planner_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Parses the TOML and expands `$DEGREE_PLANNER` in path values. Missing
    /// fields use their serde defaults.
    ///
    /// # Arguments
    ///
    /// * `toml_str` - A TOML-formatted configuration string
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let config = Config::from_toml(r#"
    /// [logging]
    /// level = "info"
    /// file = "$DEGREE_PLANNER/planner.log"
    /// "#)?;
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.data_dir = Self::expand_variables(&config.paths.data_dir);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// Debug builds use `DefaultCLIConfigDebug.toml`, release builds use
    /// `DefaultCLIConfigRelease.toml`. Falls back to the built-in `Default`
    /// values if the embedded file cannot be parsed.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).unwrap_or_else(|_| Self {
            logging: LoggingConfig {
                level: "warn".to_string(),
                ..LoggingConfig::default()
            },
            ..Self::default()
        })
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: loads it, merges missing fields from defaults and saves it back
    /// - On first run: creates the config directory and saves the defaults
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to file
    ///
    /// Serializes the configuration to TOML and writes it to the platform
    /// config file, creating the directory if needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `max_credits_per_term`,
    /// `max_extra_terms`, `estimate_credits_per_term`, `data_dir`,
    /// `reports_dir`. Dashed spellings
    /// are accepted too.
    ///
    /// # Returns
    /// - `Some(String)`: The configuration value as a string
    /// - `None`: If the key is not recognized
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let p = &self.planner;
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "max_credits_per_term" | "max-credits-per-term" => Some(p.max_credits_per_term.to_string()),
            "max_extra_terms" | "max-extra-terms" => Some(p.max_extra_terms.to_string()),
            "estimate_credits_per_term" | "estimate-credits-per-term" => {
                Some(p.estimate_credits_per_term.to_string())
            }
            "data_dir" | "data-dir" => Some(self.paths.data_dir.clone()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Accepts the same keys as [`get`](Config::get). Numeric keys are parsed
    /// and must be positive. Call [`save()`](Config::save) to persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "max_credits_per_term" | "max-credits-per-term" => {
                self.planner.max_credits_per_term = parse_credits(key, value)?;
            }
            "max_extra_terms" | "max-extra-terms" => {
                self.planner.max_extra_terms = value
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| format!("Invalid term count for '{key}': '{value}'"))?;
            }
            "estimate_credits_per_term" | "estimate-credits-per-term" => {
                self.planner.estimate_credits_per_term = parse_credits(key, value)?;
            }
            "data_dir" | "data-dir" => self.paths.data_dir = value.to_string(),
            "reports_dir" | "reports-dir" => self.paths.reports_dir = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// The default value is taken from `defaults` (typically
    /// [`from_defaults()`](Config::from_defaults)). Call
    /// [`save()`](Config::save) to persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        let d = &defaults.planner;
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "max_credits_per_term" | "max-credits-per-term" => {
                self.planner.max_credits_per_term = d.max_credits_per_term;
            }
            "max_extra_terms" | "max-extra-terms" => {
                self.planner.max_extra_terms = d.max_extra_terms;
            }
            "estimate_credits_per_term" | "estimate-credits-per-term" => {
                self.planner.estimate_credits_per_term = d.estimate_credits_per_term;
            }
            "data_dir" | "data-dir" => self.paths.data_dir.clone_from(&defaults.paths.data_dir),
            "reports_dir" | "reports-dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds if the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

fn parse_credits(key: &str, value: &str) -> Result<f32, String> {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| format!("Invalid credit value for '{key}': '{value}'"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[planner]")?;
        writeln!(f, "  max_credits_per_term = {}", self.planner.max_credits_per_term)?;
        writeln!(f, "  max_extra_terms = {}", self.planner.max_extra_terms)?;
        writeln!(
            f,
            "  estimate_credits_per_term = {}",
            self.planner.estimate_credits_per_term
        )?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  data_dir = \"{}\"", self.paths.data_dir)?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        Ok(())
    }
}
