//! Configuration for kbmanager
//!
//! Settings are a flat JSON object stored in the user's config directory.
//! Environment variables prefixed with `KBM_` override the file, for example
//! `KBM_REPOSITORY_DIRECTORY=/srv/notes`.

mod setup;

pub use setup::first_time_setup;

use config::{Config, ConfigError, Environment, File, FileFormat};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment prefix for overrides
pub const ENV_PREFIX: &str = "KBM";

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$";
const HTTPS_REMOTE_PATTERN: &str =
    r"(?i)^https://(www\.)?[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+/[a-zA-Z0-9_-]+/[a-zA-Z0-9_-]+\.git$";
const SSH_REMOTE_PATTERN: &str =
    r"(?i)^git@[a-zA-Z0-9.-]+:[a-zA-Z0-9_-]+/[a-zA-Z0-9_-]+\.git$";

/// Keys accepted by [`KbConfig::get`] and [`KbConfig::set`]
pub const KEYS: &[&str] = &[
    "repository_directory",
    "user_name",
    "user_email",
    "remote_address_https",
    "remote_address_ssh",
    "quiet",
    "excluded_directories",
];

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct KbConfig {
    /// Repository whose catalog commands operate on
    pub repository_directory: Option<PathBuf>,

    /// Commit author name
    pub user_name: Option<String>,

    /// Commit author email
    pub user_email: Option<String>,

    pub remote_address_https: Option<String>,

    pub remote_address_ssh: Option<String>,

    /// Suppress informational output by default
    pub quiet: bool,

    /// Directory names skipped by scans in addition to `.git` and `.kbdatabase`
    pub excluded_directories: Vec<String>,
}

impl KbConfig {
    /// Problems that prevent catalog and commit operations
    #[must_use]
    pub fn core_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.repository_directory.is_none() {
            issues.push("repository_directory is not set".to_string());
        }
        if is_blank(self.user_name.as_deref()) {
            issues.push("user_name is not set".to_string());
        }
        match self.user_email.as_deref() {
            None | Some("") => issues.push("user_email is not set".to_string()),
            Some(email) if !is_valid_email(email) => {
                issues.push(format!("user_email '{email}' is not a valid email address"));
            }
            Some(_) => {}
        }
        issues
    }

    /// Problems that prevent cloning the repository
    #[must_use]
    pub fn clone_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.repository_directory.is_none() {
            issues.push("repository_directory is not set".to_string());
        }
        if self.remote().is_none() {
            issues.push("neither remote_address_https nor remote_address_ssh is set".to_string());
        }
        if let Some(url) = self.remote_address_https.as_deref()
            && !is_valid_https_remote(url)
        {
            issues.push(format!("remote_address_https '{url}' is not an HTTPS git remote"));
        }
        if let Some(url) = self.remote_address_ssh.as_deref()
            && !is_valid_ssh_remote(url)
        {
            issues.push(format!("remote_address_ssh '{url}' is not an SSH git remote"));
        }
        issues
    }

    /// Check the settings needed for catalog and commit operations
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` listing every problem found.
    pub fn validate_core(&self) -> Result<(), ConfigError> {
        into_result(self.core_issues())
    }

    /// Check the settings needed to clone the repository
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` listing every problem found.
    pub fn validate_clone(&self) -> Result<(), ConfigError> {
        into_result(self.clone_issues())
    }

    /// Remote to clone from and push to; SSH wins when both are set
    #[must_use]
    pub fn remote(&self) -> Option<&str> {
        self.remote_address_ssh
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.remote_address_https.as_deref().filter(|s| !s.is_empty()))
    }

    /// Read a setting by key as display text
    ///
    /// Returns `None` for unknown keys and `Some("")` for unset values.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Some(match key {
            "repository_directory" => self
                .repository_directory
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "user_name" => text(&self.user_name),
            "user_email" => text(&self.user_email),
            "remote_address_https" => text(&self.remote_address_https),
            "remote_address_ssh" => text(&self.remote_address_ssh),
            "quiet" => self.quiet.to_string(),
            "excluded_directories" => self.excluded_directories.join(","),
            _ => return None,
        })
    }

    /// Update a setting by key; an empty value clears it
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for unknown keys and
    /// `ConfigError::Message` for values that fail validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());

        match key {
            "repository_directory" => {
                self.repository_directory = optional(value).map(PathBuf::from);
            }
            "user_name" => self.user_name = optional(value),
            "user_email" => {
                if !value.is_empty() && !is_valid_email(value) {
                    return Err(invalid(key, value, "is not a valid email address"));
                }
                self.user_email = optional(value);
            }
            "remote_address_https" => {
                if !value.is_empty() && !is_valid_https_remote(value) {
                    return Err(invalid(key, value, "is not an HTTPS git remote"));
                }
                self.remote_address_https = optional(value);
            }
            "remote_address_ssh" => {
                if !value.is_empty() && !is_valid_ssh_remote(value) {
                    return Err(invalid(key, value, "is not an SSH git remote"));
                }
                self.remote_address_ssh = optional(value);
            }
            "quiet" => {
                self.quiet = match value.to_ascii_lowercase().as_str() {
                    "" | "false" | "no" | "0" => false,
                    "true" | "yes" | "1" => true,
                    _ => return Err(invalid(key, value, "is not a boolean")),
                };
            }
            "excluded_directories" => {
                self.excluded_directories = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
            _ => return Err(ConfigError::NotFound(key.to_string())),
        }
        Ok(())
    }
}

/// Source and sink of the settings object
pub trait ConfigProvider {
    /// Load the settings, falling back to defaults when nothing is stored
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if stored settings cannot be read or parsed.
    fn read_config(&self) -> Result<KbConfig, ConfigError>;

    /// Persist the settings
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the settings cannot be written.
    fn write_config(&self, config: &KbConfig) -> Result<(), ConfigError>;
}

/// Settings kept in a JSON file, optionally overridden from the environment
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
    env_prefix: Option<String>,
}

impl JsonConfigStore {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("kbmanager").join("config.json"))
    }

    /// Store at the per-user location with `KBM_` overrides enabled
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn user() -> Result<Self, ConfigError> {
        Ok(Self::at(Self::config_path()?).with_env_prefix(ENV_PREFIX))
    }

    /// Store backed by the file at `path`, without environment overrides
    pub fn at<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            env_prefix: None,
        }
    }

    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl ConfigProvider for JsonConfigStore {
    fn read_config(&self) -> Result<KbConfig, ConfigError> {
        let mut builder = Config::builder();

        if self.exists() {
            builder = builder.add_source(File::from(self.path.as_path()).format(FileFormat::Json));
        } else {
            debug!(path = %self.path.display(), "no config file, using defaults");
        }

        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("excluded_directories"),
            );
        }

        builder.build()?.try_deserialize()
    }

    fn write_config(&self, config: &KbConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let json = serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(&self.path, json)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }
}

#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    matches_pattern(EMAIL_PATTERN, value)
}

#[must_use]
pub fn is_valid_https_remote(value: &str) -> bool {
    matches_pattern(HTTPS_REMOTE_PATTERN, value)
}

#[must_use]
pub fn is_valid_ssh_remote(value: &str) -> bool {
    matches_pattern(SSH_REMOTE_PATTERN, value)
}

fn matches_pattern(pattern: &str, value: &str) -> bool {
    Regex::new(pattern).is_ok_and(|re| re.is_match(value.trim()))
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Message(format!("{key} '{value}' {reason}"))
}

fn into_result(issues: Vec<String>) -> Result<(), ConfigError> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Message(issues.join("; ")))
    }
}
