//! Configuration loading for daily-todo.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.daily-todo/config.toml` in the working directory)
//! 3. User config (`~/.daily-todo/config.toml`, or under `$DAILY_TODO_HOME`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional except the model API key, which is only
//! checked when a command actually needs the text generator. The config is
//! built once in `main` and handed to commands; nothing below the CLI layer
//! reads the environment.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::SectionHeaders;
use crate::error::{FailOpen, Result, TodoError};
use crate::storage::file::DEFAULT_EXTENSION;

/// Default directory for day files, relative to the working directory.
pub const DEFAULT_BASE_DIR: &str = "daily-todo";

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default HTTP timeout for a generator request.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Minimum valid timeout (a zero timeout would fail every request).
pub const MIN_TIMEOUT_SECONDS: u64 = 1;

/// Main configuration struct for daily-todo.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where day files live.
    pub storage: StorageConfig,
    /// Text generator connection settings.
    pub llm: LlmConfig,
    /// Recognized section header lines.
    pub sections: SectionHeaders,
}

/// Day-file storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for day files. Relative paths resolve against the working
    /// directory; `~/` expands to the home directory.
    pub base_dir: Option<PathBuf>,
    /// File extension for day files.
    pub extension: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl StorageConfig {
    /// Resolve the effective base directory against `cwd`.
    pub fn resolve_base_dir(&self, cwd: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) => {
                let expanded = expand_home(dir);
                if expanded.is_absolute() {
                    expanded
                } else {
                    cwd.join(expanded)
                }
            }
            None => cwd.join(DEFAULT_BASE_DIR),
        }
    }
}

/// Text generator configuration.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    /// API key. Usually supplied through `OPENAI_API_KEY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl LlmConfig {
    /// Check if a timeout value is valid.
    pub fn is_valid_timeout(value: u64) -> bool {
        value >= MIN_TIMEOUT_SECONDS
    }

    /// The API key, or a config error if none is set.
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(TodoError::config("OPENAI_API_KEY is not set")),
        }
    }
}

impl Config {
    /// Load configuration for a working directory.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Project config (`.daily-todo/config.toml` in `cwd`)
    /// 3. User config
    /// 4. Defaults
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();
        config.validate_sections();

        config
    }

    /// Load user config from the daily-todo home directory.
    fn load_user_config() -> Option<Config> {
        let home = todo_home()?;
        Self::load_optional(&home.join("config.toml"))
    }

    /// Load project config from `.daily-todo/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<Config> {
        Self::load_optional(&project_config_path(cwd))
    }

    /// Load a config file that may legitimately be absent.
    ///
    /// A missing file is silent; an unreadable or invalid one is logged and
    /// skipped.
    fn load_optional(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        Self::load_from_file(path)
            .map(Some)
            .fail_open_default(&format!("loading {}", path.display()))
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| TodoError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| TodoError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // DAILY_TODO_DIR
        if let Some(val) = non_empty_var("DAILY_TODO_DIR") {
            self.storage.base_dir = Some(PathBuf::from(val));
        }

        // OPENAI_API_KEY
        if let Some(val) = non_empty_var("OPENAI_API_KEY") {
            self.llm.api_key = Some(val);
        }

        // OPENAI_BASE_URL
        if let Some(val) = non_empty_var("OPENAI_BASE_URL") {
            self.llm.base_url = val;
        }

        // OPENAI_MODEL
        if let Some(val) = non_empty_var("OPENAI_MODEL") {
            self.llm.model = val;
        }

        // DAILY_TODO_TIMEOUT_SECONDS
        if let Some(val) = non_empty_var("DAILY_TODO_TIMEOUT_SECONDS") {
            match val.parse::<u64>() {
                Ok(n) if LlmConfig::is_valid_timeout(n) => self.llm.timeout_seconds = n,
                _ => tracing::warn!(
                    "Invalid DAILY_TODO_TIMEOUT_SECONDS value '{}'. \
                    Expected an integer >= {}. Using '{}'.",
                    val,
                    MIN_TIMEOUT_SECONDS,
                    self.llm.timeout_seconds
                ),
            }
        }
    }

    /// Replace any section header the scanner could never match with its
    /// default.
    fn validate_sections(&mut self) {
        let defaults = SectionHeaders::default();
        let fields = [
            ("task", &mut self.sections.task, defaults.task),
            ("abandoned", &mut self.sections.abandoned, defaults.abandoned),
            ("summary", &mut self.sections.summary, defaults.summary),
        ];
        for (name, value, default) in fields {
            if !SectionHeaders::is_valid_header(value) {
                tracing::warn!(
                    "Invalid sections.{} header '{}'. Headers must start with '## '. Using '{}'.",
                    name,
                    value,
                    default
                );
                *value = default;
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// Field by field: every value in `other` that differs from the default
    /// wins. A layer therefore cannot reset a lower layer's customization
    /// back to the default value.
    fn merge(mut self, other: Config) -> Self {
        let default_storage = StorageConfig::default();
        if other.storage.base_dir.is_some() {
            self.storage.base_dir = other.storage.base_dir;
        }
        if other.storage.extension != default_storage.extension {
            self.storage.extension = other.storage.extension;
        }

        let default_llm = LlmConfig::default();
        if other.llm.api_key.is_some() {
            self.llm.api_key = other.llm.api_key;
        }
        if other.llm.base_url != default_llm.base_url {
            self.llm.base_url = other.llm.base_url;
        }
        if other.llm.model != default_llm.model {
            self.llm.model = other.llm.model;
        }
        if other.llm.timeout_seconds != default_llm.timeout_seconds {
            self.llm.timeout_seconds = other.llm.timeout_seconds;
        }

        let default_sections = SectionHeaders::default();
        if other.sections.task != default_sections.task {
            self.sections.task = other.sections.task;
        }
        if other.sections.abandoned != default_sections.abandoned {
            self.sections.abandoned = other.sections.abandoned;
        }
        if other.sections.summary != default_sections.summary {
            self.sections.summary = other.sections.summary;
        }

        self
    }
}

/// Read an environment variable, treating empty or blank values as unset.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// Get the daily-todo home directory.
///
/// Checks `DAILY_TODO_HOME` first, then falls back to `~/.daily-todo`.
/// An empty `DAILY_TODO_HOME` is ignored.
pub fn todo_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("DAILY_TODO_HOME") {
        if home.is_empty() {
            tracing::warn!("DAILY_TODO_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("DAILY_TODO_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    dirs::home_dir().map(|home| home.join(".daily-todo"))
}

/// Path of the project config file for `cwd`.
pub fn project_config_path(cwd: &Path) -> PathBuf {
    cwd.join(".daily-todo").join("config.toml")
}
