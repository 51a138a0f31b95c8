//!
//! Configuration management for toolbridge.
//!
//! Configuration is layered: built-in defaults, then the system config file,
//! the user config file, an optional explicit file and finally `TOOLBRIDGE_*`
//! environment variables. Files are TOML and live in platform-native
//! directories.
//!
//! - `loader.rs` - configuration loading logic
//! - `paths.rs` - platform-native path resolution
//! - `validation.rs` - configuration validation
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- modules --------------------------------------------------------------------------------- */

pub mod loader;
pub mod paths;
pub mod validation;

/* --- uses ------------------------------------------------------------------------------------ */

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::translator::{CorrelationPolicy, TranslateOptions};

pub use validation::{ValidationIssue, ValidationSeverity};

/* --- types ----------------------------------------------------------------------------------- */

///
/// Main application configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Request translation behaviour
    #[serde(default)]
    pub translator: TranslatorConfig,
    /// Request/translation capture for debugging clients
    #[serde(default)]
    pub capture: CaptureConfig,
}

///
/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// HTTP server port number
    #[serde(default = "default_port")]
    pub port: u16,
    /// Application logging level
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
    /// Largest accepted request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

///
/// Translation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// What to do with tool results whose call id is unknown
    #[serde(default)]
    pub correlation_policy: CorrelationPolicy,
    /// Model used when neither the query nor the body names one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
    /// Add the web search tool to every request unless the query says otherwise
    #[serde(default)]
    pub grounding: bool,
}

///
/// Capture of incoming and translated requests to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Whether captures are written at all
    #[serde(default)]
    pub enabled: bool,
    /// Capture directory; supports `~` and `$VAR` expansion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

///
/// Logging level enumeration.
///
/// Defines available log levels compatible with tracing crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/* --- defaults -------------------------------------------------------------------------------- */

/// Default bind address
fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// Default HTTP port
fn default_port() -> u16 {
    3000
}

/// Default logging level
fn default_log_level() -> LogLevel {
    LogLevel::Info
}

/// Default body limit (10 MiB)
fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

/* --- implementations --------------------------------------------------------------------- */

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Config {
    /// Load configuration from the standard hierarchy:
    /// 1. Environment variables (highest priority)
    /// 2. Explicit config file, when given
    /// 3. User config file (~/.config/toolbridge/config.toml)
    /// 4. System config file (/etc/toolbridge/config.toml)
    /// 5. Built-in defaults (lowest priority)
    ///
    /// # Arguments
    /// * `explicit` - optional extra config file
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(BridgeError)` - A config file or env var could not be read
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut loader =
            loader::ConfigLoader::new().with_defaults().with_system_config()?.with_user_config()?;

        if let Some(path) = explicit {
            loader = loader.with_config_file(path)?;
        }

        loader.with_env_vars()?.build_base()
    }

    /// Validate the current configuration
    ///
    /// # Returns
    /// * `Ok(())` - Configuration is valid
    /// * `Err(BridgeError)` - Configuration validation failed with details
    pub fn validate(&self) -> Result<()> {
        validation::ConfigValidator::new(self).validate()
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Translator options derived from this configuration
    pub fn translate_options(&self) -> TranslateOptions {
        TranslateOptions {
            log_level: self.server.log_level,
            correlation_policy: self.translator.correlation_policy,
            default_model: self.translator.default_model.clone(),
        }
    }

    /// Resolved capture directory, `None` when capture is disabled
    ///
    /// # Returns
    /// * `Ok(Some(dir))` - capture enabled, configured or default directory
    /// * `Ok(None)` - capture disabled
    /// * `Err(BridgeError)` - path expansion failed
    pub fn capture_dir(&self) -> Result<Option<PathBuf>> {
        if !self.capture.enabled {
            return Ok(None);
        }

        match &self.capture.dir {
            Some(dir) => paths::expand_path(dir).map(Some),
            None => paths::default_capture_dir().map(Some),
        }
    }

    /// Get configuration file example as TOML string
    ///
    /// Returns a documented example configuration file that users
    /// can use as a starting point for their own configuration.
    pub fn example_toml() -> &'static str {
        r#"# toolbridge configuration
# This file should be placed at:
#   Linux/Unix: ~/.config/toolbridge/config.toml
#   macOS: ~/Library/Application Support/toolbridge/config.toml
#   Windows: %APPDATA%/toolbridge/config.toml

[server]
# Address to bind (default: 127.0.0.1)
host = "127.0.0.1"

# HTTP server port (default: 3000)
port = 3000

# Logging level: trace, debug, info, warn, error (default: info)
# trace/debug also enable the translator's step-by-step output
log_level = "info"

# Largest accepted request body in bytes (default: 10485760)
max_body_bytes = 10485760

[translator]
# Tool result whose call id was never seen (default: lenient)
# - lenient: forward the result with an empty tool name
# - strict: reject the whole request
correlation_policy = "lenient"

# Model used when neither ?model= nor the request body names one
# default_model = "gemini-2.5-pro"

# Add the web search tool unless ?grounding= overrides it (default: false)
grounding = false

[capture]
# Write every incoming request and its translation to disk (default: false)
enabled = false

# Capture directory (default: platform data dir, e.g. ~/.local/share/toolbridge/captures)
# dir = "~/toolbridge-captures"

# Every key can also be set from the environment, e.g.:
# TOOLBRIDGE_SERVER_PORT=8080
# TOOLBRIDGE_TRANSLATOR_CORRELATION_POLICY=strict
# TOOLBRIDGE_CAPTURE_ENABLED=true
"#
    }
}

impl LogLevel {
    /// Convert to tracing::Level for logging setup
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }

    /// Check if the translator's step-by-step output is enabled
    pub fn is_trace_enabled(self) -> bool {
        matches!(self, LogLevel::Trace | LogLevel::Debug)
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(BridgeError::Config(format!(
                "Invalid log level '{}'. Valid levels are: trace, debug, info, warn, error",
                s
            ))),
        }
    }
}

/* --- tests ----------------------------------------------------------------------------------- */
