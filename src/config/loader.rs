//!
//! Configuration loading system for toolbridge.
//!
//! Layers, lowest priority first:
//! 1. Built-in defaults
//! 2. System config file (/etc/toolbridge/config.toml)
//! 3. User config file (~/.config/toolbridge/config.toml)
//! 4. Explicit config file (`--config`)
//! 5. Environment variables (`TOOLBRIDGE_*`)
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use crate::config::paths;
use crate::config::{CaptureConfig, Config, LogLevel, ServerConfig, TranslatorConfig};
use crate::error::{BridgeError, Result};
use crate::translator::CorrelationPolicy;

use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use std::str::FromStr;

/* --- constants ------------------------------------------------------------------------------- */

/// Prefix of all recognised environment variables
const ENV_PREFIX: &str = "TOOLBRIDGE_";

/* --- types ----------------------------------------------------------------------------------- */

///
/// Configuration loader implementing the Builder pattern.
///
/// Each method returns self for chaining; sources applied later win.
pub struct ConfigLoader {
    /// Current configuration being built
    config: Config,
    /// Environment variable overrides collected, applied in key order
    env_overrides: BTreeMap<String, String>,
    /// Whether defaults have been applied
    defaults_applied: bool,
}

/* --- implementations --------------------------------------------------------------------- */

impl ConfigLoader {
    /// Create a new configuration loader
    ///
    /// # Examples
    /// ```rust,no_run
    /// use toolbridge::config::loader::ConfigLoader;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ConfigLoader::new()
    ///     .with_defaults()
    ///     .with_user_config()?
    ///     .with_env_vars()?
    ///     .build_base()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new() -> Self {
        Self { config: Config::default(), env_overrides: BTreeMap::new(), defaults_applied: false }
    }

    /// Apply built-in default values
    ///
    /// # Returns
    /// * Self for method chaining
    pub fn with_defaults(mut self) -> Self {
        self.config = Config::default();
        self.defaults_applied = true;
        self
    }

    /// Load the system-wide configuration file, if present
    ///
    /// # Returns
    /// * `Ok(Self)` - System config loaded or skipped (file not found)
    /// * `Err(BridgeError)` - System config exists but failed to load
    pub fn with_system_config(mut self) -> Result<Self> {
        let system_config_path = paths::system_config_file()?;

        if system_config_path.exists() {
            tracing::debug!("Loading system config from: {}", system_config_path.display());
            self.load_config_file(&system_config_path)?;
        } else {
            tracing::debug!("System config not found at: {}", system_config_path.display());
        }

        Ok(self)
    }

    /// Load the user configuration file, if present
    ///
    /// # Returns
    /// * `Ok(Self)` - User config loaded or skipped (file not found)
    /// * `Err(BridgeError)` - User config exists but failed to load
    pub fn with_user_config(mut self) -> Result<Self> {
        let user_config_path = paths::user_config_file()?;

        if user_config_path.exists() {
            tracing::debug!("Loading user config from: {}", user_config_path.display());
            self.load_config_file(&user_config_path)?;
        } else {
            tracing::debug!("User config not found at: {}", user_config_path.display());
        }

        Ok(self)
    }

    /// Load configuration from a specific file path
    ///
    /// # Arguments
    /// * `path` - Path to configuration file to load; must exist
    ///
    /// # Returns
    /// * `Ok(Self)` - Config loaded successfully
    /// * `Err(BridgeError)` - Failed to load or parse config file
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = paths::expand_path(path)?;
        tracing::debug!("Loading custom config from: {}", path.display());
        self.load_config_file(&path)?;
        Ok(self)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - TOOLBRIDGE_SERVER_HOST, TOOLBRIDGE_SERVER_PORT
    /// - TOOLBRIDGE_SERVER_LOG_LEVEL, TOOLBRIDGE_SERVER_MAX_BODY_BYTES
    /// - TOOLBRIDGE_TRANSLATOR_CORRELATION_POLICY
    /// - TOOLBRIDGE_TRANSLATOR_DEFAULT_MODEL, TOOLBRIDGE_TRANSLATOR_GROUNDING
    /// - TOOLBRIDGE_CAPTURE_ENABLED, TOOLBRIDGE_CAPTURE_DIR
    ///
    /// # Returns
    /// * `Ok(Self)` - Environment variables applied
    /// * `Err(BridgeError)` - Invalid environment variable values
    pub fn with_env_vars(mut self) -> Result<Self> {
        tracing::debug!("Loading configuration from environment variables");

        self.env_overrides.extend(env::vars().filter(|(key, _)| key.starts_with(ENV_PREFIX)));
        self.apply_env_overrides()?;

        Ok(self)
    }

    /// Build the final configuration, failing on validation errors
    ///
    /// # Returns
    /// * `Ok(Config)` - Valid, fully-loaded configuration
    /// * `Err(BridgeError)` - Configuration validation failed
    pub fn build(self) -> Result<Config> {
        let config = self.build_base()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the configuration without validating it
    ///
    /// # Returns
    /// * `Ok(Config)` - Loaded configuration
    /// * `Err(BridgeError)` - `with_defaults()` was never called
    pub fn build_base(self) -> Result<Config> {
        if !self.defaults_applied {
            return Err(BridgeError::Config(
                "Configuration loader must call with_defaults() before build()".to_string(),
            ));
        }

        tracing::debug!(
            "Config: server={}:{}, server.log_level={:?}, translator.correlation_policy={:?}, capture.enabled={}",
            self.config.server.host,
            self.config.server.port,
            self.config.server.log_level,
            self.config.translator.correlation_policy,
            self.config.capture.enabled
        );

        Ok(self.config)
    }

    /* --- private methods ----------------------------------------------------------------- */

    /// Load and merge configuration from a TOML file
    fn load_config_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();

        paths::validate_config_file(path)?;

        let contents = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::Config(format!(
                "Failed to read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let file_config: Config = toml::from_str(&contents).map_err(|e| {
            BridgeError::Config(format!(
                "Failed to parse TOML configuration file '{}': {}\n\
                 \n\
                 Run 'toolbridge config example' to see every supported key.",
                path.display(),
                e
            ))
        })?;

        self.merge_config(file_config);

        tracing::debug!("Successfully loaded config from: {}", path.display());
        Ok(())
    }

    /// Merge another config into the current config; only non-default values override
    fn merge_config(&mut self, other: Config) {
        self.merge_server_config(other.server);
        self.merge_translator_config(other.translator);
        self.merge_capture_config(other.capture);
    }

    fn merge_server_config(&mut self, other: ServerConfig) {
        let defaults = ServerConfig::default();

        if other.host != defaults.host {
            self.config.server.host = other.host;
        }
        if other.port != defaults.port {
            self.config.server.port = other.port;
        }
        if other.log_level != defaults.log_level {
            self.config.server.log_level = other.log_level;
        }
        if other.max_body_bytes != defaults.max_body_bytes {
            self.config.server.max_body_bytes = other.max_body_bytes;
        }
    }

    fn merge_translator_config(&mut self, other: TranslatorConfig) {
        let defaults = TranslatorConfig::default();

        if other.correlation_policy != defaults.correlation_policy {
            self.config.translator.correlation_policy = other.correlation_policy;
        }
        if other.default_model.is_some() {
            self.config.translator.default_model = other.default_model;
        }
        if other.grounding {
            self.config.translator.grounding = true;
        }
    }

    fn merge_capture_config(&mut self, other: CaptureConfig) {
        if other.enabled {
            self.config.capture.enabled = true;
        }
        if other.dir.is_some() {
            self.config.capture.dir = other.dir;
        }
    }

    /// Apply environment variable overrides to current configuration
    fn apply_env_overrides(&mut self) -> Result<()> {
        for (key, value) in &self.env_overrides {
            match key.as_str() {
                "TOOLBRIDGE_SERVER_HOST" => {
                    self.config.server.host = value.clone();
                }
                "TOOLBRIDGE_SERVER_PORT" => {
                    self.config.server.port = parse_env(value, key)?;
                }
                "TOOLBRIDGE_SERVER_LOG_LEVEL" => {
                    self.config.server.log_level = LogLevel::from_str(value)?;
                }
                "TOOLBRIDGE_SERVER_MAX_BODY_BYTES" => {
                    self.config.server.max_body_bytes = parse_env(value, key)?;
                }
                "TOOLBRIDGE_TRANSLATOR_CORRELATION_POLICY" => {
                    self.config.translator.correlation_policy = CorrelationPolicy::from_str(value)?;
                }
                "TOOLBRIDGE_TRANSLATOR_DEFAULT_MODEL" => {
                    self.config.translator.default_model =
                        Some(value.clone()).filter(|model| !model.trim().is_empty());
                }
                "TOOLBRIDGE_TRANSLATOR_GROUNDING" => {
                    self.config.translator.grounding = parse_bool_env(value, key)?;
                }
                "TOOLBRIDGE_CAPTURE_ENABLED" => {
                    self.config.capture.enabled = parse_bool_env(value, key)?;
                }
                "TOOLBRIDGE_CAPTURE_DIR" => {
                    self.config.capture.dir = Some(value.clone());
                }
                _ => {
                    tracing::debug!("Ignoring unknown environment variable: {}", key);
                }
            }
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/* --- utility functions ------------------------------------------------------------------- */

/// Parse a numeric environment variable
fn parse_env<T>(value: &str, var_name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        BridgeError::Config(format!("Invalid {} value '{}': {}", var_name, value, e))
    })
}

/// Parse boolean value from environment variable
fn parse_bool_env(value: &str, var_name: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" | "enabled" => Ok(true),
        "false" | "no" | "0" | "off" | "disabled" => Ok(false),
        _ => Err(BridgeError::Config(format!(
            "Invalid boolean value for {}: '{}'\n\
             Valid values: true/false, yes/no, 1/0, on/off, enabled/disabled",
            var_name, value
        ))),
    }
}

/* --- tests ------------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_config_loader_defaults() {
        let config =
            ConfigLoader::new().with_defaults().build_base().expect("Should build with defaults");

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert!(matches!(config.server.log_level, LogLevel::Info));
        assert_eq!(config.translator.correlation_policy, CorrelationPolicy::Lenient);
        assert!(!config.capture.enabled);
    }

    #[test]
    fn test_build_requires_defaults() {
        assert!(ConfigLoader::new().build_base().is_err());
    }

    #[test]
    fn test_later_file_overrides_earlier() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.toml");
        let second = temp_dir.path().join("second.toml");

        fs::write(&first, "[server]\nport = 8080\n\n[translator]\ndefault_model = \"a\"\n").unwrap();
        fs::write(&second, "[translator]\ncorrelation_policy = \"strict\"\n").unwrap();

        let config = ConfigLoader::new()
            .with_defaults()
            .with_config_file(&first)
            .and_then(|loader| loader.with_config_file(&second))
            .and_then(|loader| loader.build_base())
            .expect("Should load both files");

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.translator.default_model.as_deref(), Some("a"));
        assert_eq!(config.translator.correlation_policy, CorrelationPolicy::Strict);
    }

    #[test]
    fn test_env_var_overrides() {
        temp_env::with_vars(
            [
                ("TOOLBRIDGE_SERVER_PORT", Some("9090")),
                ("TOOLBRIDGE_SERVER_LOG_LEVEL", Some("error")),
                ("TOOLBRIDGE_TRANSLATOR_CORRELATION_POLICY", Some("strict")),
                ("TOOLBRIDGE_CAPTURE_ENABLED", Some("yes")),
            ],
            || {
                let config = ConfigLoader::new()
                    .with_defaults()
                    .with_env_vars()
                    .expect("Should apply env vars")
                    .build_base()
                    .expect("Should build with env vars");

                assert_eq!(config.server.port, 9090);
                assert!(matches!(config.server.log_level, LogLevel::Error));
                assert_eq!(config.translator.correlation_policy, CorrelationPolicy::Strict);
                assert!(config.capture.enabled);
            },
        );
    }

    #[test]
    fn test_invalid_env_value() {
        temp_env::with_var("TOOLBRIDGE_SERVER_PORT", Some("eighty"), || {
            let result = ConfigLoader::new().with_defaults().with_env_vars();
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_invalid_toml_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[server\nport = 8080\n").unwrap();

        let result = ConfigLoader::new()
            .with_defaults()
            .with_config_file(&config_file)
            .and_then(|loader| loader.build_base());

        let error_msg = format!("{}", result.unwrap_err());
        assert!(error_msg.contains("Failed to parse TOML"));
    }

    #[test]
    fn test_boolean_env_parsing() {
        assert!(parse_bool_env("true", "TEST").unwrap());
        assert!(parse_bool_env("ON", "TEST").unwrap());
        assert!(!parse_bool_env("0", "TEST").unwrap());
        assert!(!parse_bool_env("disabled", "TEST").unwrap());
        assert!(parse_bool_env("maybe", "TEST").is_err());
    }
}
