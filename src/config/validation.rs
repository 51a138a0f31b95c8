//!
//! Configuration validation for toolbridge.
//!
//! Checks network settings, translator settings and the capture directory.
//! All issues are collected before reporting; only errors fail validation.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use crate::config::paths;
use crate::config::{Config, LogLevel};
use crate::error::{BridgeError, Result};
use crate::translator::CorrelationPolicy;

/* --- constants ------------------------------------------------------------------------------- */

/// Body limits below this are too small for realistic conversations
const MIN_REASONABLE_BODY_BYTES: usize = 64 * 1024;

/* --- types ----------------------------------------------------------------------------------- */

///
/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Configuration field name
    pub field: String,
    /// Severity of the issue
    pub severity: ValidationSeverity,
    /// Description of the issue
    pub message: String,
    /// Optional suggestion for fixing the issue
    pub suggestion: Option<String>,
}

///
/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    /// Error - configuration is invalid and will cause failures
    Error,
    /// Warning - configuration may work but has potential issues
    Warning,
}

///
/// Configuration validator collecting every issue before reporting.
pub struct ConfigValidator<'a> {
    /// Configuration to validate
    config: &'a Config,
    /// Issues collected during validation
    issues: Vec<ValidationIssue>,
}

/* --- implementations --------------------------------------------------------------------- */

impl<'a> ConfigValidator<'a> {
    /// Create a new configuration validator
    ///
    /// # Arguments
    /// * `config` - Configuration to validate
    pub fn new(config: &'a Config) -> Self {
        Self { config, issues: Vec::new() }
    }

    /// Run all checks and return the findings
    ///
    /// # Returns
    /// * All errors and warnings, in check order
    pub fn issues(mut self) -> Vec<ValidationIssue> {
        self.validate_server_config();
        self.validate_translator_config();
        self.validate_capture_config();
        self.validate_security_requirements();
        self.issues
    }

    /// Run all checks, logging warnings and failing on errors
    ///
    /// # Returns
    /// * `Ok(())` - Configuration is valid
    /// * `Err(BridgeError)` - Configuration validation failed with detailed errors
    pub fn validate(self) -> Result<()> {
        let issues = self.issues();
        let (errors, warnings): (Vec<_>, Vec<_>) =
            issues.iter().partition(|issue| issue.severity == ValidationSeverity::Error);

        for warning in &warnings {
            tracing::warn!("Configuration warning: {}: {}", warning.field, warning.message);
        }

        if !errors.is_empty() {
            let error_msg = format!(
                "Configuration validation failed with {} error(s):\n\n{}\n\
                 \n\
                 Please fix these issues and try again.\n\
                 Run 'toolbridge config example' to see a documented configuration.",
                errors.len(),
                errors
                    .iter()
                    .enumerate()
                    .map(|(i, e)| format!("{}. {}: {}", i + 1, e.field, e.message))
                    .collect::<Vec<_>>()
                    .join("\n")
            );
            return Err(BridgeError::Config(error_msg));
        }

        tracing::debug!("Configuration validation passed with {} warning(s)", warnings.len());
        Ok(())
    }

    /* --- private validation methods ------------------------------------------------------ */

    /// Validate server configuration
    fn validate_server_config(&mut self) {
        let server = &self.config.server;
        let port = server.port;

        if server.host.trim().is_empty() {
            self.add_error("server.host", "Bind address cannot be empty", Some("host = \"127.0.0.1\""));
        }

        if port == 0 {
            self.add_error(
                "server.port",
                format!("Invalid server port {}: must be between 1 and 65535", port),
                None,
            );
        } else if port < 1024 {
            self.add_warning(
                "server.port",
                format!("Server port {} requires root/administrator privileges", port),
                Some("Use a port above 1024, e.g. 3000"),
            );
        }

        match port {
            80 | 443 => self.add_warning(
                "server.port",
                format!("Port {} is commonly used by web servers and may conflict", port),
                None,
            ),
            22 => self.add_warning("server.port", "Port 22 is used by SSH and may conflict", None),
            _ => {}
        }

        if server.max_body_bytes == 0 {
            self.add_error("server.max_body_bytes", "Body limit cannot be zero", None);
        } else if server.max_body_bytes < MIN_REASONABLE_BODY_BYTES {
            self.add_warning(
                "server.max_body_bytes",
                format!(
                    "Small body limit ({} bytes) will reject long conversations",
                    server.max_body_bytes
                ),
                None,
            );
        }
    }

    /// Validate translator configuration
    fn validate_translator_config(&mut self) {
        let translator = &self.config.translator;

        if let Some(model) = &translator.default_model {
            if model.trim().is_empty() {
                self.add_error(
                    "translator.default_model",
                    "Default model is set but empty",
                    Some("Remove the key or name a model"),
                );
            }
        }

        if translator.correlation_policy == CorrelationPolicy::Strict {
            self.add_warning(
                "translator.correlation_policy",
                "Strict policy rejects any request whose tool result has no matching call",
                None,
            );
        }
    }

    /// Validate capture configuration
    fn validate_capture_config(&mut self) {
        let dir = match self.config.capture_dir() {
            Ok(Some(dir)) => dir,
            Ok(None) => return,
            Err(e) => {
                self.add_error("capture.dir", e.to_string(), None);
                return;
            }
        };

        if dir.exists() && !dir.is_dir() {
            self.add_error(
                "capture.dir",
                format!("Capture path '{}' exists but is not a directory", dir.display()),
                None,
            );
        }

        self.add_warning(
            "capture.enabled",
            format!("Request capture is enabled; full conversations are written to '{}'", dir.display()),
            Some("Disable capture outside of debugging sessions"),
        );

        if let Some(configured) = &self.config.capture.dir {
            if paths::expand_path(configured).map(|p| p.is_relative()).unwrap_or(false) {
                self.add_warning(
                    "capture.dir",
                    format!("Relative capture dir '{}' depends on the working directory", configured),
                    None,
                );
            }
        }
    }

    /// Flag configurations that should not run in production
    fn validate_security_requirements(&mut self) {
        if self.config.server.log_level == LogLevel::Trace {
            self.add_warning(
                "server.log_level",
                "Trace log level enabled: request contents may end up in logs",
                None,
            );
        }
    }

    fn add_error(&mut self, field: &str, message: impl Into<String>, suggestion: Option<&str>) {
        self.push(field, ValidationSeverity::Error, message.into(), suggestion);
    }

    fn add_warning(&mut self, field: &str, message: impl Into<String>, suggestion: Option<&str>) {
        self.push(field, ValidationSeverity::Warning, message.into(), suggestion);
    }

    fn push(
        &mut self,
        field: &str,
        severity: ValidationSeverity,
        message: String,
        suggestion: Option<&str>,
    ) {
        tracing::debug!("Validation {:?}: {}: {}", severity, field, message);
        self.issues.push(ValidationIssue {
            field: field.to_string(),
            severity,
            message,
            suggestion: suggestion.map(str::to_string),
        });
    }
}

/* --- tests ------------------------------------------------------------------------------- */
