//! Configuration validation.

use std::collections::HashSet;

use hookline_protocols::trigger::is_valid_identity_name;
use hookline_protocols::types::CredentialType;

use crate::error::ConfigError;
use crate::schema::{Config, MATCH_KINDS};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_provider(config, &mut result);
        Self::validate_upstream(config, &mut result);
        Self::validate_refresh(config, &mut result);
        Self::validate_rules(config, &mut result);
        Self::validate_subscriptions(config, &mut result);

        Ok(result)
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }

        match &config.server.public_url {
            Some(url) => {
                if url::Url::parse(url).is_err() {
                    result.add_error(ValidationError::new(
                        "server.public_url",
                        format!("Invalid URL: {}", url),
                    ));
                }
            }
            None => result.add_warning(ValidationWarning::new(
                "server.public_url",
                "public_url not set, callback endpoints will use the bind address",
            )),
        }
    }

    fn validate_provider(config: &Config, result: &mut ValidationResult) {
        if !is_valid_identity_name(&config.provider.name) {
            result.add_error(ValidationError::new(
                "provider.name",
                "Provider name must match [a-zA-Z0-9_-]+",
            ));
        }

        if config.provider.credential_type == CredentialType::ApiKey
            && config.provider.credentials.get_str("api_key").is_none()
        {
            result.add_warning(ValidationWarning::new(
                "provider.credentials.api_key",
                "API key is not set, credential validation will fail",
            ));
        }
    }

    fn validate_upstream(config: &Config, result: &mut ValidationResult) {
        match url::Url::parse(&config.upstream.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(_) => result.add_error(ValidationError::new(
                "upstream.base_url",
                "base_url must use http or https",
            )),
            Err(e) => result.add_error(ValidationError::new(
                "upstream.base_url",
                format!("Invalid URL: {}", e),
            )),
        }

        if config.upstream.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "upstream.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }

        if config.upstream.lease_seconds == 0 {
            result.add_error(ValidationError::new(
                "upstream.lease_seconds",
                "lease_seconds must be greater than 0",
            ));
        }
    }

    fn validate_refresh(config: &Config, result: &mut ValidationResult) {
        let refresh = &config.refresh;
        if !refresh.enabled {
            if !config.subscriptions.is_empty() {
                result.add_warning(ValidationWarning::new(
                    "refresh.enabled",
                    "Refresh is disabled, subscriptions will lapse when their lease expires",
                ));
            }
            return;
        }

        if refresh.check_interval_secs == 0 {
            result.add_error(ValidationError::new(
                "refresh.check_interval_secs",
                "check_interval_secs must be greater than 0",
            ));
        }

        if refresh.refresh_before_secs >= config.upstream.lease_seconds {
            result.add_error(ValidationError::new(
                "refresh.refresh_before_secs",
                "refresh_before_secs must be shorter than upstream.lease_seconds",
            ));
        }

        if refresh.check_interval_secs >= refresh.refresh_before_secs {
            result.add_warning(ValidationWarning::new(
                "refresh.check_interval_secs",
                "check_interval_secs is not shorter than refresh_before_secs, leases may lapse",
            ));
        }
    }

    fn validate_rules(config: &Config, result: &mut ValidationResult) {
        for (i, rule) in config.rules.iter().enumerate() {
            let path = format!("rules[{}]", i);

            if !is_valid_identity_name(&rule.event) {
                result.add_error(ValidationError::new(
                    format!("{}.event", path),
                    format!("Invalid event name '{}'", rule.event),
                ));
            }

            if rule.field.is_empty() || rule.field.split('.').any(str::is_empty) {
                result.add_error(ValidationError::new(
                    format!("{}.field", path),
                    format!("Invalid field path '{}'", rule.field),
                ));
            }

            if !MATCH_KINDS.contains(&rule.match_kind.as_str()) {
                result.add_error(ValidationError::new(
                    format!("{}.match", path),
                    format!(
                        "Unknown match kind '{}', valid values: {:?}",
                        rule.match_kind, MATCH_KINDS
                    ),
                ));
            } else if rule.match_kind != "exists" && rule.value.is_none() {
                result.add_error(ValidationError::new(
                    format!("{}.value", path),
                    format!("Match kind '{}' requires a value", rule.match_kind),
                ));
            }
        }
    }

    fn validate_subscriptions(config: &Config, result: &mut ValidationResult) {
        let mut seen = HashSet::new();
        for (i, sub) in config.subscriptions.iter().enumerate() {
            let path = format!("subscriptions[{}]", i);

            if !is_valid_identity_name(&sub.id) {
                result.add_error(ValidationError::new(
                    format!("{}.id", path),
                    format!("Invalid subscription id '{}'", sub.id),
                ));
            }

            if !seen.insert(sub.id.as_str()) {
                result.add_error(ValidationError::new(
                    format!("{}.id", path),
                    format!("Duplicate subscription id '{}'", sub.id),
                ));
            }

            if sub.events.iter().any(String::is_empty) {
                result.add_error(ValidationError::new(
                    format!("{}.events", path),
                    "Event types cannot be empty",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
