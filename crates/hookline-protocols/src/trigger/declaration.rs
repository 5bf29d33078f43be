//! Trigger provider declarations.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RegistryError;
use crate::types::Version;

static IDENTITY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid identity regex"));

/// Whether `name` is a valid provider or event identifier.
pub fn is_valid_identity_name(name: &str) -> bool {
    IDENTITY_NAME.is_match(name)
}

/// Identity of a trigger provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderIdentity {
    pub author: String,
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub version: Version,
}

/// Type of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterType {
    String,
    Number,
    Boolean,
    Select,
    Object,
    Array,
    Checkbox,
}

/// A parameter accepted by the subscription constructor or an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default)]
    pub description: String,
}

impl ParameterDeclaration {
    pub fn new(name: impl Into<String>, param_type: ParameterType) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: false,
            default: None,
            description: String::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// An event a provider can emit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDeclaration {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDeclaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
}

impl EventDeclaration {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            description: String::new(),
            parameters: Vec::new(),
            output_schema: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDeclaration) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.output_schema = Some(schema);
        self
    }
}

/// Everything the host needs to know about a trigger provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerProviderDeclaration {
    pub identity: ProviderIdentity,
    #[serde(default)]
    pub subscription_schema: Vec<ParameterDeclaration>,
    #[serde(default)]
    pub events: Vec<EventDeclaration>,
}

impl TriggerProviderDeclaration {
    pub fn new(identity: ProviderIdentity) -> Self {
        Self {
            identity,
            subscription_schema: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn with_subscription_parameter(mut self, parameter: ParameterDeclaration) -> Self {
        self.subscription_schema.push(parameter);
        self
    }

    pub fn with_event(mut self, event: EventDeclaration) -> Self {
        self.events.push(event);
        self
    }

    pub fn event(&self, name: &str) -> Option<&EventDeclaration> {
        self.events.iter().find(|e| e.name == name)
    }

    pub fn event_names(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.name.as_str()).collect()
    }

    /// Check identifiers and uniqueness. Reports the first violation.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if !is_valid_identity_name(&self.identity.name) {
            return Err(RegistryError::InvalidDeclaration(format!(
                "provider name '{}' must match [a-zA-Z0-9_-]+",
                self.identity.name
            )));
        }
        if self.identity.author.is_empty() {
            return Err(RegistryError::InvalidDeclaration(
                "provider author is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for event in &self.events {
            if !is_valid_identity_name(&event.name) {
                return Err(RegistryError::InvalidDeclaration(format!(
                    "event name '{}' must match [a-zA-Z0-9_-]+",
                    event.name
                )));
            }
            if !seen.insert(event.name.as_str()) {
                return Err(RegistryError::InvalidDeclaration(format!(
                    "duplicate event '{}'",
                    event.name
                )));
            }
        }

        let mut params = HashSet::new();
        for param in &self.subscription_schema {
            if !params.insert(param.name.as_str()) {
                return Err(RegistryError::InvalidDeclaration(format!(
                    "duplicate subscription parameter '{}'",
                    param.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "declaration_tests.rs"]
mod tests;
