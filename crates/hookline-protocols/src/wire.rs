//! Host ↔ plugin wire protocol.
//!
//! JSON bodies exchanged on `POST /plugin/trigger/{action}`. Every request
//! names the provider and carries the caller's credentials; the dispatch and
//! invoke actions additionally carry the inbound request as raw HTTP/1.1 text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TriggerDispatchError;
use crate::trigger::TriggerContext;
use crate::types::{
    CredentialType, Credentials, EventDispatch, EventOutcome, Parameters, Subscription,
    UnsubscribeResult, Variables, WebhookRequest,
};

/// Fields shared by every wire request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderCall {
    pub provider: String,
    #[serde(default)]
    pub credentials: Credentials,
    #[serde(default)]
    pub credential_type: CredentialType,
}

impl ProviderCall {
    pub fn new(provider: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            provider: provider.into(),
            credentials,
            credential_type: CredentialType::default(),
        }
    }

    pub fn with_credential_type(mut self, credential_type: CredentialType) -> Self {
        self.credential_type = credential_type;
        self
    }

    /// Build the per-call context.
    pub fn context(&self) -> TriggerContext {
        TriggerContext::new(
            self.provider.clone(),
            self.credentials.clone(),
            self.credential_type,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateCredentialsRequest {
    #[serde(flatten)]
    pub call: ProviderCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateCredentialsResponse {
    pub result: bool,
    /// Why validation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidateCredentialsResponse {
    pub fn valid() -> Self {
        Self {
            result: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            result: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeRequest {
    #[serde(flatten)]
    pub call: ProviderCall,
    pub endpoint: String,
    #[serde(default)]
    pub parameters: Parameters,
}

/// Response of both subscribe and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub subscription: Subscription,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    #[serde(flatten)]
    pub call: ProviderCall,
    pub subscription: Subscription,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsubscribeRequest {
    #[serde(flatten)]
    pub call: ProviderCall,
    pub subscription: Subscription,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsubscribeResponse {
    pub subscription: Subscription,
    pub result: UnsubscribeResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchEventRequest {
    #[serde(flatten)]
    pub call: ProviderCall,
    pub subscription: Subscription,
    pub raw_http_request: String,
}

impl DispatchEventRequest {
    pub fn request(&self) -> Result<WebhookRequest, TriggerDispatchError> {
        WebhookRequest::from_raw(&self.raw_http_request)
    }
}

/// Dispatch results are relayed verbatim.
pub type DispatchEventResponse = EventDispatch;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeEventRequest {
    #[serde(flatten)]
    pub call: ProviderCall,
    pub event: String,
    pub raw_http_request: String,
    #[serde(default)]
    pub parameters: Parameters,
    /// Payload from the dispatch step. Re-parsed from the raw request when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl InvokeEventRequest {
    pub fn request(&self) -> Result<WebhookRequest, TriggerDispatchError> {
        WebhookRequest::from_raw(&self.raw_http_request)
    }
}

/// `{"variables": {...}}` on emit, `{"ignored": true}` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InvokeEventResponse {
    Emitted { variables: Parameters },
    Ignored { ignored: bool },
}

impl From<EventOutcome> for InvokeEventResponse {
    fn from(outcome: EventOutcome) -> Self {
        match outcome {
            EventOutcome::Emit(Variables { variables }) => Self::Emitted { variables },
            EventOutcome::Ignored => Self::Ignored { ignored: true },
        }
    }
}
