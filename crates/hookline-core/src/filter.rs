//! Sample-filter event.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{Instrument, debug};

use hookline_protocols::error::TriggerDispatchError;
use hookline_protocols::trigger::{Event, TriggerContext};
use hookline_protocols::types::{EventOutcome, Parameters, Variables, WebhookRequest};

/// Event parameter holding the substring a payload must contain.
pub const SAMPLE_FILTER: &str = "sample_filter";

/// Decide whether `payload` is emitted.
///
/// When `sample_filter` is a non-empty string and the compact JSON text of
/// the payload does not contain it, the event is ignored. Otherwise the
/// variables carry `message` and the untouched payload as `raw_event`.
///
/// The match runs against serialized text, so string values are seen in
/// their escaped form: a filter containing `"` or `\` matches JSON syntax
/// (`"key":`) or escape sequences, not those characters inside a value.
pub fn classify_and_filter(parameters: &Parameters, payload: &Value, message: &str) -> EventOutcome {
    if let Some(filter) = parameters
        .get(SAMPLE_FILTER)
        .and_then(Value::as_str)
        .filter(|f| !f.is_empty())
    {
        // Serializing a Value cannot fail.
        let text = serde_json::to_string(payload).unwrap_or_default();
        if !text.contains(filter) {
            return EventOutcome::Ignored;
        }
    }

    EventOutcome::Emit(
        Variables::new()
            .with("message", message)
            .with("raw_event", payload.clone()),
    )
}

/// [`Event`] built on [`classify_and_filter`].
#[derive(Debug, Clone)]
pub struct SampleFilterEvent {
    name: String,
    message: String,
}

impl SampleFilterEvent {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[async_trait]
impl Event for SampleFilterEvent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn on_event(
        &self,
        ctx: &TriggerContext,
        _request: &WebhookRequest,
        parameters: &Parameters,
        payload: &Value,
    ) -> Result<EventOutcome, TriggerDispatchError> {
        async {
            let filter = parameters.get(SAMPLE_FILTER);
            if filter.is_some_and(|f| !f.is_string() && !f.is_null()) {
                return Err(TriggerDispatchError::EventFailed(format!(
                    "{SAMPLE_FILTER} must be a string"
                )));
            }

            let outcome = classify_and_filter(parameters, payload, &self.message);
            if outcome.is_ignored() {
                debug!(event = %self.name, "Payload did not match sample filter, ignoring");
            }
            Ok(outcome)
        }
        .instrument(ctx.span("on_event"))
        .await
    }
}
