//! Inbound event dispatch.

use async_trait::async_trait;
use tracing::{Instrument, debug};

use hookline_protocols::error::TriggerDispatchError;
use hookline_protocols::trigger::{Trigger, TriggerContext};
use hookline_protocols::types::{
    EventDispatch, PROPERTY_WEBHOOK_SECRET, Subscription, WebhookRequest, WebhookResponse,
};

use crate::classify::EventClassifier;
use crate::payload::extract_payload;
use crate::signature::{SIGNATURE_HEADER, verify_signature};

/// [`Trigger`] that verifies, parses and classifies webhook requests.
///
/// Every valid request is acknowledged with `200 {"status":"ok"}`, whether or
/// not any rule matched.
#[derive(Debug, Clone, Default)]
pub struct EventDispatcher {
    classifier: EventClassifier,
}

impl EventDispatcher {
    pub fn new(classifier: EventClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &EventClassifier {
        &self.classifier
    }

    fn dispatch(
        &self,
        subscription: &Subscription,
        request: &WebhookRequest,
    ) -> Result<EventDispatch, TriggerDispatchError> {
        if let Some(secret) = subscription.property_str(PROPERTY_WEBHOOK_SECRET) {
            verify_signature(secret, &request.body, request.header(SIGNATURE_HEADER))?;
        }

        let payload = extract_payload(&request.body)?;
        let events = self.classifier.classify(&payload);
        debug!(events = ?events, "Classified webhook payload");

        Ok(EventDispatch::new(events, WebhookResponse::acknowledged()).with_payload(payload))
    }
}

#[async_trait]
impl Trigger for EventDispatcher {
    async fn dispatch_event(
        &self,
        ctx: &TriggerContext,
        subscription: &Subscription,
        request: &WebhookRequest,
    ) -> Result<EventDispatch, TriggerDispatchError> {
        let span = ctx.span("dispatch_event");
        async {
            let result = self.dispatch(subscription, request);
            if let Err(ref e) = result {
                debug!(error = %e, "Rejected webhook request");
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
