//! # Hookline Core
//!
//! Reusable implementation of the trigger pipeline.
//!
//! ## Components
//!
//! - [`SubscriptionManager`] - Create, refresh and delete upstream registrations
//! - [`EventDispatcher`] - Validate inbound payloads and classify them into events
//! - [`SampleFilterEvent`] - Event that emits the raw payload unless filtered out
//! - [`TriggerRegistry`] - Registry of trigger providers

pub mod classify;
pub mod dispatcher;
pub mod filter;
pub mod manager;
pub mod payload;
pub mod registry;
pub mod signature;

pub use classify::{EventClassifier, EventRule, Matcher, RuleError};
pub use dispatcher::EventDispatcher;
pub use filter::{SampleFilterEvent, classify_and_filter};
pub use manager::{DEFAULT_LEASE_SECS, SubscriptionManager};
pub use payload::extract_payload;
pub use registry::TriggerRegistry;
pub use signature::{SIGNATURE_HEADER, sign_body, verify_signature};
