//! Example webhook trigger provider for Hookline.
//!
//! A template to copy when integrating a new upstream service: an HTTP
//! upstream client, one classification rule and one sample-filter event.

mod provider;
mod upstream;

pub use provider::{ExampleSettings, ExampleTriggerProvider, camel_name};
pub use upstream::HttpUpstream;
