//! # Hookline Protocols
//!
//! Core types and traits for webhook trigger plugins.
//!
//! A trigger provider owns the lifecycle of an upstream webhook registration
//! and turns inbound webhook requests into named events. This crate defines
//! the contracts; `hookline-core` implements the reusable pipeline.

pub mod error;
pub mod trigger;
pub mod types;
pub mod wire;

pub use error::*;
pub use trigger::*;
pub use types::*;
