//! Trigger protocol definitions.
//!
//! A trigger provider bundles three pieces: a subscription constructor that
//! manages the upstream webhook registration, a trigger that turns inbound
//! requests into event names, and the events themselves.

mod context;
mod declaration;
mod traits;
mod upstream;

pub use context::*;
pub use declaration::*;
pub use traits::*;
pub use upstream::*;
