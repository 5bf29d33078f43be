//! Error types for the Hookline protocol layer.

mod credential;
mod dispatch;
mod registry;
mod subscription;
mod unsubscribe;
mod upstream;

pub use credential::*;
pub use dispatch::*;
pub use registry::*;
pub use subscription::*;
pub use unsubscribe::*;
pub use upstream::*;
