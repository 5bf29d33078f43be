//! Shared data types.

mod common;
mod credentials;
mod dispatch;
mod subscription;
mod webhook;

pub use common::*;
pub use credentials::*;
pub use dispatch::*;
pub use subscription::*;
pub use webhook::*;
