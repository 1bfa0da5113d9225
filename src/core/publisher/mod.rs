//! Publisher module.
//! Exposes the fixed-message publish loop.
#[allow(clippy::module_inception)]
pub mod publisher;

pub use publisher::{Publisher, PublisherStats};
