//! Subscriber module.
//!
//! Provides the read-and-log loop and the counters it reports on exit.

#[allow(clippy::module_inception)]
pub mod subscriber;

pub use subscriber::{Subscriber, SubscriberStats};
