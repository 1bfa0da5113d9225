//! example-app – a small Kafka topic tester.
//!
//! This crate exports
//!  * `cli`    – clap command tree and subcommand dispatch (`pub` / `sub`)
//!  * `core`   – the publisher and subscriber loops, message types, shutdown
//!  * `client` – the Kafka writer/reader seam and its `rskafka` implementation
//!  * `config` – typed runtime configuration built from command-line flags
//!
//! The binary (`src/main.rs`) only wires logging, argument parsing and the
//! shutdown signal together; everything else lives here so the loops can be
//! driven against in-memory clients in tests.

// ───────────────────────────────────────────────────────────
// Public modules
// ───────────────────────────────────────────────────────────
pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod logging;
pub mod util;

// ───────────────────────────────────────────────────────────
// Re-exports
// ───────────────────────────────────────────────────────────
pub use crate::client::{ClientError, KafkaReader, KafkaWriter, MessageReader, MessageWriter};
pub use crate::config::{ConnectionConfig, PublisherConfig, RetryPolicy, SubscriberConfig};
pub use crate::core::publisher::Publisher;
pub use crate::core::shutdown::{Shutdown, ShutdownListener};
pub use crate::core::subscriber::Subscriber;
