//! The messaging client seam.
//!
//! The publisher and subscriber loops only see [`MessageWriter`] and
//! [`MessageReader`]. [`KafkaWriter`] and [`KafkaReader`] implement them on
//! top of `rskafka`; tests plug in in-memory versions.

use std::future::Future;
use std::time::Duration;

use rskafka::client::{Client, ClientBuilder};
use rskafka::BackoffConfig;
use tracing::debug;

use crate::config::ConnectionConfig;
use crate::core::message::{Message, ReceivedMessage};

pub mod error;
pub mod reader;
pub mod writer;

pub use error::ClientError;
pub use reader::KafkaReader;
pub use writer::KafkaWriter;

/// Sends messages to one topic.
pub trait MessageWriter: Send {
    /// Sends all `messages`; succeeds only once the broker acknowledged them.
    fn write_messages(
        &mut self,
        messages: &[Message],
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// Reads records from one topic, one at a time.
pub trait MessageReader: Send {
    /// Waits for the next record or the first error.
    fn read_message(&mut self) -> impl Future<Output = Result<ReceivedMessage, ClientError>> + Send;
}

/// Bootstraps a client from the broker list.
///
/// rskafka retries transport and retriable broker errors internally; the
/// backoff deadline makes those retries give up after `request_timeout` so
/// the error reaches the caller.
pub(crate) async fn connect(connection: &ConnectionConfig) -> Result<Client, ClientError> {
    if connection.brokers.is_empty() {
        return Err(ClientError::NoBrokers);
    }
    debug!(brokers = ?connection.brokers, "connecting to Kafka");

    let backoff = BackoffConfig {
        deadline: Some(connection.request_timeout),
        ..Default::default()
    };
    let build = ClientBuilder::new(connection.brokers.clone())
        .backoff_config(backoff)
        .build();
    let client = with_deadline("connect", connection.request_timeout, build).await??;
    Ok(client)
}

/// Runs `fut`, failing with [`ClientError::Timeout`] once `after` elapses.
pub(crate) async fn with_deadline<F: Future>(
    op: &'static str,
    after: Duration,
    fut: F,
) -> Result<F::Output, ClientError> {
    tokio::time::timeout(after, fut)
        .await
        .map_err(|_| ClientError::Timeout { op, after })
}
