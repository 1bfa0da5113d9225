use tracing::{error, info};

use crate::client::{KafkaReader, MessageReader};
use crate::config::{RetryPolicy, SubscriberConfig};
use crate::core::message::ReceivedMessage;
use crate::core::shutdown::ShutdownListener;
use crate::util::backoff::RetryBackoff;

/// Counters reported when the read loop stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberStats {
    pub received: u64,
    pub failed_reads: u64,
}

/// Reads records one at a time and logs them until shutdown.
///
/// Read errors are logged and retried. How long to wait before the retry is
/// decided by the [`RetryPolicy`]: `Immediate` keeps polling with no pause,
/// the default exponential policy backs off and resets after a good read.
pub struct Subscriber<R> {
    reader: R,
    topic: String,
    backoff: RetryBackoff,
    stats: SubscriberStats,
}

impl Subscriber<KafkaReader> {
    /// Subscriber reading from Kafka with the given topic, brokers and policy.
    pub fn kafka(config: SubscriberConfig) -> Self {
        let topic = config.connection.topic.clone();
        let retry = config.retry;
        Self::new(KafkaReader::new(config), topic, retry)
    }
}

impl<R: MessageReader> Subscriber<R> {
    pub fn new(reader: R, topic: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            reader,
            topic: topic.into(),
            backoff: RetryBackoff::new(retry),
            stats: SubscriberStats::default(),
        }
    }

    /// Runs the read loop until `shutdown` fires.
    pub async fn run(mut self, mut shutdown: ShutdownListener) -> anyhow::Result<SubscriberStats> {
        info!(topic = %self.topic, "Starting Kafka subscriber...");

        loop {
            let result = tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                result = self.reader.read_message() => result,
            };

            match result {
                Ok(message) => {
                    self.stats.received += 1;
                    self.backoff.reset();
                    log_message(&message);
                }
                Err(e) => {
                    self.stats.failed_reads += 1;
                    error!("could not read message: {e}");

                    if !self.backoff.snooze(&mut shutdown).await {
                        break;
                    }
                }
            }
        }

        info!(
            received = self.stats.received,
            failed_reads = self.stats.failed_reads,
            "Kafka subscriber stopped"
        );
        Ok(self.stats)
    }
}

fn log_message(message: &ReceivedMessage) {
    info!(
        partition = message.partition,
        "message at offset {}: {} = {}",
        message.offset,
        message.key_lossy(),
        message.value_lossy()
    );
}
