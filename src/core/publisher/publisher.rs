use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::client::{ClientError, KafkaWriter, MessageWriter};
use crate::config::PublisherConfig;
use crate::core::message::Message;
use crate::core::shutdown::ShutdownListener;

/// Counters reported when the publish loop stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublisherStats {
    pub sent: u64,
    pub failed: u64,
}

/// Sends the fixed demo message, then sleeps, until shutdown.
///
/// - A failed send is logged and the loop carries on; there is no retry.
/// - The interval sleep runs after every attempt, successful or not.
pub struct Publisher<W> {
    writer: W,
    config: PublisherConfig,
    stats: PublisherStats,
}

impl Publisher<KafkaWriter> {
    /// Publisher writing to Kafka with the given topic and brokers.
    pub fn kafka(config: PublisherConfig) -> Self {
        let writer = KafkaWriter::new(config.connection.clone());
        Self::new(writer, config)
    }
}

impl<W: MessageWriter> Publisher<W> {
    pub fn new(writer: W, config: PublisherConfig) -> Self {
        Self {
            writer,
            config,
            stats: PublisherStats::default(),
        }
    }

    /// Sends one demo message.
    pub async fn publish_once(&mut self) -> Result<(), ClientError> {
        let messages = [Message::demo()];
        let result = self.writer.write_messages(&messages).await;
        match result {
            Ok(()) => self.stats.sent += 1,
            Err(_) => self.stats.failed += 1,
        }
        result
    }

    /// Runs the publish loop until `shutdown` fires.
    pub async fn run(mut self, mut shutdown: ShutdownListener) -> anyhow::Result<PublisherStats> {
        info!(
            topic = %self.config.connection.topic,
            brokers = ?self.config.connection.brokers,
            "Starting Kafka publisher..."
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                result = self.publish_once() => match result {
                    Ok(()) => debug!(topic = %self.config.connection.topic, "message sent"),
                    Err(e) => error!("unexpected error {e}"),
                },
            }

            info!("sleeping for {:?}...", self.config.interval);
            tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                _ = sleep(self.config.interval) => {}
            }
        }

        info!(
            sent = self.stats.sent,
            failed = self.stats.failed,
            "Kafka publisher stopped"
        );
        Ok(self.stats)
    }
}
