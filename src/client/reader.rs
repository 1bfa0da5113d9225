use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use rskafka::client::consumer::{StartOffset, StreamConsumer, StreamConsumerBuilder};
use rskafka::client::partition::UnknownTopicHandling;
use rskafka::record::RecordAndOffset;
use tracing::debug;

use super::{connect, with_deadline, ClientError, MessageReader};
use crate::config::SubscriberConfig;
use crate::core::message::ReceivedMessage;

/// Reads one partition of a topic without a consumer group, starting from
/// the earliest retained offset.
///
/// Records are fetched in batches and handed out one per
/// [`read_message`](MessageReader::read_message) call. After an error the
/// stream is dropped and reopened on the next read at the offset following
/// the last record returned.
///
/// Opening the stream is bounded by the request timeout. Waiting for records
/// is not, since an idle topic is not an error; broker failures during a
/// fetch surface once the client's retry deadline runs out.
pub struct KafkaReader {
    config: SubscriberConfig,
    next_offset: Option<i64>,
    consumer: Option<StreamConsumer>,
}

impl KafkaReader {
    pub fn new(config: SubscriberConfig) -> Self {
        Self {
            config,
            next_offset: None,
            consumer: None,
        }
    }

    async fn open(
        config: &SubscriberConfig,
        next_offset: Option<i64>,
    ) -> Result<StreamConsumer, ClientError> {
        let topic = &config.connection.topic;
        let client = connect(&config.connection).await?;
        let partition_client = client
            .partition_client(topic.clone(), config.partition, UnknownTopicHandling::Error)
            .await?;

        let start = start_offset(next_offset);
        debug!(
            topic = %topic,
            partition = config.partition,
            next_offset = ?next_offset,
            "opening record stream"
        );

        let fetch = config.fetch;
        Ok(StreamConsumerBuilder::new(Arc::new(partition_client), start)
            .with_min_batch_size(fetch.min_bytes)
            .with_max_batch_size(fetch.max_bytes)
            .with_max_wait_ms(fetch.max_wait_ms())
            .build())
    }
}

impl MessageReader for KafkaReader {
    async fn read_message(&mut self) -> Result<ReceivedMessage, ClientError> {
        let mut consumer = match self.consumer.take() {
            Some(consumer) => consumer,
            None => {
                let timeout = self.config.connection.request_timeout;
                with_deadline("open", timeout, Self::open(&self.config, self.next_offset)).await??
            }
        };

        match consumer.next().await {
            Some(Ok((record, _high_watermark))) => {
                self.next_offset = Some(record.offset + 1);
                self.consumer = Some(consumer);
                Ok(to_received(self.config.partition, record))
            }
            Some(Err(e)) => Err(e.into()),
            None => Err(ClientError::StreamClosed(self.config.connection.topic.clone())),
        }
    }
}

/// Where a (re)opened stream starts: right after the last record handed
/// out, or the earliest retained offset if there was none.
fn start_offset(next_offset: Option<i64>) -> StartOffset {
    next_offset.map_or(StartOffset::Earliest, StartOffset::At)
}

fn to_received(partition: i32, record: RecordAndOffset) -> ReceivedMessage {
    ReceivedMessage {
        partition,
        offset: record.offset,
        key: record.record.key.map(Bytes::from).unwrap_or_default(),
        value: record.record.value.map(Bytes::from).unwrap_or_default(),
    }
}
