use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use rskafka::client::partition::{Compression, PartitionClient, UnknownTopicHandling};
use rskafka::client::Client;
use rskafka::record::Record;
use tracing::debug;

use super::{connect, with_deadline, ClientError, MessageWriter};
use crate::config::ConnectionConfig;
use crate::core::message::Message;

/// Writes to a Kafka topic, spreading sends round-robin over its partitions.
///
/// Nothing is contacted until the first write. A failed write throws the
/// connection and partition metadata away; the next write starts fresh.
/// Connecting and producing are each bounded by the request timeout.
pub struct KafkaWriter {
    connection: ConnectionConfig,
    state: Option<WriterState>,
}

struct WriterState {
    client: Client,
    topic: String,
    partitions: PartitionCursor,
    partition_clients: BTreeMap<i32, PartitionClient>,
}

/// Round-robin over a topic's partitions, starting at the first.
#[derive(Debug, Clone)]
struct PartitionCursor {
    partitions: Vec<i32>,
    next: usize,
}

impl PartitionCursor {
    /// `None` for a topic without partitions.
    fn new(partitions: Vec<i32>) -> Option<Self> {
        if partitions.is_empty() {
            return None;
        }
        Some(Self { partitions, next: 0 })
    }

    fn next_partition(&mut self) -> i32 {
        let partition = self.partitions[self.next % self.partitions.len()];
        self.next = (self.next + 1) % self.partitions.len();
        partition
    }
}

impl KafkaWriter {
    pub fn new(connection: ConnectionConfig) -> Self {
        Self {
            connection,
            state: None,
        }
    }
}

impl MessageWriter for KafkaWriter {
    async fn write_messages(&mut self, messages: &[Message]) -> Result<(), ClientError> {
        if messages.is_empty() {
            return Ok(());
        }

        let timeout = self.connection.request_timeout;
        let mut state = match self.state.take() {
            Some(state) => state,
            None => {
                with_deadline("metadata", timeout, WriterState::connect(&self.connection)).await??
            }
        };

        let partition = state.partitions.next_partition();
        let records: Vec<Record> = messages.iter().map(to_record).collect();
        let offsets = with_deadline("produce", timeout, state.produce(partition, records)).await??;
        debug!(topic = %state.topic, partition, ?offsets, "produced");

        self.state = Some(state);
        Ok(())
    }
}

impl WriterState {
    async fn connect(connection: &ConnectionConfig) -> Result<Self, ClientError> {
        let client = connect(connection).await?;
        let partitions: Vec<i32> = client
            .list_topics()
            .await?
            .into_iter()
            .find(|t| t.name == connection.topic)
            .map(|t| t.partitions.into_iter().collect())
            .ok_or_else(|| ClientError::UnknownTopic(connection.topic.clone()))?;
        debug!(topic = %connection.topic, ?partitions, "resolved topic metadata");

        let partitions = PartitionCursor::new(partitions)
            .ok_or_else(|| ClientError::NoPartitions(connection.topic.clone()))?;

        Ok(Self {
            client,
            topic: connection.topic.clone(),
            partitions,
            partition_clients: BTreeMap::new(),
        })
    }

    async fn produce(
        &mut self,
        partition: i32,
        records: Vec<Record>,
    ) -> Result<Vec<i64>, ClientError> {
        let offsets = self
            .partition_client(partition)
            .await?
            .produce(records, Compression::NoCompression)
            .await?;
        Ok(offsets)
    }

    async fn partition_client(&mut self, partition: i32) -> Result<&PartitionClient, ClientError> {
        if !self.partition_clients.contains_key(&partition) {
            let pc = self
                .client
                .partition_client(self.topic.clone(), partition, UnknownTopicHandling::Error)
                .await?;
            self.partition_clients.insert(partition, pc);
        }
        self.partition_clients
            .get(&partition)
            .ok_or_else(|| ClientError::UnknownTopic(self.topic.clone()))
    }
}

fn to_record(message: &Message) -> Record {
    Record {
        key: Some(message.key.to_vec()),
        value: Some(message.value.to_vec()),
        headers: BTreeMap::new(),
        timestamp: Utc::now(),
    }
}
