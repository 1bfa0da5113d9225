use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no broker addresses configured")]
    NoBrokers,
    #[error("unknown topic {0:?}")]
    UnknownTopic(String),
    #[error("topic {0:?} has no partitions")]
    NoPartitions(String),
    #[error("record stream for topic {0:?} ended")]
    StreamClosed(String),
    #[error("{op} timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },
    #[error("kafka: {0}")]
    Kafka(#[from] rskafka::client::error::Error),
}
