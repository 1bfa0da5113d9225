//! Runtime configuration.
//!
//! There is no configuration file: every value is either a command-line flag
//! (see [`crate::cli`]) or one of the defaults below. Each handler receives
//! its own config struct at construction time.

use std::time::Duration;

/// Pause between two publish attempts, counted from the end of the send.
pub const DEFAULT_PUBLISH_INTERVAL: Duration = Duration::from_secs(5);

/// Partition read by the subscriber when no consumer group is used.
pub const DEFAULT_PARTITION: i32 = 0;

pub const DEFAULT_FETCH_MIN_BYTES: i32 = 1;
pub const DEFAULT_FETCH_MAX_BYTES: i32 = 1_000_000;
pub const DEFAULT_FETCH_MAX_WAIT: Duration = Duration::from_secs(10);

/// Upper bound on one connect, produce or fetch round, retries included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_RETRY_INITIAL: Duration = Duration::from_millis(100);
pub const DEFAULT_RETRY_MAX: Duration = Duration::from_secs(5);

/// Where to connect: a topic and the bootstrap broker list.
///
/// Neither field is validated here; an empty topic or broker list is handed
/// to the client, which reports it on the first send or read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub topic: String,
    pub brokers: Vec<String>,
    /// Client calls that take longer fail with a timeout error.
    pub request_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new(String::new(), Vec::new())
    }
}

impl ConnectionConfig {
    pub fn new(topic: impl Into<String>, brokers: Vec<String>) -> Self {
        Self {
            topic: topic.into(),
            brokers,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherConfig {
    pub connection: ConnectionConfig,
    pub interval: Duration,
}

impl PublisherConfig {
    pub fn new(connection: ConnectionConfig) -> Self {
        Self {
            connection,
            interval: DEFAULT_PUBLISH_INTERVAL,
        }
    }
}

/// Fetch sizing for the subscriber's reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    pub min_bytes: i32,
    pub max_bytes: i32,
    pub max_wait: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            min_bytes: DEFAULT_FETCH_MIN_BYTES,
            max_bytes: DEFAULT_FETCH_MAX_BYTES,
            max_wait: DEFAULT_FETCH_MAX_WAIT,
        }
    }
}

impl FetchConfig {
    /// Max wait in the unit the Kafka fetch API takes, saturated to `i32`.
    pub fn max_wait_ms(&self) -> i32 {
        i32::try_from(self.max_wait.as_millis()).unwrap_or(i32::MAX)
    }
}

/// What the subscriber does after a failed read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Retry straight away, with no delay between attempts.
    Immediate,
    /// Wait `initial`, doubling after every consecutive failure up to `max`.
    Exponential { initial: Duration, max: Duration },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Exponential {
            initial: DEFAULT_RETRY_INITIAL,
            max: DEFAULT_RETRY_MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberConfig {
    pub connection: ConnectionConfig,
    pub partition: i32,
    pub fetch: FetchConfig,
    pub retry: RetryPolicy,
}

impl SubscriberConfig {
    pub fn new(connection: ConnectionConfig) -> Self {
        Self {
            connection,
            partition: DEFAULT_PARTITION,
            fetch: FetchConfig::default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
