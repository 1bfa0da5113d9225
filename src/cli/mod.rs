//! Command-line interface: `pub` and `sub`.

use clap::{Args, Parser, Subcommand};

use crate::config::{ConnectionConfig, PublisherConfig, RetryPolicy, SubscriberConfig};
use crate::core::publisher::Publisher;
use crate::core::shutdown::ShutdownListener;
use crate::core::subscriber::Subscriber;

#[derive(Debug, Parser)]
#[command(name = "example-app", version, about = "Example app for testing topics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Supported subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run Kafka publisher
    Pub {
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Run Kafka subscriber
    Sub {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Retry failed reads at once instead of backing off
        #[arg(long)]
        immediate_retry: bool,
    },
}

/// Flags shared by both subcommands.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Kafka topic name
    #[arg(short, long, default_value = "")]
    pub topic: String,

    /// Broker address, can be set multiple times
    #[arg(short, long)]
    pub brokers: Vec<String>,
}

impl From<ConnectionArgs> for ConnectionConfig {
    fn from(args: ConnectionArgs) -> Self {
        ConnectionConfig::new(args.topic, args.brokers)
    }
}

impl ConnectionArgs {
    pub fn publisher_config(self) -> PublisherConfig {
        PublisherConfig::new(self.into())
    }

    pub fn subscriber_config(self, immediate_retry: bool) -> SubscriberConfig {
        let retry = if immediate_retry {
            RetryPolicy::Immediate
        } else {
            RetryPolicy::default()
        };
        SubscriberConfig::new(self.into()).with_retry(retry)
    }
}

impl Cli {
    /// Runs the selected handler until `shutdown` fires.
    pub async fn run(self, shutdown: ShutdownListener) -> anyhow::Result<()> {
        match self.command {
            Command::Pub { connection } => {
                Publisher::kafka(connection.publisher_config())
                    .run(shutdown)
                    .await?;
            }
            Command::Sub {
                connection,
                immediate_retry,
            } => {
                Subscriber::kafka(connection.subscriber_config(immediate_retry))
                    .run(shutdown)
                    .await?;
            }
        }
        Ok(())
    }
}
