mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use common::{broker_down, record, ScriptedReader, WhenExhausted};
use example_app::core::subscriber::SubscriberStats;
use example_app::{RetryPolicy, Shutdown, Subscriber};

#[tokio::test(start_paused = true)]
async fn one_read_per_record() {
    let shutdown = Shutdown::new();
    let listener = shutdown.listen();
    let reader = ScriptedReader::new(
        vec![
            Ok(record(0, "testA", "Hello World!")),
            Ok(record(1, "testA", "Hello World!")),
            Ok(record(2, "k", "v")),
        ],
        WhenExhausted::Shutdown,
        shutdown.clone(),
    );
    let reads = reader.reads.clone();

    let stats = Subscriber::new(reader, "t1", RetryPolicy::default())
        .run(listener)
        .await
        .unwrap();

    assert_eq!(
        stats,
        SubscriberStats {
            received: 3,
            failed_reads: 0
        }
    );
    // Three records plus the read that was pending at shutdown.
    assert_eq!(reads.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn immediate_policy_retries_without_delay() {
    let shutdown = Shutdown::new();
    let listener = shutdown.listen();
    let reader = ScriptedReader::new(
        vec![
            Err(broker_down()),
            Err(broker_down()),
            Err(broker_down()),
            Ok(record(0, "testA", "Hello World!")),
        ],
        WhenExhausted::Shutdown,
        shutdown.clone(),
    );
    let read_times = reader.read_times.clone();

    let start = Instant::now();
    let stats = Subscriber::new(reader, "t1", RetryPolicy::Immediate)
        .run(listener)
        .await
        .unwrap();

    assert_eq!(
        stats,
        SubscriberStats {
            received: 1,
            failed_reads: 3
        }
    );
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert!(read_times.lock().unwrap().iter().all(|t| *t == start));
}

#[tokio::test(start_paused = true)]
async fn default_policy_backs_off_and_resets_after_success() {
    let shutdown = Shutdown::new();
    let listener = shutdown.listen();
    let reader = ScriptedReader::new(
        vec![
            Err(broker_down()),
            Err(broker_down()),
            Err(broker_down()),
            Ok(record(5, "testA", "Hello World!")),
            Err(broker_down()),
        ],
        WhenExhausted::Shutdown,
        shutdown.clone(),
    );
    let read_times = reader.read_times.clone();

    let start = Instant::now();
    let stats = Subscriber::new(reader, "t1", RetryPolicy::default())
        .run(listener)
        .await
        .unwrap();

    assert_eq!(stats.failed_reads, 4);
    assert_eq!(stats.received, 1);

    let gaps: Vec<Duration> = read_times
        .lock()
        .unwrap()
        .windows(2)
        .map(|w| w[1] - w[0])
        .collect();
    assert_eq!(
        gaps,
        vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(400),
            Duration::ZERO,
            Duration::from_millis(100),
        ]
    );
    assert_eq!(start.elapsed(), Duration::from_millis(800));
}

#[tokio::test(start_paused = true)]
async fn backoff_is_capped() {
    let shutdown = Shutdown::new();
    let listener = shutdown.listen();
    let reader = ScriptedReader::new(vec![], WhenExhausted::FailForever, shutdown.clone());
    let read_times = reader.read_times.clone();

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        sleep(Duration::from_secs(30)).await;
        trigger.trigger();
    });

    let policy = RetryPolicy::Exponential {
        initial: Duration::from_secs(1),
        max: Duration::from_secs(4),
    };
    let stats = Subscriber::new(reader, "t1", policy)
        .run(listener)
        .await
        .unwrap();

    // Reads at 0, 1, 3, 7, 11, 15, 19, 23, 27; shutdown at 30 while waiting.
    assert_eq!(stats.failed_reads, 9);
    let gaps: Vec<Duration> = read_times
        .lock()
        .unwrap()
        .windows(2)
        .map(|w| w[1] - w[0])
        .collect();
    assert_eq!(gaps[..3], [1, 2, 4].map(Duration::from_secs));
    assert!(gaps[3..].iter().all(|g| *g == Duration::from_secs(4)));
}

#[tokio::test(start_paused = true)]
async fn shutdown_before_start_reads_nothing() {
    let shutdown = Shutdown::new();
    let listener = shutdown.listen();
    let reader = ScriptedReader::new(vec![], WhenExhausted::FailForever, shutdown.clone());
    let reads = reader.reads.clone();

    shutdown.trigger();
    let stats = Subscriber::new(reader, "t1", RetryPolicy::Immediate)
        .run(listener)
        .await
        .unwrap();

    assert_eq!(stats, SubscriberStats::default());
    assert_eq!(reads.load(Ordering::SeqCst), 0);
}
