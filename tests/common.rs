#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tokio::time::Instant;

use example_app::core::message::{Message, ReceivedMessage};
use example_app::{ClientError, MessageReader, MessageWriter, Shutdown};

/// Writer that records every send and its (virtual) time.
///
/// Sends whose 1-based index is in `failing` return an error. Shutdown is
/// triggered once `stop_after` sends have been made.
pub struct RecordingWriter {
    pub sends: Arc<Mutex<Vec<(Instant, Vec<Message>)>>>,
    failing: Vec<usize>,
    stop_after: Option<usize>,
    shutdown: Shutdown,
}

impl RecordingWriter {
    pub fn new(shutdown: Shutdown) -> Self {
        Self {
            sends: Arc::new(Mutex::new(Vec::new())),
            failing: Vec::new(),
            stop_after: None,
            shutdown,
        }
    }

    pub fn failing_on(mut self, sends: &[usize]) -> Self {
        self.failing = sends.to_vec();
        self
    }

    pub fn stop_after(mut self, sends: usize) -> Self {
        self.stop_after = Some(sends);
        self
    }
}

impl MessageWriter for RecordingWriter {
    async fn write_messages(&mut self, messages: &[Message]) -> Result<(), ClientError> {
        let n = {
            let mut sends = self.sends.lock().unwrap();
            sends.push((Instant::now(), messages.to_vec()));
            sends.len()
        };
        if self.stop_after == Some(n) {
            self.shutdown.trigger();
        }
        if self.failing.contains(&n) {
            Err(ClientError::UnknownTopic("t1".into()))
        } else {
            Ok(())
        }
    }
}

/// What a [`ScriptedReader`] does once its script is used up.
pub enum WhenExhausted {
    /// Trigger shutdown and block forever.
    Shutdown,
    /// Keep failing every read.
    FailForever,
}

/// Reader that replays a fixed list of results.
pub struct ScriptedReader {
    script: VecDeque<Result<ReceivedMessage, ClientError>>,
    then: WhenExhausted,
    pub reads: Arc<AtomicUsize>,
    pub read_times: Arc<Mutex<Vec<Instant>>>,
    shutdown: Shutdown,
}

impl ScriptedReader {
    pub fn new(
        script: Vec<Result<ReceivedMessage, ClientError>>,
        then: WhenExhausted,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            script: script.into(),
            then,
            reads: Arc::new(AtomicUsize::new(0)),
            read_times: Arc::new(Mutex::new(Vec::new())),
            shutdown,
        }
    }
}

impl MessageReader for ScriptedReader {
    async fn read_message(&mut self) -> Result<ReceivedMessage, ClientError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.read_times.lock().unwrap().push(Instant::now());

        if let Some(next) = self.script.pop_front() {
            return next;
        }
        match self.then {
            WhenExhausted::FailForever => Err(broker_down()),
            WhenExhausted::Shutdown => {
                self.shutdown.trigger();
                std::future::pending().await
            }
        }
    }
}

pub fn record(offset: i64, key: &'static str, value: &'static str) -> ReceivedMessage {
    ReceivedMessage {
        partition: 0,
        offset,
        key: Bytes::from_static(key.as_bytes()),
        value: Bytes::from_static(value.as_bytes()),
    }
}

pub fn broker_down() -> ClientError {
    ClientError::StreamClosed("t1".into())
}
