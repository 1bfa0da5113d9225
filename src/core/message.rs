use std::borrow::Cow;

use bytes::Bytes;

/// Key of the message the publisher sends.
pub const DEMO_KEY: &[u8] = b"testA";
/// Value of the message the publisher sends.
pub const DEMO_VALUE: &[u8] = b"Hello World!";

/// An outgoing key/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub key: Bytes,
    pub value: Bytes,
}

impl Message {
    pub fn new(key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The fixed `testA` / `Hello World!` message.
    pub fn demo() -> Self {
        Self::new(Bytes::from_static(DEMO_KEY), Bytes::from_static(DEMO_VALUE))
    }
}

/// A record handed back by a reader. Only kept long enough to be logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub partition: i32,
    pub offset: i64,
    pub key: Bytes,
    pub value: Bytes,
}

impl ReceivedMessage {
    pub fn key_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.key)
    }

    pub fn value_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }
}
