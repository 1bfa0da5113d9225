pub mod message;
pub mod publisher;
pub mod shutdown;
pub mod subscriber;
