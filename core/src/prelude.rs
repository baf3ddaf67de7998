use std::io;

pub use crate::wire::SampleFrame;

/// Number of channels carried by a frame unless configured otherwise.
pub const DEFAULT_CHANNELS: usize = 4;

/// Samples retained per channel unless configured otherwise.
pub const DEFAULT_BUFFER_SIZE: usize = 10_000;

/// Largest datagram the receiver reads in one call.
pub const DEFAULT_MAX_DATAGRAM: usize = 10_000;

/// Common error type for the scope core.
#[derive(thiserror::Error, Debug)]
pub enum ScopeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed datagram: expected {expected} bytes, got {actual}")]
    Decode { expected: usize, actual: usize },
    #[error("frame carries {actual} channels, store holds {expected}")]
    ChannelMismatch { expected: usize, actual: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("receiver is {0:?}; operation not allowed")]
    InvalidState(ReceiverState),
    #[error("socket error: {0}")]
    Io(#[from] io::Error),
}

pub type ScopeResult<T> = Result<T, ScopeError>;

/// Message carried from the receive loop to the render loop.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Frame(SampleFrame),
    /// The receive loop has exited. `reason` is set when a socket error ended it.
    Stopped { reason: Option<String> },
}

/// Lifecycle of a datagram receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverState {
    Idle,
    Bound,
    Receiving,
    Stopped,
}

/// Summary of one drain of the hand-off channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrainOutcome {
    pub applied: usize,
    pub rejected: usize,
    pub feed_stopped: bool,
    pub stop_reason: Option<String>,
}
