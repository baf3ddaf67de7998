//! Core of the UDP waveform scope.
//!
//! Frames of little-endian `f32` samples arrive over UDP, are decoded on a
//! receive thread, and are handed to the render loop, which owns one
//! scrolling buffer per channel.

pub mod config;
pub mod math;
pub mod net;
pub mod prelude;
pub mod processing;
pub mod telemetry;
pub mod wire;

pub use config::ReceiverConfig;
pub use prelude::{FeedEvent, ReceiverState, ScopeError, ScopeResult};
