use crate::prelude::{
    ScopeError, ScopeResult, DEFAULT_BUFFER_SIZE, DEFAULT_CHANNELS, DEFAULT_MAX_DATAGRAM,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Settings consumed by [`crate::net::UdpReceiver`] and the buffer store it feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    pub listen_address: String,
    pub port: u16,
    pub channels: usize,
    pub buffer_size: usize,
    pub max_datagram: usize,
    /// Bounds how long `stop` waits for a blocked read.
    pub read_timeout_ms: u64,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0".into(),
            port: 12345,
            channels: DEFAULT_CHANNELS,
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_datagram: DEFAULT_MAX_DATAGRAM,
            read_timeout_ms: 100,
        }
    }
}

impl ReceiverConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> ScopeResult<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)?;
        let config: ReceiverConfig = serde_yaml::from_str(&contents).map_err(|err| {
            ScopeError::InvalidConfig(format!("parsing {}: {}", path_ref.display(), err))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_args(listen_address: &str, port: u16, buffer_size: usize) -> Self {
        Self {
            listen_address: listen_address.to_string(),
            port,
            buffer_size,
            ..Default::default()
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen_address, self.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms.max(1))
    }

    pub fn validate(&self) -> ScopeResult<()> {
        if self.channels == 0 {
            return Err(ScopeError::InvalidConfig("channels must be non-zero".into()));
        }
        if self.buffer_size == 0 {
            return Err(ScopeError::InvalidConfig(
                "buffer_size must be non-zero".into(),
            ));
        }
        let frame_len = self.channels * std::mem::size_of::<f32>();
        // One spare byte lets an oversized datagram show up as too long
        // instead of being truncated into a valid-looking frame.
        if self.max_datagram <= frame_len {
            return Err(ScopeError::InvalidConfig(format!(
                "max_datagram {} must exceed the {}-byte frame",
                self.max_datagram, frame_len
            )));
        }
        Ok(())
    }
}
