pub mod buffer_store;
pub mod channel_buffer;

pub use buffer_store::BufferStore;
pub use channel_buffer::ChannelBuffer;
