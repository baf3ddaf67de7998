pub mod codec;
pub mod frame;

pub use codec::FrameCodec;
pub use frame::SampleFrame;
