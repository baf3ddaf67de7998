pub mod feed;
pub mod receiver;
pub mod sender;

pub use feed::{feed_channel, FeedReceiver, FeedSender};
pub use receiver::UdpReceiver;
pub use sender::ScopeSender;
