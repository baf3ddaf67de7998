use crate::prelude::FeedEvent;
use tokio::sync::mpsc;

/// Producer half of the receive-loop to render-loop hand-off.
pub type FeedSender = mpsc::UnboundedSender<FeedEvent>;

/// Consumer half, drained by the render loop on its own schedule.
pub type FeedReceiver = mpsc::UnboundedReceiver<FeedEvent>;

/// Unbounded so the receive loop never blocks on a busy renderer.
pub fn feed_channel() -> (FeedSender, FeedReceiver) {
    mpsc::unbounded_channel()
}
