use crate::net::feed::FeedReceiver;
use crate::prelude::{DrainOutcome, FeedEvent, ScopeError, ScopeResult};
use crate::processing::channel_buffer::ChannelBuffer;
use crate::wire::SampleFrame;
use log::{debug, warn};
use tokio::sync::mpsc::error::TryRecvError;

/// Per-channel scrolling histories, indexed in frame field order.
///
/// Owned by the render loop; frames arrive as values through the hand-off
/// channel, so no locking is involved.
#[derive(Debug, Clone)]
pub struct BufferStore {
    channels: Vec<ChannelBuffer>,
}

impl BufferStore {
    pub fn new(channels: usize, capacity: usize, fill: f32) -> ScopeResult<Self> {
        if channels == 0 {
            return Err(ScopeError::InvalidConfig(
                "buffer store needs at least one channel".into(),
            ));
        }
        let channels = (0..channels)
            .map(|_| ChannelBuffer::new(capacity, fill))
            .collect::<ScopeResult<Vec<_>>>()?;
        Ok(Self { channels })
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, index: usize) -> Option<&ChannelBuffer> {
        self.channels.get(index)
    }

    pub fn channels(&self) -> &[ChannelBuffer] {
        &self.channels
    }

    /// Appends `frame[k]` to channel `k` for every channel.
    ///
    /// The frame width is checked first so a mismatched frame leaves every
    /// buffer untouched.
    pub fn apply_frame(&mut self, frame: &SampleFrame) -> ScopeResult<()> {
        if frame.len() != self.channels.len() {
            return Err(ScopeError::ChannelMismatch {
                expected: self.channels.len(),
                actual: frame.len(),
            });
        }
        for (buffer, &value) in self.channels.iter_mut().zip(frame.as_slice()) {
            buffer.push(value);
        }
        Ok(())
    }

    /// Applies every frame waiting in `feed`, in arrival order.
    pub fn drain(&mut self, feed: &mut FeedReceiver) -> DrainOutcome {
        let mut outcome = DrainOutcome::default();
        loop {
            match feed.try_recv() {
                Ok(FeedEvent::Frame(frame)) => match self.apply_frame(&frame) {
                    Ok(()) => outcome.applied += 1,
                    Err(err) => {
                        warn!("dropping frame: {}", err);
                        outcome.rejected += 1;
                    }
                },
                Ok(FeedEvent::Stopped { reason }) => {
                    outcome.feed_stopped = true;
                    outcome.stop_reason = reason;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("feed channel disconnected");
                    outcome.feed_stopped = true;
                    break;
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::feed::feed_channel;

    #[test]
    fn two_frames_with_capacity_three() {
        let mut store = BufferStore::new(4, 3, 0.0).unwrap();
        store.apply_frame(&SampleFrame::from([1.0, 2.0, 3.0, 4.0])).unwrap();
        store.apply_frame(&SampleFrame::from([5.0, 6.0, 7.0, 8.0])).unwrap();

        assert_eq!(store.channel(0).unwrap().to_vec(), vec![0.0, 1.0, 5.0]);
        assert_eq!(store.channel(3).unwrap().to_vec(), vec![0.0, 4.0, 8.0]);
    }

    #[test]
    fn retains_last_capacity_values_per_channel() {
        let capacity = 5;
        let mut store = BufferStore::new(2, capacity, 0.0).unwrap();
        let sent: Vec<[f32; 2]> = (0..12).map(|i| [i as f32, -(i as f32)]).collect();

        for (count, values) in sent.iter().enumerate() {
            store.apply_frame(&SampleFrame::from(*values)).unwrap();
            for buffer in store.channels() {
                assert_eq!(buffer.len(), capacity);
            }

            let applied = count + 1;
            let kept = applied.min(capacity);
            let mut expected = vec![0.0f32; capacity - kept];
            expected.extend(sent[applied - kept..applied].iter().map(|v| v[0]));
            assert_eq!(store.channel(0).unwrap().to_vec(), expected);
        }
    }

    #[test]
    fn mismatched_frame_leaves_buffers_untouched() {
        let mut store = BufferStore::new(4, 2, 0.0).unwrap();
        let err = store.apply_frame(&SampleFrame::from([1.0, 2.0])).unwrap_err();
        assert!(matches!(
            err,
            ScopeError::ChannelMismatch {
                expected: 4,
                actual: 2
            }
        ));
        for buffer in store.channels() {
            assert_eq!(buffer.to_vec(), vec![0.0, 0.0]);
        }
    }

    #[test]
    fn drain_applies_pending_frames_and_reports_stop() {
        let (tx, mut rx) = feed_channel();
        let mut store = BufferStore::new(2, 4, 0.0).unwrap();

        tx.send(FeedEvent::Frame(SampleFrame::from([1.0, 10.0]))).unwrap();
        tx.send(FeedEvent::Frame(SampleFrame::from([1.0]))).unwrap();
        tx.send(FeedEvent::Frame(SampleFrame::from([2.0, 20.0]))).unwrap();
        tx.send(FeedEvent::Stopped {
            reason: Some("connection reset".into()),
        })
        .unwrap();

        let outcome = store.drain(&mut rx);
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.rejected, 1);
        assert!(outcome.feed_stopped);
        assert_eq!(outcome.stop_reason.as_deref(), Some("connection reset"));
        assert_eq!(store.channel(1).unwrap().to_vec(), vec![0.0, 0.0, 10.0, 20.0]);
    }

    #[test]
    fn drain_on_empty_feed_is_a_no_op() {
        let (_tx, mut rx) = feed_channel();
        let mut store = BufferStore::new(1, 2, 0.0).unwrap();
        assert_eq!(store.drain(&mut rx), DrainOutcome::default());
    }
}
