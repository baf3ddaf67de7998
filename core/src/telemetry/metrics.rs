use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Feed health shared between the receive loop and whoever reports on it.
///
/// Written only by the receive thread; readers take a [`FeedSnapshot`].
#[derive(Debug, Default)]
pub struct FeedMetrics {
    frames: AtomicUsize,
    decode_errors: AtomicUsize,
    live: AtomicBool,
}

/// Point-in-time copy of [`FeedMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    pub frames: usize,
    pub decode_errors: usize,
    /// True while the receive loop is running.
    pub live: bool,
}

impl FeedSnapshot {
    /// Share of datagrams that failed to decode, 0 when nothing arrived.
    pub fn error_ratio(&self) -> f32 {
        let total = self.frames + self.decode_errors;
        if total == 0 {
            0.0
        } else {
            self.decode_errors as f32 / total as f32
        }
    }
}

impl FeedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_live(&self) {
        self.live.store(true, Ordering::Release);
    }

    pub fn mark_stopped(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn record_frame(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            frames: self.frames.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            live: self.live.load(Ordering::Acquire),
        }
    }
}
