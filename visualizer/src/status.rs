//! Feed health as shown in the scope's status line.

use scopecore::prelude::DrainOutcome;
use scopecore::telemetry::FeedSnapshot;
use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedStatus {
    Live,
    Stopped(Option<String>),
    Unavailable,
}

impl FeedStatus {
    /// Folds one drain of the feed into the status. Returns true when the feed
    /// has just gone from live to stopped.
    pub fn observe(&mut self, outcome: &DrainOutcome) -> bool {
        if *self == FeedStatus::Live && outcome.feed_stopped {
            *self = FeedStatus::Stopped(outcome.stop_reason.clone());
            return true;
        }
        false
    }

    pub fn label(&self) -> String {
        match self {
            FeedStatus::Live => "live".to_string(),
            FeedStatus::Stopped(Some(reason)) => format!("feed stopped: {reason}"),
            FeedStatus::Stopped(None) => "feed stopped".to_string(),
            FeedStatus::Unavailable => "unavailable".to_string(),
        }
    }
}

pub fn status_line(
    local_addr: SocketAddr,
    snapshot: &FeedSnapshot,
    status: &FeedStatus,
) -> String {
    format!(
        "UDP {} | frames {} | decode errors {} ({:.1}%) | {}",
        local_addr,
        snapshot.frames,
        snapshot.decode_errors,
        snapshot.error_ratio() * 100.0,
        status.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_feed_records_stop_reason() {
        let mut status = FeedStatus::Live;
        let outcome = DrainOutcome {
            applied: 3,
            feed_stopped: true,
            stop_reason: Some("connection refused".into()),
            ..Default::default()
        };

        assert!(status.observe(&outcome));
        assert_eq!(status, FeedStatus::Stopped(Some("connection refused".into())));
        assert_eq!(status.label(), "feed stopped: connection refused");
    }

    #[test]
    fn frames_alone_keep_the_feed_live() {
        let mut status = FeedStatus::Live;
        let outcome = DrainOutcome {
            applied: 10,
            ..Default::default()
        };
        assert!(!status.observe(&outcome));
        assert_eq!(status, FeedStatus::Live);
    }

    #[test]
    fn first_stop_reason_is_kept() {
        let mut status = FeedStatus::Live;
        status.observe(&DrainOutcome {
            feed_stopped: true,
            stop_reason: Some("reset".into()),
            ..Default::default()
        });
        let changed = status.observe(&DrainOutcome {
            feed_stopped: true,
            ..Default::default()
        });
        assert!(!changed);
        assert_eq!(status, FeedStatus::Stopped(Some("reset".into())));
    }

    #[test]
    fn status_line_reports_counters_and_state() {
        let snapshot = FeedSnapshot {
            frames: 3,
            decode_errors: 1,
            live: false,
        };
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        assert_eq!(
            status_line(addr, &snapshot, &FeedStatus::Stopped(None)),
            "UDP 127.0.0.1:12345 | frames 3 | decode errors 1 (25.0%) | feed stopped"
        );
    }
}
