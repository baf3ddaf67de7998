pub mod metrics;

pub use metrics::{FeedMetrics, FeedSnapshot};
