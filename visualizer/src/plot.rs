//! Screen-space helpers for the scrolling line plot.

use scopecore::math::StatsHelper;
use scopecore::processing::{BufferStore, ChannelBuffer};

/// Pen colours, cycled when there are more channels than entries.
pub const PEN_COLORS: [(u8, u8, u8); 4] = [(255, 0, 0), (0, 255, 0), (0, 0, 255), (100, 100, 100)];

pub fn pen_color(channel: usize) -> (u8, u8, u8) {
    PEN_COLORS[channel % PEN_COLORS.len()]
}

pub fn channel_label(channel: usize) -> String {
    format!("wave{channel}")
}

/// Reduces a buffer to at most two points per pixel column, keeping each
/// column's minimum and maximum so peaks survive. Points are `(index, value)`
/// pairs in oldest-to-newest order.
pub fn decimate(buffer: &ChannelBuffer, columns: usize) -> Vec<(usize, f32)> {
    let len = buffer.len();
    let columns = columns.max(1);
    if len <= columns * 2 {
        return buffer.iter().enumerate().collect();
    }

    let mut points = Vec::with_capacity(columns * 2);
    let mut bucket: Option<(usize, (usize, f32), (usize, f32))> = None;

    for (index, value) in buffer.iter().enumerate() {
        let column = index * columns / len;
        if let Some((current, low, high)) = bucket.as_mut() {
            if *current == column {
                if value < low.1 {
                    *low = (index, value);
                }
                if value > high.1 {
                    *high = (index, value);
                }
                continue;
            }
        }
        if let Some((_, low, high)) = bucket.take() {
            push_extremes(&mut points, low, high);
        }
        bucket = Some((column, (index, value), (index, value)));
    }
    if let Some((_, low, high)) = bucket {
        push_extremes(&mut points, low, high);
    }
    points
}

fn push_extremes(points: &mut Vec<(usize, f32)>, low: (usize, f32), high: (usize, f32)) {
    if low.0 == high.0 {
        points.push(low);
    } else if low.0 < high.0 {
        points.push(low);
        points.push(high);
    } else {
        points.push(high);
        points.push(low);
    }
}

/// Vertical range shared by every channel, padded so flat lines stay visible.
pub fn value_range(store: &BufferStore) -> (f32, f32) {
    let (min, max) = store
        .channels()
        .iter()
        .filter_map(|buffer| StatsHelper::bounds(buffer.iter()))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), (min, max)| {
            (lo.min(min), hi.max(max))
        });

    if !min.is_finite() || !max.is_finite() {
        return (-1.0, 1.0);
    }
    let span = max - min;
    if span <= f32::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let pad = span * 0.05;
    (min - pad, max + pad)
}

/// Maps a sample position and value into a `width` x `height` plot area,
/// oldest sample on the left edge, newest on the right.
pub fn project(
    index: usize,
    value: f32,
    len: usize,
    range: (f32, f32),
    width: f32,
    height: f32,
) -> (f32, f32) {
    let x = if len > 1 {
        index as f32 / (len - 1) as f32 * width
    } else {
        0.0
    };
    let normalized = (value - range.0) / (range.1 - range.0);
    let y = height - normalized.clamp(0.0, 1.0) * height;
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopecore::wire::SampleFrame;

    #[test]
    fn short_buffers_are_not_decimated() {
        let mut buffer = ChannelBuffer::new(4, 0.0).unwrap();
        buffer.push(2.0);
        assert_eq!(
            decimate(&buffer, 10),
            vec![(0, 0.0), (1, 0.0), (2, 0.0), (3, 2.0)]
        );
    }

    #[test]
    fn decimation_keeps_column_peaks() {
        let mut buffer = ChannelBuffer::new(100, 0.0).unwrap();
        for i in 0..100 {
            buffer.push(if i == 37 { 50.0 } else { (i % 3) as f32 });
        }
        let points = decimate(&buffer, 10);
        assert!(points.len() <= 20);
        assert!(points.contains(&(37, 50.0)));
        assert!(points.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn value_range_pads_flat_signal() {
        let store = BufferStore::new(2, 3, 0.0).unwrap();
        assert_eq!(value_range(&store), (-1.0, 1.0));
    }

    #[test]
    fn value_range_spans_all_channels() {
        let mut store = BufferStore::new(2, 2, 0.0).unwrap();
        store.apply_frame(&SampleFrame::from([-10.0, 30.0])).unwrap();
        let (min, max) = value_range(&store);
        assert!(min < -10.0 && min > -13.0);
        assert!(max > 30.0 && max < 33.0);
    }

    #[test]
    fn projection_puts_oldest_left_and_newest_right() {
        let range = (0.0, 10.0);
        assert_eq!(project(0, 0.0, 5, range, 100.0, 50.0), (0.0, 50.0));
        assert_eq!(project(4, 10.0, 5, range, 100.0, 50.0), (100.0, 0.0));
        assert_eq!(project(2, 5.0, 5, range, 100.0, 50.0), (50.0, 25.0));
    }

    #[test]
    fn pens_cycle_past_four_channels() {
        assert_eq!(pen_color(0), (255, 0, 0));
        assert_eq!(pen_color(5), (0, 255, 0));
        assert_eq!(channel_label(3), "wave3");
    }
}
