use serde::{Deserialize, Serialize};

/// One simultaneous reading of every channel, in channel order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleFrame {
    samples: Vec<f32>,
}

impl SampleFrame {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, channel: usize) -> Option<f32> {
        self.samples.get(channel).copied()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }
}

impl<const N: usize> From<[f32; N]> for SampleFrame {
    fn from(samples: [f32; N]) -> Self {
        Self::new(samples.to_vec())
    }
}

impl From<Vec<f32>> for SampleFrame {
    fn from(samples: Vec<f32>) -> Self {
        Self::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_exposes_channels_in_order() {
        let frame = SampleFrame::from([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(frame.len(), 4);
        assert_eq!(frame.get(0), Some(1.0));
        assert_eq!(frame.get(3), Some(4.0));
        assert_eq!(frame.get(4), None);
    }
}
