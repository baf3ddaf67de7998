//! Fixed-width datagram layout: one little-endian `f32` per channel, no
//! header, no length prefix, no sequence number.

use crate::prelude::{ScopeError, ScopeResult, DEFAULT_CHANNELS};
use crate::wire::frame::SampleFrame;

const SAMPLE_WIDTH: usize = std::mem::size_of::<f32>();

/// Encodes and decodes sample frames for a fixed channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCodec {
    channels: usize,
}

impl FrameCodec {
    pub fn new(channels: usize) -> Self {
        Self { channels }
    }

    /// Exact payload size of one datagram.
    pub fn frame_len(&self) -> usize {
        self.channels * SAMPLE_WIDTH
    }

    pub fn encode(&self, frame: &SampleFrame) -> Vec<u8> {
        let mut out = Vec::with_capacity(frame.len() * SAMPLE_WIDTH);
        encode_into(frame.as_slice(), &mut out);
        out
    }

    /// Decodes a whole datagram. Any length other than `frame_len` is rejected
    /// without producing a partial frame.
    pub fn decode(&self, payload: &[u8]) -> ScopeResult<SampleFrame> {
        let expected = self.frame_len();
        if payload.len() != expected {
            return Err(ScopeError::Decode {
                expected,
                actual: payload.len(),
            });
        }

        let samples = payload
            .chunks_exact(SAMPLE_WIDTH)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        Ok(SampleFrame::new(samples))
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNELS)
    }
}

/// Appends `samples` to `out` as consecutive little-endian `f32` values.
pub fn encode_into(samples: &[f32], out: &mut Vec<u8>) {
    out.reserve(samples.len() * SAMPLE_WIDTH);
    for sample in samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_matches_wire_layout() {
        let codec = FrameCodec::default();
        let bytes = codec.encode(&SampleFrame::from([1.0, -2.0, 0.5, 0.0]));
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[4..8], &(-2.0f32).to_le_bytes());
        assert_eq!(&bytes[8..12], &0.5f32.to_le_bytes());
        assert_eq!(&bytes[12..16], &0.0f32.to_le_bytes());
    }

    #[test]
    fn decode_is_bit_exact() {
        let codec = FrameCodec::default();
        let values = [f32::MIN_POSITIVE, -0.0, 70.710_68, f32::MAX];
        let decoded = codec
            .decode(&codec.encode(&SampleFrame::from(values)))
            .unwrap();
        for (got, want) in decoded.as_slice().iter().zip(values.iter()) {
            assert_eq!(got.to_bits(), want.to_bits());
        }
    }

    #[test]
    fn decode_rejects_wrong_lengths() {
        let codec = FrameCodec::default();
        for len in [0usize, 4, 15, 17, 32] {
            let payload = vec![0u8; len];
            match codec.decode(&payload) {
                Err(ScopeError::Decode { expected, actual }) => {
                    assert_eq!(expected, 16);
                    assert_eq!(actual, len);
                }
                other => panic!("expected decode error for {len} bytes, got {other:?}"),
            }
        }
    }

    #[test]
    fn codec_follows_configured_channel_count() {
        let codec = FrameCodec::new(2);
        assert_eq!(codec.frame_len(), 8);
        let frame = codec.decode(&codec.encode(&SampleFrame::from([3.0, 4.0]))).unwrap();
        assert_eq!(frame.as_slice(), &[3.0, 4.0]);
    }
}
