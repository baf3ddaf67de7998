use crate::prelude::{ScopeError, ScopeResult};

/// Fixed-capacity scrolling history of one channel.
///
/// Backed by a ring with a write cursor, so a push is O(1). Every read is
/// presented oldest to newest, the same order a shift-left buffer would hold.
#[derive(Debug, Clone)]
pub struct ChannelBuffer {
    samples: Vec<f32>,
    // Slot holding the oldest sample; the next push overwrites it.
    cursor: usize,
}

impl ChannelBuffer {
    /// Allocates `capacity` slots pre-filled with `fill`.
    pub fn new(capacity: usize, fill: f32) -> ScopeResult<Self> {
        if capacity == 0 {
            return Err(ScopeError::InvalidConfig(
                "channel buffer capacity must be non-zero".into(),
            ));
        }
        Ok(Self {
            samples: vec![fill; capacity],
            cursor: 0,
        })
    }

    /// Always equal to the capacity.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drops the oldest sample and appends `value` as the newest.
    pub fn push(&mut self, value: f32) {
        self.samples[self.cursor] = value;
        self.cursor = (self.cursor + 1) % self.samples.len();
    }

    /// Sample at logical position `index`, where 0 is the oldest.
    pub fn get(&self, index: usize) -> Option<f32> {
        if index >= self.samples.len() {
            return None;
        }
        Some(self.samples[(self.cursor + index) % self.samples.len()])
    }

    pub fn oldest(&self) -> f32 {
        self.samples[self.cursor]
    }

    pub fn newest(&self) -> f32 {
        let len = self.samples.len();
        self.samples[(self.cursor + len - 1) % len]
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let (newer, older) = self.samples.split_at(self.cursor);
        older.iter().chain(newer.iter()).copied()
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.iter().collect()
    }
}
