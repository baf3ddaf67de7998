use anyhow::ensure;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Phase-advancing sine source; channel `k` is scaled by `k + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SineProfile {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase_step: f64,
    pub channels: usize,
    /// Peak of uniform jitter added to each sample; 0 disables it.
    pub noise: f32,
    pub seed: u64,
}

impl Default for SineProfile {
    fn default() -> Self {
        Self {
            amplitude: 100.0,
            frequency: 0.5,
            phase_step: 0.01,
            channels: scopecore::prelude::DEFAULT_CHANNELS,
            noise: 0.0,
            seed: 0,
        }
    }
}

impl SineProfile {
    /// Rejects parameters that would emit NaN/inf or break the jitter range.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.channels > 0, "channels must be non-zero");
        ensure!(self.amplitude.is_finite(), "amplitude must be finite");
        ensure!(self.frequency.is_finite(), "frequency must be finite");
        ensure!(self.phase_step.is_finite(), "phase_step must be finite");
        ensure!(
            self.noise.is_finite() && self.noise >= 0.0,
            "noise must be a finite, non-negative peak, got {}",
            self.noise
        );
        Ok(())
    }

    /// Noise-free sample set at `phase`.
    pub fn values(&self, phase: f64) -> Vec<f32> {
        let base = self.amplitude as f64 * (2.0 * PI * self.frequency as f64 * phase).sin();
        (0..self.channels)
            .map(|k| (base * (k + 1) as f64) as f32)
            .collect()
    }
}

/// Walks a [`SineProfile`] one phase step at a time.
pub struct WaveSource {
    profile: SineProfile,
    phase: f64,
    rng: StdRng,
}

impl WaveSource {
    pub fn new(profile: SineProfile) -> anyhow::Result<Self> {
        profile.validate()?;
        let rng = StdRng::seed_from_u64(profile.seed);
        Ok(Self {
            profile,
            phase: 0.0,
            rng,
        })
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Samples at the current phase, then advances it.
    pub fn next_values(&mut self) -> Vec<f32> {
        let mut values = self.profile.values(self.phase);
        let noise = self.profile.noise;
        if noise > 0.0 {
            for value in values.iter_mut() {
                *value += self.rng.gen_range(-noise..noise);
            }
        }
        self.phase += self.profile.phase_step;
        values
    }
}
