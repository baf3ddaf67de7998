use crate::generator::profile::WaveSource;
use crate::workflow::config::GeneratorConfig;
use anyhow::Context;
use log::{debug, info};
use scopecore::net::ScopeSender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Emits one datagram per interval until told to stop.
pub struct Runner {
    config: GeneratorConfig,
    source: WaveSource,
    sender: ScopeSender,
    sent: u64,
}

impl Runner {
    pub fn new(config: GeneratorConfig) -> anyhow::Result<Self> {
        let sender = ScopeSender::new(config.destination.as_str())
            .with_context(|| format!("opening sender towards {}", config.destination))?;
        let source = WaveSource::new(config.profile.clone())
            .context("validating sine profile")?;
        Ok(Self {
            config,
            source,
            sender,
            sent: 0,
        })
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Computes, encodes and sends a single frame, then advances the phase.
    pub fn step(&mut self) -> anyhow::Result<Vec<f32>> {
        let phase = self.source.phase();
        let values = self.source.next_values();
        self.sender
            .send_wave(&values)
            .with_context(|| format!("sending frame to {}", self.sender.destination()))?;
        self.sent += 1;
        debug!("frame {} phase {:.2} -> {:?}", self.sent, phase, values);
        Ok(values)
    }

    /// Sends until `running` is cleared or a send fails. The flag is only
    /// checked between iterations.
    pub fn run(&mut self, running: &AtomicBool) -> anyhow::Result<()> {
        info!(
            "sending {} channels to {} every {} ms",
            self.config.profile.channels,
            self.sender.destination(),
            self.config.interval_ms
        );
        while running.load(Ordering::Acquire) {
            self.step()?;
            thread::sleep(self.config.interval());
        }
        info!("generator stopped after {} frames", self.sent);
        Ok(())
    }

    pub fn run_for(&mut self, iterations: usize) -> anyhow::Result<()> {
        for _ in 0..iterations {
            self.step()?;
            thread::sleep(self.config.interval());
        }
        Ok(())
    }
}
