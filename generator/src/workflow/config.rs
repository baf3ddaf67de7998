use crate::generator::profile::SineProfile;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub destination: String,
    pub interval_ms: u64,
    pub profile: SineProfile,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            destination: "127.0.0.1:12345".into(),
            interval_ms: 10,
            profile: SineProfile::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading generator config {}", path_ref.display()))?;
        let config: GeneratorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing generator config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(destination: String, interval_ms: u64, profile: SineProfile) -> Self {
        Self {
            destination,
            interval_ms,
            profile,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_targets_local_scope() {
        let cfg = GeneratorConfig::default();
        assert_eq!(cfg.destination, "127.0.0.1:12345");
        assert_eq!(cfg.interval(), Duration::from_millis(10));
        assert_eq!(cfg.profile.amplitude, 100.0);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"destination: 10.0.0.2:4000\ninterval_ms: 5\nprofile:\n  amplitude: 2.5\n  channels: 2\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = GeneratorConfig::load(&path).unwrap();
        assert_eq!(cfg.destination, "10.0.0.2:4000");
        assert_eq!(cfg.interval_ms, 5);
        assert_eq!(cfg.profile.amplitude, 2.5);
        assert_eq!(cfg.profile.channels, 2);
        assert_eq!(cfg.profile.frequency, 0.5);
    }
}
