//! Timing configuration loaded from an optional TOML file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use grid_chase_engine::SessionConfig;
use serde::Deserialize;

/// Loop timing knobs, all expressed in milliseconds.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TimingConfig {
    /// Delay the authority loop sleeps twice per tick.
    frame_delay_ms: u64,
    /// Interval between player input actor decisions.
    player_interval_ms: u64,
    /// Interval between pursuer actor decisions.
    pursuer_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_delay_ms: 200,
            player_interval_ms: 100,
            pursuer_interval_ms: 250,
        }
    }
}

impl TimingConfig {
    /// Loads timing from the provided file, or falls back to the defaults
    /// when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading timing config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing timing config {}", path.display()))
    }

    pub(crate) fn into_session_config(self) -> SessionConfig {
        SessionConfig {
            frame_delay: Duration::from_millis(self.frame_delay_ms),
            player_interval: Duration::from_millis(self.player_interval_ms),
            pursuer_interval: Duration::from_millis(self.pursuer_interval_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: TimingConfig = toml::from_str("frame_delay_ms = 50").expect("valid toml");
        assert_eq!(
            parsed,
            TimingConfig {
                frame_delay_ms: 50,
                ..TimingConfig::default()
            }
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed: Result<TimingConfig, _> = toml::from_str("frame_rate = 60");
        assert!(parsed.is_err());
    }

    #[test]
    fn conversion_preserves_every_interval() {
        let session = TimingConfig::default().into_session_config();
        assert_eq!(session.frame_delay, Duration::from_millis(200));
        assert_eq!(session.player_interval, Duration::from_millis(100));
        assert_eq!(session.pursuer_interval, Duration::from_millis(250));
    }
}
