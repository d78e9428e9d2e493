//! Randomizer tunables
//!
//! Read from `assets/config.ron` when present. Durations are stored in
//! milliseconds so the file stays hand-editable.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::wheel::resolver::MAX_JITTER_FRACTION;
use crate::wheel::{AnimatorSettings, SpinTuning, TickTuning};

/// Default location of the config file
pub const CONFIG_PATH: &str = "assets/config.ron";

/// Spin shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    pub duration_ms: u64,
    pub min_turns: u32,
    pub max_turns: u32,
    /// Fraction of one sector the landing point may wander
    pub jitter_fraction: f64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            duration_ms: 4000,
            min_turns: 3,
            max_turns: 5,
            jitter_fraction: 0.4,
        }
    }
}

/// Tick feedback during a spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    pub lead_in_ms: u64,
    pub min_count: u32,
    pub max_count: u32,
    pub min_gap_ms: u64,
    pub max_gap_ms: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            lead_in_ms: 50,
            min_count: 20,
            max_count: 30,
            min_gap_ms: 30,
            max_gap_ms: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomizerConfig {
    pub spin: SpinConfig,
    pub ticks: TickConfig,
    /// Pause between the class wheel landing and the build wheel starting
    pub inter_wheel_delay_ms: u64,
    /// Entries kept in the recent results list
    pub history_limit: usize,
    /// Game selected at startup
    pub default_game: String,
    /// Master volume for feedback sounds, 0.0 to 1.0
    pub volume: f64,
}

impl Default for RandomizerConfig {
    fn default() -> Self {
        Self {
            spin: SpinConfig::default(),
            ticks: TickConfig::default(),
            inter_wheel_delay_ms: 100,
            history_limit: 10,
            default_game: "diablo4".to_string(),
            volume: 1.0,
        }
    }
}

impl RandomizerConfig {
    /// Load from the default path
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    /// Load from `path`. Missing or broken files yield the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Self::default();
        }

        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| ron::from_str::<Self>(&text).map_err(|e| e.to_string()));

        match parsed {
            Ok(config) => {
                log::info!("Config loaded from {:?}", path);
                config.sanitized()
            }
            Err(e) => {
                log::warn!("Failed to load config {:?}: {}. Using defaults.", path, e);
                Self::default()
            }
        }
    }

    /// Clamp values that would break spin invariants
    pub fn sanitized(mut self) -> Self {
        let spin = &mut self.spin;
        spin.duration_ms = spin.duration_ms.max(1);
        spin.min_turns = spin.min_turns.max(1);
        spin.max_turns = spin.max_turns.max(spin.min_turns);
        spin.jitter_fraction = if spin.jitter_fraction.is_finite() {
            spin.jitter_fraction.clamp(0.0, MAX_JITTER_FRACTION)
        } else {
            0.0
        };

        let ticks = &mut self.ticks;
        ticks.min_count = ticks.min_count.max(1);
        ticks.max_count = ticks.max_count.max(ticks.min_count);
        ticks.min_gap_ms = ticks.min_gap_ms.max(1);
        ticks.max_gap_ms = ticks.max_gap_ms.max(ticks.min_gap_ms);

        self.history_limit = self.history_limit.max(1);
        self.volume = if self.volume.is_finite() { self.volume.clamp(0.0, 1.0) } else { 1.0 };
        self
    }

    pub fn spin_duration(&self) -> Duration {
        Duration::from_millis(self.spin.duration_ms)
    }

    pub fn inter_wheel_delay(&self) -> Duration {
        Duration::from_millis(self.inter_wheel_delay_ms)
    }

    /// Per-wheel settings derived from this config
    pub fn animator_settings(&self) -> AnimatorSettings {
        AnimatorSettings {
            duration: self.spin_duration(),
            spin: SpinTuning {
                full_turns: self.spin.min_turns..=self.spin.max_turns,
                jitter_fraction: self.spin.jitter_fraction,
            },
            ticks: TickTuning {
                lead_in: Duration::from_millis(self.ticks.lead_in_ms),
                count: self.ticks.min_count..=self.ticks.max_count,
                min_gap: Duration::from_millis(self.ticks.min_gap_ms),
                max_gap: Duration::from_millis(self.ticks.max_gap_ms),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_wheel_defaults() {
        let settings = RandomizerConfig::default().animator_settings();
        assert_eq!(settings, AnimatorSettings::default());
    }

    #[test]
    fn test_sanitized_clamps() {
        let mut config = RandomizerConfig::default();
        config.spin.jitter_fraction = 3.0;
        config.spin.min_turns = 0;
        config.spin.max_turns = 0;
        config.ticks.min_count = 10;
        config.ticks.max_count = 2;
        config.ticks.min_gap_ms = 500;
        config.ticks.max_gap_ms = 100;
        config.history_limit = 0;
        config.volume = 4.0;

        let config = config.sanitized();
        assert_eq!(config.spin.jitter_fraction, MAX_JITTER_FRACTION);
        assert_eq!((config.spin.min_turns, config.spin.max_turns), (1, 1));
        assert_eq!((config.ticks.min_count, config.ticks.max_count), (10, 10));
        assert_eq!(config.ticks.max_gap_ms, 500);
        assert_eq!(config.history_limit, 1);
        assert_eq!(config.volume, 1.0);
    }

    #[test]
    fn test_nan_jitter_disabled() {
        let mut config = RandomizerConfig::default();
        config.spin.jitter_fraction = f64::NAN;
        assert_eq!(config.sanitized().spin.jitter_fraction, 0.0);
    }

    #[test]
    fn test_partial_file() {
        let dir = std::env::temp_dir().join(format!("buildwheel-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.ron");
        fs::write(&path, "(inter_wheel_delay_ms: 250, spin: (duration_ms: 2000))").unwrap();

        let config = RandomizerConfig::load_from(&path);
        assert_eq!(config.inter_wheel_delay(), Duration::from_millis(250));
        assert_eq!(config.spin_duration(), Duration::from_millis(2000));
        assert_eq!(config.spin.max_turns, 5);
        assert_eq!(config.history_limit, 10);

        fs::write(&path, "not ron at all (").unwrap();
        assert_eq!(RandomizerConfig::load_from(&path), RandomizerConfig::default());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_shipped_config_is_default() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(CONFIG_PATH);
        assert_eq!(RandomizerConfig::load_from(&path), RandomizerConfig::default());
    }
}
