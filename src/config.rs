//! # Config
//!
//! Tunables for a sweep. Every option has a default and can be overridden from the
//! environment (`CHASE_*` variables), there is no argument parsing. Loading is done through
//! a lookup function so the same code path is used for the process environment and tests.
use crate::error::ConfigError;
use log::info;
use std::str::FromStr;

/// Smallest accepted minimum size; below this the quartile points of the first step collapse
pub const MIN_SLOTS_FLOOR: usize = 8;

pub const ENV_MIN_SLOTS: &str = "CHASE_MIN_SLOTS";
pub const ENV_MAX_SLOTS: &str = "CHASE_MAX_SLOTS";
pub const ENV_TRIALS: &str = "CHASE_TRIALS";
pub const ENV_ITERATIONS: &str = "CHASE_ITERATIONS";
pub const ENV_SHUFFLE: &str = "CHASE_SHUFFLE";
pub const ENV_STRIDE: &str = "CHASE_STRIDE";
pub const ENV_SEED: &str = "CHASE_SEED";
pub const ENV_WARMUP: &str = "CHASE_WARMUP";
pub const ENV_PIN_CORE: &str = "CHASE_PIN_CORE";
pub const ENV_MAX_PRIORITY: &str = "CHASE_MAX_PRIORITY";

/// Parameters of one latency sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Working-set size (in slots) of the first full step
    pub min_slots: usize,
    /// Sweep stops once the doubling size exceeds this many slots
    pub max_slots: usize,
    /// Timed trials per point, the minimum is kept
    pub trials: usize,
    /// Dependent loads per trial
    pub iterations: usize,
    /// Randomize traversal order instead of walking the stride lattice
    pub shuffle: bool,
    /// Slot skip distance during chain construction
    pub stride: usize,
    /// Fixed shuffle seed, OS entropy when unset
    pub seed: Option<u64>,
    /// Run one untimed lap over the chain before the trials of each point
    pub warmup: bool,
    /// Optional CPU core to pin the measuring thread to
    pub pin_core: Option<usize>,
    /// Raise the measuring thread to maximum OS priority
    pub max_priority: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            min_slots: 1024,
            max_slots: 1 << 27,
            trials: 10,
            iterations: 1_000_000,
            shuffle: false,
            stride: 1,
            seed: None,
            warmup: false,
            pin_core: None,
            max_priority: false,
        }
    }
}

impl SweepConfig {
    /// Build a config from the process environment and validate it
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from `lookup`, falling back to defaults for missing keys, and validate it
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SweepConfig::default();
        let config = SweepConfig {
            min_slots: parse_or(&lookup, ENV_MIN_SLOTS, defaults.min_slots)?,
            max_slots: parse_or(&lookup, ENV_MAX_SLOTS, defaults.max_slots)?,
            trials: parse_or(&lookup, ENV_TRIALS, defaults.trials)?,
            iterations: parse_or(&lookup, ENV_ITERATIONS, defaults.iterations)?,
            shuffle: flag_or(&lookup, ENV_SHUFFLE, defaults.shuffle)?,
            stride: parse_or(&lookup, ENV_STRIDE, defaults.stride)?,
            seed: parse_opt(&lookup, ENV_SEED)?,
            warmup: flag_or(&lookup, ENV_WARMUP, defaults.warmup)?,
            pin_core: parse_opt(&lookup, ENV_PIN_CORE)?,
            max_priority: flag_or(&lookup, ENV_MAX_PRIORITY, defaults.max_priority)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a meaningful sweep
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_slots < MIN_SLOTS_FLOOR {
            return Err(ConfigError::MinTooSmall {
                min: self.min_slots,
                floor: MIN_SLOTS_FLOOR,
            });
        }
        if self.max_slots < self.min_slots {
            return Err(ConfigError::MaxBelowMin {
                min: self.min_slots,
                max: self.max_slots,
            });
        }
        if self.trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.stride == 0 {
            return Err(ConfigError::ZeroStride);
        }
        Ok(())
    }

    /// Log the effective settings
    pub fn log_summary(&self) {
        info!(
            "Sweeping {} to {} slots, {} trials x {} loads per point",
            self.min_slots, self.max_slots, self.trials, self.iterations
        );
        info!(
            "Traversal: {}, stride {}, warmup {}",
            if self.shuffle { "shuffled" } else { "sequential" },
            self.stride,
            if self.warmup { "on" } else { "off" }
        );
        if let Some(seed) = self.seed {
            info!("Shuffle seed: {seed:#x}");
        }
    }
}

fn parse_opt<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Parse { key, value: raw }),
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}

fn flag_or<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Parse { key, value: raw }),
    }
}
