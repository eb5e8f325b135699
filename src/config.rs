use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::error::ConfigError;
use crate::policy::BacktrackPolicy;
use crate::rng::DEFAULT_SEED;

pub const DEFAULT_FPS: u64 = 60;
pub const DEFAULT_CARVE_DELAY_MS: u64 = 0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub seed: u16,
    pub policy: BacktrackPolicy,
    pub fps: u64,
    pub carve_delay: Duration,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            policy: BacktrackPolicy::default(),
            fps: DEFAULT_FPS,
            carve_delay: Duration::from_millis(DEFAULT_CARVE_DELAY_MS),
            log_file: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `MAZE_*` variables resolved through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let seed = match lookup("MAZE_SEED") {
            Some(v) => parse_seed(&v)?,
            None => DEFAULT_SEED,
        };
        let policy = match lookup("MAZE_POLICY") {
            Some(v) => v.parse()?,
            None => BacktrackPolicy::default(),
        };
        let fps = read_positive(&lookup, "MAZE_FPS").unwrap_or(DEFAULT_FPS);
        let carve_delay_ms = lookup("MAZE_CARVE_DELAY_MS")
            .and_then(|v| parse_or_warn("MAZE_CARVE_DELAY_MS", &v))
            .unwrap_or(DEFAULT_CARVE_DELAY_MS);
        let log_file = read_log_file(&lookup);

        Ok(Self {
            seed,
            policy,
            fps,
            carve_delay: Duration::from_millis(carve_delay_ms),
            log_file,
        })
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.fps.max(1))
    }
}

/// Resolves `MAZE_LOG` alone, so the subscriber can be installed before
/// [`Config::from_env`] emits its warnings.
pub fn log_file_from_env() -> Option<PathBuf> {
    read_log_file(&|key: &str| std::env::var(key).ok())
}

fn read_log_file(lookup: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    lookup("MAZE_LOG")
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

fn read_positive(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    lookup(key)
        .and_then(|v| parse_or_warn(key, &v))
        .filter(|v| *v > 0)
}

fn parse_or_warn(key: &str, value: &str) -> Option<u64> {
    match value.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring {}={:?}: not a number", key, value);
            None
        }
    }
}

pub fn parse_seed(value: &str) -> Result<u16, ConfigError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("random") {
        return Ok(rand::thread_rng().gen_range(1..=u16::MAX));
    }
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse::<u16>(),
    };
    match parsed {
        Ok(0) => Err(ConfigError::ZeroSeed),
        Ok(seed) => Ok(seed),
        Err(_) => Err(ConfigError::InvalidSeed(value.to_string())),
    }
}
