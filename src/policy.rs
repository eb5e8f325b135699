use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::history::History;
use crate::rng::RandomSource;

/// Where the carver resumes once its cursor has no unvisited neighbor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BacktrackPolicy {
    /// Pop the most recent entry (classic depth-first stack).
    #[default]
    Trackback,
    /// Take an entry chosen by `draw % len` and swap-remove it.
    Random,
    /// Take the oldest entry and swap-remove it.
    Restart,
}

impl BacktrackPolicy {
    /// Removes the next backtrack target from `history` and returns it, or
    /// `None` when the history is exhausted.
    pub fn take_next(self, history: &mut History, rng: &mut impl RandomSource) -> Option<u16> {
        if history.is_empty() {
            return None;
        }
        match self {
            BacktrackPolicy::Trackback => history.pop(),
            BacktrackPolicy::Random => {
                // modulo bias for non power-of-two lengths is accepted
                let idx = rng.next_u16() as usize % history.len();
                Some(history.swap_remove(idx))
            }
            BacktrackPolicy::Restart => Some(history.swap_remove(0)),
        }
    }
}

impl FromStr for BacktrackPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trackback" => Ok(BacktrackPolicy::Trackback),
            "random" => Ok(BacktrackPolicy::Random),
            "restart" => Ok(BacktrackPolicy::Restart),
            _ => Err(ConfigError::InvalidPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for BacktrackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BacktrackPolicy::Trackback => write!(f, "trackback"),
            BacktrackPolicy::Random => write!(f, "random"),
            BacktrackPolicy::Restart => write!(f, "restart"),
        }
    }
}
