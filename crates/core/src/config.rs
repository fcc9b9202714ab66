use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Spins after which the match ends on runs.
pub const MAX_SPINS: u32 = 12;
/// Wickets that knock a player out.
pub const KNOCKOUT_WICKETS: u32 = 2;
/// Time the wheel spends turning before its result counts.
pub const SPIN_DELAY: Duration = Duration::from_millis(7000);
pub const DEFAULT_SEED: u64 = 0xC0FFEE;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    pub seed: u64,
    #[serde(default = "default_spin_delay_ms")]
    pub spin_delay_ms: u64,
}

fn default_spin_delay_ms() -> u64 {
    SPIN_DELAY.as_millis() as u64
}

impl SessionConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Results land on the same call that requested them.
    pub fn instant(seed: u64) -> Self {
        Self {
            seed,
            spin_delay_ms: 0,
        }
    }

    pub fn spin_delay(&self) -> Duration {
        Duration::from_millis(self.spin_delay_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            spin_delay_ms: default_spin_delay_ms(),
        }
    }
}
