use crate::error::{Result, TontineError};
use serde::{Deserialize, Serialize};

/// The smallest number of players a tontine can be started with.
pub const MIN_PLAYERS_FLOOR: u32 = 2;

/// Immutable parameters of a tontine, fixed at creation.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct TontineConfig {
    /// Exact amount every participant must pay to enroll.
    pub dues: u64,
    /// Elimination window in seconds.
    pub interval: u64,
    /// Enrollment count that moves the tontine from open to started.
    pub min_players: u32,
    /// Whether enrollment stays open after the tontine has started.
    #[serde(default)]
    pub allow_latecomers: bool,
}

impl TontineConfig {
    pub fn new(dues: u64, interval: u64, min_players: u32, allow_latecomers: bool) -> Result<Self> {
        let config = Self {
            dues,
            interval,
            min_players,
            allow_latecomers,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants that cannot be expressed in the field types.
    pub fn validate(&self) -> Result<()> {
        if self.min_players < MIN_PLAYERS_FLOOR {
            return Err(TontineError::InvalidConfig(format!(
                "min_players must be at least {}, got {}",
                MIN_PLAYERS_FLOOR, self.min_players
            )));
        }
        Ok(())
    }
}
