use super::participant::ParticipantId;
use super::tontine::Tontine;
use crate::error::Result;
use async_trait::async_trait;

/// Source of the current time in seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;

    /// Called on resume with the latest reading a stored tontine saw.
    /// Simulated clocks move forward to it; wall clocks ignore it.
    fn catch_up(&self, _at: u64) {}
}

/// Custody provider that actually moves funds out of the pool.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn transfer(&self, to: &ParticipantId, amount: u64) -> Result<()>;
}

/// Persistence for a tontine snapshot.
#[async_trait]
pub trait TontineStore: Send + Sync {
    async fn save(&self, tontine: &Tontine) -> Result<()>;
    async fn load(&self) -> Result<Option<Tontine>>;
    async fn remove(&self) -> Result<()>;
}

pub type ClockBox = Box<dyn Clock>;
pub type LedgerBox = Box<dyn Ledger>;
pub type TontineStoreBox = Box<dyn TontineStore>;
