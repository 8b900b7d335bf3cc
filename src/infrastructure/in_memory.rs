use crate::domain::participant::ParticipantId;
use crate::domain::ports::{Ledger, TontineStore};
use crate::domain::tontine::Tontine;
use crate::error::{Result, TontineError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory ledger that records every payout it makes.
///
/// Uses `Arc<RwLock<HashMap<ParticipantId, u64>>>` so clones observe the
/// same credits. Ideal for simulations and tests.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    credits: Arc<RwLock<HashMap<ParticipantId, u64>>>,
}

impl InMemoryLedger {
    /// Creates a new, empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total amount credited to `id` so far.
    pub async fn credited(&self, id: &ParticipantId) -> u64 {
        let credits = self.credits.read().await;
        credits.get(id).copied().unwrap_or(0)
    }

    /// All credits, sorted by recipient.
    pub async fn credits(&self) -> Vec<(ParticipantId, u64)> {
        let credits = self.credits.read().await;
        let mut all: Vec<_> = credits.iter().map(|(k, v)| (k.clone(), *v)).collect();
        all.sort();
        all
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn transfer(&self, to: &ParticipantId, amount: u64) -> Result<()> {
        let mut credits = self.credits.write().await;
        let entry = credits.entry(to.clone()).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| TontineError::Ledger(format!("credit overflow for {}", to)))?;
        Ok(())
    }
}

/// A thread-safe in-memory slot for a single tontine snapshot.
#[derive(Default, Clone)]
pub struct InMemoryTontineStore {
    tontine: Arc<RwLock<Option<Tontine>>>,
}

impl InMemoryTontineStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TontineStore for InMemoryTontineStore {
    async fn save(&self, tontine: &Tontine) -> Result<()> {
        let mut slot = self.tontine.write().await;
        *slot = Some(tontine.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<Tontine>> {
        let slot = self.tontine.read().await;
        Ok(slot.clone())
    }

    async fn remove(&self) -> Result<()> {
        let mut slot = self.tontine.write().await;
        *slot = None;
        Ok(())
    }
}
