use crate::domain::config::TontineConfig;
use crate::domain::participant::{Participant, ParticipantId};
use crate::domain::ports::{ClockBox, LedgerBox, TontineStoreBox};
use crate::domain::tontine::{Phase, Tontine};
use crate::error::{Result, TontineError};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// The main entry point for running a tontine.
///
/// `TontineEngine` owns one [`Tontine`] together with the clock it reads,
/// the ledger that pays out the pool and the store that persists it.
/// Mutating operations hold the write lock for their whole duration, so
/// they are serialized per engine; queries share the read lock.
///
/// Once a claim succeeds the tontine stays in [`Phase::Closed`] with an
/// empty pool, and every later operation fails with
/// [`TontineError::AlreadyClosed`].
pub struct TontineEngine {
    config: TontineConfig,
    state: RwLock<Tontine>,
    clock: ClockBox,
    ledger: LedgerBox,
    store: TontineStoreBox,
}

impl TontineEngine {
    /// Creates a new tontine and persists its initial snapshot.
    ///
    /// # Arguments
    ///
    /// * `config` - The tontine parameters; rejected if `min_players < 2`.
    /// * `clock` - Time source sampled at the start of every operation.
    /// * `ledger` - Custody provider used to pay out claims.
    /// * `store` - Snapshot persistence.
    pub async fn create(
        config: TontineConfig,
        clock: ClockBox,
        ledger: LedgerBox,
        store: TontineStoreBox,
    ) -> Result<Self> {
        let mut tontine = Tontine::new(config)?;
        tontine.observe(clock.now());
        store.save(&tontine).await?;
        info!(
            dues = config.dues,
            interval = config.interval,
            min_players = config.min_players,
            allow_latecomers = config.allow_latecomers,
            "tontine created"
        );
        Ok(Self::from_parts(tontine, clock, ledger, store))
    }

    /// Restores the tontine previously saved in `store`.
    ///
    /// The snapshot is checked with [`Tontine::validate`] and the clock is
    /// caught up to the latest reading the snapshot recorded.
    pub async fn resume(clock: ClockBox, ledger: LedgerBox, store: TontineStoreBox) -> Result<Self> {
        let tontine = store.load().await?.ok_or(TontineError::NotFound)?;
        tontine.validate()?;
        clock.catch_up(tontine.observed_at());
        info!(
            phase = %tontine.phase(),
            balance = tontine.balance(),
            participants = tontine.participants().len(),
            at = clock.now(),
            "tontine resumed"
        );
        Ok(Self::from_parts(tontine, clock, ledger, store))
    }

    fn from_parts(tontine: Tontine, clock: ClockBox, ledger: LedgerBox, store: TontineStoreBox) -> Self {
        Self {
            config: *tontine.config(),
            state: RwLock::new(tontine),
            clock,
            ledger,
            store,
        }
    }

    /// Enrolls `caller` with a payment of `amount`.
    ///
    /// The new state is persisted before it becomes visible; a failed
    /// validation or store write leaves the engine untouched.
    pub async fn contribute(&self, caller: ParticipantId, amount: u64) -> Result<Phase> {
        let mut guard = self.state.write().await;
        let now = self.clock.now();

        let mut next = guard.clone();
        let phase = next.contribute(caller.clone(), amount, now)?;
        self.store.save(&next).await?;

        if phase != guard.phase() {
            info!(at = now, participants = next.participants().len(), "tontine started");
        }
        debug!(%caller, amount, balance = next.balance(), "contribution accepted");

        *guard = next;
        Ok(phase)
    }

    /// Persists the current clock reading with the snapshot, so time that
    /// passed without any contribution survives a resume. Does nothing once
    /// the tontine is closed.
    pub async fn checkpoint(&self) -> Result<()> {
        let mut guard = self.state.write().await;
        if guard.phase() == Phase::Closed {
            return Ok(());
        }

        let mut next = guard.clone();
        next.observe(self.clock.now());
        self.store.save(&next).await?;
        debug!(at = next.observed_at(), "tontine checkpointed");

        *guard = next;
        Ok(())
    }

    /// Pays the whole pool to `caller` and closes the tontine.
    ///
    /// The snapshot is removed from the store before the transfer; if the
    /// ledger then refuses the transfer the snapshot is written back and the
    /// engine stays as it was. The ledger error is returned even when that
    /// write-back fails too; the next [`TontineEngine::checkpoint`] or
    /// contribution saves the snapshot again.
    pub async fn claim(&self, caller: ParticipantId) -> Result<u64> {
        let mut guard = self.state.write().await;
        let now = self.clock.now();

        let payout = guard.check_claim(&caller, now)?;

        self.store.remove().await?;
        if let Err(e) = self.ledger.transfer(&caller, payout).await {
            warn!(%caller, payout, error = %e, "transfer failed, restoring tontine");
            if let Err(restore) = self.store.save(&guard).await {
                error!(
                    %caller,
                    payout,
                    ledger_error = %e,
                    store_error = %restore,
                    "transfer failed and the snapshot could not be restored"
                );
            }
            return Err(e);
        }

        let paid = guard.close();
        info!(%caller, payout = paid, at = now, "pool claimed, tontine closed");
        Ok(paid)
    }

    pub fn config(&self) -> &TontineConfig {
        &self.config
    }

    pub fn dues(&self) -> u64 {
        self.config.dues
    }

    pub fn interval(&self) -> u64 {
        self.config.interval
    }

    pub fn min_players(&self) -> u32 {
        self.config.min_players
    }

    pub fn allow_latecomers(&self) -> bool {
        self.config.allow_latecomers
    }

    /// Current phase; [`Phase::Closed`] once the pool has been claimed.
    pub async fn phase(&self) -> Phase {
        self.state.read().await.phase()
    }

    /// Funds currently held in custody.
    pub async fn balance(&self) -> u64 {
        self.state.read().await.balance()
    }

    pub async fn started_at(&self) -> Option<u64> {
        self.state.read().await.started_at()
    }

    pub async fn participants(&self) -> Vec<Participant> {
        self.state.read().await.participants().to_vec()
    }

    /// Whether `id` has been eliminated as of the clock's current reading.
    pub async fn is_eliminated(&self, id: &ParticipantId) -> bool {
        let now = self.clock.now();
        self.state.read().await.is_eliminated(id, now)
    }

    /// `false` once the tontine has been claimed and closed.
    pub async fn exists(&self) -> bool {
        self.state.read().await.phase() != Phase::Closed
    }
}
