use super::config::TontineConfig;
use super::participant::{Participant, ParticipantId};
use crate::error::{Result, TontineError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Lifecycle stage of a tontine. Only ever moves forward.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Open,
    Started,
    Closed,
}

impl Phase {
    /// Numeric state code: 0 open, 1 started, 2 closed.
    pub fn code(self) -> u8 {
        match self {
            Phase::Open => 0,
            Phase::Started => 1,
            Phase::Closed => 2,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Open => "open",
            Phase::Started => "started",
            Phase::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// The tontine state machine and its pooled balance.
///
/// All transitions take the current clock reading as an argument so the
/// type stays deterministic. Every fallible operation validates before it
/// mutates: an `Err` means nothing changed.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Tontine {
    config: TontineConfig,
    phase: Phase,
    participants: Vec<Participant>,
    balance: u64,
    started_at: Option<u64>,
    /// Latest clock reading this tontine has seen.
    #[serde(default)]
    observed_at: u64,
}

impl Tontine {
    pub fn new(config: TontineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            phase: Phase::Open,
            participants: Vec::new(),
            balance: 0,
            started_at: None,
            observed_at: 0,
        })
    }

    /// Checks a tontine that did not come from [`Tontine::new`], such as a
    /// deserialized snapshot, against the invariants the transitions keep.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;

        let invalid = |reason: String| -> Result<()> { Err(TontineError::InvalidConfig(reason)) };
        let count = self.participants.len();
        let min_players = self.config.min_players as usize;

        match (self.phase, self.started_at) {
            (Phase::Closed, _) => return invalid("a closed tontine cannot be restored".to_string()),
            (Phase::Open, Some(_)) => return invalid("open tontine has a start time".to_string()),
            (Phase::Started, None) => return invalid("started tontine has no start time".to_string()),
            (Phase::Open, None) if count >= min_players => {
                return invalid(format!("open tontine already has {} participants", count));
            }
            (Phase::Started, Some(_)) if count < min_players => {
                return invalid(format!("started tontine has only {} participants", count));
            }
            _ => {}
        }

        let mut seen = HashSet::new();
        for participant in &self.participants {
            if !participant.contributed {
                return invalid(format!("{} never contributed", participant.id));
            }
            if !seen.insert(&participant.id) {
                return invalid(format!("{} is enrolled twice", participant.id));
            }
        }

        let expected = (count as u64).checked_mul(self.config.dues);
        if expected != Some(self.balance) {
            return invalid(format!(
                "balance {} does not match {} participant(s) paying {}",
                self.balance, count, self.config.dues
            ));
        }

        Ok(())
    }

    pub fn config(&self) -> &TontineConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn started_at(&self) -> Option<u64> {
        self.started_at
    }

    pub fn observed_at(&self) -> u64 {
        self.observed_at
    }

    /// Records a clock reading; the stored reading never moves backwards.
    pub fn observe(&mut self, now: u64) {
        self.observed_at = self.observed_at.max(now);
    }

    /// Participants in enrollment order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// Enrolls `caller` by paying exactly the configured dues.
    ///
    /// Returns the phase after the enrollment; the enrollment that brings the
    /// count to `min_players` starts the tontine.
    pub fn contribute(&mut self, caller: ParticipantId, amount: u64, now: u64) -> Result<Phase> {
        match self.phase {
            Phase::Closed => return Err(TontineError::AlreadyClosed),
            Phase::Started if !self.config.allow_latecomers => {
                return Err(TontineError::WrongPhase(self.phase));
            }
            _ => {}
        }

        if amount != self.config.dues {
            return Err(TontineError::WrongAmount {
                expected: self.config.dues,
                actual: amount,
            });
        }

        if self.participant(&caller).is_some() {
            return Err(TontineError::AlreadyEnrolled(caller.to_string()));
        }

        let balance = self
            .balance
            .checked_add(amount)
            .ok_or(TontineError::Overflow)?;

        self.participants.push(Participant::enroll(caller, now));
        self.balance = balance;
        self.observe(now);

        if self.phase == Phase::Open && self.participants.len() == self.config.min_players as usize {
            self.phase = Phase::Started;
            self.started_at = Some(now);
        }

        Ok(self.phase)
    }

    /// Whether `id` has let its elimination window run out.
    ///
    /// Nobody is eliminated before the tontine starts, and unknown
    /// identities are never reported as eliminated.
    pub fn is_eliminated(&self, id: &ParticipantId, now: u64) -> bool {
        match (self.started_at, self.participant(id)) {
            (Some(started_at), Some(participant)) if self.phase == Phase::Started => {
                self.window_elapsed(participant, started_at, now)
            }
            _ => false,
        }
    }

    fn window_elapsed(&self, participant: &Participant, started_at: u64, now: u64) -> bool {
        let deadline = participant
            .active_since(started_at)
            .saturating_add(self.config.interval);
        now >= deadline
    }

    /// Checks whether `caller` may claim the pool right now and returns the
    /// payout they would receive. Does not change any state.
    pub fn check_claim(&self, caller: &ParticipantId, now: u64) -> Result<u64> {
        if self.phase == Phase::Closed {
            return Err(TontineError::AlreadyClosed);
        }

        let claimant = self
            .participant(caller)
            .ok_or_else(|| TontineError::NotParticipant(caller.to_string()))?;

        let started_at = match (self.phase, self.started_at) {
            (Phase::Started, Some(started_at)) => started_at,
            _ => {
                return Err(TontineError::NotEligible(
                    "the tontine has not started".to_string(),
                ));
            }
        };

        let remaining = self
            .participants
            .iter()
            .filter(|p| p.id != claimant.id)
            .filter(|p| !self.window_elapsed(p, started_at, now))
            .count();

        if remaining > 0 {
            return Err(TontineError::NotEligible(format!(
                "{} other participant(s) have not been eliminated",
                remaining
            )));
        }

        Ok(self.balance)
    }

    /// Closes the tontine and empties the pool, returning the amount that
    /// left custody. Callers must have passed [`Tontine::check_claim`].
    pub fn close(&mut self) -> u64 {
        let payout = self.balance;
        self.balance = 0;
        self.participants.clear();
        self.phase = Phase::Closed;
        payout
    }
}
