use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of a caller, such as an address or account name.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A participant's enrollment record. Written once and never updated.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    /// Clock reading (seconds) at enrollment.
    pub enrolled_at: u64,
    /// Always `true` for a live record: enrollment and payment are one step.
    /// Snapshots with `false` are rejected by [`crate::domain::tontine::Tontine::validate`].
    pub contributed: bool,
}

impl Participant {
    pub fn enroll(id: ParticipantId, now: u64) -> Self {
        Self {
            id,
            enrolled_at: now,
            contributed: true,
        }
    }

    /// The instant from which the elimination window runs: enrollment, or
    /// the start of the game for anyone who joined before it began.
    pub fn active_since(&self, started_at: u64) -> u64 {
        self.enrolled_at.max(started_at)
    }
}
