use crate::domain::tontine::Phase;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TontineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Operation not allowed while the tontine is {0}")]
    WrongPhase(Phase),
    #[error("Wrong amount: expected exactly {expected}, got {actual}")]
    WrongAmount { expected: u64, actual: u64 },
    #[error("Participant {0} has already contributed")]
    AlreadyEnrolled(String),
    #[error("{0} is not a participant")]
    NotParticipant(String),
    #[error("Claim not allowed: {0}")]
    NotEligible(String),
    #[error("Tontine is closed")]
    AlreadyClosed,
    #[error("Balance overflow")]
    Overflow,
    #[error("Ledger error: {0}")]
    Ledger(String),
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("No tontine found in store")]
    NotFound,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    Storage(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, TontineError>;
