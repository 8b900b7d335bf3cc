//! Application layer orchestrating the tontine.
//!
//! This module defines the `TontineEngine`, which serializes every mutating
//! operation on a tontine and wires the state machine to its clock, ledger
//! and store.

pub mod engine;
