//! Domain layer: the tontine state machine and the ports it talks through.

pub mod config;
pub mod participant;
pub mod ports;
pub mod tontine;
