#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;
use tontine::application::engine::TontineEngine;
use tontine::domain::config::TontineConfig;
use tontine::infrastructure::clock::ManualClock;
use tontine::infrastructure::in_memory::{InMemoryLedger, InMemoryTontineStore};

pub const DUES: u64 = 1000;
pub const MONTH: u64 = 60 * 60 * 24 * 30;

pub struct Harness {
    pub engine: TontineEngine,
    pub clock: ManualClock,
    pub ledger: InMemoryLedger,
    pub store: InMemoryTontineStore,
}

pub async fn harness(min_players: u32, allow_latecomers: bool) -> Harness {
    let clock = ManualClock::new(1_700_000_000);
    let ledger = InMemoryLedger::new();
    let store = InMemoryTontineStore::new();
    let config = TontineConfig::new(DUES, MONTH, min_players, allow_latecomers)
        .expect("Invalid test configuration");
    let engine = TontineEngine::create(
        config,
        Box::new(clock.clone()),
        Box::new(ledger.clone()),
        Box::new(store.clone()),
    )
    .await
    .expect("Failed to create engine");

    Harness {
        engine,
        clock,
        ledger,
        store,
    }
}

/// Writes a simulation script with the standard header followed by `rows`.
pub fn write_script(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "action, caller, value").unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}
