use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("tontine"));
    cmd.arg("tests/fixtures/two_player_claim.csv")
        .args(["--dues", "1000", "--interval", "2592000", "--min-players", "2"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "phase,balance,participants,winner,payout",
        ))
        .stdout(predicate::str::contains("closed,0,0,alice,2000"));

    Ok(())
}

#[test]
fn test_cli_rejects_invalid_config() {
    let mut cmd = Command::new(cargo_bin!("tontine"));
    cmd.arg("tests/fixtures/two_player_claim.csv")
        .args(["--dues", "1000", "--interval", "60", "--min-players", "1"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("min_players must be at least 2"));
}

#[test]
fn test_cli_requires_config() {
    let mut cmd = Command::new(cargo_bin!("tontine"));
    cmd.arg("tests/fixtures/two_player_claim.csv");

    cmd.assert().failure();
}
