mod common;

use common::{DUES, MONTH, harness};
use rand::Rng;
use rand::seq::SliceRandom;
use tontine::domain::ports::TontineStore;

// Hammers a started tontine with calls that must all be rejected and checks
// that nothing observable moves.
#[tokio::test]
async fn test_failed_operations_never_mutate() {
    let h = harness(2, false).await;
    h.engine.contribute("alice".into(), DUES).await.unwrap();
    h.engine.contribute("bob".into(), DUES).await.unwrap();

    let phase = h.engine.phase().await;
    let balance = h.engine.balance().await;
    let participants = h.engine.participants().await;
    let snapshot = h.store.load().await.unwrap();

    let callers = ["alice", "bob", "carol", "dave"];
    let mut rng = rand::thread_rng();

    for _ in 0..200 {
        let caller = *callers.choose(&mut rng).unwrap();
        if rng.gen_bool(0.5) {
            let mut amount = rng.gen_range(0..=2 * DUES);
            if amount == DUES {
                amount += 1;
            }
            assert!(h.engine.contribute(caller.into(), amount).await.is_err());
            // exact dues are still refused after the start
            assert!(h.engine.contribute(caller.into(), DUES).await.is_err());
        } else {
            // every claim lands before the elimination window closes
            assert!(h.engine.claim(caller.into()).await.is_err());
        }
        h.clock.advance(rng.gen_range(0..MONTH / 1000));
    }

    assert_eq!(h.engine.phase().await, phase);
    assert_eq!(h.engine.balance().await, balance);
    assert_eq!(h.engine.participants().await, participants);
    assert_eq!(h.store.load().await.unwrap(), snapshot);
    assert!(h.ledger.credits().await.is_empty());
}

#[tokio::test]
async fn test_balance_matches_dues_times_participants() {
    let h = harness(3, true).await;
    let mut rng = rand::thread_rng();

    for i in 0..30 {
        let caller = format!("player-{}", rng.gen_range(0..15));
        let amount = if rng.gen_bool(0.7) { DUES } else { DUES + i };
        let _ = h.engine.contribute(caller.into(), amount).await;

        let participants = h.engine.participants().await.len() as u64;
        assert_eq!(h.engine.balance().await, DUES * participants);
    }
}
