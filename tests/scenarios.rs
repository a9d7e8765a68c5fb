//! End-to-end session scenarios

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use sushi_neko::consts::FRAME_DT;
use sushi_neko::sim::{
    DefeatCause, EventLog, GameEvent, GameState, Hand, ScriptedRandom, Side, TapOutcome,
};
use sushi_neko::{HighScores, Leaderboard, LocalLeaderboard, ScoreReporter, TowerGame, Tuning};

fn started(seed: u64) -> (TowerGame, EventLog) {
    let mut game = TowerGame::with_seed(seed);
    let events = EventLog::new();
    game.subscribe(Box::new(events.clone()));
    assert!(game.start());
    (game, events)
}

fn poll_until(game: &mut TowerGame) -> usize {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let handled = game.poll_leaderboard();
        if handled > 0 || Instant::now() > deadline {
            return handled;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn start_resets_and_seeds_the_tower() {
    for seed in 0..20 {
        let (game, events) = started(seed);
        assert_eq!(game.state(), GameState::Ready);
        assert_eq!(game.score(), 0);
        assert_eq!(game.health(), 1.0);

        let pieces = game.tower().to_vec();
        assert_eq!(pieces.len(), 12);
        assert_eq!(pieces[0].side, Side::None);
        assert_eq!(pieces[1].side, Side::Right);
        assert!(game.tower().is_solvable());

        match events.drain().as_slice() {
            [GameEvent::RestartReady { tower }] => assert_eq!(tower, &pieces),
            other => panic!("unexpected events: {other:?}"),
        }
    }
}

#[test]
fn opening_tap_is_always_safe() {
    for hand in [Hand::Left, Hand::Right] {
        for seed in 0..20 {
            let (mut game, _) = started(seed);
            assert!(matches!(game.on_tap(hand), TapOutcome::Chopped(_)));
            assert_eq!(game.state(), GameState::Playing);
        }
    }
}

#[test]
fn left_beats_the_seeded_right_piece() {
    let (mut game, events) = started(42);
    game.on_tap(Hand::Left);
    let len = game.tower().len();

    let outcome = game.on_tap(Hand::Left);
    assert!(matches!(outcome, TapOutcome::Chopped(p) if p.side == Side::Right && p.slot == 1));
    assert_eq!(game.score(), 2);
    assert_eq!(game.health(), 1.0);
    assert_eq!(game.tower().len(), len);
    assert_eq!(
        events.count(|e| matches!(e, GameEvent::PieceResolved { .. })),
        2
    );
}

#[test]
fn chopping_with_the_chopstick_hand_loses() {
    let (mut game, events) = started(42);
    game.on_tap(Hand::Left);
    assert_eq!(game.on_tap(Hand::Right), TapOutcome::Defeat);
    assert_eq!(game.state(), GameState::GameOver);
    assert!(events.drain().contains(&GameEvent::Defeat {
        score: 1,
        cause: DefeatCause::WrongSide
    }));
}

#[test]
fn idle_player_runs_out_after_101_frames() {
    let (mut game, events) = started(7);
    game.on_tap(Hand::Left);

    for _ in 0..101 {
        game.tick(FRAME_DT);
    }
    assert_eq!(game.state(), GameState::GameOver);
    assert!(game.health() <= 0.0);

    for _ in 0..10 {
        game.tick(FRAME_DT);
    }
    assert_eq!(
        events.count(|e| matches!(e, GameEvent::Defeat { .. })),
        1
    );
}

#[test]
fn decay_follows_elapsed_time_not_frame_count() {
    let (mut fast, _) = started(1);
    let (mut slow, _) = started(1);
    fast.on_tap(Hand::Left);
    slow.on_tap(Hand::Left);

    // One second at 120 Hz vs one second at 30 Hz
    for _ in 0..120 {
        fast.tick(1.0 / 120.0);
    }
    for _ in 0..30 {
        slow.tick(1.0 / 30.0);
    }
    assert!((fast.health() - slow.health()).abs() < 1e-4);
    assert!((fast.health() - 0.4).abs() < 1e-4);
}

#[test]
fn custom_tuning_changes_the_prefill() {
    let tuning = Tuning {
        prefill_pieces: 3,
        ..Default::default()
    };
    let mut game = TowerGame::new(tuning, ScriptedRandom::new(vec![0.5]));
    game.start();
    let sides: Vec<Side> = game.tower().iter().map(|p| p.side).collect();
    assert_eq!(
        sides,
        vec![Side::None, Side::Right, Side::None, Side::Right, Side::None]
    );
}

#[test]
fn personal_best_is_submitted_once() {
    let board = Arc::new(LocalLeaderboard::new(HighScores::new()));
    let mut game = TowerGame::with_seed(3);
    let events = EventLog::new();
    game.subscribe(Box::new(events.clone()));
    game.set_leaderboard(ScoreReporter::spawn(board.clone()).unwrap(), "Mochi", Some(0));

    game.start();
    game.on_tap(Hand::Left);
    game.on_tap(Hand::Left);
    game.game_over(DefeatCause::Abandoned);

    assert_eq!(poll_until(&mut game), 1);
    assert!(events.drain().contains(&GameEvent::ScoreSubmitted {
        score: 2,
        rank: Some(1)
    }));
    assert_eq!(board.best_for("Mochi").unwrap(), Some(2));

    // Not a new best: nothing submitted
    game.start();
    game.on_tap(Hand::Left);
    game.game_over(DefeatCause::Abandoned);
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(game.poll_leaderboard(), 0);
    assert_eq!(board.snapshot().unwrap().entries.len(), 1);
}

#[test]
fn stale_submission_is_not_applied() {
    let board = Arc::new(LocalLeaderboard::new(HighScores::new()));
    let reporter = ScoreReporter::spawn(board.clone()).unwrap();
    let mut game = TowerGame::with_seed(3);
    let events = EventLog::new();
    game.subscribe(Box::new(events.clone()));
    game.set_leaderboard(reporter, "Mochi", None);

    game.start();
    game.on_tap(Hand::Left);
    game.game_over(DefeatCause::Abandoned);
    // New session begins before the result comes back
    game.start();

    // The result is consumed but not applied to the new session
    assert_eq!(poll_until(&mut game), 1);
    assert_eq!(board.best_for("Mochi").unwrap(), Some(1));
    assert_eq!(
        events.count(|e| matches!(e, GameEvent::ScoreSubmitted { .. })),
        0
    );
}

struct Offline;

impl Leaderboard for Offline {
    fn submit_score(&self, _name: &str, _score: u64) -> Result<Option<usize>> {
        Err(anyhow!("leaderboard offline"))
    }

    fn best_for(&self, _name: &str) -> Result<Option<u64>> {
        Err(anyhow!("leaderboard offline"))
    }
}

#[test]
fn leaderboard_failure_never_reaches_gameplay() {
    let mut game = TowerGame::with_seed(8);
    let events = EventLog::new();
    game.subscribe(Box::new(events.clone()));
    game.set_leaderboard(ScoreReporter::spawn(Arc::new(Offline)).unwrap(), "Mochi", None);
    game.start();
    game.on_tap(Hand::Left);
    game.game_over(DefeatCause::Abandoned);

    // The failure counts as handled so hosts stop waiting for it
    assert_eq!(poll_until(&mut game), 1);
    assert_eq!(game.best_score(), 1);

    assert_eq!(
        events.count(|e| matches!(e, GameEvent::ScoreSubmitted { .. })),
        0
    );

    assert!(game.start());
    assert_eq!(game.state(), GameState::Ready);
}
