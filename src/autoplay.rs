//! Idle/demo mode: a bot that plays the tower by itself
//!
//! Used by the headless native host and by the web build's attract screen.

use crate::consts::FRAME_DT;
use crate::sim::{DefeatCause, GameState, Hand, Side, Tower, TowerGame};

/// Pick the hand that chops the bottom piece safely.
///
/// Chopstick pieces force the opposite hand. Plain rolls look one piece
/// ahead and take the hand the next chopstick does not block.
pub fn choose_hand(tower: &Tower) -> Hand {
    let mut pieces = tower.iter();
    match pieces.next().map(|p| p.side) {
        Some(Side::Left) => Hand::Right,
        Some(Side::Right) => Hand::Left,
        _ => match pieces.next().map(|p| p.side) {
            Some(Side::Left) => Hand::Right,
            _ => Hand::Left,
        },
    }
}

/// Pacing for a bot run
#[derive(Debug, Clone, Copy)]
pub struct AutoplayConfig {
    /// Frames between taps (reaction time)
    pub frames_per_tap: u32,
    /// Stop the run after this many chops
    pub max_score: u64,
    /// Hard frame cap
    pub max_frames: u64,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            frames_per_tap: 8,
            max_score: 100,
            max_frames: 60 * 60 * 10,
        }
    }
}

/// What happened during a bot run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub score: u64,
    pub frames: u64,
    pub final_health: f32,
}

/// Play one session from `Ready` to `GameOver` at a fixed 60 Hz timestep.
///
/// Starts the game if needed. Pending leaderboard results are polled every frame.
pub fn run(game: &mut TowerGame, config: &AutoplayConfig) -> RunSummary {
    if game.state() != GameState::Ready {
        game.start();
    }

    let frames_per_tap = u64::from(config.frames_per_tap.max(1));
    let mut frames = 0u64;
    while game.state() != GameState::GameOver {
        if frames % frames_per_tap == 0 {
            let hand = choose_hand(game.tower());
            game.on_tap(hand);
            if game.score() >= config.max_score {
                game.game_over(DefeatCause::Abandoned);
            }
        }
        game.tick(FRAME_DT);
        game.poll_leaderboard();

        frames += 1;
        if frames >= config.max_frames {
            game.game_over(DefeatCause::Abandoned);
        }
    }

    RunSummary {
        score: game.score(),
        frames,
        final_health: game.health(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_hand_avoids_chopsticks() {
        let mut tower = Tower::new();
        tower.push(Side::Left);
        assert_eq!(choose_hand(&tower), Hand::Right);

        let mut tower = Tower::new();
        tower.push(Side::None);
        tower.push(Side::Left);
        assert_eq!(choose_hand(&tower), Hand::Right);

        let mut tower = Tower::new();
        tower.push(Side::None);
        tower.push(Side::Right);
        assert_eq!(choose_hand(&tower), Hand::Left);
    }

    #[test]
    fn test_bot_reaches_score_cap() {
        let mut game = TowerGame::with_seed(77);
        let config = AutoplayConfig {
            max_score: 40,
            ..Default::default()
        };
        let summary = run(&mut game, &config);
        assert_eq!(summary.score, 40);
        assert_eq!(game.state(), GameState::GameOver);
    }

    #[test]
    fn test_slow_bot_runs_out_of_health() {
        // 0.2 health lost between taps, only 0.1 regained
        let mut game = TowerGame::with_seed(5);
        let config = AutoplayConfig {
            frames_per_tap: 20,
            max_score: 1_000,
            ..Default::default()
        };
        let summary = run(&mut game, &config);
        assert!(summary.score < 1_000);
        assert_eq!(summary.final_health, 0.0);
    }
}
