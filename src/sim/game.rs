//! The tower game: state machine, scoring, health and the chop rule
//!
//! Single-threaded and frame driven. The host calls `tick` once per frame
//! and `on_tap` when input arrives; renderers follow along through
//! `GameObserver` events and the read-only accessors.

use super::events::{DefeatCause, GameEvent, GameObserver};
use super::generate::generate;
use super::rng::{PcgRandom, RandomSource};
use super::state::{GameState, Hand, Piece, Side, clamp_health};
use super::tower::Tower;
use crate::consts::HEALTH_MAX;
use crate::highscores::ScoreReporter;
use crate::tuning::Tuning;

/// Result of a single tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Not accepting input (title screen or game over)
    Ignored,
    /// The bottom piece was chopped off
    Chopped(Piece),
    /// Wrong side: the run is over
    Defeat,
}

pub struct TowerGame {
    state: GameState,
    score: u64,
    health: f32,
    tower: Tower,
    /// Hand the character last punched with
    character_side: Hand,
    tuning: Tuning,
    rng: Box<dyn RandomSource>,
    observers: Vec<Box<dyn GameObserver>>,
    /// Bumped by every `start()`; tags async leaderboard results
    session: u64,
    /// Best score known locally for `player_name`
    best_score: u64,
    player_name: String,
    reporter: Option<ScoreReporter>,
}

impl TowerGame {
    /// New game on the title screen
    pub fn new(tuning: Tuning, rng: impl RandomSource + 'static) -> Self {
        Self {
            state: GameState::Title,
            score: 0,
            health: HEALTH_MAX,
            tower: Tower::new(),
            character_side: Hand::Left,
            tuning,
            rng: Box::new(rng),
            observers: Vec::new(),
            session: 0,
            best_score: 0,
            player_name: crate::settings::DEFAULT_PLAYER_NAME.to_string(),
            reporter: None,
        }
    }

    /// Default tuning with a seeded PCG source
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Tuning::default(), PcgRandom::new(seed))
    }

    /// Submit new personal bests for `player_name` through `reporter`
    pub fn set_leaderboard(
        &mut self,
        reporter: ScoreReporter,
        player_name: &str,
        best_score: Option<u64>,
    ) {
        self.reporter = Some(reporter);
        self.player_name = player_name.to_string();
        self.best_score = best_score.unwrap_or(0);
    }

    /// Register an observer for game events
    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    // === Read-only state ===

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Health in [0, 1]
    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn tower(&self) -> &Tower {
        &self.tower
    }

    pub fn character_side(&self) -> Hand {
        self.character_side
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    // === Commands ===

    /// Build a fresh tower and wait for the first tap.
    ///
    /// Allowed from every state except `Playing`; returns false when ignored.
    pub fn start(&mut self) -> bool {
        if !self.state.can_start() {
            log::debug!("start() ignored while playing");
            return false;
        }

        self.session += 1;
        self.state = GameState::Ready;
        self.score = 0;
        self.health = HEALTH_MAX;
        self.character_side = Hand::Left;

        // The first piece is always a plain roll, so the opening tap is safe
        self.tower.clear();
        self.tower.push(Side::None);
        self.tower.push(Side::Right);
        self.generate(self.tuning.prefill_pieces);

        log::info!(
            "Session {} ready ({} pieces)",
            self.session,
            self.tower.len()
        );
        self.emit(GameEvent::RestartReady {
            tower: self.tower.to_vec(),
        });
        true
    }

    /// Punch from `hand`. Losing when `hand` is the side the chopstick is on.
    pub fn on_tap(&mut self, hand: Hand) -> TapOutcome {
        if !self.state.accepts_input() {
            return TapOutcome::Ignored;
        }

        // Game begins on first touch
        if self.state == GameState::Ready {
            self.state = GameState::Playing;
            log::debug!("Session {} playing", self.session);
        }
        self.character_side = hand;

        if self.tower.is_empty() {
            debug_assert!(false, "tower ran dry while playing");
            log::error!("Tower empty on tap; refilling");
            self.generate(1);
        }
        let Some(&top) = self.tower.front() else {
            return TapOutcome::Ignored;
        };

        if hand.side() == top.side {
            self.game_over(DefeatCause::WrongSide);
            return TapOutcome::Defeat;
        }

        self.tower.pop_front();
        self.generate(1);
        self.score += 1;
        self.health = clamp_health(self.health + self.tuning.tap_health_gain);

        log::debug!(
            "Chopped slot {} ({}) with {:?}, score {}",
            top.slot,
            top.side.as_str(),
            hand,
            self.score
        );
        self.emit(GameEvent::PieceResolved {
            side: top.side,
            slot: top.slot,
            hand,
        });
        TapOutcome::Chopped(top)
    }

    /// Advance `dt` seconds: drains health while playing
    pub fn tick(&mut self, dt: f32) {
        if self.state != GameState::Playing {
            return;
        }

        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let health = self.health - self.tuning.health_loss(dt);
        self.health = clamp_health(health);

        if health < 0.0 {
            self.game_over(DefeatCause::Exhausted);
        }
    }

    /// End the run. Only acts while Ready/Playing, so repeated calls are no-ops.
    pub fn game_over(&mut self, cause: DefeatCause) {
        if !self.state.accepts_input() {
            return;
        }

        self.state = GameState::GameOver;
        log::info!(
            "Session {} over ({:?}), score {}",
            self.session,
            cause,
            self.score
        );
        self.emit(GameEvent::Defeat {
            score: self.score,
            cause,
        });

        if self.score > self.best_score {
            self.best_score = self.score;
            if let Some(reporter) = &self.reporter {
                reporter.submit(self.session, &self.player_name, self.score);
            }
        }
    }

    /// Apply finished leaderboard submissions; call once per frame.
    ///
    /// Results from an earlier session are dropped. Returns how many results
    /// were handled (applied, failed or stale), so hosts can stop waiting.
    pub fn poll_leaderboard(&mut self) -> usize {
        let done = match &self.reporter {
            Some(reporter) => reporter.poll(),
            None => return 0,
        };

        let handled = done.len();
        for submission in done {
            match submission.result {
                Err(e) => {
                    log::warn!("Score {} not submitted: {}", submission.score, e);
                }
                Ok(_) if submission.session != self.session => {
                    log::debug!(
                        "Dropping leaderboard result for stale session {}",
                        submission.session
                    );
                }
                Ok(rank) => {
                    log::info!("Score {} submitted, rank {:?}", submission.score, rank);
                    self.emit(GameEvent::ScoreSubmitted {
                        score: submission.score,
                        rank,
                    });
                }
            }
        }
        handled
    }

    fn generate(&mut self, count: u32) {
        generate(&mut self.tower, self.rng.as_mut(), &self.tuning, count);
    }

    fn emit(&mut self, event: GameEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }
}
