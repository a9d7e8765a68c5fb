//! Sushi Neko - chop the sushi tower before your health runs out
//!
//! Core modules:
//! - `sim`: Deterministic game core (tower, generation, state machine, events)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (name, score submission, tuning)
//! - `autoplay`: Demo bot used by the headless host
//! - `highscores`: Local leaderboard table and the background score reporter
//! - `web`: wasm-bindgen host for the browser build

pub mod autoplay;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::{HighScores, Leaderboard, LocalLeaderboard, ScoreReporter};
pub use settings::Settings;
pub use sim::{GameEvent, GameObserver, GameState, Hand, Piece, Side, TapOutcome, TowerGame};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Host frame timestep (the original game decayed health once per 60 Hz frame)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum frame delta accepted by hosts (avoids one huge health drop after a stall)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Health bounds
    pub const HEALTH_MAX: f32 = 1.0;
    pub const HEALTH_MIN: f32 = 0.0;
    /// Health lost per second while playing (0.01 per 60 Hz frame)
    pub const HEALTH_LOSS_PER_SECOND: f32 = 0.6;
    /// Health restored by each correct chop
    pub const TAP_HEALTH_GAIN: f32 = 0.1;

    /// Random pieces generated after the two seeded ones
    pub const PREFILL_PIECES: u32 = 10;
    /// r < LEFT_THRESHOLD -> Left
    pub const LEFT_THRESHOLD: f32 = 0.45;
    /// LEFT_THRESHOLD <= r < RIGHT_THRESHOLD -> Right, otherwise None
    pub const RIGHT_THRESHOLD: f32 = 0.90;

    /// Tower layout (scene units)
    pub const PIECE_HEIGHT: f32 = 55.0;
    pub const FIRST_PIECE_Y: f32 = 200.0;
}
