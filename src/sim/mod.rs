//! Deterministic game core
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Injected RNG only
//! - Elapsed time passed in by the host
//! - No rendering or platform dependencies

pub mod events;
pub mod game;
pub mod generate;
pub mod rng;
pub mod state;
pub mod tower;

pub use events::{DefeatCause, EventLog, GameEvent, GameObserver};
pub use game::{TapOutcome, TowerGame};
pub use generate::{generate, next_side, side_for_roll};
pub use rng::{PcgRandom, RandomSource, RngState, ScriptedRandom};
pub use state::{GameState, Hand, Piece, Side, clamp_health};
pub use tower::{Tower, settle, slot_height};
