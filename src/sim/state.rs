//! Core game types
//!
//! Plain data shared by the tower, the generator and the game loop.

use serde::{Deserialize, Serialize};

use crate::consts::{HEALTH_MAX, HEALTH_MIN};

/// Which chopstick a piece exposes (or which hand the character is using)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    /// Plain roll, no chopstick
    #[default]
    None,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::None => "none",
        }
    }

    /// True if a chopstick is showing on this side
    pub fn is_armed(&self) -> bool {
        *self != Side::None
    }
}

/// Player input: the side of the tower the character punches from.
///
/// There is no `None` hand, so a tap can never match a plain roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// The side this hand occupies
    pub fn side(self) -> Side {
        match self {
            Hand::Left => Side::Left,
            Hand::Right => Side::Right,
        }
    }
}

/// A single sushi piece in the tower
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    /// Vertical slot, assigned in generation order (monotonic per session)
    pub slot: u32,
}

/// Game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Title screen, nothing running
    #[default]
    Title,
    /// Tower built, waiting for the first tap
    Ready,
    /// Active gameplay, health decaying
    Playing,
    /// Run ended; only `start()` leaves this state
    GameOver,
}

impl GameState {
    /// States in which taps are accepted
    pub fn accepts_input(&self) -> bool {
        matches!(self, GameState::Ready | GameState::Playing)
    }

    /// States from which a new session may be started
    pub fn can_start(&self) -> bool {
        !matches!(self, GameState::Playing)
    }
}

/// Clamp a health value into range (NaN collapses to empty)
#[inline]
pub fn clamp_health(health: f32) -> f32 {
    if health.is_nan() {
        return HEALTH_MIN;
    }
    health.clamp(HEALTH_MIN, HEALTH_MAX)
}
