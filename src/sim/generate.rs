//! Procedural piece generation
//!
//! A chopstick piece is always followed by a plain roll, so whatever the
//! dice say the player can never face two blocked sides in a row.

use super::rng::RandomSource;
use super::state::{Piece, Side};
use super::tower::Tower;
use crate::tuning::Tuning;

/// Map a uniform roll onto a side using the tuning thresholds
pub fn side_for_roll(roll: f32, tuning: &Tuning) -> Side {
    if roll < tuning.left_threshold {
        Side::Left
    } else if roll < tuning.right_threshold {
        Side::Right
    } else {
        Side::None
    }
}

/// Pick the side of the next piece given the side currently on top.
///
/// Only draws from `rng` when the previous piece is a plain roll. An empty
/// tower (`last == None`) also gets a plain roll, so a refill is always safe.
pub fn next_side(last: Option<Side>, rng: &mut dyn RandomSource, tuning: &Tuning) -> Side {
    match last {
        Some(Side::None) => side_for_roll(rng.uniform01(), tuning),
        _ => Side::None,
    }
}

/// Append `count` generated pieces to the tower
pub fn generate(tower: &mut Tower, rng: &mut dyn RandomSource, tuning: &Tuning, count: u32) {
    for _ in 0..count {
        let side = next_side(tower.last_side(), rng, tuning);
        let Piece { slot, .. } = tower.push(side);
        log::trace!("generated piece slot={} side={}", slot, side.as_str());
    }
}
