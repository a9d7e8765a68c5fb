//! The sushi tower: a queue of pending pieces, front = next to chop

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::state::{Piece, Side};
use crate::consts::{FIRST_PIECE_Y, PIECE_HEIGHT};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tower {
    pieces: VecDeque<Piece>,
    /// Slot handed to the next pushed piece
    next_slot: u32,
}

impl Tower {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every piece and restart slot numbering
    pub fn clear(&mut self) {
        self.pieces.clear();
        self.next_slot = 0;
    }

    /// Append a piece on top of the tower, returning it
    pub fn push(&mut self, side: Side) -> Piece {
        let piece = Piece {
            side,
            slot: self.next_slot,
        };
        self.next_slot += 1;
        self.pieces.push_back(piece);
        piece
    }

    /// Remove the piece nearest the character
    pub fn pop_front(&mut self) -> Option<Piece> {
        self.pieces.pop_front()
    }

    pub fn front(&self) -> Option<&Piece> {
        self.pieces.front()
    }

    pub fn last(&self) -> Option<&Piece> {
        self.pieces.back()
    }

    /// Side of the topmost piece, `None` when the tower is empty
    pub fn last_side(&self) -> Option<Side> {
        self.last().map(|p| p.side)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn next_slot(&self) -> u32 {
        self.next_slot
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    /// Queue position of the piece with `slot` (0 = next to chop)
    pub fn visible_index(&self, slot: u32) -> Option<usize> {
        let front = self.front()?.slot;
        let index = slot.checked_sub(front)? as usize;
        (index < self.pieces.len()).then_some(index)
    }

    /// Snapshot of the pieces in resolve order
    pub fn to_vec(&self) -> Vec<Piece> {
        self.pieces.iter().copied().collect()
    }

    /// No two chopstick pieces sit directly on top of each other
    pub fn is_solvable(&self) -> bool {
        self.pieces
            .iter()
            .zip(self.pieces.iter().skip(1))
            .all(|(below, above)| !(below.side.is_armed() && above.side.is_armed()))
    }
}

/// Resting height of the piece at `index` in the queue (0 = next to chop).
///
/// The base roll sits at `FIRST_PIECE_Y`; pending pieces stack above it.
#[inline]
pub fn slot_height(index: usize) -> f32 {
    FIRST_PIECE_Y + (index as f32 + 1.0) * PIECE_HEIGHT
}

/// Ease a piece halfway toward its resting height (one call per frame)
#[inline]
pub fn settle(current_y: f32, target_y: f32) -> f32 {
    current_y - (current_y - target_y) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_monotonic_slots() {
        let mut tower = Tower::new();
        let a = tower.push(Side::None);
        let b = tower.push(Side::Right);
        assert_eq!((a.slot, b.slot), (0, 1));

        tower.pop_front();
        let c = tower.push(Side::None);
        assert_eq!(c.slot, 2);
        assert_eq!(tower.front().map(|p| p.slot), Some(1));
        assert_eq!(tower.len(), 2);
    }

    #[test]
    fn test_clear_resets_slots() {
        let mut tower = Tower::new();
        tower.push(Side::Left);
        tower.clear();
        assert!(tower.is_empty());
        assert_eq!(tower.push(Side::None).slot, 0);
    }

    #[test]
    fn test_last_side_empty() {
        let mut tower = Tower::new();
        assert_eq!(tower.last_side(), None);
        tower.push(Side::Left);
        assert_eq!(tower.last_side(), Some(Side::Left));
    }

    #[test]
    fn test_visible_index_follows_chops() {
        let mut tower = Tower::new();
        for _ in 0..4 {
            tower.push(Side::None);
        }
        assert_eq!(tower.visible_index(2), Some(2));

        tower.pop_front();
        assert_eq!(tower.visible_index(0), None);
        assert_eq!(tower.visible_index(2), Some(1));
        assert_eq!(tower.visible_index(4), None);
        assert_eq!(Tower::new().visible_index(0), None);
    }

    #[test]
    fn test_is_solvable() {
        let mut tower = Tower::new();
        tower.push(Side::Left);
        tower.push(Side::None);
        tower.push(Side::Right);
        assert!(tower.is_solvable());
        tower.push(Side::Left);
        assert!(!tower.is_solvable());
    }

    #[test]
    fn test_layout() {
        assert_eq!(slot_height(0), FIRST_PIECE_Y + PIECE_HEIGHT);
        assert_eq!(slot_height(2), FIRST_PIECE_Y + 3.0 * PIECE_HEIGHT);
        assert_eq!(settle(400.0, 300.0), 350.0);
        assert_eq!(settle(300.0, 300.0), 300.0);
    }
}
