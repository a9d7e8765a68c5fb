//! Events pushed from the game core to whoever draws it
//!
//! The core never calls into a renderer. Hosts register `GameObserver`s and
//! animate from the events they receive.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::state::{Hand, Piece, Side};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A piece was chopped off the bottom of the tower; remaining pieces drop one slot
    PieceResolved { side: Side, slot: u32, hand: Hand },
    /// The run ended
    Defeat { score: u64, cause: DefeatCause },
    /// A fresh tower is ready, waiting for the first tap
    RestartReady { tower: Vec<Piece> },
    /// The leaderboard accepted a score from the current session
    ScoreSubmitted { score: u64, rank: Option<usize> },
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefeatCause {
    /// Punched from the side the chopstick was on
    WrongSide,
    /// Health bar ran out
    Exhausted,
    /// Host ended the run (quit, lost focus for good, ...)
    Abandoned,
}

pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent);
}

/// Observer that records events into a shared list.
///
/// Keep a clone of the handle; the game owns the other one.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything recorded so far
    pub fn drain(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Count recorded events matching a predicate
    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }
}

impl GameObserver for EventLog {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_shares_buffer() {
        let log = EventLog::new();
        let mut observer = log.clone();
        let defeat = GameEvent::Defeat {
            score: 3,
            cause: DefeatCause::Exhausted,
        };
        observer.on_event(&defeat);
        assert_eq!(log.len(), 1);
        assert_eq!(log.count(|e| matches!(e, GameEvent::Defeat { .. })), 1);
        assert_eq!(log.drain(), vec![defeat]);
        assert!(log.is_empty());
    }
}
