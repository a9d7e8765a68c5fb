//! Browser host
//!
//! Thin wasm-bindgen wrapper: JS owns the canvas, the animation frame loop
//! and touch handling, and reads state back after each call.

use wasm_bindgen::prelude::*;

use crate::consts::MAX_FRAME_DT;
use crate::highscores::HighScores;
use crate::settings::Settings;
use crate::sim::{
    EventLog, GameState, Hand, PcgRandom, Side, TapOutcome, TowerGame, settle, slot_height,
};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Sushi Neko (web) starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    game: TowerGame,
    events: EventLog,
    settings: Settings,
    scores: HighScores,
    /// Session whose score is already in `scores`
    recorded_session: u64,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> WebGame {
        let settings = Settings::load();
        let scores = HighScores::load();
        let mut game = TowerGame::new(settings.tuning.clone(), PcgRandom::new(seed as u64));
        let events = EventLog::new();
        game.subscribe(Box::new(events.clone()));
        WebGame {
            game,
            events,
            settings,
            scores,
            recorded_session: 0,
        }
    }

    /// Play / play again
    pub fn start(&mut self) -> bool {
        self.game.start()
    }

    /// Tap on the left (`true`) or right half of the screen.
    /// Returns 0 = ignored, 1 = chopped, 2 = defeat.
    pub fn tap(&mut self, left: bool) -> u8 {
        let hand = if left { Hand::Left } else { Hand::Right };
        let outcome = self.game.on_tap(hand);
        self.record_defeat();
        match outcome {
            TapOutcome::Ignored => 0,
            TapOutcome::Chopped(_) => 1,
            TapOutcome::Defeat => 2,
        }
    }

    /// Advance by the frame delta in seconds
    pub fn tick(&mut self, dt: f32) {
        self.game.tick(dt.min(MAX_FRAME_DT));
        self.record_defeat();
    }

    pub fn score(&self) -> f64 {
        self.game.score() as f64
    }

    /// Personal best of the current player
    pub fn best_score(&self) -> f64 {
        self.scores.best_for(&self.settings.player_name).unwrap_or(0) as f64
    }

    pub fn health(&self) -> f32 {
        self.game.health()
    }

    pub fn state(&self) -> String {
        match self.game.state() {
            GameState::Title => "title",
            GameState::Ready => "ready",
            GameState::Playing => "playing",
            GameState::GameOver => "game_over",
        }
        .to_string()
    }

    /// Hand the character faces: true = left
    pub fn character_left(&self) -> bool {
        self.game.character_side() == Hand::Left
    }

    /// Tower sides bottom to top: 0 = none, 1 = left, 2 = right
    pub fn tower_sides(&self) -> Vec<u8> {
        self.game
            .tower()
            .iter()
            .map(|p| match p.side {
                Side::None => 0,
                Side::Left => 1,
                Side::Right => 2,
            })
            .collect()
    }

    /// Resting height of the pending piece at queue `index` (0 = next to chop)
    pub fn piece_y(&self, index: usize) -> f32 {
        slot_height(index)
    }

    /// Queue index of the piece with `slot`, or undefined once it has been chopped
    pub fn visible_index(&self, slot: u32) -> Option<usize> {
        self.game.tower().visible_index(slot)
    }

    /// Ease a piece drawn at `current_y` halfway toward its resting height
    pub fn settle_y(&self, current_y: f32, index: usize) -> f32 {
        settle(current_y, slot_height(index))
    }

    /// Events since the last call, as a JSON array
    pub fn take_events(&self) -> String {
        serde_json::to_string(&self.events.drain()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.settings.player_name = crate::settings::sanitize_name(name);
        self.settings.save();
    }
}

impl WebGame {
    /// Record a finished run in the local table (once per session)
    fn record_defeat(&mut self) {
        let session = self.game.session();
        if self.game.state() != GameState::GameOver || self.recorded_session == session {
            return;
        }
        self.recorded_session = session;

        let score = self.game.score();
        if self.settings.submit_scores
            && self
                .scores
                .add_score(&self.settings.player_name, score, js_sys::Date::now())
                .is_some()
        {
            self.scores.save();
        }
    }
}
