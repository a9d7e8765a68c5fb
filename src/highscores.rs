//! High score leaderboard
//!
//! `HighScores` is the local top-10 table, persisted as JSON (a file on
//! native, LocalStorage on the web). `Leaderboard` is the seam the game
//! submits through; `ScoreReporter` runs submissions on a worker thread so
//! a slow leaderboard never stalls a frame.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::sync::{Arc, Mutex};
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player name
    pub name: String,
    /// Pieces chopped
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sushi_neko_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, name: &str, score: u64, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            name: name.to_string(),
            score,
            timestamp,
        };

        // Sorted descending; ties keep the older entry first
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Best score recorded under `name`
    pub fn best_for(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .filter(|e| e.name == name)
            .map(|e| e.score)
            .max()
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Load high scores from a JSON file; a missing file is an empty table
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No high scores at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading high scores from {}", path.display()))?;
        let scores: HighScores = serde_json::from_str(&json)
            .with_context(|| format!("parsing high scores in {}", path.display()))?;
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing high scores to {}", path.display()))?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Current time as Unix milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// A place scores can be submitted to
pub trait Leaderboard {
    /// Record a score; returns the rank achieved if it made the board
    fn submit_score(&self, name: &str, score: u64) -> Result<Option<usize>>;

    /// Best score previously recorded for `name`
    fn best_for(&self, name: &str) -> Result<Option<u64>>;
}

/// Leaderboard backed by the local `HighScores` table
#[derive(Debug, Default)]
pub struct LocalLeaderboard {
    scores: Mutex<HighScores>,
    #[cfg(not(target_arch = "wasm32"))]
    path: Option<PathBuf>,
}

impl LocalLeaderboard {
    /// Board over an existing table (native: kept in memory only; web: saved to LocalStorage)
    pub fn new(scores: HighScores) -> Self {
        Self {
            scores: Mutex::new(scores),
            #[cfg(not(target_arch = "wasm32"))]
            path: None,
        }
    }

    /// Board loaded from and saved back to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let scores = HighScores::load_from(&path)?;
        Ok(Self {
            scores: Mutex::new(scores),
            path: Some(path),
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn persist(&self, scores: &HighScores) -> Result<()> {
        match &self.path {
            Some(path) => scores.save_to(path),
            None => Ok(()),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn persist(&self, scores: &HighScores) -> Result<()> {
        scores.save();
        Ok(())
    }

    /// Copy of the current table
    pub fn snapshot(&self) -> Result<HighScores> {
        self.scores
            .lock()
            .map(|s| s.clone())
            .map_err(|_| anyhow!("high score table poisoned"))
    }
}

impl Leaderboard for LocalLeaderboard {
    fn submit_score(&self, name: &str, score: u64) -> Result<Option<usize>> {
        let mut scores = self
            .scores
            .lock()
            .map_err(|_| anyhow!("high score table poisoned"))?;
        // Save the updated copy first so a failed write leaves the table untouched
        let mut updated = scores.clone();
        let rank = updated.add_score(name, score, now_ms());
        if rank.is_some() {
            self.persist(&updated)?;
            *scores = updated;
        }
        Ok(rank)
    }

    fn best_for(&self, name: &str) -> Result<Option<u64>> {
        let scores = self
            .scores
            .lock()
            .map_err(|_| anyhow!("high score table poisoned"))?;
        Ok(scores.best_for(name))
    }
}

/// Outcome of one background submission
#[derive(Debug, Clone)]
pub struct Submission {
    /// Session that produced the score
    pub session: u64,
    pub name: String,
    pub score: u64,
    /// Rank on success, error text on failure
    pub result: std::result::Result<Option<usize>, String>,
}

struct SubmitJob {
    session: u64,
    name: String,
    score: u64,
}

/// Submits scores on a worker thread; results are polled from the game thread.
///
/// Best effort: one attempt per score, failures are only reported back.
pub struct ScoreReporter {
    job_tx: Sender<SubmitJob>,
    result_rx: Receiver<Submission>,
}

impl ScoreReporter {
    /// Start the worker thread for `board`
    pub fn spawn(board: Arc<dyn Leaderboard + Send + Sync>) -> Result<Self> {
        let (job_tx, job_rx) = channel::<SubmitJob>();
        let (result_tx, result_rx) = channel::<Submission>();

        std::thread::Builder::new()
            .name("score-reporter".into())
            .spawn(move || {
                // Runs until the reporter (and its sender) is dropped
                for job in job_rx {
                    let result = board
                        .submit_score(&job.name, job.score)
                        .map_err(|e| format!("{e:#}"));
                    let submission = Submission {
                        session: job.session,
                        name: job.name,
                        score: job.score,
                        result,
                    };
                    if result_tx.send(submission).is_err() {
                        break;
                    }
                }
            })
            .context("spawning score reporter thread")?;

        Ok(Self { job_tx, result_rx })
    }

    /// Queue a submission without blocking
    pub fn submit(&self, session: u64, name: &str, score: u64) {
        let job = SubmitJob {
            session,
            name: name.to_string(),
            score,
        };
        if self.job_tx.send(job).is_err() {
            log::warn!("Score reporter stopped; dropping score {} for {}", score, name);
        }
    }

    /// Drain finished submissions (non-blocking)
    pub fn poll(&self) -> Vec<Submission> {
        let mut done = Vec::new();
        loop {
            match self.result_rx.try_recv() {
                Ok(submission) => done.push(submission),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Score reporter thread exited");
                    break;
                }
            }
        }
        done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for(reporter: &ScoreReporter) -> Vec<Submission> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let done = reporter.poll();
            if !done.is_empty() || Instant::now() > deadline {
                return done;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_add_score_sorted_and_truncated() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score("a", 5, 0.0), Some(1));
        assert_eq!(scores.add_score("b", 9, 0.0), Some(1));
        assert_eq!(scores.add_score("c", 7, 0.0), Some(2));
        assert_eq!(scores.top_score(), Some(9));

        for i in 0..20 {
            scores.add_score("x", 10 + i, 0.0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert!(!scores.qualifies(5));
        assert_eq!(scores.potential_rank(100), Some(1));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add_score("a", 0, 0.0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_best_for_name() {
        let mut scores = HighScores::new();
        scores.add_score("neko", 4, 0.0);
        scores.add_score("tora", 12, 0.0);
        scores.add_score("neko", 8, 0.0);
        assert_eq!(scores.best_for("neko"), Some(8));
        assert_eq!(scores.best_for("nobody"), None);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!(
            "sushi_neko_scores_{}.json",
            std::process::id()
        ));
        let board = LocalLeaderboard::open(&path).unwrap();
        assert_eq!(board.submit_score("neko", 3).unwrap(), Some(1));

        let reloaded = HighScores::load_from(&path).unwrap();
        assert_eq!(reloaded.top_score(), Some(3));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_failed_save_keeps_table_unchanged() {
        let path = std::env::temp_dir()
            .join(format!("sushi_neko_no_such_dir_{}", std::process::id()))
            .join("scores.json");
        let board = LocalLeaderboard::open(&path).unwrap();

        assert!(board.submit_score("neko", 3).is_err());
        assert!(board.snapshot().unwrap().is_empty());
        assert_eq!(board.best_for("neko").unwrap(), None);
    }

    #[test]
    fn test_reporter_delivers_results() {
        let board = Arc::new(LocalLeaderboard::new(HighScores::new()));
        let reporter = ScoreReporter::spawn(board.clone()).unwrap();
        reporter.submit(1, "neko", 21);

        let done = wait_for(&reporter);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].session, 1);
        assert_eq!(done[0].result, Ok(Some(1)));
        assert_eq!(board.best_for("neko").unwrap(), Some(21));
    }

    struct Offline;

    impl Leaderboard for Offline {
        fn submit_score(&self, _name: &str, _score: u64) -> Result<Option<usize>> {
            Err(anyhow!("network unreachable"))
        }

        fn best_for(&self, _name: &str) -> Result<Option<u64>> {
            Ok(None)
        }
    }

    #[test]
    fn test_reporter_reports_failure() {
        let reporter = ScoreReporter::spawn(Arc::new(Offline)).unwrap();
        reporter.submit(2, "neko", 5);
        let done = wait_for(&reporter);
        assert_eq!(done.len(), 1);
        assert!(done[0].result.as_ref().is_err_and(|e| e.contains("unreachable")));
    }
}
