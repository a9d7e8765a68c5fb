//! Sushi Neko entry point
//!
//! Native: runs a headless autoplay session and reports the outcome.
//! Web: the browser drives the game through `sushi_neko::web`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use anyhow::Result;
    use clap::Parser;

    use sushi_neko::autoplay::{self, AutoplayConfig};
    use sushi_neko::sim::{EventLog, GameEvent, PcgRandom};
    use sushi_neko::{HighScores, Leaderboard, LocalLeaderboard, ScoreReporter, Settings, TowerGame};

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Play a headless Sushi Neko session with the demo bot", long_about = None)]
    struct Args {
        /// Tower seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Settings JSON (player name, tuning)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// High score JSON file; scores stay in memory when omitted
        #[arg(long)]
        scores: Option<PathBuf>,
        /// Frames between bot taps at 60 Hz
        #[arg(long, default_value_t = 8)]
        frames_per_tap: u32,
        /// End the run after this many chops
        #[arg(long, default_value_t = 100)]
        max_score: u64,
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();

        let settings = args
            .settings
            .as_deref()
            .map(Settings::load_or_default)
            .unwrap_or_default();
        let seed = args.seed.unwrap_or_else(rand::random);
        log::info!("Sushi Neko (headless) seed={} player={}", seed, settings.player_name);

        let mut game = TowerGame::new(settings.tuning.clone(), PcgRandom::new(seed));
        let events = EventLog::new();
        game.subscribe(Box::new(events.clone()));

        let board = match &args.scores {
            Some(path) => LocalLeaderboard::open(path)?,
            None => LocalLeaderboard::new(HighScores::new()),
        };
        let board = Arc::new(board);
        let previous_best = board.best_for(&settings.player_name)?;
        if settings.submit_scores {
            let reporter = ScoreReporter::spawn(board.clone())?;
            game.set_leaderboard(reporter, &settings.player_name, previous_best);
        }

        let config = AutoplayConfig {
            frames_per_tap: args.frames_per_tap,
            max_score: args.max_score,
            ..Default::default()
        };
        let summary = autoplay::run(&mut game, &config);

        // Give the reporter a moment to land a new personal best
        let new_best = settings.submit_scores && summary.score > previous_best.unwrap_or(0);
        if new_best {
            let deadline = Instant::now() + Duration::from_secs(2);
            while game.poll_leaderboard() == 0 && Instant::now() < deadline {
                std::thread::sleep(Duration::from_millis(10));
            }
        }

        for event in events.drain() {
            match event {
                GameEvent::Defeat { score, cause } => {
                    println!("Game over ({cause:?}) with {score} pieces chopped");
                }
                GameEvent::ScoreSubmitted { rank: Some(rank), .. } => {
                    println!("New high score! Rank #{rank}");
                }
                _ => {}
            }
        }
        println!(
            "Frames: {}  health left: {:.2}  best: {}",
            summary.frames,
            summary.final_health,
            game.best_score()
        );

        let table = board.snapshot()?;
        for (i, entry) in table.entries.iter().enumerate() {
            println!("{:>2}. {:<16} {}", i + 1, entry.name, entry.score);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = native::run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is sushi_neko::web::init, this is just to satisfy the compiler
}
