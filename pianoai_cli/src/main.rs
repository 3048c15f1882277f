mod simulate;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::debug;
use pianoai_core::{EngineConfig, GameEngine};
use score_store::{BestScore, BestScores, FileStore};

use crate::simulate::{PressSchedule, Simulation};

#[derive(Debug, Parser)]
#[command(name = "pianoai")]
#[command(about = "Headless PianoAI song player", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print song metadata.
    Info { song: PathBuf },
    /// Play a song against scripted or perfect input.
    Play {
        song: PathBuf,
        /// JSON array of `{ "time": seconds, "note": "C4" }` presses.
        #[arg(long, conflicts_with = "autoplay")]
        inputs: Option<PathBuf>,
        /// Press every note exactly on time.
        #[arg(long)]
        autoplay: bool,
        #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
        frame_ms: u64,
        /// Engine configuration JSON; missing fields use defaults.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Directory for best-score records.
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Info { song } => {
            let song = song_runner::load_song_json_from_path(&song)?;
            println!("id={}", song.id);
            println!("title={}", song.title);
            println!("artist={}", song.artist);
            println!("difficulty={}", song.difficulty.as_str());
            println!("duration={:.3}", song.duration);
            println!("notes={}", song.note_count());
            if let Some(last) = song.last_note_time() {
                println!("last_note={:.3}", last);
            }
        }
        Command::Play {
            song,
            inputs,
            autoplay,
            frame_ms,
            config,
            store,
        } => {
            let song = song_runner::load_song_json_from_path(&song)?;
            let config = match config {
                Some(path) => load_config(&path)?,
                None => EngineConfig::default(),
            };
            let presses = if autoplay {
                PressSchedule::autoplay(&song)
            } else if let Some(path) = inputs {
                PressSchedule::from_path(&path)?
            } else {
                PressSchedule::default()
            };
            debug!("{} scripted presses", presses.len());

            let engine = GameEngine::new(song, config).context("invalid engine config")?;
            let mut sim = Simulation::new(engine, presses, frame_ms as f64 / 1000.0);
            let result = sim.run();

            println!("accuracy={}", result.accuracy);
            println!("points={}", result.score.points);
            println!("stars={}", result.stars);
            println!("max_combo={}", result.score.max_combo);
            println!("misses={}", result.score.misses);
            if result.unresolved > 0 {
                println!("unresolved={}", result.unresolved);
            }

            if let Some(dir) = store {
                let scores = BestScores::new(
                    FileStore::open(&dir)
                        .with_context(|| format!("failed to open store: {}", dir.display()))?,
                );
                let best = BestScore {
                    accuracy: result.accuracy,
                    points: result.score.points,
                    stars: result.stars,
                };
                if scores
                    .record(&result.song_id, best)
                    .context("failed to record best score")?
                {
                    println!("new best");
                }
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn load_config(path: &Path) -> anyhow::Result<EngineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config json: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(config)
}
