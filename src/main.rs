//! Star Collector entry point
//!
//! Native builds run a headless session driven by the autopilot against the
//! arcade integrator; the browser build enters through `star_collector::web`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result, bail};
    use clap::Parser;

    use star_collector::persistence::{FileStore, KeyValueStore, MemoryStore};
    use star_collector::sim::{ArcadePhysics, GameEvent, autopilot, builtin_levels, load_levels};
    use star_collector::{Session, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "star-collector")]
    #[command(about = "Headless Star Collector runner driven by the autopilot")]
    pub struct Cli {
        /// Level to start on (must already be unlocked)
        #[arg(long, default_value_t = 1)]
        level: u32,
        /// RNG seed; defaults to the clock
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many ticks
        #[arg(long, default_value_t = 36_000)]
        max_ticks: u64,
        /// Tuning overrides (JSON object)
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Level pack (JSON array)
        #[arg(long)]
        levels: Option<PathBuf>,
        /// Progress file; defaults to the platform data directory
        #[arg(long)]
        save: Option<PathBuf>,
        /// Keep progression in memory only
        #[arg(long)]
        no_save: bool,
        /// Print every event as a JSON line
        #[arg(long)]
        events: bool,
    }

    pub fn run(cli: Cli) -> Result<()> {
        let tuning = match &cli.tuning {
            Some(path) => Tuning::load_from(path)
                .with_context(|| format!("failed loading tuning {}", path.display()))?,
            None => Tuning::default(),
        };
        let levels = match &cli.levels {
            Some(path) => load_levels(path)
                .with_context(|| format!("failed loading levels {}", path.display()))?,
            None => builtin_levels(),
        };
        let seed = cli.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        });
        log::info!("Star Collector (headless) starting, seed {}", seed);

        let physics = ArcadePhysics::from_tuning(&tuning);
        if cli.no_save {
            play(Session::new(levels, tuning, MemoryStore::new(), seed), &cli, &physics)
        } else {
            let path = match &cli.save {
                Some(path) => path.clone(),
                None => FileStore::default_path().context("no default save location")?,
            };
            let store = FileStore::open(&path)
                .with_context(|| format!("failed opening save {}", path.display()))?;
            play(Session::new(levels, tuning, store, seed), &cli, &physics)
        }
    }

    fn play<S: KeyValueStore>(
        mut session: Session<S>,
        cli: &Cli,
        physics: &ArcadePhysics,
    ) -> Result<()> {
        if !session.start_level(cli.level) {
            bail!(
                "level {} is locked (reached {} of {})",
                cli.level,
                session.progression().level_reached,
                session.level_count()
            );
        }

        let mut ticks = 0;
        while ticks < cli.max_ticks {
            let Some(state) = session.state() else {
                break;
            };
            let input = autopilot(state);
            for event in session.update(&input, physics) {
                if cli.events {
                    println!(
                        "{}",
                        serde_json::to_string(&event).context("failed to serialize event")?
                    );
                }
                match event {
                    GameEvent::Cue { .. } | GameEvent::ScoreChanged { .. } => {}
                    GameEvent::PlayerDied
                    | GameEvent::BossDefeated
                    | GameEvent::LevelCleared { .. }
                    | GameEvent::AllLevelsCleared => log::info!("{:?}", event),
                    other => log::debug!("{:?}", other),
                }
            }
            ticks += 1;
        }

        if let Some(state) = session.state() {
            let hud = state.hud();
            println!(
                "Stopped on level {} with score {} ({}/{} hearts)",
                hud.level, hud.score, hud.hearts, hud.max_hearts
            );
        }
        let progress = session.progression();
        println!(
            "Ran {} ticks: high score {}, level reached {}",
            ticks, progress.high_score, progress.level_reached
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    if let Err(e) = native::run(native::Cli::parse()) {
        log::error!("{:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is star_collector::web::start, this is just to satisfy the compiler
}
