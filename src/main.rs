//! Dreamwalk entry point
//!
//! Native builds run a headless demo: the autoplay driver plays every level
//! from the chosen start level to the end, logging progress.
//!
//! Usage: `dreamwalk [--seed N] [--level NAME] [--tuning PATH]`

#[cfg(not(target_arch = "wasm32"))]
use dreamwalk::sim::{GameEvent, GameStore, Level, play_through};
#[cfg(not(target_arch = "wasm32"))]
use dreamwalk::tuning::Tuning;

/// Demo frame rate
#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 60.0;

/// Give up on a level after this many frames
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES_PER_LEVEL: u32 = 20_000;

#[cfg(not(target_arch = "wasm32"))]
struct Options {
    seed: Option<u64>,
    level: Level,
    tuning: Tuning,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_args() -> Options {
    let mut options = Options {
        seed: None,
        level: Level::FIRST,
        tuning: Tuning::default(),
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => match args.next().and_then(|s| s.parse().ok()) {
                Some(seed) => options.seed = Some(seed),
                None => log::warn!("--seed expects an integer"),
            },
            "--level" => match args.next().as_deref().and_then(Level::from_name) {
                Some(level) => options.level = level,
                None => log::warn!("--level expects one of the level names"),
            },
            "--tuning" => match args.next() {
                Some(path) => options.tuning = Tuning::load(path),
                None => log::warn!("--tuning expects a file path"),
            },
            other => log::warn!("Ignoring unknown argument {}", other),
        }
    }
    options
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dreamwalk (native) starting...");

    let options = parse_args();
    let seed = options.seed.unwrap_or_else(rand::random);
    log::info!("Seed {}", seed);

    let mut store = GameStore::with_tuning(seed, options.tuning);
    if options.level != Level::FIRST {
        store.start_level(options.level);
    }

    let completed = play_through(&mut store, FRAME_DT, MAX_FRAMES_PER_LEVEL);

    let events = store.drain_events();
    let completions = events
        .iter()
        .filter(|e| matches!(e, GameEvent::LevelCompleted(_)))
        .count();
    log::debug!("{} events queued during the run", events.len());

    println!("\nDemo run (seed {}):", seed);
    for level in &completed {
        println!("  ✓ {}", level.as_str());
    }
    if store.state().is_level_complete && store.level().next().is_none() {
        println!("Reached the end ({} levels completed).", completions);
    } else {
        println!("Stopped on {}.", store.level().as_str());
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The store is driven by the host page on the web; nothing to run here
}
