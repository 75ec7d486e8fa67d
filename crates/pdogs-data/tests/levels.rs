//! The bundled level files load, validate and run.

use std::path::{Path, PathBuf};

use pdogs_core::config::Level;
use pdogs_core::manager::Manager;
use pdogs_core::strategy::IdleStrategy;
use pdogs_data::load_level;

fn levels_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../levels")
}

#[test]
fn bundled_levels_load() {
    let primes = load_level(&levels_dir().join("primes.ron")).unwrap();
    assert_eq!(primes.name, "primes");
    assert_eq!(primes.level, Level::new(1, 20));

    let sevens = load_level(&levels_dir().join("sevens.toml")).unwrap();
    assert_eq!(sevens.level, Level::new(7, 42));
    assert_eq!(sevens.config.end_tick, 9000);

    let small = load_level(&levels_dir().join("small.json")).unwrap();
    assert_eq!(small.level, Level::new(3, 5));
    assert_eq!(small.config.board.width, 20);
    assert_eq!(small.config.end_tick, 1200);
}

#[test]
fn loaded_level_runs_to_end() {
    let small = load_level(&levels_dir().join("small.json")).unwrap();
    let mut manager = Manager::new(small.config, small.level, Box::new(IdleStrategy)).unwrap();
    assert_eq!(manager.run_to_end(), 0);
    assert_eq!(manager.elapsed_ticks(), 1200);
    assert_eq!(pdogs_core::strategy::GameInfo::level_info(&manager.view()), "(3)");
}
