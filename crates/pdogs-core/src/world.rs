//! Seeded world generation.
//!
//! Three steps, each deterministic for a given seed:
//! 1. One draw per cell in row-major order decides its deposit.
//! 2. The collection center is built at the exact board center.
//! 3. A second generator, seeded with the same value, draws wall
//!    positions. A draw that lands on an occupied cell is skipped.

use crate::board::Board;
use crate::config::SimConfig;
use crate::entity::{Background, BuildKind};
use crate::grid::CellPosition;
use crate::product::Product;
use crate::rng::Mt19937;
use tracing::{info, warn};

/// What generation actually produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorldSummary {
    pub deposits: usize,
    pub walls_attempted: u32,
    pub walls_placed: u32,
}

/// Generate the starting board for `seed`. `config` must be validated.
pub fn generate_world(config: &SimConfig, seed: u32) -> (Board, WorldSummary) {
    let mut board = Board::new(config.board.clone());
    let mut summary = WorldSummary::default();

    let mut deposit_rng = Mt19937::new(seed);
    for position in board.size().positions() {
        let roll = deposit_rng.next_below(config.world.deposit_roll);
        if !config.world.deposit_values.contains(&roll) {
            continue;
        }
        if let Some(value) = Product::new(roll) {
            board.set_background(position, Some(Background::Deposit { value }));
            summary.deposits += 1;
        }
    }

    let goal = config.board.goal_top_left();
    if let Err(err) = board.build(goal, BuildKind::CollectionCenter) {
        warn!(?goal, %err, "collection center could not be placed");
    }

    let mut wall_rng = Mt19937::new(seed);
    let size = board.size();
    for _ in 0..config.world.wall_count {
        let row = wall_rng.next_below(size.height) as i32;
        let col = wall_rng.next_below(size.width) as i32;
        let position = CellPosition::new(row, col);
        summary.walls_attempted += 1;
        if board.foreground(position).is_some() {
            continue;
        }
        if board.build(position, BuildKind::Wall).is_ok() {
            summary.walls_placed += 1;
        }
    }

    info!(
        seed,
        deposits = summary.deposits,
        walls_placed = summary.walls_placed,
        walls_attempted = summary.walls_attempted,
        "world generated"
    );

    (board, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::grid::Footprint;

    #[test]
    fn same_seed_same_world() {
        let config = SimConfig::default();
        let (a, sa) = generate_world(&config, 20);
        let (b, sb) = generate_world(&config, 20);
        assert_eq!(sa, sb);
        for p in a.size().positions() {
            assert_eq!(a.background(p), b.background(p));
            assert_eq!(
                a.foreground(p).map(|c| c.kind()),
                b.foreground(p).map(|c| c.kind())
            );
        }
    }

    #[test]
    fn different_seeds_differ() {
        let config = SimConfig::default();
        let (a, _) = generate_world(&config, 1);
        let (b, _) = generate_world(&config, 2);
        let differs = a
            .size()
            .positions()
            .any(|p| a.background(p) != b.background(p));
        assert!(differs);
    }

    #[test]
    fn collection_center_covers_board_center() {
        let config = SimConfig::default();
        let (board, _) = generate_world(&config, 7);
        let id = board.foreground_id(CellPosition::new(16, 29)).unwrap();
        for p in Footprint::new(4, 4).cells(CellPosition::new(16, 29)) {
            assert_eq!(board.foreground_id(p), Some(id));
        }
        assert_eq!(board.count_kind(EntityKind::CollectionCenter), 1);
    }

    #[test]
    fn deposits_use_configured_values() {
        let config = SimConfig::default();
        let (board, summary) = generate_world(&config, 99);
        let mut count = 0;
        for p in board.size().positions() {
            if let Some(value) = board.background(p).and_then(|bg| bg.deposit_value()) {
                assert!(config.world.deposit_values.contains(&value.value()));
                count += 1;
            }
        }
        assert_eq!(count, summary.deposits);
        // Roughly 7 in 30 of 2232 cells.
        assert!((300..=750).contains(&count), "got {count}");
    }

    #[test]
    fn walls_match_summary() {
        let config = SimConfig::default();
        let (board, summary) = generate_world(&config, 20);
        assert_eq!(summary.walls_attempted, 100);
        assert_eq!(board.count_kind(EntityKind::Wall), summary.walls_placed as usize);
        assert!(summary.walls_placed <= 100);
    }

    #[test]
    fn wall_collisions_are_skipped() {
        let mut config = SimConfig::default();
        config.board.width = 6;
        config.board.height = 6;
        config.board.goal_size = 2;
        let (board, summary) = generate_world(&config, 20);
        // 100 draws over 32 free cells must collide.
        assert!(summary.walls_placed < 100);
        assert!(summary.walls_placed <= 32);
        assert_eq!(board.count_kind(EntityKind::Wall), summary.walls_placed as usize);
        assert_eq!(board.count_kind(EntityKind::CollectionCenter), 1);
    }

    #[test]
    fn zero_walls_configured() {
        let mut config = SimConfig::default();
        config.world.wall_count = 0;
        let (board, summary) = generate_world(&config, 3);
        assert_eq!(summary.walls_placed, 0);
        assert_eq!(board.entity_count(), 1);
    }
}
