//! Fixtures for exercising boards without a full game: small configs,
//! conveyors and combiners with preloaded products, a flow port that just
//! records sends, and a fixed `GameInfo`.
//!
//! Compiled for this crate's unit tests, and for its integration tests and
//! benches through the `test-utils` feature.

use crate::board::LayeredCell;
use crate::config::{BoardConfig, SimConfig, WorldConfig};
use crate::entity::{Background, Combiner, Conveyor, Foreground, ForegroundCell};
use crate::flow::FlowPort;
use crate::grid::{CellPosition, Direction, GridSize};
use crate::product::Product;
use crate::strategy::GameInfo;

// ===========================================================================
// Products and configs
// ===========================================================================

/// A product of value `v`. Panics on zero.
pub fn product(v: u32) -> Product {
    Product::new(v).expect("products are non-zero")
}

/// Default board constants on a `width` x `height` board.
pub fn board_config(width: u32, height: u32) -> BoardConfig {
    BoardConfig {
        width,
        height,
        ..BoardConfig::default()
    }
}

/// A 16 x 12 world with a handful of walls and a short game.
pub fn small_config() -> SimConfig {
    SimConfig {
        board: board_config(16, 12),
        world: WorldConfig {
            wall_count: 10,
            ..WorldConfig::default()
        },
        end_tick: 300,
        ..SimConfig::default()
    }
}

// ===========================================================================
// Entity builders
// ===========================================================================

/// A 10-slot conveyor whose slots hold `values` (0 = empty). Missing
/// trailing slots are empty.
pub fn conveyor_with(direction: Direction, values: &[u32]) -> Conveyor {
    let size = BoardConfig::default().conveyor_buffer_size;
    let mut slots: Vec<Option<Product>> = values.iter().map(|&v| Product::new(v)).collect();
    slots.resize(size.max(slots.len()), None);
    Conveyor::with_slots(direction, slots)
}

pub fn conveyor_cell(at: CellPosition, direction: Direction, values: &[u32]) -> ForegroundCell {
    ForegroundCell::new(at, Foreground::Conveyor(conveyor_with(direction, values)))
}

/// A combiner anchored at `top_left` with both slots filled.
pub fn combiner_cell(top_left: CellPosition, facing: Direction, first: u32, second: u32) -> ForegroundCell {
    let mut combiner = Combiner::new(facing, BoardConfig::default().conveyor_buffer_size);
    let main = combiner.main_cell(top_left);
    let other = Combiner::footprint_for(facing)
        .cells(top_left)
        .find(|&p| p != main)
        .expect("combiners span two cells");
    combiner.receive(top_left, main, product(first));
    combiner.receive(top_left, other, product(second));
    ForegroundCell::new(top_left, Foreground::Combiner(combiner))
}

// ===========================================================================
// StubPort
// ===========================================================================

/// A flow port with a fixed downstream capacity that records every send.
#[derive(Debug, Clone, Default)]
pub struct StubPort {
    pub capacity: usize,
    pub deposit: Option<Product>,
    pub sent: Vec<(CellPosition, Direction, Product)>,
}

impl StubPort {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Report `product` as the deposit under every cell.
    pub fn on_deposit(mut self, product: Product) -> Self {
        self.deposit = Some(product);
        self
    }
}

impl FlowPort for StubPort {
    fn neighbor_capacity(&self, _from: CellPosition, _direction: Direction) -> usize {
        self.capacity
    }

    fn send_product(&mut self, from: CellPosition, direction: Direction, product: Product) {
        self.sent.push((from, direction, product));
    }

    fn deposit_at(&self, _position: CellPosition) -> Option<Product> {
        self.deposit
    }
}

// ===========================================================================
// FixedInfo
// ===========================================================================

/// A `GameInfo` over an empty board with fixed counters.
#[derive(Debug, Clone)]
pub struct FixedInfo {
    pub size: GridSize,
    pub divisor: u32,
    pub score: u64,
    pub elapsed: u64,
    pub end_tick: u64,
}

impl Default for FixedInfo {
    fn default() -> Self {
        let config = SimConfig::default();
        Self {
            size: config.board.size(),
            divisor: 1,
            score: 0,
            elapsed: 0,
            end_tick: config.end_tick,
        }
    }
}

impl GameInfo for FixedInfo {
    fn board_size(&self) -> GridSize {
        self.size
    }

    fn layered_cell(&self, _position: CellPosition) -> Option<&LayeredCell> {
        None
    }

    fn foreground(&self, _position: CellPosition) -> Option<&ForegroundCell> {
        None
    }

    fn background(&self, _position: CellPosition) -> Option<&Background> {
        None
    }

    fn is_scored_product(&self, value: u32) -> bool {
        value % self.divisor == 0
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn elapsed_ticks(&self) -> u64 {
        self.elapsed
    }

    fn end_tick(&self) -> u64 {
        self.end_tick
    }

    fn is_game_over(&self) -> bool {
        self.elapsed >= self.end_tick
    }

    fn level_info(&self) -> String {
        format!("({})", self.divisor)
    }
}
