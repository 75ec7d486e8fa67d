//! Neighbor flow protocol.
//!
//! Entities never touch each other directly. During a tick an entity asks
//! how much room its downstream neighbor has ([`FlowPort::neighbor_capacity`])
//! and, when the answer clears [`SEND_THRESHOLD`], hands it one product
//! ([`FlowPort::send_product`]). Nothing else crosses a cell boundary.

use crate::board::Board;
use crate::grid::{CellPosition, Direction};
use crate::product::Product;

/// Minimum downstream capacity required before any entity sends a product.
/// Conveyors also keep this many empty slots between queued products.
pub const SEND_THRESHOLD: usize = 3;

/// Receives every product that reaches the collection center.
pub trait ProductObserver {
    fn on_product_received(&mut self, product: Product);
}

/// Discards deliveries. Useful when only the board state matters.
impl ProductObserver for () {
    fn on_product_received(&mut self, _product: Product) {}
}

/// Collects deliveries in arrival order.
impl ProductObserver for Vec<Product> {
    fn on_product_received(&mut self, product: Product) {
        self.push(product);
    }
}

/// What an entity can see of the board while it updates.
pub trait FlowPort {
    /// Capacity offered by the foreground entity one step from `from` in
    /// `direction`. Zero when the neighbor is off the board or empty.
    fn neighbor_capacity(&self, from: CellPosition, direction: Direction) -> usize;

    /// Deliver `product` to the neighbor one step from `from`. Dropped
    /// silently when the neighbor is off the board or has no foreground.
    fn send_product(&mut self, from: CellPosition, direction: Direction, product: Product);

    /// Yield of the deposit under `position`, if any.
    fn deposit_at(&self, position: CellPosition) -> Option<Product>;
}

/// Capacity of the neighbor of `from` in `direction`.
pub fn neighbor_capacity(board: &Board, from: CellPosition, direction: Direction) -> usize {
    let target = from.neighbor(direction);
    board
        .foreground(target)
        .map_or(0, |cell| cell.capacity(target))
}

/// Send `product` to the neighbor of `from` in `direction`.
///
/// Callers must have checked [`neighbor_capacity`] first; the receiving
/// entity asserts it has room.
pub fn send_product(
    board: &mut Board,
    from: CellPosition,
    direction: Direction,
    product: Product,
    observer: &mut dyn ProductObserver,
) {
    let target = from.neighbor(direction);
    if let Some(cell) = board.foreground_mut(target) {
        cell.receive(target, product, observer);
    }
}

/// The live port used by the board's sweeps: the board plus the scoring
/// observer for this tick.
pub(crate) struct SweepPort<'a> {
    pub(crate) board: &'a mut Board,
    pub(crate) observer: &'a mut dyn ProductObserver,
}

impl FlowPort for SweepPort<'_> {
    fn neighbor_capacity(&self, from: CellPosition, direction: Direction) -> usize {
        neighbor_capacity(self.board, from, direction)
    }

    fn send_product(&mut self, from: CellPosition, direction: Direction, product: Product) {
        send_product(self.board, from, direction, product, &mut *self.observer);
    }

    fn deposit_at(&self, position: CellPosition) -> Option<Product> {
        self.board.background(position).and_then(|bg| bg.deposit_value())
    }
}
