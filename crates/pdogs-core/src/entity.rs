//! Entity model: the closed set of things a board cell can hold.
//!
//! A cell has at most one [`Background`] (a deposit) and at most one
//! foreground entity ([`ForegroundCell`]). Foreground behavior is dispatched
//! by matching on [`Foreground`]; there is no trait object per kind.
//!
//! # Update hooks
//!
//! Each tick the board calls [`ForegroundCell::pass_one`] for every occupied
//! cell in row-major order, then [`ForegroundCell::pass_two`] in a second
//! sweep. A multi-cell entity is visited once per covered cell and decides
//! for itself which visit does the work.

use crate::config::{BoardConfig, MIN_CONVEYOR_SLOTS};
use crate::flow::{FlowPort, ProductObserver, SEND_THRESHOLD};
use crate::grid::{CellPosition, Direction, Footprint};
use crate::product::Product;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Kind tag
// ---------------------------------------------------------------------------

/// Fieldless tag for all six entity kinds, for renderers and strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Deposit,
    Wall,
    Conveyor,
    Combiner,
    MiningMachine,
    CollectionCenter,
}

// ---------------------------------------------------------------------------
// Background
// ---------------------------------------------------------------------------

/// Background layer. Created at world generation and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Background {
    /// A minable number cell.
    Deposit { value: Product },
}

impl Background {
    /// Whether foreground entities may be placed on top.
    pub fn can_build(&self) -> bool {
        match self {
            Background::Deposit { .. } => true,
        }
    }

    pub fn deposit_value(&self) -> Option<Product> {
        match self {
            Background::Deposit { value } => Some(*value),
        }
    }

    /// Always [`EntityKind::Deposit`]; the background layer has one kind.
    pub fn kind(&self) -> EntityKind {
        match self {
            Background::Deposit { .. } => EntityKind::Deposit,
        }
    }
}

// ---------------------------------------------------------------------------
// Build requests
// ---------------------------------------------------------------------------

/// A foreground entity the board can be asked to build, before it exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildKind {
    Wall,
    /// A conveyor moving products toward the given direction.
    Conveyor(Direction),
    /// A combiner emitting toward the given direction.
    Combiner(Direction),
    /// A mining machine emitting toward the given direction.
    MiningMachine(Direction),
    CollectionCenter,
}

impl BuildKind {
    pub fn footprint(self, config: &BoardConfig) -> Footprint {
        match self {
            BuildKind::Combiner(direction) => Combiner::footprint_for(direction),
            BuildKind::CollectionCenter => Footprint::new(config.goal_size, config.goal_size),
            BuildKind::Wall | BuildKind::Conveyor(_) | BuildKind::MiningMachine(_) => {
                Footprint::single()
            }
        }
    }

    pub fn kind(self) -> EntityKind {
        match self {
            BuildKind::Wall => EntityKind::Wall,
            BuildKind::Conveyor(_) => EntityKind::Conveyor,
            BuildKind::Combiner(_) => EntityKind::Combiner,
            BuildKind::MiningMachine(_) => EntityKind::MiningMachine,
            BuildKind::CollectionCenter => EntityKind::CollectionCenter,
        }
    }

    /// Construct the entity's initial state.
    pub fn instantiate(self, config: &BoardConfig) -> Foreground {
        match self {
            BuildKind::Wall => Foreground::Wall,
            BuildKind::Conveyor(direction) => {
                Foreground::Conveyor(Conveyor::new(direction, config.conveyor_buffer_size))
            }
            BuildKind::Combiner(direction) => {
                Foreground::Combiner(Combiner::new(direction, config.conveyor_buffer_size))
            }
            BuildKind::MiningMachine(direction) => {
                Foreground::MiningMachine(MiningMachine::new(direction, config.mining_interval))
            }
            BuildKind::CollectionCenter => Foreground::CollectionCenter(CollectionCenter::new(
                config.goal_size,
                config.conveyor_buffer_size,
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Foreground
// ---------------------------------------------------------------------------

/// Per-kind foreground state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Foreground {
    /// Inert obstacle. Cannot be removed.
    Wall,
    Conveyor(Conveyor),
    Combiner(Combiner),
    MiningMachine(MiningMachine),
    CollectionCenter(CollectionCenter),
}

/// A placed foreground entity: its state plus the top-left anchor of its
/// footprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForegroundCell {
    top_left: CellPosition,
    entity: Foreground,
}

impl ForegroundCell {
    /// Wrap `entity` with its anchor. Nothing is checked until the board
    /// places it.
    pub fn new(top_left: CellPosition, entity: Foreground) -> Self {
        Self { top_left, entity }
    }

    /// Anchor of the footprint (its smallest row and column).
    pub fn top_left(&self) -> CellPosition {
        self.top_left
    }

    pub fn entity(&self) -> &Foreground {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Foreground {
        &mut self.entity
    }

    /// Kind tag of the wrapped entity.
    pub fn kind(&self) -> EntityKind {
        match &self.entity {
            Foreground::Wall => EntityKind::Wall,
            Foreground::Conveyor(_) => EntityKind::Conveyor,
            Foreground::Combiner(_) => EntityKind::Combiner,
            Foreground::MiningMachine(_) => EntityKind::MiningMachine,
            Foreground::CollectionCenter(_) => EntityKind::CollectionCenter,
        }
    }

    /// Rows and columns covered, derived from the entity's state.
    pub fn footprint(&self) -> Footprint {
        match &self.entity {
            Foreground::Combiner(c) => Combiner::footprint_for(c.direction),
            Foreground::CollectionCenter(c) => Footprint::new(c.size, c.size),
            Foreground::Wall | Foreground::Conveyor(_) | Foreground::MiningMachine(_) => {
                Footprint::single()
            }
        }
    }

    /// Every board position this entity covers.
    pub fn cells(&self) -> impl Iterator<Item = CellPosition> {
        self.footprint().cells(self.top_left)
    }

    /// Walls and the collection center stay for the whole game.
    pub fn is_removable(&self) -> bool {
        match &self.entity {
            Foreground::Conveyor(_) | Foreground::Combiner(_) | Foreground::MiningMachine(_) => {
                true
            }
            Foreground::Wall | Foreground::CollectionCenter(_) => false,
        }
    }

    /// Output direction, for the kinds that have one.
    pub fn direction(&self) -> Option<Direction> {
        match &self.entity {
            Foreground::Conveyor(c) => Some(c.direction),
            Foreground::Combiner(c) => Some(c.direction),
            Foreground::MiningMachine(m) => Some(m.direction),
            Foreground::Wall | Foreground::CollectionCenter(_) => None,
        }
    }

    /// Room offered to a sender targeting the covered cell `at`.
    pub fn capacity(&self, at: CellPosition) -> usize {
        match &self.entity {
            Foreground::Conveyor(c) => c.capacity(),
            Foreground::Combiner(c) => c.capacity(self.top_left, at),
            Foreground::CollectionCenter(c) => c.capacity(),
            Foreground::Wall | Foreground::MiningMachine(_) => 0,
        }
    }

    /// Accept one product at the covered cell `at`.
    ///
    /// Only valid after [`capacity`](Self::capacity) reported room.
    pub fn receive(&mut self, at: CellPosition, product: Product, observer: &mut dyn ProductObserver) {
        let top_left = self.top_left;
        let kind = self.kind();
        match &mut self.entity {
            Foreground::Conveyor(c) => c.receive(product),
            Foreground::Combiner(c) => c.receive(top_left, at, product),
            Foreground::CollectionCenter(_) => observer.on_product_received(product),
            Foreground::Wall | Foreground::MiningMachine(_) => {
                debug_assert!(false, "{kind:?} at {at:?} cannot receive products");
            }
        }
    }

    /// First sweep: forwarding, merging and mining.
    pub fn pass_one<P: FlowPort + ?Sized>(&mut self, at: CellPosition, port: &mut P) {
        let top_left = self.top_left;
        match &mut self.entity {
            Foreground::Conveyor(c) => c.pass_one(at, port),
            Foreground::Combiner(c) => c.pass_one(top_left, at, port),
            Foreground::MiningMachine(m) => m.pass_one(at, port),
            Foreground::Wall | Foreground::CollectionCenter(_) => {}
        }
    }

    /// Second sweep: conveyor backlog compaction.
    pub fn pass_two<P: FlowPort + ?Sized>(&mut self, _at: CellPosition, _port: &mut P) {
        if let Foreground::Conveyor(c) = &mut self.entity {
            c.pass_two();
        }
    }

    /// The conveyor state, if this is a conveyor.
    pub fn as_conveyor(&self) -> Option<&Conveyor> {
        match &self.entity {
            Foreground::Conveyor(c) => Some(c),
            _ => None,
        }
    }

    /// The combiner state, if this is a combiner.
    pub fn as_combiner(&self) -> Option<&Combiner> {
        match &self.entity {
            Foreground::Combiner(c) => Some(c),
            _ => None,
        }
    }

    /// The miner state, if this is a mining machine.
    pub fn as_mining_machine(&self) -> Option<&MiningMachine> {
        match &self.entity {
            Foreground::MiningMachine(m) => Some(m),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Conveyor
// ---------------------------------------------------------------------------

/// A belt with a fixed number of slots. Slot 0 is the head (next to leave),
/// the last slot is the tail (where products enter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conveyor {
    direction: Direction,
    slots: Vec<Option<Product>>,
}

impl Conveyor {
    /// An empty conveyor. The board refuses to place one with fewer than
    /// [`MIN_CONVEYOR_SLOTS`] slots.
    pub fn new(direction: Direction, slot_count: usize) -> Self {
        Self {
            direction,
            slots: vec![None; slot_count],
        }
    }

    /// A conveyor preloaded with the given slots (head first).
    #[cfg(any(test, feature = "test-utils"))]
    pub fn with_slots(direction: Direction, slots: Vec<Option<Product>>) -> Self {
        Self { direction, slots }
    }

    /// Direction products leave through the head.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Slot contents, head first.
    pub fn slots(&self) -> &[Option<Product>] {
        &self.slots
    }

    /// Empty slots counted from the tail until the first occupied one.
    pub fn capacity(&self) -> usize {
        self.slots.iter().rev().take_while(|s| s.is_none()).count()
    }

    /// Put `product` into the tail slot, which must be empty.
    pub fn receive(&mut self, product: Product) {
        if let Some(tail) = self.slots.last_mut() {
            debug_assert!(tail.is_none(), "conveyor tail is occupied");
            *tail = Some(product);
        }
    }

    /// Send the head product if the neighbor has room, then shift the two
    /// slots behind it forward as far as the neighbor's capacity allows.
    pub fn pass_one<P: FlowPort + ?Sized>(&mut self, at: CellPosition, port: &mut P) {
        let capacity = port.neighbor_capacity(at, self.direction);

        if capacity >= SEND_THRESHOLD {
            if let Some(product) = self.slots[0].take() {
                port.send_product(at, self.direction, product);
            }
        }

        if capacity >= SEND_THRESHOLD - 1 && self.slots[0].is_none() && self.slots[1].is_some() {
            self.slots.swap(0, 1);
        }

        if capacity >= SEND_THRESHOLD - 2
            && self.slots[0].is_none()
            && self.slots[1].is_none()
            && self.slots[2].is_some()
        {
            self.slots.swap(1, 2);
        }
    }

    /// Advance any product deeper than the head region whose three
    /// predecessors are all empty by one slot.
    pub fn pass_two(&mut self) {
        for k in SEND_THRESHOLD..self.slots.len() {
            let gap_is_clear = self.slots[k - SEND_THRESHOLD..k].iter().all(Option::is_none);
            if self.slots[k].is_some() && gap_is_clear {
                self.slots.swap(k, k - 1);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Combiner
// ---------------------------------------------------------------------------

/// Two single-item input slots merged into one product (their sum).
///
/// Horizontal (1 row, 2 columns) when facing `Top`/`Bottom`, vertical
/// otherwise. The main cell feeds the first slot and does the sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combiner {
    direction: Direction,
    first: Option<Product>,
    second: Option<Product>,
    slot_capacity: usize,
}

impl Combiner {
    /// An empty combiner. Each free slot offers `slot_capacity` to senders.
    pub fn new(direction: Direction, slot_capacity: usize) -> Self {
        Self {
            direction,
            first: None,
            second: None,
            slot_capacity,
        }
    }

    /// Footprint of a combiner facing `direction`.
    pub fn footprint_for(direction: Direction) -> Footprint {
        if direction.is_vertical() {
            Footprint::new(2, 1)
        } else {
            Footprint::new(1, 2)
        }
    }

    /// Output direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Input slot fed through the main cell.
    pub fn first_slot(&self) -> Option<Product> {
        self.first
    }

    /// Input slot fed through the other cell.
    pub fn second_slot(&self) -> Option<Product> {
        self.second
    }

    /// Whether `at` is the main cell of a combiner anchored at `top_left`.
    pub fn is_main_cell(&self, top_left: CellPosition, at: CellPosition) -> bool {
        match self.direction {
            Direction::Top | Direction::Right => at != top_left,
            Direction::Bottom | Direction::Left => at == top_left,
        }
    }

    /// Position of the main cell for a combiner anchored at `top_left`.
    pub fn main_cell(&self, top_left: CellPosition) -> CellPosition {
        match self.direction {
            Direction::Top => top_left.neighbor(Direction::Right),
            Direction::Right => top_left.neighbor(Direction::Bottom),
            Direction::Bottom | Direction::Left => top_left,
        }
    }

    /// Room behind the covered cell `at`: all or nothing per slot.
    pub fn capacity(&self, top_left: CellPosition, at: CellPosition) -> usize {
        let slot = if self.is_main_cell(top_left, at) {
            self.first
        } else {
            self.second
        };
        if slot.is_none() { self.slot_capacity } else { 0 }
    }

    /// Fill the slot belonging to the covered cell `at`.
    pub fn receive(&mut self, top_left: CellPosition, at: CellPosition, product: Product) {
        let slot = if self.is_main_cell(top_left, at) {
            &mut self.first
        } else {
            &mut self.second
        };
        debug_assert!(slot.is_none(), "combiner slot is occupied");
        *slot = Some(product);
    }

    /// On the main cell visit only: merge and send once both slots are full
    /// and the neighbor has room.
    pub fn pass_one<P: FlowPort + ?Sized>(
        &mut self,
        top_left: CellPosition,
        at: CellPosition,
        port: &mut P,
    ) {
        if !self.is_main_cell(top_left, at) {
            return;
        }
        if let (Some(first), Some(second)) = (self.first, self.second) {
            if port.neighbor_capacity(at, self.direction) >= SEND_THRESHOLD {
                port.send_product(at, self.direction, first.merge(second));
                self.first = None;
                self.second = None;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MiningMachine
// ---------------------------------------------------------------------------

/// Extracts the deposit under it every `interval` ticks. An extraction that
/// finds no room downstream is lost, not retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningMachine {
    direction: Direction,
    elapsed: u32,
    interval: u32,
}

impl MiningMachine {
    /// A miner that extracts every `interval` ticks, starting idle.
    pub fn new(direction: Direction, interval: u32) -> Self {
        Self {
            direction,
            elapsed: 0,
            interval,
        }
    }

    /// Output direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Ticks since the last extraction attempt.
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Count one tick; on reaching the interval, try to send the deposit
    /// value and restart the count either way.
    pub fn pass_one<P: FlowPort + ?Sized>(&mut self, at: CellPosition, port: &mut P) {
        self.elapsed += 1;
        if self.elapsed < self.interval {
            return;
        }
        if let Some(value) = port.deposit_at(at) {
            if port.neighbor_capacity(at, self.direction) >= SEND_THRESHOLD {
                port.send_product(at, self.direction, value);
            }
        }
        self.elapsed = 0;
    }
}

// ---------------------------------------------------------------------------
// CollectionCenter
// ---------------------------------------------------------------------------

/// The scoring sink. Always has room; every product it receives goes to the
/// observer and is not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionCenter {
    size: u32,
    capacity: usize,
}

impl CollectionCenter {
    pub fn new(size: u32, capacity: usize) -> Self {
        Self { size, capacity }
    }

    /// Side length of the square footprint.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Room reported to every sender.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{StubPort, conveyor_with, product};

    const AT: CellPosition = CellPosition::new(5, 5);

    // -- Conveyor ------------------------------------------------------------

    #[test]
    fn conveyor_capacity_counts_from_tail() {
        let c = conveyor_with(Direction::Right, &[0, 0, 4, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(c.capacity(), 7);
        let c = conveyor_with(Direction::Right, &[0, 0, 0, 0, 0, 0, 0, 0, 0, 9]);
        assert_eq!(c.capacity(), 0);
        let c = Conveyor::new(Direction::Right, 10);
        assert_eq!(c.capacity(), 10);
    }

    #[test]
    fn conveyor_receive_fills_tail() {
        let mut c = Conveyor::new(Direction::Left, 10);
        c.receive(product(3));
        assert_eq!(c.slots()[9], Some(product(3)));
        assert_eq!(c.capacity(), 0);
    }

    #[test]
    fn conveyor_forwards_head_at_threshold() {
        let mut c = conveyor_with(Direction::Right, &[7, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let mut port = StubPort::with_capacity(3);
        c.pass_one(AT, &mut port);
        assert_eq!(c.slots()[0], None);
        assert_eq!(port.sent, vec![(AT, Direction::Right, product(7))]);
    }

    #[test]
    fn conveyor_holds_head_below_threshold() {
        let mut c = conveyor_with(Direction::Right, &[7, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let mut port = StubPort::with_capacity(2);
        c.pass_one(AT, &mut port);
        assert_eq!(c.slots()[0], Some(product(7)));
        assert!(port.sent.is_empty());
    }

    #[test]
    fn conveyor_fill_steps_are_staged() {
        // Head leaves, slot 1 moves up; slot 2 stays because slot 1 was
        // occupied when its rule ran.
        let mut c = conveyor_with(Direction::Top, &[1, 2, 3, 0, 0, 0, 0, 0, 0, 0]);
        let mut port = StubPort::with_capacity(10);
        c.pass_one(AT, &mut port);
        assert_eq!(
            c.slots()[..3],
            [Some(product(2)), None, Some(product(3))]
        );
    }

    #[test]
    fn conveyor_slot_two_advances_when_head_region_empty() {
        let mut c = conveyor_with(Direction::Top, &[0, 0, 3, 0, 0, 0, 0, 0, 0, 0]);
        let mut port = StubPort::with_capacity(1);
        c.pass_one(AT, &mut port);
        assert_eq!(c.slots()[..3], [None, Some(product(3)), None]);
    }

    #[test]
    fn conveyor_fill_gated_by_downstream_capacity() {
        let mut c = conveyor_with(Direction::Top, &[0, 4, 0, 0, 0, 0, 0, 0, 0, 0]);
        let mut port = StubPort::with_capacity(1);
        c.pass_one(AT, &mut port);
        assert_eq!(c.slots()[1], Some(product(4)));

        let mut port = StubPort::with_capacity(2);
        c.pass_one(AT, &mut port);
        assert_eq!(c.slots()[0], Some(product(4)));
        assert!(port.sent.is_empty());
    }

    #[test]
    fn conveyor_pass_two_keeps_spacing() {
        let mut c = conveyor_with(Direction::Right, &[0, 0, 0, 0, 0, 0, 0, 0, 0, 6]);
        c.pass_two();
        assert_eq!(c.slots()[8], Some(product(6)));
        assert_eq!(c.slots()[9], None);

        // A product within three slots blocks the one behind it.
        let mut c = conveyor_with(Direction::Right, &[0, 0, 0, 5, 0, 6, 0, 0, 0, 0]);
        c.pass_two();
        assert_eq!(c.slots()[2], Some(product(5)));
        assert_eq!(c.slots()[5], Some(product(6)));
    }

    #[test]
    fn conveyor_pass_two_ignores_head_region() {
        let mut c = conveyor_with(Direction::Right, &[0, 0, 8, 0, 0, 0, 0, 0, 0, 0]);
        c.pass_two();
        assert_eq!(c.slots()[2], Some(product(8)));
    }

    // -- Combiner ------------------------------------------------------------

    #[test]
    fn combiner_footprint_by_direction() {
        assert_eq!(Combiner::footprint_for(Direction::Top), Footprint::new(2, 1));
        assert_eq!(Combiner::footprint_for(Direction::Bottom), Footprint::new(2, 1));
        assert_eq!(Combiner::footprint_for(Direction::Left), Footprint::new(1, 2));
        assert_eq!(Combiner::footprint_for(Direction::Right), Footprint::new(1, 2));
    }

    #[test]
    fn combiner_main_cell_by_direction() {
        let tl = CellPosition::new(2, 2);
        for d in Direction::ALL {
            let c = Combiner::new(d, 10);
            let main = c.main_cell(tl);
            assert!(c.is_main_cell(tl, main), "{d:?}");
            assert!(Combiner::footprint_for(d).covers(tl, main));
        }
        assert_eq!(Combiner::new(Direction::Top, 10).main_cell(tl), CellPosition::new(2, 3));
        assert_eq!(Combiner::new(Direction::Right, 10).main_cell(tl), CellPosition::new(3, 2));
        assert_eq!(Combiner::new(Direction::Bottom, 10).main_cell(tl), tl);
        assert_eq!(Combiner::new(Direction::Left, 10).main_cell(tl), tl);
    }

    #[test]
    fn combiner_slots_route_by_cell() {
        let tl = CellPosition::new(0, 0);
        let other = CellPosition::new(0, 1);
        let mut c = Combiner::new(Direction::Bottom, 10);
        assert_eq!(c.capacity(tl, tl), 10);
        c.receive(tl, tl, product(2));
        assert_eq!(c.capacity(tl, tl), 0);
        assert_eq!(c.capacity(tl, other), 10);
        c.receive(tl, other, product(5));
        assert_eq!(c.first_slot(), Some(product(2)));
        assert_eq!(c.second_slot(), Some(product(5)));
    }

    #[test]
    fn combiner_merges_and_clears() {
        let tl = CellPosition::new(0, 0);
        let mut c = Combiner::new(Direction::Bottom, 10);
        c.receive(tl, tl, product(2));
        c.receive(tl, CellPosition::new(0, 1), product(5));

        let mut port = StubPort::with_capacity(3);
        c.pass_one(tl, tl, &mut port);
        assert_eq!(port.sent, vec![(tl, Direction::Bottom, product(7))]);
        assert_eq!((c.first_slot(), c.second_slot()), (None, None));
    }

    #[test]
    fn combiner_waits_for_both_slots() {
        let tl = CellPosition::new(0, 0);
        let mut c = Combiner::new(Direction::Bottom, 10);
        c.receive(tl, tl, product(2));
        let mut port = StubPort::with_capacity(10);
        c.pass_one(tl, tl, &mut port);
        assert!(port.sent.is_empty());
        assert_eq!(c.first_slot(), Some(product(2)));
    }

    #[test]
    fn combiner_secondary_cell_does_nothing() {
        let tl = CellPosition::new(0, 0);
        let other = CellPosition::new(0, 1);
        let mut c = Combiner::new(Direction::Bottom, 10);
        c.receive(tl, tl, product(2));
        c.receive(tl, other, product(3));
        let mut port = StubPort::with_capacity(10);
        c.pass_one(tl, other, &mut port);
        assert!(port.sent.is_empty());
        assert!(c.first_slot().is_some());
    }

    // -- MiningMachine -------------------------------------------------------

    #[test]
    fn miner_extracts_every_interval() {
        let mut m = MiningMachine::new(Direction::Left, 100);
        let mut port = StubPort::with_capacity(10).on_deposit(product(11));
        for _ in 0..99 {
            m.pass_one(AT, &mut port);
        }
        assert!(port.sent.is_empty());
        assert_eq!(m.elapsed(), 99);
        m.pass_one(AT, &mut port);
        assert_eq!(port.sent, vec![(AT, Direction::Left, product(11))]);
        assert_eq!(m.elapsed(), 0);
    }

    #[test]
    fn blocked_miner_loses_cycle() {
        let mut m = MiningMachine::new(Direction::Left, 100);
        let mut port = StubPort::with_capacity(0).on_deposit(product(11));
        for _ in 0..100 {
            m.pass_one(AT, &mut port);
        }
        assert!(port.sent.is_empty());
        assert_eq!(m.elapsed(), 0);
    }

    #[test]
    fn miner_without_deposit_sends_nothing() {
        let mut m = MiningMachine::new(Direction::Left, 2);
        let mut port = StubPort::with_capacity(10);
        m.pass_one(AT, &mut port);
        m.pass_one(AT, &mut port);
        assert!(port.sent.is_empty());
        assert_eq!(m.elapsed(), 0);
    }

    // -- ForegroundCell ------------------------------------------------------

    #[test]
    fn removability_by_kind() {
        let config = BoardConfig::default();
        let tl = CellPosition::new(0, 0);
        let removable = |k: BuildKind| ForegroundCell::new(tl, k.instantiate(&config)).is_removable();
        assert!(!removable(BuildKind::Wall));
        assert!(!removable(BuildKind::CollectionCenter));
        assert!(removable(BuildKind::Conveyor(Direction::Top)));
        assert!(removable(BuildKind::Combiner(Direction::Top)));
        assert!(removable(BuildKind::MiningMachine(Direction::Top)));
    }

    #[test]
    fn collection_center_forwards_to_observer() {
        let config = BoardConfig::default();
        let tl = CellPosition::new(0, 0);
        let mut cell = ForegroundCell::new(tl, BuildKind::CollectionCenter.instantiate(&config));
        assert_eq!(cell.capacity(CellPosition::new(3, 3)), 10);
        assert_eq!(cell.footprint(), Footprint::new(4, 4));

        let mut seen = Vec::new();
        cell.receive(CellPosition::new(1, 1), product(13), &mut seen);
        assert_eq!(seen, vec![product(13)]);
        assert_eq!(cell.capacity(CellPosition::new(1, 1)), 10);
    }

    #[test]
    fn walls_and_miners_offer_no_capacity() {
        let config = BoardConfig::default();
        let tl = CellPosition::new(0, 0);
        for k in [BuildKind::Wall, BuildKind::MiningMachine(Direction::Top)] {
            assert_eq!(ForegroundCell::new(tl, k.instantiate(&config)).capacity(tl), 0);
        }
    }

    #[test]
    fn build_kind_and_cell_kind_agree() {
        let config = BoardConfig::default();
        for k in [
            BuildKind::Wall,
            BuildKind::Conveyor(Direction::Left),
            BuildKind::Combiner(Direction::Right),
            BuildKind::MiningMachine(Direction::Bottom),
            BuildKind::CollectionCenter,
        ] {
            let cell = ForegroundCell::new(CellPosition::new(0, 0), k.instantiate(&config));
            assert_eq!(cell.kind(), k.kind());
            assert_eq!(cell.footprint(), k.footprint(&config));
        }
    }

    #[test]
    fn deposit_background() {
        let bg = Background::Deposit { value: product(5) };
        assert!(bg.can_build());
        assert_eq!(bg.deposit_value(), Some(product(5)));
        assert_eq!(bg.kind(), EntityKind::Deposit);
    }
}
