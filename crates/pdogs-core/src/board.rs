//! The board: a fixed grid of layered cells over an arena of entities.
//!
//! # Layout
//!
//! - `cells`: one [`LayeredCell`] per position, row-major.
//! - `entities`: foreground entities keyed by [`EntityId`]. Every cell of a
//!   footprint stores the same id, so a 4x4 collection center is one entity
//!   referenced from sixteen cells.
//!
//! # Tick
//!
//! [`Board::update`] runs two full row-major sweeps: pass one over every
//! occupied cell, then pass two. State is mutated in place, so a cell
//! visited later in a sweep sees what earlier cells did this tick.

use crate::config::{BoardConfig, MIN_CONVEYOR_SLOTS};
use crate::entity::{Background, BuildKind, EntityKind, Foreground, ForegroundCell};
use crate::flow::{ProductObserver, SweepPort};
use crate::grid::{CellPosition, Footprint, GridSize};
use crate::id::EntityId;
use crate::sim::StateHash;
use slotmap::SlotMap;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("footprint {footprint:?} at {position:?} leaves the board")]
    OutOfBounds {
        position: CellPosition,
        footprint: Footprint,
    },
    #[error("cell {position:?} is not buildable")]
    Occupied { position: CellPosition },
    #[error("conveyor at {position:?} has {slots} slots, needs at least {MIN_CONVEYOR_SLOTS}")]
    ShortConveyor { position: CellPosition, slots: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoveError {
    #[error("cell {position:?} is off the board")]
    OutOfBounds { position: CellPosition },
    #[error("cell {position:?} has no foreground entity")]
    Empty { position: CellPosition },
    #[error("{kind:?} cannot be removed")]
    NotRemovable { kind: EntityKind },
}

// ---------------------------------------------------------------------------
// LayeredCell
// ---------------------------------------------------------------------------

/// One grid position: an optional foreground reference over an optional
/// background.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayeredCell {
    foreground: Option<EntityId>,
    background: Option<Background>,
}

impl LayeredCell {
    /// The entity covering this cell, if any.
    pub fn foreground_id(&self) -> Option<EntityId> {
        self.foreground
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    /// Empty foreground and a buildable (or absent) background.
    pub fn can_build(&self) -> bool {
        self.foreground.is_none() && self.background.as_ref().is_none_or(Background::can_build)
    }
}

#[derive(Clone, Copy)]
enum Pass {
    One,
    Two,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The playing field. Owns every cell and every foreground entity.
#[derive(Debug, Clone)]
pub struct Board {
    config: BoardConfig,
    size: GridSize,
    cells: Vec<LayeredCell>,
    /// `None` only while the entity is detached for its own update.
    entities: SlotMap<EntityId, Option<ForegroundCell>>,
}

impl Board {
    /// An empty board with no backgrounds and no entities.
    pub fn new(config: BoardConfig) -> Self {
        let size = config.size();
        Self {
            cells: vec![LayeredCell::default(); size.cell_count()],
            entities: SlotMap::with_key(),
            size,
            config,
        }
    }

    /// Constants the board was created with.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Rows and columns.
    pub fn size(&self) -> GridSize {
        self.size
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The cell at `position`, or `None` off the board.
    pub fn layered_cell(&self, position: CellPosition) -> Option<&LayeredCell> {
        self.size.index(position).map(|i| &self.cells[i])
    }

    /// Background at `position`. `None` for empty and off-board cells alike.
    pub fn background(&self, position: CellPosition) -> Option<&Background> {
        self.layered_cell(position)?.background()
    }

    pub fn foreground_id(&self, position: CellPosition) -> Option<EntityId> {
        self.layered_cell(position)?.foreground
    }

    /// The entity covering `position`. Any covered cell of a multi-cell
    /// entity resolves to the same entity.
    pub fn foreground(&self, position: CellPosition) -> Option<&ForegroundCell> {
        self.entity(self.foreground_id(position)?)
    }

    pub fn foreground_mut(&mut self, position: CellPosition) -> Option<&mut ForegroundCell> {
        let id = self.foreground_id(position)?;
        self.entities.get_mut(id)?.as_mut()
    }

    /// Look up an entity by id. `None` once it has been removed.
    pub fn entity(&self, id: EntityId) -> Option<&ForegroundCell> {
        self.entities.get(id)?.as_ref()
    }

    /// Number of live entities, the collection center and walls included.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// All live entities, in arena order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &ForegroundCell)> {
        self.entities
            .iter()
            .filter_map(|(id, cell)| cell.as_ref().map(|c| (id, c)))
    }

    /// Number of live entities of the given kind.
    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.entities().filter(|(_, c)| c.kind() == kind).count()
    }

    // -----------------------------------------------------------------------
    // Placement
    // -----------------------------------------------------------------------

    /// Set or clear the background of a cell.
    pub fn set_background(&mut self, position: CellPosition, background: Option<Background>) {
        if let Some(i) = self.size.index(position) {
            self.cells[i].background = background;
        }
    }

    /// Check that a footprint anchored at `top_left` is on the board and
    /// every covered cell is buildable.
    pub fn check_placement(
        &self,
        top_left: CellPosition,
        footprint: Footprint,
    ) -> Result<(), BuildError> {
        if !self.size.fits(top_left, footprint) {
            return Err(BuildError::OutOfBounds {
                position: top_left,
                footprint,
            });
        }
        match footprint
            .cells(top_left)
            .find(|&p| !self.layered_cell(p).is_some_and(LayeredCell::can_build))
        {
            Some(position) => Err(BuildError::Occupied { position }),
            None => Ok(()),
        }
    }

    /// Whether [`build`](Self::build) would succeed.
    pub fn can_build(&self, top_left: CellPosition, kind: BuildKind) -> bool {
        self.check_placement(top_left, kind.footprint(&self.config))
            .is_ok()
    }

    /// Build a new entity anchored at `top_left`. On failure nothing changes.
    pub fn build(&mut self, top_left: CellPosition, kind: BuildKind) -> Result<EntityId, BuildError> {
        let entity = kind.instantiate(&self.config);
        self.place(ForegroundCell::new(top_left, entity))
    }

    /// Place an already constructed entity (e.g. one with preloaded state).
    ///
    /// Conveyors shorter than [`MIN_CONVEYOR_SLOTS`] are refused, which also
    /// covers [`build`](Self::build) on a board whose config was never
    /// validated.
    pub fn place(&mut self, cell: ForegroundCell) -> Result<EntityId, BuildError> {
        if let Some(conveyor) = cell.as_conveyor() {
            if conveyor.slots().len() < MIN_CONVEYOR_SLOTS {
                return Err(BuildError::ShortConveyor {
                    position: cell.top_left(),
                    slots: conveyor.slots().len(),
                });
            }
        }
        self.check_placement(cell.top_left(), cell.footprint())?;
        let covered: Vec<CellPosition> = cell.cells().collect();
        let id = self.entities.insert(Some(cell));
        for position in covered {
            if let Some(i) = self.size.index(position) {
                self.cells[i].foreground = Some(id);
            }
        }
        Ok(id)
    }

    /// Remove the removable entity covering `position`, clearing its whole
    /// footprint and freeing its arena slot.
    pub fn remove(&mut self, position: CellPosition) -> Result<EntityId, RemoveError> {
        if !self.size.contains(position) {
            return Err(RemoveError::OutOfBounds { position });
        }
        let id = self
            .foreground_id(position)
            .ok_or(RemoveError::Empty { position })?;
        let cell = self.entity(id).ok_or(RemoveError::Empty { position })?;
        if !cell.is_removable() {
            return Err(RemoveError::NotRemovable { kind: cell.kind() });
        }
        let covered: Vec<CellPosition> = cell.cells().collect();
        for p in covered {
            if let Some(i) = self.size.index(p) {
                self.cells[i].foreground = None;
            }
        }
        self.entities.remove(id);
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Run one tick: a full pass-one sweep, then a full pass-two sweep.
    /// Products reaching the collection center are reported to `observer`.
    pub fn update(&mut self, observer: &mut dyn ProductObserver) {
        self.sweep(Pass::One, observer);
        self.sweep(Pass::Two, observer);
    }

    fn sweep(&mut self, pass: Pass, observer: &mut dyn ProductObserver) {
        let width = self.size.width as usize;
        for index in 0..self.cells.len() {
            let Some(id) = self.cells[index].foreground else {
                continue;
            };
            let at = CellPosition::new((index / width) as i32, (index % width) as i32);

            // Detach the entity while it runs. No entity's output cell lies
            // inside its own footprint, so it is never addressed while out.
            let Some(mut cell) = self.entities.get_mut(id).and_then(Option::take) else {
                continue;
            };
            {
                let mut port = SweepPort {
                    board: self,
                    observer: &mut *observer,
                };
                match pass {
                    Pass::One => cell.pass_one(at, &mut port),
                    Pass::Two => cell.pass_two(at, &mut port),
                }
            }
            if let Some(slot) = self.entities.get_mut(id) {
                *slot = Some(cell);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Hashing
    // -----------------------------------------------------------------------

    /// Fold every cell's background and foreground state into `hash`.
    pub fn hash_into(&self, hash: &mut StateHash) {
        for (index, layered) in self.cells.iter().enumerate() {
            hash.write_slot(layered.background.and_then(|bg| bg.deposit_value()));

            let Some(cell) = layered.foreground.and_then(|id| self.entity(id)) else {
                hash.write_tag(0xFF);
                continue;
            };
            hash.write_tag(kind_tag(cell.kind()));
            let width = self.size.width as usize;
            let at = CellPosition::new((index / width) as i32, (index % width) as i32);
            if at == cell.top_left() {
                hash_entity(cell, hash);
            }
        }
    }
}

fn kind_tag(kind: EntityKind) -> u8 {
    match kind {
        EntityKind::Deposit => 0,
        EntityKind::Wall => 1,
        EntityKind::Conveyor => 2,
        EntityKind::Combiner => 3,
        EntityKind::MiningMachine => 4,
        EntityKind::CollectionCenter => 5,
    }
}

fn hash_entity(cell: &ForegroundCell, hash: &mut StateHash) {
    if let Some(direction) = cell.direction() {
        hash.write_tag(direction.ordinal());
    }
    match cell.entity() {
        Foreground::Conveyor(c) => {
            for s in c.slots() {
                hash.write_slot(*s);
            }
        }
        Foreground::Combiner(c) => {
            hash.write_slot(c.first_slot());
            hash.write_slot(c.second_slot());
        }
        Foreground::MiningMachine(m) => hash.write_u32(m.elapsed()),
        Foreground::Wall | Foreground::CollectionCenter(_) => {}
    }
}
