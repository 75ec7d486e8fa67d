//! Grid coordinates, cardinal directions and rectangular footprints.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

// ---------------------------------------------------------------------------
// CellPosition
// ---------------------------------------------------------------------------

/// A `(row, col)` position on the board. Rows grow downward, columns grow
/// to the right. Positions may lie outside the board; use
/// [`GridSize::contains`] to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct CellPosition {
    pub row: i32,
    pub col: i32,
}

impl CellPosition {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The adjacent position one step in `direction`.
    pub fn neighbor(self, direction: Direction) -> Self {
        self + direction.offset()
    }
}

impl Add for CellPosition {
    type Output = CellPosition;

    fn add(self, rhs: CellPosition) -> CellPosition {
        CellPosition::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl AddAssign for CellPosition {
    fn add_assign(&mut self, rhs: CellPosition) {
        self.row += rhs.row;
        self.col += rhs.col;
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Cardinal directions. The discriminants are stable and used for
/// rotation arithmetic (`(d + 1) % 4` is a clockwise turn).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl Direction {
    /// All four directions in ordinal order.
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    /// Direction for an ordinal, wrapping modulo 4.
    pub fn from_ordinal(ordinal: u8) -> Self {
        Self::ALL[(ordinal % 4) as usize]
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Offset of the neighbor in this direction.
    pub fn offset(self) -> CellPosition {
        match self {
            Direction::Top => CellPosition::new(-1, 0),
            Direction::Right => CellPosition::new(0, 1),
            Direction::Bottom => CellPosition::new(1, 0),
            Direction::Left => CellPosition::new(0, -1),
        }
    }

    /// Rotate 90 degrees clockwise.
    pub fn rotate_cw(self) -> Self {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// Rotate 90 degrees counter-clockwise.
    pub fn rotate_ccw(self) -> Self {
        Self::from_ordinal(self.ordinal() + 3)
    }

    pub fn opposite(self) -> Self {
        Self::from_ordinal(self.ordinal() + 2)
    }

    /// True for `Top` and `Bottom`.
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Top | Direction::Bottom)
    }
}

// ---------------------------------------------------------------------------
// Footprint
// ---------------------------------------------------------------------------

/// Width and height of an entity on the grid, anchored at its top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub width: u32,
    pub height: u32,
}

impl Footprint {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A 1x1 footprint.
    pub const fn single() -> Self {
        Self::new(1, 1)
    }

    /// Iterate over every covered position in row-major order.
    pub fn cells(self, top_left: CellPosition) -> impl Iterator<Item = CellPosition> {
        let w = self.width as i32;
        let h = self.height as i32;
        (0..h).flat_map(move |dr| (0..w).map(move |dc| top_left + CellPosition::new(dr, dc)))
    }

    /// Whether `position` lies inside this footprint anchored at `top_left`.
    pub fn covers(self, top_left: CellPosition, position: CellPosition) -> bool {
        let dr = position.row - top_left.row;
        let dc = position.col - top_left.col;
        dr >= 0 && dc >= 0 && dr < self.height as i32 && dc < self.width as i32
    }
}

// ---------------------------------------------------------------------------
// GridSize
// ---------------------------------------------------------------------------

/// Board dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(self, position: CellPosition) -> bool {
        position.row >= 0
            && position.col >= 0
            && (position.row as u32) < self.height
            && (position.col as u32) < self.width
    }

    /// Whether a whole footprint anchored at `top_left` fits on the board.
    pub fn fits(self, top_left: CellPosition, footprint: Footprint) -> bool {
        top_left.row >= 0
            && top_left.col >= 0
            && top_left.row as u64 + footprint.height as u64 <= self.height as u64
            && top_left.col as u64 + footprint.width as u64 <= self.width as u64
    }

    /// Flat row-major index of an in-bounds position.
    pub fn index(self, position: CellPosition) -> Option<usize> {
        self.contains(position)
            .then(|| position.row as usize * self.width as usize + position.col as usize)
    }

    pub fn cell_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Every position in row-major order (ascending row, then column).
    pub fn positions(self) -> impl Iterator<Item = CellPosition> {
        Footprint::new(self.width, self.height).cells(CellPosition::new(0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbor_offsets() {
        let p = CellPosition::new(5, 5);
        assert_eq!(p.neighbor(Direction::Top), CellPosition::new(4, 5));
        assert_eq!(p.neighbor(Direction::Right), CellPosition::new(5, 6));
        assert_eq!(p.neighbor(Direction::Bottom), CellPosition::new(6, 5));
        assert_eq!(p.neighbor(Direction::Left), CellPosition::new(5, 4));
    }

    #[test]
    fn rotation_wraps() {
        assert_eq!(Direction::Left.rotate_cw(), Direction::Top);
        assert_eq!(Direction::Top.rotate_ccw(), Direction::Left);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
        for d in Direction::ALL {
            assert_eq!(d.rotate_cw().rotate_ccw(), d);
        }
    }

    #[test]
    fn add_assign_matches_add() {
        let mut p = CellPosition::new(1, 2);
        p += CellPosition::new(3, -4);
        assert_eq!(p, CellPosition::new(1, 2) + CellPosition::new(3, -4));
    }

    #[test]
    fn footprint_cells_row_major() {
        let cells: Vec<_> = Footprint::new(2, 2).cells(CellPosition::new(3, 4)).collect();
        assert_eq!(
            cells,
            vec![
                CellPosition::new(3, 4),
                CellPosition::new(3, 5),
                CellPosition::new(4, 4),
                CellPosition::new(4, 5),
            ]
        );
    }

    #[test]
    fn footprint_covers() {
        let fp = Footprint::new(1, 2);
        let origin = CellPosition::new(0, 0);
        assert!(fp.covers(origin, CellPosition::new(1, 0)));
        assert!(!fp.covers(origin, CellPosition::new(0, 1)));
        assert!(!fp.covers(origin, CellPosition::new(-1, 0)));
    }

    #[test]
    fn grid_bounds() {
        let size = GridSize::new(4, 3);
        assert!(size.contains(CellPosition::new(2, 3)));
        assert!(!size.contains(CellPosition::new(3, 0)));
        assert!(!size.contains(CellPosition::new(0, -1)));
        assert_eq!(size.index(CellPosition::new(1, 2)), Some(6));
        assert_eq!(size.index(CellPosition::new(0, 4)), None);
        assert!(size.fits(CellPosition::new(1, 2), Footprint::new(2, 2)));
        assert!(!size.fits(CellPosition::new(2, 2), Footprint::new(2, 2)));
        assert_eq!(size.positions().count(), 12);
    }
}
