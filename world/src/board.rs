//! Toroidal cell grid underlying the authoritative world.

use grid_chase_core::{CellKind, CellPos, Direction, UnitId, UnitTag};
use thiserror::Error;

/// Errors raised while constructing a board.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// The requested board had a zero width or height.
    #[error("board dimensions must be positive, got {width}x{height}")]
    ZeroDimension {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// The provided terrain list did not match the requested dimensions.
    #[error("expected {expected} cells for the requested dimensions, got {actual}")]
    CellCountMismatch {
        /// Cell count implied by the dimensions.
        expected: usize,
        /// Cell count actually provided.
        actual: usize,
    },
}

/// Atomic position on the board: terrain plus an ordered occupant list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    kind: CellKind,
    occupants: Vec<UnitId>,
}

impl Cell {
    fn new(kind: CellKind) -> Self {
        Self {
            kind,
            occupants: Vec::new(),
        }
    }

    /// Terrain classification of this cell.
    #[must_use]
    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    /// Units currently occupying this cell, oldest arrival first.
    #[must_use]
    pub fn occupants(&self) -> &[UnitId] {
        &self.occupants
    }

    pub(crate) fn enter(&mut self, id: UnitId) {
        assert!(
            !self.occupants.contains(&id),
            "unit {} already occupies this cell",
            id.get()
        );
        self.occupants.push(id);
    }

    pub(crate) fn leave(&mut self, id: UnitId) {
        let position = self
            .occupants
            .iter()
            .position(|occupant| *occupant == id)
            .expect("occupancy lists and unit cells must stay consistent");
        let _ = self.occupants.remove(position);
    }
}

/// Fixed-size rectangular grid of cells with wrap-around adjacency.
///
/// Every position inside the dimensions holds a cell, and every cell has
/// exactly one neighbor per cardinal direction. Edges wrap to the opposite
/// edge, so a 1x1 board neighbors itself in all four directions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates a board from row-major terrain data.
    pub fn new(width: u32, height: u32, kinds: Vec<CellKind>) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::ZeroDimension { width, height });
        }

        let expected = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(usize::MAX);
        if kinds.len() != expected {
            return Err(BoardError::CellCountMismatch {
                expected,
                actual: kinds.len(),
            });
        }

        Ok(Self {
            width,
            height,
            cells: kinds.into_iter().map(Cell::new).collect(),
        })
    }

    /// Number of columns on the board.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows on the board.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the position lies within the board dimensions.
    #[must_use]
    pub const fn contains(&self, pos: CellPos) -> bool {
        pos.x() < self.width && pos.y() < self.height
    }

    /// Returns the cell at the provided position.
    ///
    /// Positions outside the dimensions are programming defects; every
    /// position produced by [`Board::neighbor`] is in range by construction.
    #[must_use]
    pub fn cell(&self, pos: CellPos) -> &Cell {
        assert!(self.contains(pos), "position off the board: {pos:?}");
        &self.cells[self.index(pos)]
    }

    /// Returns the position adjacent to `pos` in the given direction,
    /// wrapping at the board edges.
    #[must_use]
    pub fn neighbor(&self, pos: CellPos, direction: Direction) -> CellPos {
        let x = wrap(i64::from(pos.x()) + i64::from(direction.dx()), self.width);
        let y = wrap(i64::from(pos.y()) + i64::from(direction.dy()), self.height);
        CellPos::new(x, y)
    }

    /// Walks `steps` cells from `pos` in the given direction, wrapping.
    #[must_use]
    pub fn project(&self, pos: CellPos, direction: Direction, steps: u32) -> CellPos {
        let mut current = pos;
        for _ in 0..steps {
            current = self.neighbor(current, direction);
        }
        current
    }

    /// Reports whether a unit of the given kind may occupy the cell at `pos`.
    #[must_use]
    pub fn accessible_to(&self, pos: CellPos, tag: UnitTag) -> bool {
        self.cell(pos).kind().accessible_to(tag)
    }

    /// Iterates all positions on the board in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = CellPos> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| CellPos::new(x, y)))
    }

    pub(crate) fn cell_mut(&mut self, pos: CellPos) -> &mut Cell {
        assert!(self.contains(pos), "position off the board: {pos:?}");
        let index = self.index(pos);
        &mut self.cells[index]
    }

    fn index(&self, pos: CellPos) -> usize {
        let row = usize::try_from(pos.y()).expect("row fits usize");
        let column = usize::try_from(pos.x()).expect("column fits usize");
        let width = usize::try_from(self.width).expect("width fits usize");
        row * width + column
    }
}

fn wrap(value: i64, modulus: u32) -> u32 {
    let wrapped = value.rem_euclid(i64::from(modulus));
    u32::try_from(wrapped).expect("rem_euclid result is non-negative and below modulus")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_board(width: u32, height: u32) -> Board {
        let count = (width * height) as usize;
        Board::new(width, height, vec![CellKind::Ground; count]).expect("valid board")
    }

    #[test]
    fn construction_rejects_zero_dimensions() {
        assert_eq!(
            Board::new(0, 3, Vec::new()),
            Err(BoardError::ZeroDimension {
                width: 0,
                height: 3
            })
        );
    }

    #[test]
    fn construction_rejects_mismatched_cell_counts() {
        assert_eq!(
            Board::new(2, 2, vec![CellKind::Ground; 3]),
            Err(BoardError::CellCountMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn single_cell_board_neighbors_itself() {
        let board = open_board(1, 1);
        let origin = CellPos::new(0, 0);
        for direction in Direction::SEARCH_ORDER {
            assert_eq!(board.neighbor(origin, direction), origin);
        }
    }

    #[test]
    fn neighbors_wrap_at_the_edges() {
        let board = open_board(4, 3);
        assert_eq!(
            board.neighbor(CellPos::new(0, 0), Direction::North),
            CellPos::new(0, 2)
        );
        assert_eq!(
            board.neighbor(CellPos::new(0, 0), Direction::West),
            CellPos::new(3, 0)
        );
        assert_eq!(
            board.neighbor(CellPos::new(3, 2), Direction::East),
            CellPos::new(0, 2)
        );
        assert_eq!(
            board.neighbor(CellPos::new(3, 2), Direction::South),
            CellPos::new(3, 0)
        );
    }

    #[test]
    fn walking_a_full_lap_returns_to_the_origin() {
        let board = open_board(5, 4);
        let origin = CellPos::new(2, 1);
        assert_eq!(board.project(origin, Direction::East, 5), origin);
        assert_eq!(board.project(origin, Direction::West, 5), origin);
        assert_eq!(board.project(origin, Direction::North, 4), origin);
        assert_eq!(board.project(origin, Direction::South, 4), origin);
    }

    #[test]
    fn occupant_order_preserves_arrival() {
        let mut board = open_board(2, 1);
        let pos = CellPos::new(0, 0);
        board.cell_mut(pos).enter(UnitId::new(3));
        board.cell_mut(pos).enter(UnitId::new(1));
        assert_eq!(board.cell(pos).occupants(), &[UnitId::new(3), UnitId::new(1)]);

        board.cell_mut(pos).leave(UnitId::new(3));
        assert_eq!(board.cell(pos).occupants(), &[UnitId::new(1)]);
    }

    #[test]
    #[should_panic(expected = "already occupies")]
    fn double_entry_is_rejected() {
        let mut board = open_board(1, 1);
        let pos = CellPos::new(0, 0);
        board.cell_mut(pos).enter(UnitId::new(0));
        board.cell_mut(pos).enter(UnitId::new(0));
    }
}
