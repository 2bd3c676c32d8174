//! ASCII layout scaffolding for tests and adapters.
//!
//! The engine itself only ever consumes a fully constructed [`World`]; this
//! module is the boundary where character grids become boards, start cells,
//! pursuers, and collectibles. Enabled through the `layout_scaffolding`
//! feature so library consumers that bring their own level source pay nothing
//! for it.

use grid_chase_core::{CellKind, CellPos, PursuerKind, COLLECTIBLE_VALUE};
use thiserror::Error;

use crate::board::{Board, BoardError};
use crate::collisions::default_table;
use crate::{World, WorldError};

/// Errors raised while interpreting an ASCII layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The layout contained no rows or no columns.
    #[error("a layout needs at least one row and one column")]
    Empty,
    /// A row's length differed from the first row's length.
    #[error("row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of columns found in the row.
        actual: usize,
        /// Number of columns implied by the first row.
        expected: usize,
    },
    /// The layout contained a character with no assigned meaning.
    #[error("unknown layout glyph {0:?}")]
    UnknownGlyph(char),
    /// The parsed grid could not be turned into a board.
    #[error(transparent)]
    Board(#[from] BoardError),
    /// The parsed layout could not be assembled into a world.
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Parsed representation of an ASCII level description.
///
/// Recognised glyphs: `#` wall, space ground, `P` player start, `.`
/// collectible, and `D`/`A`/`F`/`E` the four pursuer identities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    width: u32,
    height: u32,
    kinds: Vec<CellKind>,
    player_starts: Vec<CellPos>,
    pursuers: Vec<(PursuerKind, CellPos)>,
    collectibles: Vec<CellPos>,
}

impl Layout {
    /// Parses the provided rows into a layout.
    pub fn parse(rows: &[&str]) -> Result<Self, LayoutError> {
        let first = rows.first().ok_or(LayoutError::Empty)?;
        let expected = first.chars().count();
        if expected == 0 {
            return Err(LayoutError::Empty);
        }

        let mut layout = Self {
            width: u32::try_from(expected).expect("layout width fits u32"),
            height: u32::try_from(rows.len()).expect("layout height fits u32"),
            kinds: Vec::with_capacity(expected * rows.len()),
            player_starts: Vec::new(),
            pursuers: Vec::new(),
            collectibles: Vec::new(),
        };

        for (row, line) in rows.iter().enumerate() {
            let actual = line.chars().count();
            if actual != expected {
                return Err(LayoutError::RaggedRow {
                    row,
                    actual,
                    expected,
                });
            }

            for (column, glyph) in line.chars().enumerate() {
                let pos = CellPos::new(
                    u32::try_from(column).expect("column fits u32"),
                    u32::try_from(row).expect("row fits u32"),
                );
                layout.kinds.push(match glyph {
                    '#' => CellKind::Wall,
                    ' ' => CellKind::Ground,
                    'P' => {
                        layout.player_starts.push(pos);
                        CellKind::Ground
                    }
                    '.' => {
                        layout.collectibles.push(pos);
                        CellKind::Ground
                    }
                    'D' => {
                        layout.pursuers.push((PursuerKind::Direct, pos));
                        CellKind::Ground
                    }
                    'A' => {
                        layout.pursuers.push((PursuerKind::Ambush, pos));
                        CellKind::Ground
                    }
                    'F' => {
                        layout.pursuers.push((PursuerKind::Flank, pos));
                        CellKind::Ground
                    }
                    'E' => {
                        layout.pursuers.push((PursuerKind::Erratic, pos));
                        CellKind::Ground
                    }
                    other => return Err(LayoutError::UnknownGlyph(other)),
                });
            }
        }

        Ok(layout)
    }

    /// Number of columns described by the layout.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows described by the layout.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Player start cells in reading order.
    #[must_use]
    pub fn player_starts(&self) -> &[CellPos] {
        &self.player_starts
    }

    /// Pursuer placements in reading order.
    #[must_use]
    pub fn pursuers(&self) -> &[(PursuerKind, CellPos)] {
        &self.pursuers
    }

    /// Collectible placements in reading order.
    #[must_use]
    pub fn collectibles(&self) -> &[CellPos] {
        &self.collectibles
    }

    /// Builds a bare board from the layout's terrain.
    pub fn build_board(&self) -> Result<Board, LayoutError> {
        Ok(Board::new(self.width, self.height, self.kinds.clone())?)
    }

    /// Builds a world with the default collision rules, pursuers, and
    /// collectibles in place. Players are not registered; callers decide how
    /// many to add.
    pub fn build_world(&self) -> Result<World, LayoutError> {
        let board = self.build_board()?;
        let mut world = World::new(board, self.player_starts.clone(), default_table())?;
        for (kind, pos) in &self.pursuers {
            let _ = world.add_pursuer(*kind, *pos)?;
        }
        for pos in &self.collectibles {
            let _ = world.add_collectible(*pos, COLLECTIBLE_VALUE)?;
        }
        Ok(world)
    }
}

/// Convenience wrapper building a board straight from rows.
pub fn board_from_rows(rows: &[&str]) -> Result<Board, LayoutError> {
    Layout::parse(rows)?.build_board()
}

/// Convenience wrapper building a world straight from rows.
pub fn world_from_rows(rows: &[&str]) -> Result<World, LayoutError> {
    Layout::parse(rows)?.build_world()
}

#[cfg(test)]
mod tests {
    use grid_chase_core::UnitTag;

    use super::*;
    use crate::query;

    #[test]
    fn parses_terrain_and_spawn_markers() {
        let layout = Layout::parse(&[
            "#####", //
            "#P.D#", //
            "#####",
        ])
        .expect("valid layout");

        assert_eq!(layout.width(), 5);
        assert_eq!(layout.height(), 3);
        assert_eq!(layout.player_starts(), &[CellPos::new(1, 1)]);
        assert_eq!(layout.collectibles(), &[CellPos::new(2, 1)]);
        assert_eq!(
            layout.pursuers(),
            &[(PursuerKind::Direct, CellPos::new(3, 1))]
        );
    }

    #[test]
    fn rejects_ragged_rows() {
        assert_eq!(
            Layout::parse(&["##", "###"]),
            Err(LayoutError::RaggedRow {
                row: 1,
                actual: 3,
                expected: 2
            })
        );
    }

    #[test]
    fn rejects_unknown_glyphs() {
        assert_eq!(
            Layout::parse(&["#x#"]),
            Err(LayoutError::UnknownGlyph('x'))
        );
    }

    #[test]
    fn built_worlds_carry_the_parsed_units() {
        let mut world = world_from_rows(&[
            "#######", //
            "#P...E#", //
            "#######",
        ])
        .expect("valid world");
        let player = world.register_player();

        assert_eq!(
            query::unit(&world, player).cell(),
            Some(CellPos::new(1, 1))
        );
        assert_eq!(query::remaining_collectibles(&world), 3);
        assert_eq!(
            query::pursuer(&world, PursuerKind::Erratic).map(crate::Unit::tag),
            Some(UnitTag::Pursuer)
        );
    }
}
