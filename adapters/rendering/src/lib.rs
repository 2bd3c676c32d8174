#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Grid Chase adapters.
//!
//! Converts a published world copy into a draw-ready scene: one visual per
//! cell plus a heads-up summary of score and life. How the scene ends up on
//! a screen is each adapter's business; this crate never performs IO.

use grid_chase_core::{CellKind, PursuerKind, UnitTag};
use grid_chase_world::{query, Unit, World};

/// Visual state signal for a unit, derived from its kind and alive status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitVisual {
    /// A living player.
    PlayerAlive,
    /// A player that has been caught.
    PlayerDead,
    /// A pursuer with the given identity.
    Pursuer(PursuerKind),
    /// A collectible still waiting to be consumed.
    Collectible,
}

impl UnitVisual {
    fn from_unit(unit: &Unit) -> Self {
        match unit.tag() {
            UnitTag::Player if unit.is_alive() => Self::PlayerAlive,
            UnitTag::Player => Self::PlayerDead,
            UnitTag::Pursuer => Self::Pursuer(
                unit.pursuer_kind()
                    .expect("pursuer-tagged units carry an identity"),
            ),
            UnitTag::Collectible => Self::Collectible,
        }
    }

    /// Draw priority when several units share a cell; higher wins.
    fn priority(self) -> u8 {
        match self {
            Self::Collectible => 0,
            Self::Pursuer(_) => 1,
            Self::PlayerAlive | Self::PlayerDead => 2,
        }
    }
}

/// Visual content of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileVisual {
    /// Terrain beneath the unit, if any.
    pub terrain: CellKind,
    /// The most prominent unit on the cell, if any.
    pub unit: Option<UnitVisual>,
}

/// Heads-up display values exposed alongside the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Current score of the first registered player.
    pub score: u32,
    /// Whether that player is still alive.
    pub alive: bool,
}

/// Draw-ready projection of a world copy.
#[derive(Clone, Debug)]
pub struct Scene {
    width: u32,
    height: u32,
    tiles: Vec<TileVisual>,
    hud: Hud,
}

impl Scene {
    /// Projects the provided world into tiles and a heads-up display.
    #[must_use]
    pub fn from_world(world: &World) -> Self {
        let board = query::board(world);
        let tiles = board
            .positions()
            .map(|pos| {
                let unit = query::units_at(world, pos)
                    .map(UnitVisual::from_unit)
                    .max_by_key(|visual| visual.priority());
                TileVisual {
                    terrain: board.cell(pos).kind(),
                    unit,
                }
            })
            .collect();

        let hud = query::player(world).map_or(
            Hud {
                score: 0,
                alive: false,
            },
            |player| Hud {
                score: player.score().unwrap_or(0),
                alive: player.is_alive(),
            },
        );

        Self {
            width: board.width(),
            height: board.height(),
            tiles,
            hud,
        }
    }

    /// Number of tile columns in the scene.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows in the scene.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[TileVisual] {
        &self.tiles
    }

    /// Rows of tiles from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[TileVisual]> {
        self.tiles.chunks(self.width as usize)
    }

    /// Score and alive status of the first registered player.
    #[must_use]
    pub const fn hud(&self) -> Hud {
        self.hud
    }
}
