#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Chase engine.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! the pure pathfinding and steering systems, the concurrent runtime, and the
//! adapters: grid positions and terrain, unit identities, and the proposals
//! that decision actors submit for the authority loop to apply.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Grid Chase.";

/// Points awarded for a collectible in the default configuration.
pub const COLLECTIBLE_VALUE: u32 = 10;

/// Cardinal movement directions available to units.
///
/// The declaration order doubles as the breadth-first expansion order used by
/// pathfinding, so it is part of the crate's contract: North, South, West,
/// East.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward increasing column indices.
    East,
}

impl Direction {
    /// All directions in the fixed search-expansion order.
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Returns the direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// Column delta for a single step in this direction.
    #[must_use]
    pub const fn dx(self) -> i32 {
        match self {
            Direction::West => -1,
            Direction::East => 1,
            Direction::North | Direction::South => 0,
        }
    }

    /// Row delta for a single step in this direction, with row zero at the
    /// top of the board.
    #[must_use]
    pub const fn dy(self) -> i32 {
        match self {
            Direction::North => -1,
            Direction::South => 1,
            Direction::West | Direction::East => 0,
        }
    }
}

/// Location of a single board cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPos {
    x: u32,
    y: u32,
}

impl CellPos {
    /// Creates a new cell position.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }
}

/// Terrain classification of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Impassable cell that no unit may occupy.
    Wall,
    /// Open cell that any unit may occupy.
    Ground,
}

impl CellKind {
    /// Reports whether a unit of the provided kind may occupy this terrain.
    #[must_use]
    pub const fn accessible_to(self, _tag: UnitTag) -> bool {
        matches!(self, CellKind::Ground)
    }
}

/// Unique identifier assigned to a unit by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kind tags used to key collision rules and unit queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitTag {
    /// The player-controlled unit.
    Player,
    /// A pursuing unit.
    Pursuer,
    /// A consumable item worth points.
    Collectible,
}

/// Identity of one of the four pursuer behaviors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PursuerKind {
    /// Heads straight for the player's current cell.
    Direct,
    /// Aims a few cells ahead of where the player is facing.
    Ambush,
    /// Flanks by extending the line from the direct pursuer past the player.
    Flank,
    /// Chases from afar but retreats once it gets close.
    Erratic,
}

impl PursuerKind {
    /// All pursuer identities in their canonical order.
    pub const ALL: [PursuerKind; 4] = [
        PursuerKind::Direct,
        PursuerKind::Ambush,
        PursuerKind::Flank,
        PursuerKind::Erratic,
    ];
}

/// Identity of the decision actor that produced a proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorId {
    /// The actor translating player input into moves.
    Player,
    /// The actor steering the pursuer with the given identity.
    Pursuer(PursuerKind),
}

/// A requested direction submitted by a decision actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Proposal {
    /// Actor that produced the proposal.
    pub actor: ActorId,
    /// Direction the actor wants its unit to move in.
    pub direction: Direction,
}

impl Proposal {
    /// Creates a new proposal for the given actor and direction.
    #[must_use]
    pub const fn new(actor: ActorId, direction: Direction) -> Self {
        Self { actor, direction }
    }
}

#[cfg(test)]
mod tests {
    use super::{CellKind, CellPos, Direction, PursuerKind, UnitTag};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::SEARCH_ORDER {
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn opposite_deltas_cancel() {
        for direction in Direction::SEARCH_ORDER {
            assert_eq!(direction.dx() + direction.opposite().dx(), 0);
            assert_eq!(direction.dy() + direction.opposite().dy(), 0);
        }
    }

    #[test]
    fn search_order_is_north_south_west_east() {
        assert_eq!(
            Direction::SEARCH_ORDER,
            [
                Direction::North,
                Direction::South,
                Direction::West,
                Direction::East
            ]
        );
    }

    #[test]
    fn walls_are_accessible_to_nobody() {
        assert!(!CellKind::Wall.accessible_to(UnitTag::Player));
        assert!(!CellKind::Wall.accessible_to(UnitTag::Pursuer));
        assert!(CellKind::Ground.accessible_to(UnitTag::Collectible));
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_pos_round_trips_through_bincode() {
        assert_round_trip(&CellPos::new(7, 3));
    }

    #[test]
    fn pursuer_kind_round_trips_through_bincode() {
        assert_round_trip(&PursuerKind::Flank);
    }
}
