//! Movable and collectible entities placed on the board.

use std::time::Duration;

use grid_chase_core::{CellPos, Direction, PursuerKind, UnitId, UnitTag};

/// Suggested delay between pursuer moves, carried for presentation and
/// tuning purposes; the engine's actor scheduling does not consult it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveProfile {
    base: Duration,
    variation: Duration,
}

impl MoveProfile {
    /// Default profile shared by all pursuer kinds.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            base: Duration::from_millis(250),
            variation: Duration::from_millis(50),
        }
    }

    /// Base interval between moves.
    #[must_use]
    pub const fn base(&self) -> Duration {
        self.base
    }

    /// Random variation added on top of the base interval.
    #[must_use]
    pub const fn variation(&self) -> Duration {
        self.variation
    }
}

#[derive(Clone, Debug)]
pub(crate) enum UnitPayload {
    Player { alive: bool, score: u32 },
    Pursuer { kind: PursuerKind, profile: MoveProfile },
    Collectible { value: u32 },
}

/// A unit occupying at most one cell of the board.
#[derive(Clone, Debug)]
pub struct Unit {
    id: UnitId,
    payload: UnitPayload,
    cell: Option<CellPos>,
    facing: Direction,
}

impl Unit {
    pub(crate) fn new(id: UnitId, payload: UnitPayload) -> Self {
        Self {
            id,
            payload,
            cell: None,
            facing: Direction::East,
        }
    }

    /// Identifier assigned to this unit by the world.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Kind tag of this unit, used to key collision rules.
    #[must_use]
    pub const fn tag(&self) -> UnitTag {
        match self.payload {
            UnitPayload::Player { .. } => UnitTag::Player,
            UnitPayload::Pursuer { .. } => UnitTag::Pursuer,
            UnitPayload::Collectible { .. } => UnitTag::Collectible,
        }
    }

    /// Cell this unit currently occupies, or `None` if it is off the board.
    #[must_use]
    pub const fn cell(&self) -> Option<CellPos> {
        self.cell
    }

    /// Direction this unit is facing. Units face East on creation.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Behavior identity when this unit is a pursuer.
    #[must_use]
    pub const fn pursuer_kind(&self) -> Option<PursuerKind> {
        match self.payload {
            UnitPayload::Pursuer { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Descriptive movement cadence when this unit is a pursuer.
    #[must_use]
    pub const fn move_profile(&self) -> Option<MoveProfile> {
        match self.payload {
            UnitPayload::Pursuer { profile, .. } => Some(profile),
            _ => None,
        }
    }

    /// Reports whether this unit is alive. Only players can die; every other
    /// unit always reports `true`.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        match self.payload {
            UnitPayload::Player { alive, .. } => alive,
            _ => true,
        }
    }

    /// Points accumulated when this unit is a player.
    #[must_use]
    pub const fn score(&self) -> Option<u32> {
        match self.payload {
            UnitPayload::Player { score, .. } => Some(score),
            _ => None,
        }
    }

    /// Point value carried when this unit is a collectible.
    #[must_use]
    pub const fn collectible_value(&self) -> Option<u32> {
        match self.payload {
            UnitPayload::Collectible { value } => Some(value),
            _ => None,
        }
    }

    pub(crate) fn set_facing(&mut self, direction: Direction) {
        self.facing = direction;
    }

    pub(crate) fn set_cell(&mut self, cell: Option<CellPos>) {
        self.cell = cell;
    }

    pub(crate) fn kill(&mut self) {
        match &mut self.payload {
            UnitPayload::Player { alive, .. } => *alive = false,
            _ => panic!("only players can be killed"),
        }
    }

    pub(crate) fn award_points(&mut self, points: u32) {
        match &mut self.payload {
            UnitPayload::Player { score, .. } => *score = score.saturating_add(points),
            _ => panic!("only players accumulate points"),
        }
    }
}
