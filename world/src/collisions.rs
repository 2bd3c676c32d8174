//! Pairwise collision rules applied when a move lands on occupied cells.

use std::collections::HashMap;

use grid_chase_core::{UnitId, UnitTag};

use crate::board::Board;
use crate::units::Unit;

/// Mutable view of the world handed to collision handlers.
///
/// Handlers reach the units and the board through this scene rather than the
/// whole world, so rules stay independent from observers and the rule table
/// itself.
pub struct Contact<'a> {
    board: &'a mut Board,
    units: &'a mut [Unit],
}

impl<'a> Contact<'a> {
    pub(crate) fn new(board: &'a mut Board, units: &'a mut [Unit]) -> Self {
        Self { board, units }
    }

    /// Marks the player with the given id as no longer alive.
    pub fn kill_player(&mut self, id: UnitId) {
        self.unit_mut(id).kill();
    }

    /// Adds points to the player with the given id.
    pub fn award_points(&mut self, id: UnitId, points: u32) {
        self.unit_mut(id).award_points(points);
    }

    /// Point value of the collectible with the given id.
    #[must_use]
    pub fn collectible_value(&self, id: UnitId) -> u32 {
        self.unit(id)
            .collectible_value()
            .expect("collision rule applied to a non-collectible")
    }

    /// Removes the unit with the given id from the board entirely.
    pub fn remove_from_board(&mut self, id: UnitId) {
        let cell = self.unit(id).cell();
        if let Some(pos) = cell {
            self.board.cell_mut(pos).leave(id);
            self.unit_mut(id).set_cell(None);
        }
    }

    fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.get() as usize]
    }

    fn unit_mut(&mut self, id: UnitId) -> &mut Unit {
        &mut self.units[id.get() as usize]
    }
}

/// Handler invoked for a collision between two units.
///
/// The first identifier always belongs to the unit matching the first tag the
/// rule was registered under, regardless of which of the two was the mover.
pub type CollisionHandler = fn(&mut Contact<'_>, UnitId, UnitId);

#[derive(Clone, Copy, Debug)]
struct Rule {
    handler: CollisionHandler,
    swapped: bool,
}

impl Rule {
    fn invoke(self, contact: &mut Contact<'_>, mover: UnitId, occupant: UnitId) {
        if self.swapped {
            (self.handler)(contact, occupant, mover);
        } else {
            (self.handler)(contact, mover, occupant);
        }
    }
}

/// Registration table of collision rules keyed by unit-kind pairs.
///
/// Registering a rule for `(a, b)` also serves collisions observed as
/// `(b, a)`: the handler receives its arguments in registration order either
/// way, so outcomes never depend on which unit happened to be moving.
#[derive(Clone, Debug, Default)]
pub struct CollisionTable {
    rules: HashMap<(UnitTag, UnitTag), Rule>,
}

impl CollisionTable {
    /// Creates an empty table with no rules registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for collisions between the two unit kinds.
    ///
    /// A later registration for the same pair replaces the earlier one.
    pub fn register(&mut self, first: UnitTag, second: UnitTag, handler: CollisionHandler) {
        let _ = self.rules.insert(
            (first, second),
            Rule {
                handler,
                swapped: false,
            },
        );
        if first != second {
            let _ = self.rules.insert(
                (second, first),
                Rule {
                    handler,
                    swapped: true,
                },
            );
        }
    }

    pub(crate) fn resolve(
        &self,
        contact: &mut Contact<'_>,
        mover: (UnitId, UnitTag),
        occupant: (UnitId, UnitTag),
    ) {
        if let Some(rule) = self.rules.get(&(mover.1, occupant.1)).copied() {
            rule.invoke(contact, mover.0, occupant.0);
        }
    }
}

/// Builds the default chase rules: pursuers kill the player, the player
/// consumes collectibles for their point value.
#[must_use]
pub fn default_table() -> CollisionTable {
    let mut table = CollisionTable::new();
    table.register(UnitTag::Player, UnitTag::Pursuer, |contact, player, _| {
        contact.kill_player(player);
    });
    table.register(
        UnitTag::Player,
        UnitTag::Collectible,
        |contact, player, collectible| {
            let value = contact.collectible_value(collectible);
            contact.remove_from_board(collectible);
            contact.award_points(player, value);
        },
    );
    table
}
