#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Grid Chase.
//!
//! The world owns the toroidal board, the units moving across it, the
//! collision rule table, and the win/lose observers. A single writer mutates
//! it through [`World::move_unit`]; everything else reads through the
//! [`query`] module or works from an independent clone.

mod board;
mod collisions;
#[cfg(feature = "layout_scaffolding")]
pub mod layout;
mod units;

use std::fmt;

use grid_chase_core::{CellPos, Direction, PursuerKind, UnitId, UnitTag};
use thiserror::Error;

pub use board::{Board, BoardError, Cell};
pub use collisions::{default_table, CollisionHandler, CollisionTable, Contact};
pub use units::{MoveProfile, Unit};

use units::UnitPayload;

/// Errors raised while assembling a world from parsed level data.
///
/// These are configuration failures: they surface before any simulation loop
/// starts and are never retried.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// The world was given no starting cells for players.
    #[error("a world needs at least one player start cell")]
    NoStartCells,
    /// A referenced position lies outside the board.
    #[error("position {0:?} lies outside the board")]
    OutOfBounds(CellPos),
    /// A unit was placed on terrain it cannot occupy.
    #[error("position {0:?} is not accessible terrain")]
    Blocked(CellPos),
}

/// Observer notified synchronously when the world reaches a terminal state.
pub trait WorldObserver: Send + Sync {
    /// All collectibles have been consumed.
    fn level_won(&self);
    /// No registered player is alive anymore.
    fn level_lost(&self);
}

/// The authoritative game state: board, units, rules, and observers.
pub struct World {
    board: Board,
    units: Vec<Unit>,
    start_cells: Vec<CellPos>,
    next_start: usize,
    players: Vec<UnitId>,
    pursuers: Vec<UnitId>,
    collisions: CollisionTable,
    observers: Vec<Box<dyn WorldObserver>>,
}

impl World {
    /// Creates a new world over the provided board.
    ///
    /// Start cells are validated eagerly; players registered later are placed
    /// on them in round-robin order.
    pub fn new(
        board: Board,
        start_cells: Vec<CellPos>,
        collisions: CollisionTable,
    ) -> Result<Self, WorldError> {
        if start_cells.is_empty() {
            return Err(WorldError::NoStartCells);
        }
        for &cell in &start_cells {
            check_placement(&board, cell, UnitTag::Player)?;
        }

        Ok(Self {
            board,
            units: Vec::new(),
            start_cells,
            next_start: 0,
            players: Vec::new(),
            pursuers: Vec::new(),
            collisions,
            observers: Vec::new(),
        })
    }

    /// Registers a new player, placing it on the next start cell.
    pub fn register_player(&mut self) -> UnitId {
        let cell = self.start_cells[self.next_start];
        self.next_start = (self.next_start + 1) % self.start_cells.len();

        let id = self.allocate(UnitPayload::Player {
            alive: true,
            score: 0,
        });
        self.players.push(id);
        self.attach(id, cell);
        id
    }

    /// Adds a pursuer of the given identity at the given position.
    ///
    /// Each identity may appear at most once per world because proposals are
    /// resolved back to their pursuer by identity.
    pub fn add_pursuer(&mut self, kind: PursuerKind, pos: CellPos) -> Result<UnitId, WorldError> {
        assert!(
            self.pursuers
                .iter()
                .all(|id| self.unit(*id).pursuer_kind() != Some(kind)),
            "pursuer {kind:?} registered twice"
        );
        check_placement(&self.board, pos, UnitTag::Pursuer)?;

        let id = self.allocate(UnitPayload::Pursuer {
            kind,
            profile: MoveProfile::standard(),
        });
        self.pursuers.push(id);
        self.attach(id, pos);
        Ok(id)
    }

    /// Adds a collectible worth the given number of points.
    pub fn add_collectible(&mut self, pos: CellPos, value: u32) -> Result<UnitId, WorldError> {
        check_placement(&self.board, pos, UnitTag::Collectible)?;

        let id = self.allocate(UnitPayload::Collectible { value });
        self.attach(id, pos);
        Ok(id)
    }

    /// Subscribes an observer to win/lose notifications.
    pub fn add_observer(&mut self, observer: Box<dyn WorldObserver>) {
        self.observers.push(observer);
    }

    /// Moves a unit one cell in the given direction, resolving collisions.
    ///
    /// The unit's facing is updated regardless of whether the move succeeds.
    /// If the destination is accessible, occupancy transfers atomically and
    /// the collision table runs once for every unit that already occupied the
    /// destination. Terminal conditions are re-checked and observers notified
    /// before this returns.
    pub fn move_unit(&mut self, id: UnitId, direction: Direction) {
        let index = unit_index(id);
        assert!(index < self.units.len(), "unknown unit {}", id.get());

        self.units[index].set_facing(direction);

        if let Some(from) = self.units[index].cell() {
            let mover_tag = self.units[index].tag();
            let destination = self.board.neighbor(from, direction);
            if self.board.accessible_to(destination, mover_tag) {
                // A wrap-around step can land on the origin cell, so the
                // mover itself never counts as a prior occupant.
                let prior: Vec<UnitId> = self
                    .board
                    .cell(destination)
                    .occupants()
                    .iter()
                    .copied()
                    .filter(|occupant| *occupant != id)
                    .collect();
                self.detach(id);
                self.attach(id, destination);

                for occupant in prior {
                    let occupant_tag = self.units[unit_index(occupant)].tag();
                    let mut contact = Contact::new(&mut self.board, &mut self.units);
                    self.collisions
                        .resolve(&mut contact, (id, mover_tag), (occupant, occupant_tag));
                }
            }
        }

        self.notify_observers();
    }

    pub(crate) fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn unit(&self, id: UnitId) -> &Unit {
        &self.units[unit_index(id)]
    }

    pub(crate) fn player_ids(&self) -> &[UnitId] {
        &self.players
    }

    pub(crate) fn pursuer_ids(&self) -> &[UnitId] {
        &self.pursuers
    }

    pub(crate) fn any_player_alive(&self) -> bool {
        self.players.iter().any(|id| self.unit(*id).is_alive())
    }

    pub(crate) fn remaining_collectibles(&self) -> usize {
        self.units
            .iter()
            .filter(|unit| unit.tag() == UnitTag::Collectible && unit.cell().is_some())
            .count()
    }

    fn allocate(&mut self, payload: UnitPayload) -> UnitId {
        let id = UnitId::new(u32::try_from(self.units.len()).expect("unit count fits u32"));
        self.units.push(Unit::new(id, payload));
        id
    }

    fn attach(&mut self, id: UnitId, pos: CellPos) {
        self.board.cell_mut(pos).enter(id);
        self.units[unit_index(id)].set_cell(Some(pos));
    }

    fn detach(&mut self, id: UnitId) {
        if let Some(pos) = self.units[unit_index(id)].cell() {
            self.board.cell_mut(pos).leave(id);
            self.units[unit_index(id)].set_cell(None);
        }
    }

    fn notify_observers(&self) {
        if !self.any_player_alive() {
            for observer in &self.observers {
                observer.level_lost();
            }
        }
        if self.remaining_collectibles() == 0 {
            for observer in &self.observers {
                observer.level_won();
            }
        }
    }
}

impl Clone for World {
    /// Deep copy of the board and units. Observers are deliberately not
    /// carried over: a clone is an isolated reading copy, not a second
    /// authority.
    fn clone(&self) -> Self {
        Self {
            board: self.board.clone(),
            units: self.units.clone(),
            start_cells: self.start_cells.clone(),
            next_start: self.next_start,
            players: self.players.clone(),
            pursuers: self.pursuers.clone(),
            collisions: self.collisions.clone(),
            observers: Vec::new(),
        }
    }
}

impl fmt::Debug for World {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("World")
            .field("board", &self.board)
            .field("units", &self.units)
            .field("start_cells", &self.start_cells)
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn unit_index(id: UnitId) -> usize {
    usize::try_from(id.get()).expect("unit id fits usize")
}

fn check_placement(board: &Board, pos: CellPos, tag: UnitTag) -> Result<(), WorldError> {
    if !board.contains(pos) {
        return Err(WorldError::OutOfBounds(pos));
    }
    if !board.accessible_to(pos, tag) {
        return Err(WorldError::Blocked(pos));
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use grid_chase_core::{CellPos, PursuerKind, UnitId};

    use super::{Board, Unit, World};

    /// Provides read-only access to the world's board.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        world.board()
    }

    /// Returns the unit with the provided identifier.
    #[must_use]
    pub fn unit(world: &World, id: UnitId) -> &Unit {
        world.unit(id)
    }

    /// Identifiers of the units occupying the given cell, oldest first.
    #[must_use]
    pub fn occupants(world: &World, pos: CellPos) -> &[UnitId] {
        world.board().cell(pos).occupants()
    }

    /// Units occupying the given cell, oldest first.
    pub fn units_at<'world>(
        world: &'world World,
        pos: CellPos,
    ) -> impl Iterator<Item = &'world Unit> {
        occupants(world, pos).iter().map(|id| world.unit(*id))
    }

    /// The first registered player, if any.
    #[must_use]
    pub fn player(world: &World) -> Option<&Unit> {
        world.player_ids().first().map(|id| world.unit(*id))
    }

    /// All registered players in registration order.
    pub fn players(world: &World) -> impl Iterator<Item = &Unit> {
        world.player_ids().iter().map(|id| world.unit(*id))
    }

    /// The pursuer with the given identity, if present.
    #[must_use]
    pub fn pursuer(world: &World, kind: PursuerKind) -> Option<&Unit> {
        pursuers(world).find(|unit| unit.pursuer_kind() == Some(kind))
    }

    /// All pursuers in registration order.
    pub fn pursuers(world: &World) -> impl Iterator<Item = &Unit> {
        world.pursuer_ids().iter().map(|id| world.unit(*id))
    }

    /// Identities of the pursuers present in the world.
    #[must_use]
    pub fn pursuer_kinds(world: &World) -> Vec<PursuerKind> {
        pursuers(world).filter_map(Unit::pursuer_kind).collect()
    }

    /// Number of collectibles still on the board.
    #[must_use]
    pub fn remaining_collectibles(world: &World) -> usize {
        world.remaining_collectibles()
    }

    /// Reports whether at least one registered player is alive.
    #[must_use]
    pub fn any_player_alive(world: &World) -> bool {
        world.any_player_alive()
    }
}
