#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure decision logic for the chase: translates a world snapshot into the
//! direction each actor wants to move next.
//!
//! Nothing here mutates the world or blocks; the concurrent runtime calls
//! these functions from its actor loops with whatever snapshot was last
//! published.

use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;

use grid_chase_core::{CellPos, Direction, PursuerKind, UnitTag};
use grid_chase_system_pathfinding::shortest_path;
use grid_chase_world::{query, Board, Unit, World};

/// How many cells ahead of the player the ambusher aims.
const AMBUSH_LOOKAHEAD: u32 = 4;

/// How many cells ahead of the player anchor the flanking segment.
const FLANK_LOOKAHEAD: u32 = 2;

/// Path length at which the erratic pursuer stops chasing and retreats.
const SHYNESS: usize = 8;

/// Errors raised while steering a pursuer.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SteeringError {
    /// Every direction out of the pursuer's cell is inaccessible. The unit
    /// is enclosed and its decision loop cannot continue.
    #[error("pursuer {kind:?} is enclosed at {at:?} with no legal move")]
    Enclosed {
        /// Identity of the enclosed pursuer.
        kind: PursuerKind,
        /// Cell the pursuer is stuck on.
        at: CellPos,
    },
    /// The snapshot held no player on the board to steer against.
    #[error("no player on the board to steer against")]
    PlayerMissing,
    /// A pursuer required for the decision is absent from the board.
    #[error("pursuer {0:?} is absent from the board")]
    PursuerMissing(PursuerKind),
}

/// Translates the latest decoded input command into a player move proposal.
///
/// An illegal command is never converted into some other legal direction;
/// the player keeps going the way it already faces. With no command recorded
/// yet there is nothing to propose.
#[must_use]
pub fn propose_player_move(world: &World, input: Option<Direction>) -> Option<Direction> {
    let command = input?;
    let player = query::player(world)?;
    let cell = player.cell()?;
    let board = query::board(world);

    if board.accessible_to(board.neighbor(cell, command), UnitTag::Player) {
        Some(command)
    } else {
        Some(player.facing())
    }
}

/// Steering state for a single pursuer actor.
///
/// The ambusher keeps its previous heading between decisions; every other
/// identity is stateless, so one value of this type per actor covers all
/// four behaviors.
#[derive(Clone, Debug)]
pub struct PursuerSteering {
    kind: PursuerKind,
    remembered_heading: Option<Direction>,
}

impl PursuerSteering {
    /// Creates steering state for the pursuer with the given identity.
    #[must_use]
    pub const fn new(kind: PursuerKind) -> Self {
        Self {
            kind,
            remembered_heading: None,
        }
    }

    /// Identity this steering state belongs to.
    #[must_use]
    pub const fn kind(&self) -> PursuerKind {
        self.kind
    }

    /// Decides the next direction for this pursuer from the given snapshot.
    ///
    /// Target selection varies by identity; every identity then runs the
    /// same impassability fallback, so the returned direction always leads
    /// onto accessible terrain. An enclosed pursuer is an error, never a
    /// silent skip.
    pub fn decide<R: Rng>(
        &mut self,
        world: &World,
        rng: &mut R,
    ) -> Result<Direction, SteeringError> {
        let me = query::pursuer(world, self.kind)
            .ok_or(SteeringError::PursuerMissing(self.kind))?;
        let my_cell = me
            .cell()
            .ok_or(SteeringError::PursuerMissing(self.kind))?;
        let player = query::player(world).ok_or(SteeringError::PlayerMissing)?;
        let player_cell = player.cell().ok_or(SteeringError::PlayerMissing)?;
        let board = query::board(world);

        let first_choice = match self.kind {
            PursuerKind::Direct => direct_choice(board, my_cell, player, player_cell),
            PursuerKind::Ambush => {
                self.ambush_choice(board, me, my_cell, player, player_cell)
            }
            PursuerKind::Flank => {
                flank_choice(board, world, me, my_cell, player, player_cell, rng)?
            }
            PursuerKind::Erratic => erratic_choice(board, me, my_cell, player_cell),
        };

        reroute_if_impassable(board, my_cell, me.facing(), first_choice).ok_or(
            SteeringError::Enclosed {
                kind: self.kind,
                at: my_cell,
            },
        )
    }

    fn ambush_choice(
        &mut self,
        board: &Board,
        me: &Unit,
        my_cell: CellPos,
        player: &Unit,
        player_cell: CellPos,
    ) -> Direction {
        let target = board.project(player_cell, player.facing(), AMBUSH_LOOKAHEAD);
        let behind = board.neighbor(player_cell, player.facing().opposite());
        let mut ignore = HashSet::new();
        let _ = ignore.insert(behind);

        if let Some(path) = shortest_path(board, my_cell, target, Some(UnitTag::Pursuer), &ignore)
        {
            if let Some(first) = path.first() {
                self.remembered_heading = Some(*first);
            }
        }
        self.remembered_heading.unwrap_or_else(|| me.facing())
    }
}

fn direct_choice(
    board: &Board,
    my_cell: CellPos,
    player: &Unit,
    player_cell: CellPos,
) -> Direction {
    match shortest_path(board, my_cell, player_cell, Some(UnitTag::Pursuer), &HashSet::new()) {
        Some(path) if !path.is_empty() => path[0],
        _ => player.facing(),
    }
}

#[allow(clippy::too_many_arguments)]
fn flank_choice<R: Rng>(
    board: &Board,
    world: &World,
    me: &Unit,
    my_cell: CellPos,
    player: &Unit,
    player_cell: CellPos,
    rng: &mut R,
) -> Result<Direction, SteeringError> {
    let anchor = query::pursuer(world, PursuerKind::Direct)
        .and_then(Unit::cell)
        .ok_or(SteeringError::PursuerMissing(PursuerKind::Direct))?;

    let ahead = board.project(player_cell, player.facing(), FLANK_LOOKAHEAD);
    let Some(segment) = shortest_path(board, anchor, ahead, None, &HashSet::new()) else {
        // Cannot build the flanking segment: wander instead of stalling.
        return Ok(random_move(board, my_cell, rng).unwrap_or_else(|| me.facing()));
    };

    let mut destination = ahead;
    for direction in &segment {
        destination = board.neighbor(destination, *direction);
    }

    match shortest_path(board, my_cell, destination, Some(UnitTag::Pursuer), &HashSet::new()) {
        Some(path) if !path.is_empty() => Ok(path[0]),
        _ => Ok(me.facing()),
    }
}

fn erratic_choice(board: &Board, me: &Unit, my_cell: CellPos, player_cell: CellPos) -> Direction {
    match shortest_path(board, my_cell, player_cell, Some(UnitTag::Pursuer), &HashSet::new()) {
        Some(path) if !path.is_empty() => {
            if path.len() > SHYNESS {
                path[0]
            } else {
                // Close enough to get caught: head the other way.
                path[0].opposite()
            }
        }
        _ => me.facing(),
    }
}

/// Keeps the first choice when its destination is accessible; otherwise
/// tries the current facing and then each cardinal direction in fixed order,
/// skipping the rejected choice. `None` means the unit is enclosed.
fn reroute_if_impassable(
    board: &Board,
    cell: CellPos,
    facing: Direction,
    first_choice: Direction,
) -> Option<Direction> {
    if board.accessible_to(board.neighbor(cell, first_choice), UnitTag::Pursuer) {
        return Some(first_choice);
    }

    let candidates = [
        facing,
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
    let mut seen = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if candidate != first_choice && !seen.contains(&candidate) {
            seen.push(candidate);
        }
    }

    seen.into_iter()
        .find(|direction| board.accessible_to(board.neighbor(cell, *direction), UnitTag::Pursuer))
}

fn random_move<R: Rng>(board: &Board, cell: CellPos, rng: &mut R) -> Option<Direction> {
    let legal: Vec<Direction> = Direction::SEARCH_ORDER
        .into_iter()
        .filter(|direction| {
            board.accessible_to(board.neighbor(cell, *direction), UnitTag::Pursuer)
        })
        .collect();
    if legal.is_empty() {
        None
    } else {
        Some(legal[rng.gen_range(0..legal.len())])
    }
}
