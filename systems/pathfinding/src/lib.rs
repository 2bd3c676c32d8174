#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure breadth-first navigation queries over a chase board.
//!
//! Both queries are deterministic functions of their inputs: neighbors are
//! expanded in the fixed order North, South, West, East, and every cell is
//! visited at most once, so identical inputs always yield identical answers.

use std::collections::{HashMap, HashSet, VecDeque};

use grid_chase_core::{CellPos, Direction, UnitId, UnitTag};
use grid_chase_world::{query, Board, World};

/// Calculates the shortest path from `from` to `to` as a list of directions.
///
/// With a `traveller`, only cells accessible to that unit kind are expanded;
/// without one, terrain is ignored entirely, which is how "as the crow flies"
/// targets are designed. Cells in `ignore` are excluded from the search
/// outright. Returns an empty path when `from == to` and `None` when the
/// destination cannot be reached.
#[must_use]
pub fn shortest_path(
    board: &Board,
    from: CellPos,
    to: CellPos,
    traveller: Option<UnitTag>,
    ignore: &HashSet<CellPos>,
) -> Option<Vec<Direction>> {
    if from == to {
        return Some(Vec::new());
    }

    let mut visited: HashSet<CellPos> = ignore.clone();
    let mut parents: HashMap<CellPos, (CellPos, Direction)> = HashMap::new();
    let mut frontier = VecDeque::new();

    let _ = visited.insert(from);
    frontier.push_back(from);

    while let Some(current) = frontier.pop_front() {
        for direction in Direction::SEARCH_ORDER {
            let next = board.neighbor(current, direction);
            if visited.contains(&next) {
                continue;
            }
            if let Some(tag) = traveller {
                if !board.accessible_to(next, tag) {
                    continue;
                }
            }

            let _ = visited.insert(next);
            let _ = parents.insert(next, (current, direction));
            if next == to {
                return Some(reconstruct(&parents, from, to));
            }
            frontier.push_back(next);
        }
    }

    None
}

/// Finds the nearest unit of the requested kind, searching outward from
/// `from` without regard for terrain. Returns `None` when the whole board
/// holds no such unit.
#[must_use]
pub fn find_nearest(world: &World, tag: UnitTag, from: CellPos) -> Option<UnitId> {
    let board = query::board(world);
    let mut visited = HashSet::new();
    let mut frontier = VecDeque::new();

    let _ = visited.insert(from);
    frontier.push_back(from);

    while let Some(current) = frontier.pop_front() {
        for unit in query::units_at(world, current) {
            if unit.tag() == tag {
                return Some(unit.id());
            }
        }

        for direction in Direction::SEARCH_ORDER {
            let next = board.neighbor(current, direction);
            if visited.insert(next) {
                frontier.push_back(next);
            }
        }
    }

    None
}

fn reconstruct(
    parents: &HashMap<CellPos, (CellPos, Direction)>,
    from: CellPos,
    to: CellPos,
) -> Vec<Direction> {
    let mut path = Vec::new();
    let mut current = to;
    while current != from {
        let (previous, direction) = parents[&current];
        path.push(direction);
        current = previous;
    }
    path.reverse();
    path
}
