//! The coordination point between the authority loop and the decision
//! actors: a last-write-wins snapshot slot, a proposal stack, and the most
//! recent input command.
//!
//! The bus is an explicitly constructed value shared through an `Arc`, so a
//! process can run any number of independent sessions side by side. No
//! operation here blocks beyond a short critical section: reads hand out the
//! previously published `Arc`, writers swap it, and popping an empty stack
//! returns `None` instead of waiting.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use grid_chase_core::{Direction, Proposal};
use grid_chase_world::World;

/// Immutable copy of the world published once per tick.
///
/// Readers may hold a snapshot for as long as they like; the authority loop
/// only ever replaces the slot, never the snapshot behind it.
#[derive(Debug)]
pub struct Snapshot {
    world: World,
    input: Option<Direction>,
    tick: u64,
}

impl Snapshot {
    pub(crate) fn new(world: World, input: Option<Direction>, tick: u64) -> Self {
        Self { world, input, tick }
    }

    /// The copied world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The most recently decoded input command at publication time.
    #[must_use]
    pub fn input(&self) -> Option<Direction> {
        self.input
    }

    /// Index of the tick that published this snapshot.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

/// Shared coordination object wiring the loops together.
#[derive(Debug, Default)]
pub struct Bus {
    snapshot: Mutex<Option<Arc<Snapshot>>>,
    proposals: Mutex<Vec<Proposal>>,
    command: Mutex<Option<Direction>>,
}

impl Bus {
    /// Creates a bus with no snapshot, no proposals, and no input recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a fresh snapshot, superseding the previous one.
    pub fn publish(&self, snapshot: Snapshot) {
        *lock(&self.snapshot) = Some(Arc::new(snapshot));
    }

    /// Returns the most recently published snapshot, if any.
    #[must_use]
    pub fn latest_snapshot(&self) -> Option<Arc<Snapshot>> {
        lock(&self.snapshot).clone()
    }

    /// Pushes a proposal onto the stack.
    ///
    /// The stack is deliberately last-in-first-out: the consumer always sees
    /// the most recently produced intent first. Older entries stay queued
    /// until they are popped on a later tick or cleared by [`Bus::reset`].
    pub fn push_proposal(&self, proposal: Proposal) {
        lock(&self.proposals).push(proposal);
    }

    /// Removes and returns the most recent proposal, or `None` when the
    /// stack is empty. Never blocks on producers.
    #[must_use]
    pub fn pop_proposal(&self) -> Option<Proposal> {
        lock(&self.proposals).pop()
    }

    /// Drops every queued proposal, for use between independent sessions.
    pub fn reset(&self) {
        lock(&self.proposals).clear();
    }

    /// Records the latest decoded input command, replacing the previous one.
    pub fn record_command(&self, direction: Direction) {
        *lock(&self.command) = Some(direction);
    }

    /// Returns the most recently recorded input command, if any.
    #[must_use]
    pub fn latest_command(&self) -> Option<Direction> {
        *lock(&self.command)
    }
}

/// Bus values are replaced wholesale, so a guard recovered from a poisoned
/// mutex is still coherent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use grid_chase_core::{ActorId, PursuerKind};

    use super::*;

    #[test]
    fn popping_returns_the_most_recent_proposal_first() {
        let bus = Bus::new();
        let first = Proposal::new(ActorId::Player, Direction::North);
        let second = Proposal::new(ActorId::Pursuer(PursuerKind::Direct), Direction::South);

        bus.push_proposal(first);
        bus.push_proposal(second);

        assert_eq!(bus.pop_proposal(), Some(second));
        assert_eq!(bus.pop_proposal(), Some(first));
        assert_eq!(bus.pop_proposal(), None);
    }

    #[test]
    fn unconsumed_proposals_survive_until_reset() {
        let bus = Bus::new();
        bus.push_proposal(Proposal::new(ActorId::Player, Direction::East));
        bus.push_proposal(Proposal::new(ActorId::Player, Direction::West));

        assert_eq!(
            bus.pop_proposal(),
            Some(Proposal::new(ActorId::Player, Direction::West))
        );

        bus.reset();
        assert_eq!(bus.pop_proposal(), None);
    }

    #[test]
    fn the_latest_command_wins() {
        let bus = Bus::new();
        assert_eq!(bus.latest_command(), None);

        bus.record_command(Direction::North);
        bus.record_command(Direction::West);
        assert_eq!(bus.latest_command(), Some(Direction::West));
    }
}
