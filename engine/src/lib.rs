#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Concurrent runtime for Grid Chase.
//!
//! One authority loop owns and mutates the live world; decision actors run
//! on their own threads and only ever see immutable snapshots. The two sides
//! meet at the [`Bus`]: the authority publishes a snapshot each tick and
//! drains at most one proposal, so exactly one state-changing move commits
//! per tick no matter how fast the actors produce.

mod actors;
mod bus;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use grid_chase_core::{ActorId, Direction, Proposal};
use grid_chase_world::{query, World, WorldObserver};

pub use bus::{Bus, Snapshot};

/// Timing parameters for the runtime loops.
///
/// These are scheduling knobs, not correctness requirements: the input actor
/// polls fastest, pursuers more slowly, and the authority loop sleeps twice
/// per tick to pace the frame rate.
#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Delay slept twice per authority tick.
    pub frame_delay: Duration,
    /// Interval between player input actor decisions.
    pub player_interval: Duration,
    /// Interval between pursuer actor decisions.
    pub pursuer_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_delay: Duration::from_millis(200),
            player_interval: Duration::from_millis(100),
            pursuer_interval: Duration::from_millis(250),
        }
    }
}

/// Observer that clears the shared running flag on either terminal state.
///
/// Registered on the world before it moves into the authority thread, so the
/// loop condition and a stop request act on the same atomic flag without a
/// race window.
struct StopOnTerminal {
    running: Arc<AtomicBool>,
}

impl WorldObserver for StopOnTerminal {
    fn level_won(&self) {
        self.running.store(false, Ordering::Release);
    }

    fn level_lost(&self) {
        self.running.store(false, Ordering::Release);
    }
}

/// A single game session: owns the world when stopped, lends it to the
/// authority thread while running.
pub struct Session {
    config: SessionConfig,
    bus: Arc<Bus>,
    running: Arc<AtomicBool>,
    world: Option<World>,
    authority: Option<JoinHandle<World>>,
    actors: Vec<JoinHandle<()>>,
}

impl Session {
    /// Creates a session around a fully constructed world.
    #[must_use]
    pub fn new(world: World, config: SessionConfig) -> Self {
        Self {
            config,
            bus: Arc::new(Bus::new()),
            running: Arc::new(AtomicBool::new(false)),
            world: Some(world),
            authority: None,
            actors: Vec::new(),
        }
    }

    /// Starts or resumes the session.
    ///
    /// A session only transitions to running while at least one player is
    /// alive and at least one collectible remains; otherwise the call is a
    /// logged no-op, matching an explicit stop having happened already.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.reclaim_world();

        let ready = self.world.as_ref().is_some_and(|world| {
            query::any_player_alive(world) && query::remaining_collectibles(world) > 0
        });
        if !ready {
            tracing::warn!("not starting: need a living player and a remaining collectible");
            return;
        }

        let mut world = self.world.take().expect("world present when stopped");
        let pursuer_kinds = query::pursuer_kinds(&world);

        self.running.store(true, Ordering::Release);
        world.add_observer(Box::new(StopOnTerminal {
            running: Arc::clone(&self.running),
        }));

        tracing::info!(pursuers = pursuer_kinds.len(), "session starting");

        let bus = Arc::clone(&self.bus);
        let running = Arc::clone(&self.running);
        let frame_delay = self.config.frame_delay;
        self.authority = Some(
            thread::Builder::new()
                .name("authority".to_owned())
                .spawn(move || authority_loop(world, bus, running, frame_delay))
                .expect("spawn authority thread"),
        );

        let bus = Arc::clone(&self.bus);
        let running = Arc::clone(&self.running);
        let player_interval = self.config.player_interval;
        self.actors.push(
            thread::Builder::new()
                .name("player-input".to_owned())
                .spawn(move || actors::player_loop(bus, running, player_interval))
                .expect("spawn player actor thread"),
        );

        for kind in pursuer_kinds {
            let bus = Arc::clone(&self.bus);
            let running = Arc::clone(&self.running);
            let pursuer_interval = self.config.pursuer_interval;
            self.actors.push(
                thread::Builder::new()
                    .name(format!("pursuer-{kind:?}").to_lowercase())
                    .spawn(move || actors::pursuer_loop(kind, bus, running, pursuer_interval))
                    .expect("spawn pursuer actor thread"),
            );
        }
    }

    /// Requests a stop and waits for every loop to wind down.
    ///
    /// Cancellation is cooperative: each loop notices the cleared flag on
    /// its next wake-up, so this blocks for up to one sleep interval.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        for handle in self.actors.drain(..) {
            if handle.join().is_err() {
                tracing::error!("actor thread panicked before joining");
            }
        }
        self.reclaim_world();
    }

    /// Reports whether the session is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Records a decoded directional command as the latest player intent.
    pub fn report_command(&self, direction: Direction) {
        self.bus.record_command(direction);
    }

    /// Clears any pending proposals, for use between independent games.
    pub fn reset(&self) {
        self.bus.reset();
    }

    /// The most recently published snapshot: the read surface for rendering
    /// and score queries. At most one tick stale, never torn.
    #[must_use]
    pub fn latest_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.bus.latest_snapshot()
    }

    fn reclaim_world(&mut self) {
        if let Some(handle) = self.authority.take() {
            match handle.join() {
                Ok(world) => self.world = Some(world),
                Err(_) => tracing::error!("authority thread panicked; world lost"),
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The single writer of world state. Each tick publishes a snapshot, sleeps,
/// commits at most one proposed move, sleeps again, and re-evaluates the
/// running flag. On the way out it publishes one final snapshot so readers
/// observe the terminal state.
fn authority_loop(
    mut world: World,
    bus: Arc<Bus>,
    running: Arc<AtomicBool>,
    frame_delay: Duration,
) -> World {
    let mut tick: u64 = 0;

    while running.load(Ordering::Acquire) {
        tick += 1;
        bus.publish(Snapshot::new(world.clone(), bus.latest_command(), tick));

        thread::sleep(frame_delay);

        match bus.pop_proposal() {
            Some(proposal) => apply_proposal(&mut world, proposal),
            None => {
                // No fresh intent: the player keeps moving the way it faces.
                let mover = query::player(&world).map(|player| (player.id(), player.facing()));
                if let Some((id, facing)) = mover {
                    world.move_unit(id, facing);
                }
            }
        }

        thread::sleep(frame_delay);
    }

    tick += 1;
    bus.publish(Snapshot::new(world.clone(), bus.latest_command(), tick));
    tracing::info!(ticks = tick, "authority loop stopped");
    world
}

fn apply_proposal(world: &mut World, proposal: Proposal) {
    let target = match proposal.actor {
        ActorId::Player => query::player(world).map(grid_chase_world::Unit::id),
        ActorId::Pursuer(kind) => query::pursuer(world, kind).map(grid_chase_world::Unit::id),
    };

    match target {
        Some(id) => world.move_unit(id, proposal.direction),
        None => tracing::warn!(actor = ?proposal.actor, "proposal for an absent unit dropped"),
    }
}
