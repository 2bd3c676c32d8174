//! Decision actor loops: one thread per pursuer plus one for player input.
//!
//! Each loop sleeps its fixed interval, reads whatever snapshot was last
//! published, and pushes at most one proposal. Actors never touch the live
//! world and never block each other; they exit cooperatively once the shared
//! running flag clears.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use grid_chase_core::{ActorId, Proposal, PursuerKind};
use grid_chase_system_steering::{propose_player_move, PursuerSteering};

use crate::bus::Bus;

pub(crate) fn player_loop(bus: Arc<Bus>, running: Arc<AtomicBool>, interval: Duration) {
    while running.load(Ordering::Acquire) {
        thread::sleep(interval);
        if !running.load(Ordering::Acquire) {
            break;
        }

        let Some(snapshot) = bus.latest_snapshot() else {
            continue;
        };
        if let Some(direction) = propose_player_move(snapshot.world(), snapshot.input()) {
            bus.push_proposal(Proposal::new(ActorId::Player, direction));
        }
    }
}

pub(crate) fn pursuer_loop(
    kind: PursuerKind,
    bus: Arc<Bus>,
    running: Arc<AtomicBool>,
    interval: Duration,
) {
    let mut steering = PursuerSteering::new(kind);
    let mut rng = rand::thread_rng();

    while running.load(Ordering::Acquire) {
        thread::sleep(interval);
        if !running.load(Ordering::Acquire) {
            break;
        }

        let Some(snapshot) = bus.latest_snapshot() else {
            continue;
        };
        match steering.decide(snapshot.world(), &mut rng) {
            Ok(direction) => {
                bus.push_proposal(Proposal::new(ActorId::Pursuer(kind), direction));
            }
            Err(error) => {
                // Fatal to this actor only; the authority loop and the other
                // actors keep running.
                tracing::error!(pursuer = ?kind, %error, "decision loop aborted");
                break;
            }
        }
    }
}
