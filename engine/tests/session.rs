use std::time::{Duration, Instant};

use grid_chase_core::{Direction, COLLECTIBLE_VALUE};
use grid_chase_engine::{Session, SessionConfig};
use grid_chase_world::layout::world_from_rows;
use grid_chase_world::{query, World};

fn quick_config() -> SessionConfig {
    SessionConfig {
        frame_delay: Duration::from_millis(5),
        player_interval: Duration::from_millis(3),
        pursuer_interval: Duration::from_millis(5),
    }
}

fn world(rows: &[&str]) -> World {
    let mut world = world_from_rows(rows).expect("valid layout");
    let _ = world.register_player();
    world
}

/// Polls until the session stops on its own or the deadline passes.
fn wait_until_stopped(session: &Session) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while session.is_running() {
        if Instant::now() > deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    true
}

#[test]
fn eating_every_collectible_wins_the_game() {
    // No pursuers and no input: the authority loop rolls the eastward-facing
    // player over both collectibles on its own.
    let mut session = Session::new(
        world(&[
            "#####", //
            "#P..#", //
            "#####",
        ]),
        quick_config(),
    );

    session.start();
    assert!(session.is_running());
    assert!(wait_until_stopped(&session), "game should end by winning");
    // Joining the loops guarantees the terminal snapshot has been published.
    session.stop();

    let snapshot = session.latest_snapshot().expect("snapshot published");
    let player = query::player(snapshot.world()).expect("player present");
    assert_eq!(player.score(), Some(2 * COLLECTIBLE_VALUE));
    assert!(player.is_alive());
    assert_eq!(query::remaining_collectibles(snapshot.world()), 0);
}

#[test]
fn meeting_a_pursuer_loses_the_game() {
    // The direct pursuer closes in from the east; whichever side commits the
    // meeting move, the player dies and the session reports not running.
    let mut session = Session::new(
        world(&[
            "######", //
            "#P D.#", //
            "######",
        ]),
        quick_config(),
    );

    session.start();
    assert!(wait_until_stopped(&session), "game should end by losing");
    session.stop();

    let snapshot = session.latest_snapshot().expect("snapshot published");
    let player = query::player(snapshot.world()).expect("player present");
    assert!(!player.is_alive());
    assert!(!query::any_player_alive(snapshot.world()));
    assert!(!session.is_running());
}

#[test]
fn reported_commands_steer_the_player() {
    // The player is walled in except to the south, where the only
    // collectible waits. Only a reported command can finish this game.
    let mut session = Session::new(
        world(&[
            "#######", //
            "#P#####", //
            "#.#####",
        ]),
        quick_config(),
    );

    session.start();
    assert!(session.is_running());

    session.report_command(Direction::South);
    assert!(wait_until_stopped(&session), "the command should win the game");
    session.stop();

    let snapshot = session.latest_snapshot().expect("snapshot published");
    let player = query::player(snapshot.world()).expect("player present");
    assert_eq!(player.score(), Some(COLLECTIBLE_VALUE));
}

#[test]
fn stop_requests_wind_the_session_down() {
    // The collectible is unreachable without input, so the game would run
    // forever; an explicit stop has to bring it down.
    let mut session = Session::new(
        world(&[
            "#######", //
            "#P#####", //
            "#.#####",
        ]),
        quick_config(),
    );

    session.start();
    assert!(session.is_running());
    std::thread::sleep(Duration::from_millis(50));
    assert!(session.is_running(), "no terminal condition was reached");

    session.stop();
    assert!(!session.is_running());
}

#[test]
fn sessions_without_collectibles_refuse_to_start() {
    let mut session = Session::new(
        world(&[
            "####", //
            "#P #", //
            "####",
        ]),
        quick_config(),
    );

    session.start();
    assert!(!session.is_running());
    assert!(session.latest_snapshot().is_none());
}

#[test]
fn stopped_sessions_can_be_started_again() {
    let mut session = Session::new(
        world(&[
            "#######", //
            "#P#####", //
            "#.#####",
        ]),
        quick_config(),
    );

    session.start();
    assert!(session.is_running());
    session.stop();
    assert!(!session.is_running());

    session.reset();
    session.start();
    assert!(session.is_running(), "the reclaimed world still satisfies the start conditions");
    session.stop();
}
