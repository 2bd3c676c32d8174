use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use grid_chase_core::{Direction, PursuerKind};
use grid_chase_system_steering::{propose_player_move, PursuerSteering, SteeringError};
use grid_chase_world::layout::world_from_rows;
use grid_chase_world::World;

fn world(rows: &[&str]) -> World {
    let mut world = world_from_rows(rows).expect("valid layout");
    let _ = world.register_player();
    world
}

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(7)
}

#[test]
fn direct_heads_straight_for_the_player() {
    let world = world(&[
        "######", //
        "#P  D#", //
        "######",
    ]);

    let mut steering = PursuerSteering::new(PursuerKind::Direct);
    let direction = steering.decide(&world, &mut rng()).expect("legal move");
    assert_eq!(direction, Direction::West);
}

#[test]
fn direct_borrows_the_player_facing_when_no_path_exists() {
    // The pursuer sits in a side room the player cannot be reached from,
    // but with open cells around it so the facing fallback stays legal.
    let world = world(&[
        "########", //
        "#P#    #", //
        "###    #", //
        "### D  #", //
        "###    #", //
        "########",
    ]);

    let mut steering = PursuerSteering::new(PursuerKind::Direct);
    let direction = steering.decide(&world, &mut rng()).expect("legal move");
    // Players face East on creation and this one never moved.
    assert_eq!(direction, Direction::East);
}

#[test]
fn ambush_aims_four_cells_ahead_of_the_player() {
    // Four ahead of the player is the cell just east of the ambusher, so
    // the shortest path begins with an eastward step.
    let world = world(&[
        "#########", //
        "#P  A   #", //
        "#########",
    ]);

    let mut steering = PursuerSteering::new(PursuerKind::Ambush);
    let direction = steering.decide(&world, &mut rng()).expect("legal move");
    assert_eq!(direction, Direction::East);
}

#[test]
fn ambush_keeps_its_heading_when_the_target_is_walled() {
    // Four ahead of the player lands on the perimeter wall, so no path is
    // found and the ambusher falls back to its own facing.
    let world = world(&[
        "######", //
        "#PA  #", //
        "######",
    ]);

    let mut steering = PursuerSteering::new(PursuerKind::Ambush);
    let direction = steering.decide(&world, &mut rng()).expect("legal move");
    assert_eq!(direction, Direction::East);
}

#[test]
fn flank_extends_the_line_from_the_direct_pursuer() {
    // Two ahead of the player is one step east of the direct pursuer, so
    // the extended segment ends one further cell east, at x = 4. The
    // flanker's shortest path there starts westward.
    let world = world(&[
        "#######", //
        "#PD  F#", //
        "#######",
    ]);

    let mut steering = PursuerSteering::new(PursuerKind::Flank);
    let direction = steering.decide(&world, &mut rng()).expect("legal move");
    assert_eq!(direction, Direction::West);
}

#[test]
fn flank_requires_the_direct_pursuer_on_the_board() {
    let world = world(&[
        "#####", //
        "#P F#", //
        "#####",
    ]);

    let mut steering = PursuerSteering::new(PursuerKind::Flank);
    assert_eq!(
        steering.decide(&world, &mut rng()),
        Err(SteeringError::PursuerMissing(PursuerKind::Direct))
    );
}

#[test]
fn erratic_chases_while_the_player_is_far_away() {
    let world = world(&[
        "#############", //
        "#P         E#", //
        "#############",
    ]);

    let mut steering = PursuerSteering::new(PursuerKind::Erratic);
    let direction = steering.decide(&world, &mut rng()).expect("legal move");
    assert_eq!(direction, Direction::West, "ten cells away is outside shyness range");
}

#[test]
fn erratic_retreats_once_the_player_is_close() {
    let world = world(&[
        "#########", //
        "#P  E   #", //
        "#########",
    ]);

    let mut steering = PursuerSteering::new(PursuerKind::Erratic);
    let direction = steering.decide(&world, &mut rng()).expect("legal move");
    assert_eq!(direction, Direction::East, "three cells away triggers the retreat");
}

#[test]
fn enclosed_pursuers_surface_an_error() {
    let world = world(&[
        "#####", //
        "#P#D#", //
        "#####",
    ]);

    let mut steering = PursuerSteering::new(PursuerKind::Direct);
    assert!(matches!(
        steering.decide(&world, &mut rng()),
        Err(SteeringError::Enclosed {
            kind: PursuerKind::Direct,
            ..
        })
    ));
}

#[test]
fn player_input_is_translated_verbatim_when_legal() {
    let world = world(&[
        "####", //
        "#P #", //
        "####",
    ]);

    assert_eq!(
        propose_player_move(&world, Some(Direction::East)),
        Some(Direction::East)
    );
}

#[test]
fn illegal_player_input_keeps_the_current_facing() {
    let world = world(&[
        "####", //
        "#P #", //
        "####",
    ]);

    // North is a wall; the player faces East and keeps going that way
    // rather than being rerouted to some other legal direction.
    assert_eq!(
        propose_player_move(&world, Some(Direction::North)),
        Some(Direction::East)
    );
}

#[test]
fn no_input_means_no_proposal() {
    let world = world(&[
        "####", //
        "#P #", //
        "####",
    ]);

    assert_eq!(propose_player_move(&world, None), None);
}
