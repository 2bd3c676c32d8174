use grid_chase_core::{CellPos, UnitTag};
use grid_chase_system_pathfinding::find_nearest;
use grid_chase_world::layout::world_from_rows;
use grid_chase_world::query;

#[test]
fn finds_the_closest_collectible() {
    let world = world_from_rows(&[
        "#####", //
        "#P..#", //
        "#####",
    ])
    .expect("valid world");

    let found = find_nearest(&world, UnitTag::Collectible, CellPos::new(1, 1))
        .expect("a collectible exists");
    assert_eq!(
        query::unit(&world, found).cell(),
        Some(CellPos::new(2, 1)),
        "the nearer of the two collectibles should win"
    );
}

#[test]
fn search_crosses_walls_because_terrain_is_ignored() {
    let world = world_from_rows(&[
        "#####", //
        "#P#.#", //
        "#####",
    ])
    .expect("valid world");

    let found = find_nearest(&world, UnitTag::Collectible, CellPos::new(1, 1));
    assert!(found.is_some());
}

#[test]
fn exhausted_searches_return_none() {
    let world = world_from_rows(&["P"]).expect("valid world");
    assert_eq!(find_nearest(&world, UnitTag::Collectible, CellPos::new(0, 0)), None);
}

#[test]
fn units_on_the_starting_cell_are_found_first() {
    let mut world = world_from_rows(&[
        "####", //
        "#P.#", //
        "####",
    ])
    .expect("valid world");
    let player = world.register_player();

    let found = find_nearest(&world, UnitTag::Player, CellPos::new(1, 1));
    assert_eq!(found, Some(player));
}
