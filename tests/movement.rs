use gridkeeper::geometry::TilePos;
use gridkeeper::grid::TileMap;
use gridkeeper::state::{GameState, Player};
use gridkeeper::tiles::{FLOOR, LAVA, TileRegistry, WALL, WATER};
use gridkeeper::update::{StepOutcome, step};
use winit::keyboard::KeyCode;

fn state_at(map: TileMap, x: i32, y: i32) -> GameState {
    GameState::new(map, Player { x, y })
}

#[test]
fn each_press_moves_exactly_one_tile() {
    let registry = TileRegistry::default();
    let mut s = state_at(TileMap::filled(5, 5, FLOOR), 0, 0);
    for expected in 1..=3 {
        s.keys_pressed.insert(KeyCode::KeyD);
        assert_eq!(step(&mut s, &registry), StepOutcome::Moved { to: TilePos::new(expected, 0) });
        assert_eq!(step(&mut s, &registry), StepOutcome::Idle);
    }
}

#[test]
fn arrows_and_wasd_are_interchangeable() {
    let registry = TileRegistry::default();
    let mut s = state_at(TileMap::filled(3, 3, FLOOR), 1, 1);
    s.keys_pressed.insert(KeyCode::ArrowUp);
    step(&mut s, &registry);
    s.keys_pressed.insert(KeyCode::KeyS);
    step(&mut s, &registry);
    s.keys_pressed.insert(KeyCode::KeyA);
    step(&mut s, &registry);
    assert_eq!(s.player, Player { x: 0, y: 1 });
}

#[test]
fn collidable_tiles_all_block() {
    let registry = TileRegistry::default();
    for solid in [WALL, WATER, LAVA] {
        let mut map = TileMap::filled(3, 1, FLOOR);
        map.set(1, 0, solid);
        let mut s = state_at(map, 0, 0);
        s.keys_pressed.insert(KeyCode::ArrowRight);
        assert_eq!(step(&mut s, &registry), StepOutcome::Blocked);
        assert_eq!(s.player, Player { x: 0, y: 0 });
        assert!(s.keys_pressed.contains(&KeyCode::ArrowRight));
    }
}

#[test]
fn player_never_leaves_the_grid() {
    let registry = TileRegistry::default();
    let mut s = state_at(TileMap::filled(2, 2, FLOOR), 0, 0);
    for key in [KeyCode::ArrowUp, KeyCode::ArrowLeft] {
        s.keys_pressed.clear();
        s.keys_pressed.insert(key);
        assert_eq!(step(&mut s, &registry), StepOutcome::Blocked);
    }
    assert_eq!(s.player, Player { x: 0, y: 0 });
}

#[test]
fn unknown_tile_ids_block_movement() {
    let registry = TileRegistry::default();
    let mut map = TileMap::filled(2, 1, FLOOR);
    map.set(1, 0, 250);
    let mut s = state_at(map, 0, 0);
    s.keys_pressed.insert(KeyCode::ArrowRight);
    assert_eq!(step(&mut s, &registry), StepOutcome::Blocked);
}
