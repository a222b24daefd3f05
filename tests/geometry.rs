use gridkeeper::geometry::*;
use winit::keyboard::KeyCode;

#[test]
fn in_bounds_accepts_every_cell_of_the_grid() {
    for y in 0..3 {
        for x in 0..5 {
            assert!(in_bounds(x, y, 5, 3), "({x},{y}) should be inside 5x3");
        }
    }
}

#[test]
fn in_bounds_rejects_negative_and_far_edges() {
    assert!(!in_bounds(-1, 0, 5, 3));
    assert!(!in_bounds(0, -1, 5, 3));
    assert!(!in_bounds(5, 0, 5, 3));
    assert!(!in_bounds(0, 3, 5, 3));
    assert!(!in_bounds(0, 0, 0, 0));
}

#[test]
fn offset_moves_one_cell() {
    let p = TilePos::new(2, 2);
    assert_eq!(p.offset(Direction::Up), TilePos::new(2, 1));
    assert_eq!(p.offset(Direction::Down), TilePos::new(2, 3));
    assert_eq!(p.offset(Direction::Left), TilePos::new(1, 2));
    assert_eq!(p.offset(Direction::Right), TilePos::new(3, 2));
}

#[test]
fn offset_saturates_at_the_coordinate_limits() {
    assert_eq!(TilePos::new(i32::MAX, 0).offset(Direction::Right), TilePos::new(i32::MAX, 0));
    assert_eq!(TilePos::new(0, i32::MIN).offset(Direction::Up), TilePos::new(0, i32::MIN));
    assert!(!in_bounds(i32::MAX, 0, 5, 3));
}

#[test]
fn priority_is_up_down_left_right() {
    assert_eq!(
        Direction::PRIORITY,
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    );
}

#[test]
fn arrows_and_wasd_map_to_directions() {
    assert_eq!(Direction::from_key(KeyCode::ArrowUp), Some(Direction::Up));
    assert_eq!(Direction::from_key(KeyCode::KeyS), Some(Direction::Down));
    assert_eq!(Direction::from_key(KeyCode::KeyA), Some(Direction::Left));
    assert_eq!(Direction::from_key(KeyCode::ArrowRight), Some(Direction::Right));
    assert_eq!(Direction::from_key(KeyCode::Space), None);
}
