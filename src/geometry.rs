// =============================================================================
// GEOMETRY.RS: Tile coordinates and the four walking directions
// =============================================================================

use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

/// A cell coordinate. Signed so that "one step left of column 0" is
/// representable and can be rejected by a bounds check.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step in `dir`. Saturates at the `i32` range,
    /// which is never inside a grid.
    pub fn offset(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self { x: self.x.saturating_add(dx), y: self.y.saturating_add(dy) }
    }
}

/// Returns true iff `0 <= x < width` and `0 <= y < height`.
#[inline]
pub fn in_bounds(x: i32, y: i32, width: u32, height: u32) -> bool {
    x >= 0 && y >= 0 && (x as i64) < width as i64 && (y as i64) < height as i64
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Order in which held directions are tried each step.
    pub const PRIORITY: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Grid delta; y grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Keys bound to this direction, arrow key first.
    pub fn keys(self) -> &'static [KeyCode] {
        match self {
            Direction::Up => &[KeyCode::ArrowUp, KeyCode::KeyW],
            Direction::Down => &[KeyCode::ArrowDown, KeyCode::KeyS],
            Direction::Left => &[KeyCode::ArrowLeft, KeyCode::KeyA],
            Direction::Right => &[KeyCode::ArrowRight, KeyCode::KeyD],
        }
    }

    pub fn from_key(key: KeyCode) -> Option<Direction> {
        Self::PRIORITY.into_iter().find(|d| d.keys().contains(&key))
    }
}
