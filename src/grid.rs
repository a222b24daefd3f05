use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{TilePos, in_bounds};
use crate::tiles::{TileId, TileRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("tile map must have at least one row and one column")]
    Empty,
    #[error("row {row} has {actual} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, actual: usize },
    #[error("unknown tile id {id} at ({x}, {y})")]
    UnknownTile { id: TileId, x: u32, y: u32 },
    #[error("player at ({x}, {y}) is outside the {width}x{height} grid")]
    PlayerOutOfBounds { x: i32, y: i32, width: u32, height: u32 },
}

/// Rectangular grid of tile ids, stored row-major.
///
/// Serialized as a JSON array of rows (`number[][]`); deserializing checks
/// that the grid is non-empty and rectangular.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<TileId>>", into = "Vec<Vec<TileId>>")]
pub struct TileMap {
    width: u32,
    height: u32,
    cells: Vec<TileId>,
}

impl TileMap {
    pub fn filled(width: u32, height: u32, tile: TileId) -> Self {
        Self { width, height, cells: vec![tile; (width * height) as usize] }
    }

    /// `floor` everywhere, `wall` around the outer edge.
    pub fn bordered(width: u32, height: u32, floor: TileId, wall: TileId) -> Self {
        let mut map = Self::filled(width, height, floor);
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    map.cells[(y * width + x) as usize] = wall;
                }
            }
        }
        map
    }

    /// Floor with roughly one cell in five turned into `wall`.
    /// Deterministic for a given `seed`.
    pub fn scattered(width: u32, height: u32, floor: TileId, wall: TileId, seed: u64) -> Self {
        let mut map = Self::filled(width, height, floor);
        for (i, cell) in map.cells.iter_mut().enumerate() {
            if pseudo_rand(seed.wrapping_add(i as u64 * 7919)) > 0.8 {
                *cell = wall;
            }
        }
        map
    }

    pub fn from_rows(rows: Vec<Vec<TileId>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(GridError::Empty);
        }
        let mut cells = Vec::with_capacity(width * height);
        for (row, cols) in rows.into_iter().enumerate() {
            if cols.len() != width {
                return Err(GridError::Ragged { row, expected: width, actual: cols.len() });
            }
            cells.extend(cols);
        }
        Ok(Self { width: width as u32, height: height as u32, cells })
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        in_bounds(x, y, self.width, self.height)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<TileId> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Overwrite one cell. Returns false when `(x, y)` is out of bounds.
    pub fn set(&mut self, x: i32, y: i32, tile: TileId) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = tile;
                true
            }
            None => false,
        }
    }

    /// In bounds and not collidable.
    pub fn is_walkable(&self, pos: TilePos, registry: &TileRegistry) -> bool {
        self.get(pos.x, pos.y).is_some_and(|id| !registry.is_collidable(id))
    }

    /// Every cell must reference an existing tile type.
    pub fn validate(&self, registry: &TileRegistry) -> Result<(), GridError> {
        for (i, &id) in self.cells.iter().enumerate() {
            if !registry.contains(id) {
                let i = i as u32;
                return Err(GridError::UnknownTile { id, x: i % self.width, y: i / self.width });
            }
        }
        Ok(())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[TileId]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// `(x, y, tile)` for every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, TileId)> + '_ {
        let w = self.width.max(1);
        self.cells.iter().enumerate().map(move |(i, &t)| (i as u32 % w, i as u32 / w, t))
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.is_valid_position(x, y).then(|| y as usize * self.width as usize + x as usize)
    }
}

impl TryFrom<Vec<Vec<TileId>>> for TileMap {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<TileId>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<TileMap> for Vec<Vec<TileId>> {
    fn from(map: TileMap) -> Self {
        map.rows().map(<[TileId]>::to_vec).collect()
    }
}

fn pseudo_rand(seed: u64) -> f32 {
    let x = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    (x >> 33) as f32 / (1u64 << 31) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{FLOOR, WALL};

    #[test]
    fn from_rows_rejects_ragged_grid() {
        let err = TileMap::from_rows(vec![vec![0, 0, 0], vec![0, 0]]).unwrap_err();
        assert_eq!(err, GridError::Ragged { row: 1, expected: 3, actual: 2 });
    }

    #[test]
    fn from_rows_rejects_empty_grid() {
        assert_eq!(TileMap::from_rows(vec![]).unwrap_err(), GridError::Empty);
        assert_eq!(TileMap::from_rows(vec![vec![]]).unwrap_err(), GridError::Empty);
    }

    #[test]
    fn rows_round_trip_through_vec() {
        let rows = vec![vec![0, 1, 0, 0], vec![1, 0, 0, 1]];
        let map = TileMap::from_rows(rows.clone()).unwrap();
        assert_eq!(map.width(), 4);
        assert_eq!(map.height(), 2);
        assert_eq!(Vec::<Vec<TileId>>::from(map), rows);
    }

    #[test]
    fn bordered_puts_walls_only_on_the_edge() {
        let map = TileMap::bordered(5, 3, FLOOR, WALL);
        assert_eq!(map.get(0, 0), Some(WALL));
        assert_eq!(map.get(4, 2), Some(WALL));
        assert_eq!(map.get(2, 1), Some(FLOOR));
        assert_eq!(map.get(1, 1), Some(FLOOR));
    }

    #[test]
    fn scattered_is_deterministic_and_sparse() {
        let a = TileMap::scattered(20, 15, FLOOR, WALL, 42);
        let b = TileMap::scattered(20, 15, FLOOR, WALL, 42);
        assert_eq!(a, b);
        let walls = a.cells().filter(|&(_, _, t)| t == WALL).count();
        assert!(walls > 0 && walls < 150, "expected a sparse scatter, got {walls} walls");
    }

    #[test]
    fn set_and_get_ignore_out_of_bounds() {
        let mut map = TileMap::filled(3, 3, FLOOR);
        assert!(!map.set(3, 0, WALL));
        assert!(!map.set(-1, 0, WALL));
        assert!(map.set(2, 2, WALL));
        assert_eq!(map.get(2, 2), Some(WALL));
        assert_eq!(map.get(0, 3), None);
    }

    #[test]
    fn validate_reports_first_unknown_cell() {
        let map = TileMap::from_rows(vec![vec![0, 0], vec![0, 9]]).unwrap();
        let err = map.validate(&TileRegistry::default()).unwrap_err();
        assert_eq!(err, GridError::UnknownTile { id: 9, x: 1, y: 1 });
    }
}
