// ── Tile registry ────────────────────────────────────────────────────────────
//
// Static table of tile types. The integers stored in a `TileMap` are indices
// into this table; every lookup treats an unknown index as a solid tile so a
// bad id can block the player but never panic.

use crate::engine::Color;

/// Index into a [`TileRegistry`], as stored in every grid cell.
pub type TileId = u16;

/// One named tile category.
#[derive(Clone, Debug, PartialEq)]
pub struct TileType {
    pub name: &'static str,
    /// Sprite name looked up in the texture atlas (PNG file stem).
    pub texture: &'static str,
    /// Blocks player movement.
    pub collidable: bool,
    /// Stepping onto this tile switches to the linked map.
    pub transition: bool,
    /// Flat fill used when `texture` was not loaded.
    pub color: Color,
}

impl TileType {
    const fn new(name: &'static str, texture: &'static str, color: Color) -> Self {
        Self { name, texture, collidable: false, transition: false, color }
    }

    const fn solid(mut self) -> Self {
        self.collidable = true;
        self
    }

    const fn portal(mut self) -> Self {
        self.transition = true;
        self
    }
}

pub const FLOOR: TileId = 0;
pub const WALL: TileId = 1;
pub const PORTAL: TileId = 2;
pub const WATER: TileId = 3;
pub const LAVA: TileId = 4;

const DEFAULT_TYPES: [TileType; 5] = [
    TileType::new("floor", "floor", Color([0.8, 0.9, 0.8, 1.0])),
    TileType::new("wall", "wall", Color([0.3, 0.3, 0.3, 1.0])).solid(),
    TileType::new("portal", "portal", Color([0.2, 0.6, 0.95, 1.0])).portal(),
    TileType::new("water", "water", Color([0.15, 0.35, 0.8, 1.0])).solid(),
    TileType::new("lava", "lava", Color([0.9, 0.3, 0.05, 1.0])).solid(),
];

/// Ordered list of tile types, immutable for the session.
#[derive(Clone, Debug)]
pub struct TileRegistry {
    types: Vec<TileType>,
}

impl TileRegistry {
    pub fn new(types: Vec<TileType>) -> Self {
        Self { types }
    }

    pub fn get(&self, id: TileId) -> Option<&TileType> {
        self.types.get(id as usize)
    }

    pub fn contains(&self, id: TileId) -> bool {
        (id as usize) < self.types.len()
    }

    pub fn is_collidable(&self, id: TileId) -> bool {
        self.get(id).map_or(true, |t| t.collidable)
    }

    pub fn is_transition(&self, id: TileId) -> bool {
        self.get(id).is_some_and(|t| t.transition)
    }

    /// Id of the first tile type called `name`.
    pub fn find(&self, name: &str) -> Option<TileId> {
        self.types.iter().position(|t| t.name == name).map(|i| i as TileId)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileId, &TileType)> {
        self.types.iter().enumerate().map(|(i, t)| (i as TileId, t))
    }
}

impl Default for TileRegistry {
    /// floor, wall, portal, water, lava, in that index order.
    fn default() -> Self {
        Self::new(DEFAULT_TYPES.to_vec())
    }
}
