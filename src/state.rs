use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use crate::geometry::TilePos;
use crate::grid::TileMap;
use crate::maps::MapSnapshot;
use crate::tiles::FLOOR;

/// Object tags offered by the drag-and-drop palette.
pub const OBJECT_KINDS: [&str; 4] = ["Tree", "Rock", "House", "NPC"];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub x: i32,
    pub y: i32,
}

impl Player {
    pub fn pos(&self) -> TilePos {
        TilePos::new(self.x, self.y)
    }
}

/// A decorative object placed on a cell. Several objects may share a cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: i32,
    pub y: i32,
}

/// Everything the frame loop and the input handlers read and write.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub keys_pressed: HashSet<KeyCode>,
    pub tile_map: TileMap,
    pub objects: Vec<MapObject>,
    pub hover_tile: Option<TilePos>,
}

impl GameState {
    pub fn new(tile_map: TileMap, player: Player) -> Self {
        Self {
            player,
            keys_pressed: HashSet::new(),
            tile_map,
            objects: Vec::new(),
            hover_tile: None,
        }
    }

    /// The spatial fields as a map snapshot.
    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            tile_map: self.tile_map.clone(),
            objects: self.objects.clone(),
            player: self.player,
        }
    }

    /// Replace the spatial fields with `snapshot`. Held keys and the hover
    /// cell are left alone.
    pub fn apply_snapshot(&mut self, snapshot: &MapSnapshot) {
        self.tile_map = snapshot.tile_map.clone();
        self.objects = snapshot.objects.clone();
        self.player = snapshot.player;
    }

    pub fn add_object(&mut self, kind: &str, pos: TilePos) {
        self.objects.push(MapObject { kind: kind.to_string(), x: pos.x, y: pos.y });
    }

    pub fn objects_at(&self, pos: TilePos) -> impl Iterator<Item = &MapObject> {
        self.objects.iter().filter(move |o| o.x == pos.x && o.y == pos.y)
    }
}

impl Default for GameState {
    /// 20×15 floor with the player at (2, 2).
    fn default() -> Self {
        Self::new(TileMap::filled(20, 15, FLOOR), Player { x: 2, y: 2 })
    }
}
