pub mod format;
pub mod storage;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{GridError, TileMap};
use crate::state::{GameState, MapObject, Player};
use crate::tiles::{FLOOR, TileRegistry};

pub use format::PersistError;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

/// Storage key holding every named map.
pub const MAPS_KEY: &str = "gameMaps";
/// Storage key holding the single-slot session save.
pub const SESSION_KEY: &str = "gameState";

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map {0:?} not found")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// The spatial part of a game state, saved per map name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    #[serde(rename = "tileMap")]
    pub tile_map: TileMap,
    #[serde(default)]
    pub objects: Vec<MapObject>,
    pub player: Player,
}

impl MapSnapshot {
    /// An all-floor map with the player in the top-left corner.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            tile_map: TileMap::filled(width, height, FLOOR),
            objects: Vec::new(),
            player: Player { x: 0, y: 0 },
        }
    }

    /// Every cell must be a known tile and the player must stand on the grid.
    pub fn validate(&self, registry: &TileRegistry) -> Result<(), GridError> {
        self.tile_map.validate(registry)?;
        let Player { x, y } = self.player;
        if !self.tile_map.is_valid_position(x, y) {
            return Err(GridError::PlayerOutOfBounds {
                x,
                y,
                width: self.tile_map.width(),
                height: self.tile_map.height(),
            });
        }
        Ok(())
    }
}

/// Named collection of map snapshots, the record of which one is live, and
/// the transition pairing between maps.
pub struct MapManager {
    maps: BTreeMap<String, MapSnapshot>,
    links: BTreeMap<String, String>,
    current: Option<String>,
    storage: Box<dyn Storage>,
}

impl MapManager {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { maps: BTreeMap::new(), links: BTreeMap::new(), current: None, storage }
    }

    /// Insert or overwrite `name`. The snapshot is stored as given.
    pub fn add_map(&mut self, name: impl Into<String>, snapshot: MapSnapshot) {
        self.maps.insert(name.into(), snapshot);
    }

    /// Copy the snapshot called `name` into `state` and make it current.
    /// A missing name leaves both `state` and the current map untouched.
    pub fn load_map(&mut self, name: &str, state: &mut GameState) -> Result<(), MapError> {
        let Some(snapshot) = self.maps.get(name) else {
            tracing::warn!(map = name, "map not found");
            return Err(MapError::NotFound(name.to_string()));
        };
        state.apply_snapshot(snapshot);
        self.current = Some(name.to_string());
        tracing::info!(
            map = name,
            width = snapshot.tile_map.width(),
            height = snapshot.tile_map.height(),
            objects = snapshot.objects.len(),
            "loaded map"
        );
        Ok(())
    }

    /// Store `state` back into the current map and persist the collection.
    /// Returns `Ok(false)` without writing anything when no map is current.
    pub fn save_current_map(&mut self, state: &GameState) -> Result<bool, MapError> {
        let Some(name) = self.current.clone() else {
            return Ok(false);
        };
        self.maps.insert(name.clone(), state.snapshot());
        self.persist()?;
        tracing::info!(map = %name, total = self.maps.len(), "saved map collection");
        Ok(true)
    }

    /// Write the whole collection under [`MAPS_KEY`].
    pub fn persist(&mut self) -> Result<(), MapError> {
        let text = format::encode_maps(&self.maps, &self.links)?;
        self.storage.set(MAPS_KEY, &text)?;
        Ok(())
    }

    /// Replace the in-memory collection with the stored one.
    ///
    /// `Ok(false)` when nothing is stored. Unreadable or invalid data is an
    /// error and leaves the collection as it was.
    pub fn load_saved_maps(&mut self, registry: &TileRegistry) -> Result<bool, MapError> {
        let Some(text) = self.storage.get(MAPS_KEY)? else {
            tracing::debug!("no saved maps");
            return Ok(false);
        };
        let saved = format::decode_maps(&text, registry)?;
        tracing::info!(maps = saved.maps.len(), links = saved.links.len(), "loaded saved maps");
        self.maps = saved.maps;
        self.links = saved.links;
        Ok(true)
    }

    /// Make `a` and `b` each other's transition target.
    pub fn link_pair(&mut self, a: &str, b: &str) {
        self.links.insert(a.to_string(), b.to_string());
        self.links.insert(b.to_string(), a.to_string());
    }

    /// The map a transition tile on `name` leads to.
    pub fn linked_map(&self, name: &str) -> Option<&str> {
        self.links.get(name).map(String::as_str)
    }

    /// Save `state` to the single-slot session key.
    pub fn save_session(&mut self, state: &GameState) -> Result<(), MapError> {
        let text = format::encode_session(&state.snapshot())?;
        self.storage.set(SESSION_KEY, &text)?;
        tracing::info!("saved session");
        Ok(())
    }

    /// Restore the single-slot session save into `state`.
    /// `Ok(false)` when there is none; `state` is untouched on any error.
    pub fn load_session(&mut self, state: &mut GameState, registry: &TileRegistry) -> Result<bool, MapError> {
        let Some(text) = self.storage.get(SESSION_KEY)? else {
            return Ok(false);
        };
        let snapshot = format::decode_session(&text, registry)?;
        state.apply_snapshot(&snapshot);
        tracing::info!("restored session");
        Ok(true)
    }

    pub fn maps(&self) -> &BTreeMap<String, MapSnapshot> {
        &self.maps
    }

    pub fn get(&self, name: &str) -> Option<&MapSnapshot> {
        self.maps.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.maps.contains_key(name)
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
