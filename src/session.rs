// ── Editor session ───────────────────────────────────────────────────────────
//
// Owns the game state together with everything that mutates it: the map
// manager, the tile registry and the canvas layout. The engine feeds it typed
// input events and calls `tick` once per fixed update.

use std::collections::HashSet;

use winit::keyboard::KeyCode;

use crate::geometry::{Direction, TilePos};
use crate::input::{self, InputEvent};
use crate::maps::{MapError, MapManager, MapSnapshot};
use crate::grid::TileMap;
use crate::renderer::utils::{CanvasLayout, Viewport, fit_canvas};
use crate::state::{GameState, Player};
use crate::tiles::{FLOOR, PORTAL, TileId, TileRegistry, WALL};
use crate::update::{self, StepOutcome};

/// What an input event did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    Ignored,
    HoverChanged,
    Inspected { pos: TilePos, tile: TileId },
    ObjectPlaced { at: TilePos },
    KeyHeld,
    KeyReleased,
}

/// Name of the map linked to the start map by [`Session::start_new_game`].
pub const SECOND_MAP: &str = "secondMap";

pub struct Session {
    pub state: GameState,
    pub maps: MapManager,
    pub registry: TileRegistry,
    layout: CanvasLayout,
    container: Viewport,
    inspected: Option<TilePos>,
    /// Direction keys pressed since the last tick.
    fresh_keys: HashSet<KeyCode>,
    /// Releases of fresh keys, applied after the next tick so a quick tap
    /// still moves one tile.
    late_releases: HashSet<KeyCode>,
}

impl Session {
    pub fn new(maps: MapManager, registry: TileRegistry) -> Self {
        let mut session = Self {
            state: GameState::default(),
            maps,
            registry,
            layout: CanvasLayout::default(),
            container: Viewport::default(),
            inspected: None,
            fresh_keys: HashSet::new(),
            late_releases: HashSet::new(),
        };
        session.recompute_layout();
        session
    }

    // ── Layout ──────────────────────────────────────────────────────────────

    pub fn layout(&self) -> &CanvasLayout {
        &self.layout
    }

    /// Set the area the canvas may occupy and refit the grid into it.
    pub fn set_container(&mut self, container: Viewport) {
        self.container = container;
        self.recompute_layout();
    }

    pub fn recompute_layout(&mut self) {
        let map = &self.state.tile_map;
        self.layout = fit_canvas(self.container, map.width(), map.height());
    }

    // ── Maps ────────────────────────────────────────────────────────────────

    /// Switch to `name`. On failure the live state is unchanged.
    pub fn load_map(&mut self, name: &str) -> Result<(), MapError> {
        self.maps.load_map(name, &mut self.state)?;
        self.state.hover_tile = None;
        self.inspected = None;
        self.recompute_layout();
        Ok(())
    }

    /// Add an all-floor `width` × `height` map. Returns false if `name` is taken.
    pub fn new_map(&mut self, name: &str, width: u32, height: u32) -> bool {
        if name.is_empty() || self.maps.contains(name) {
            return false;
        }
        self.maps.add_map(name, MapSnapshot::blank(width, height));
        tracing::info!(map = name, width, height, "created map");
        true
    }

    /// Build the linked starting pair at `width` × `height` (at least 3×3)
    /// and play the first one.
    ///
    /// `start` is walled in with a portal on its right edge; [`SECOND_MAP`]
    /// has scattered walls and a portal on its left edge.
    pub fn start_new_game(&mut self, start: &str, width: u32, height: u32) -> Result<(), MapError> {
        let (w, h) = (width.max(3), height.max(3));
        let mid = (h / 2) as i32;

        let mut first = MapSnapshot {
            tile_map: TileMap::bordered(w, h, FLOOR, WALL),
            objects: Vec::new(),
            player: Player { x: 1, y: 1 },
        };
        first.tile_map.set(w as i32 - 1, mid, PORTAL);

        let mut second = MapSnapshot {
            tile_map: TileMap::scattered(w, h, FLOOR, WALL, u64::from(w) * 31 + u64::from(h)),
            objects: Vec::new(),
            player: Player { x: 1, y: mid },
        };
        second.tile_map.set(0, mid, PORTAL);
        second.tile_map.set(1, mid, FLOOR);

        self.maps.add_map(start, first);
        self.maps.add_map(SECOND_MAP, second);
        self.maps.link_pair(start, SECOND_MAP);
        tracing::info!(start, second = SECOND_MAP, width = w, height = h, "built starting maps");
        self.load_map(start)?;
        self.maps.persist()
    }

    pub fn save_current_map(&mut self) -> Result<bool, MapError> {
        self.maps.save_current_map(&self.state)
    }

    pub fn load_saved_maps(&mut self) -> Result<bool, MapError> {
        self.maps.load_saved_maps(&self.registry)
    }

    pub fn save_project(&mut self) -> Result<(), MapError> {
        self.maps.save_session(&self.state)
    }

    pub fn load_project(&mut self) -> Result<bool, MapError> {
        let restored = self.maps.load_session(&mut self.state, &self.registry)?;
        if restored {
            self.inspected = None;
            self.recompute_layout();
        }
        Ok(restored)
    }

    // ── Editing ─────────────────────────────────────────────────────────────

    /// The cell last clicked, if it is still on the grid.
    pub fn inspected(&self) -> Option<(TilePos, TileId)> {
        let pos = self.inspected?;
        let id = self.state.tile_map.get(pos.x, pos.y)?;
        Some((pos, id))
    }

    /// Repaint one cell. Unknown ids and out-of-bounds cells are refused.
    pub fn set_tile(&mut self, pos: TilePos, id: TileId) -> bool {
        if !self.registry.contains(id) {
            tracing::warn!(id, "refusing unknown tile id");
            return false;
        }
        let changed = self.state.tile_map.set(pos.x, pos.y, id);
        if changed {
            tracing::debug!(x = pos.x, y = pos.y, id, "tile changed");
        }
        changed
    }

    // ── Events and the update step ──────────────────────────────────────────

    pub fn handle_event(&mut self, event: InputEvent) -> InputOutcome {
        match event {
            InputEvent::PointerMoved { x, y } => {
                if input::pointer_moved(&mut self.state, x, y, &self.layout) {
                    InputOutcome::HoverChanged
                } else {
                    InputOutcome::Ignored
                }
            }
            InputEvent::PointerLeft => {
                if input::pointer_left(&mut self.state) {
                    InputOutcome::HoverChanged
                } else {
                    InputOutcome::Ignored
                }
            }
            InputEvent::PointerClicked { x, y } => match input::pointer_clicked(&self.state, x, y, &self.layout) {
                Some((pos, tile)) => {
                    self.inspected = Some(pos);
                    InputOutcome::Inspected { pos, tile }
                }
                None => InputOutcome::Ignored,
            },
            InputEvent::KeyDown(key) => {
                if Direction::from_key(key).is_none() {
                    return InputOutcome::Ignored;
                }
                self.state.keys_pressed.insert(key);
                self.fresh_keys.insert(key);
                self.late_releases.remove(&key);
                InputOutcome::KeyHeld
            }
            InputEvent::KeyUp(key) => {
                if self.fresh_keys.contains(&key) {
                    self.late_releases.insert(key);
                    InputOutcome::KeyReleased
                } else if self.state.keys_pressed.remove(&key) {
                    InputOutcome::KeyReleased
                } else {
                    InputOutcome::Ignored
                }
            }
            InputEvent::Dropped { kind, x, y } => {
                match input::drop_object(&mut self.state, &kind, x, y, &self.layout) {
                    Some(at) => InputOutcome::ObjectPlaced { at },
                    None => InputOutcome::Ignored,
                }
            }
        }
    }

    /// Run one update step; a transition saves this map and enters the
    /// linked one.
    pub fn tick(&mut self) -> StepOutcome {
        let outcome = update::step(&mut self.state, &self.registry);
        for key in self.late_releases.drain() {
            self.state.keys_pressed.remove(&key);
        }
        self.fresh_keys.clear();
        if let StepOutcome::Transition { at } = outcome {
            self.follow_transition(at);
        }
        outcome
    }

    fn follow_transition(&mut self, at: TilePos) {
        let Some(from) = self.maps.current().map(str::to_owned) else {
            tracing::warn!(x = at.x, y = at.y, "transition tile with no current map");
            return;
        };
        if let Err(e) = self.save_current_map() {
            tracing::error!(map = %from, error = %e, "could not save map before switching");
        }
        let Some(to) = self.maps.linked_map(&from).map(str::to_owned) else {
            tracing::warn!(map = %from, "transition tile has no linked map");
            return;
        };
        match self.load_map(&to) {
            Ok(()) => tracing::info!(from = %from, to = %to, "switched map"),
            Err(e) => tracing::warn!(from = %from, to = %to, error = %e, "map switch failed"),
        }
    }
}
