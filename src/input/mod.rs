use std::collections::HashSet;

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

use crate::geometry::TilePos;
use crate::renderer::utils::CanvasLayout;
use crate::state::GameState;
use crate::tiles::TileId;

/// Raw hardware state for a single frame, read by the UI widgets.
#[derive(Debug, Default)]
pub struct InputState {
    pub keys_held: HashSet<KeyCode>,
    pub keys_pressed: HashSet<KeyCode>,
    pub keys_released: HashSet<KeyCode>,

    pub mouse_pos: [f32; 2],
    pub mouse_held: HashSet<MouseButton>,
    pub mouse_pressed: HashSet<MouseButton>,
    pub mouse_released: HashSet<MouseButton>,

    pub chars_typed: Vec<char>,
    /// Set to true if a UI element has consumed keyboard input this frame.
    pub key_consumed: bool,
    /// Set to true if a UI element has consumed mouse input this frame.
    pub mouse_consumed: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_frame_state(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
        self.chars_typed.clear();
        self.key_consumed = false;
        self.mouse_consumed = false;
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool { self.keys_pressed.contains(&key) }

    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool { self.mouse_pressed.contains(&button) }
    pub fn is_mouse_released(&self, button: MouseButton) -> bool { self.mouse_released.contains(&button) }

    /// Returns true if the mouse is currently within the given pixel bounds.
    pub fn is_mouse_over(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        let [mx, my] = self.mouse_pos;
        mx >= x && mx < x + w && my >= y && my < y + h
    }

    /// Returns true if the mouse was clicked (pressed) within the given bounds this frame.
    pub fn was_clicked(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        !self.mouse_consumed && self.is_mouse_pressed(MouseButton::Left) && self.is_mouse_over(x, y, w, h)
    }
}

// ── Typed editor events ───────────────────────────────────────────────────────

/// Pointer positions are in window pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f32, y: f32 },
    PointerLeft,
    PointerClicked { x: f32, y: f32 },
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// An object kind released from the palette.
    Dropped { kind: String, x: f32, y: f32 },
}

/// The cell under `(px, py)`, or `None` outside the grid.
pub fn tile_at(px: f32, py: f32, layout: &CanvasLayout) -> Option<TilePos> {
    if layout.tile_size <= 0.0 {
        return None;
    }
    let tx = ((px - layout.canvas.x) / layout.tile_size).floor();
    let ty = ((py - layout.canvas.y) / layout.tile_size).floor();
    let inside = tx >= 0.0 && ty >= 0.0 && tx < layout.grid_width as f32 && ty < layout.grid_height as f32;
    inside.then(|| TilePos::new(tx as i32, ty as i32))
}

/// Track the hovered cell. Returns true when `hover_tile` changed; a pointer
/// off the grid clears it.
pub fn pointer_moved(state: &mut GameState, px: f32, py: f32, layout: &CanvasLayout) -> bool {
    let hover = tile_at(px, py, layout);
    if hover == state.hover_tile {
        return false;
    }
    state.hover_tile = hover;
    tracing::debug!(?hover, "hover changed");
    true
}

pub fn pointer_left(state: &mut GameState) -> bool {
    state.hover_tile.take().is_some()
}

/// The clicked cell and its tile id, for the inspector.
pub fn pointer_clicked(state: &GameState, px: f32, py: f32, layout: &CanvasLayout) -> Option<(TilePos, TileId)> {
    let pos = tile_at(px, py, layout)?;
    let id = state.tile_map.get(pos.x, pos.y)?;
    Some((pos, id))
}

/// Place one `kind` object at the cell under the pointer.
///
/// A pointer outside the canvas rectangle adds nothing. On the far edge of
/// the canvas the computed cell is clamped back into the grid.
pub fn drop_object(state: &mut GameState, kind: &str, px: f32, py: f32, layout: &CanvasLayout) -> Option<TilePos> {
    if layout.tile_size <= 0.0 || !layout.canvas.contains_inclusive(px, py) {
        tracing::debug!(kind, x = px, y = py, "drop outside the canvas ignored");
        return None;
    }
    let max_x = state.tile_map.width().saturating_sub(1) as i32;
    let max_y = state.tile_map.height().saturating_sub(1) as i32;
    let tx = ((px - layout.canvas.x) / layout.tile_size).floor() as i32;
    let ty = ((py - layout.canvas.y) / layout.tile_size).floor() as i32;
    let pos = TilePos::new(tx.clamp(0, max_x), ty.clamp(0, max_y));

    state.add_object(kind, pos);
    tracing::debug!(kind, x = pos.x, y = pos.y, "object dropped");
    Some(pos)
}

// ── Drag and drop ─────────────────────────────────────────────────────────────

/// An object kind carried from the palette until the pointer is released.
#[derive(Debug, Default)]
pub struct DragState {
    carrying: Option<String>,
}

impl DragState {
    pub fn begin(&mut self, kind: &str) {
        self.carrying = Some(kind.to_string());
    }

    pub fn carrying(&self) -> Option<&str> {
        self.carrying.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.carrying.is_some()
    }

    /// End the drag, yielding the drop event at the release point.
    pub fn release(&mut self, x: f32, y: f32) -> Option<InputEvent> {
        self.carrying.take().map(|kind| InputEvent::Dropped { kind, x, y })
    }

    pub fn cancel(&mut self) {
        self.carrying = None;
    }
}
