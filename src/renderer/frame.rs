// ── World quads ──────────────────────────────────────────────────────────────
//
// Turns the game state into one instance list: every tile, then every object,
// then the player, so later entries draw on top of earlier ones.

use crate::engine::Color;
use crate::renderer::atlas::SpriteSheet;
use crate::renderer::pipeline::QuadInstance;
use crate::renderer::utils::{CanvasLayout, Viewport};
use crate::state::GameState;
use crate::tiles::TileRegistry;

pub const HOVER: Color = Color([1.0, 0.95, 0.55, 1.0]);
pub const OBJECT: Color = Color([0.5, 0.2, 0.7, 1.0]);
pub const PLAYER: Color = Color([0.85, 0.2, 0.2, 1.0]);
pub const BACKGROUND: Color = Color([0.15, 0.15, 0.15, 1.0]);
/// Fill for ids missing from the registry.
pub const UNKNOWN_TILE: Color = Color::MAGENTA;

const OBJECT_INSET: f32 = 0.15;
const PLAYER_INSET: f32 = 0.1;

/// Sprite name for an object kind: `"Tree"` → `"tree"`.
pub fn object_sprite_name(kind: &str) -> String {
    kind.to_ascii_lowercase()
}

fn inset(rect: Viewport, frac: f32) -> Viewport {
    let dx = rect.width * frac;
    let dy = rect.height * frac;
    Viewport::new(rect.x + dx, rect.y + dy, rect.width - 2.0 * dx, rect.height - 2.0 * dy)
}

/// Tile quads use the tile type's texture when it was loaded and its flat
/// colour otherwise. The hovered cell is always drawn flat in [`HOVER`].
pub fn build_world(
    state: &GameState,
    registry: &TileRegistry,
    layout: &CanvasLayout,
    sheet: &SpriteSheet,
) -> Vec<QuadInstance> {
    let white = sheet.white();
    let mut out = Vec::with_capacity(state.tile_map.width() as usize * state.tile_map.height() as usize + state.objects.len() + 1);

    for (x, y, id) in state.tile_map.cells() {
        let rect = layout.cell_rect(x, y);
        let hovered = state.hover_tile.is_some_and(|h| h.x == x as i32 && h.y == y as i32);
        if hovered {
            out.push(QuadInstance::solid(rect, white, HOVER));
            continue;
        }
        let quad = match registry.get(id) {
            Some(tile) => match sheet.get(tile.texture) {
                Some(sprite) => QuadInstance::sprite(rect, sprite, Color::WHITE),
                None => QuadInstance::solid(rect, white, tile.color),
            },
            None => QuadInstance::solid(rect, white, UNKNOWN_TILE),
        };
        out.push(quad);
    }

    let on_grid = |x: i32, y: i32| state.tile_map.is_valid_position(x, y);

    for obj in &state.objects {
        if !on_grid(obj.x, obj.y) {
            continue;
        }
        let rect = inset(layout.cell_rect(obj.x as u32, obj.y as u32), OBJECT_INSET);
        let quad = match sheet.get(&object_sprite_name(&obj.kind)) {
            Some(sprite) => QuadInstance::sprite(rect, sprite, Color::WHITE),
            None => QuadInstance::solid(rect, white, OBJECT),
        };
        out.push(quad);
    }

    let p = state.player;
    if on_grid(p.x, p.y) {
        let rect = inset(layout.cell_rect(p.x as u32, p.y as u32), PLAYER_INSET);
        let quad = match sheet.get("player") {
            Some(sprite) => QuadInstance::sprite(rect, sprite, Color::WHITE),
            None => QuadInstance::solid(rect, white, PLAYER),
        };
        out.push(quad);
    }

    out
}
