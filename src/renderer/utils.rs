// ── Canvas layout math ────────────────────────────────────────────────────────
//
// Fits the tile grid inside the area left free by the panels. Every cell is a
// square of `tile_size` pixels; the canvas is the grid scaled by that size,
// rounded down to whole pixels and centred in its container on both axes.

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in physical pixels.
///
/// `x`, `y` is the top-left origin and `width`, `height` the extent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// True for points inside the rectangle, far edges included.
    pub fn contains_inclusive(&self, px: f32, py: f32) -> bool {
        px >= self.x && py >= self.y && px <= self.x + self.width && py <= self.y + self.height
    }
}

// ── CanvasLayout ──────────────────────────────────────────────────────────────

/// Grid dimensions used when a map reports a zero width or height.
pub const FALLBACK_GRID: (u32, u32) = (20, 15);

/// Where the grid sits inside its container and how large a cell is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasLayout {
    /// The canvas rectangle in container coordinates.
    pub canvas: Viewport,
    /// Side of one square cell in pixels. May be fractional.
    pub tile_size: f32,
    pub grid_width: u32,
    pub grid_height: u32,
}

impl Default for CanvasLayout {
    fn default() -> Self {
        Self {
            canvas: Viewport::default(),
            tile_size: 0.0,
            grid_width: FALLBACK_GRID.0,
            grid_height: FALLBACK_GRID.1,
        }
    }
}

impl CanvasLayout {
    /// Screen rectangle of cell `(x, y)`, clipped to the canvas so the last
    /// row and column never spill past the rounded-down edge.
    pub fn cell_rect(&self, x: u32, y: u32) -> Viewport {
        let c = &self.canvas;
        let left = c.x + x as f32 * self.tile_size;
        let top = c.y + y as f32 * self.tile_size;
        let right = (left + self.tile_size).min(c.x + c.width);
        let bottom = (top + self.tile_size).min(c.y + c.height);
        Viewport {
            x: left,
            y: top,
            width: (right - left).max(0.0),
            height: (bottom - top).max(0.0),
        }
    }
}

// ── fit_canvas ────────────────────────────────────────────────────────────────

/// Lay out a `grid_w` × `grid_h` grid inside `container`.
///
/// ```text
/// tile_size = min(container.width / grid_w, container.height / grid_h)
/// canvas    = floor(tile_size * grid)          per axis
/// origin    = container + (container - canvas) / 2
/// ```
///
/// A zero grid dimension falls back to [`FALLBACK_GRID`]. An empty container
/// yields a zero-sized canvas at the container's centre.
pub fn fit_canvas(container: Viewport, grid_w: u32, grid_h: u32) -> CanvasLayout {
    let (gw, gh) = if grid_w == 0 || grid_h == 0 { FALLBACK_GRID } else { (grid_w, grid_h) };

    let cw = container.width.max(0.0);
    let ch = container.height.max(0.0);
    let tile_size = (cw / gw as f32).min(ch / gh as f32);

    let width = (tile_size * gw as f32).floor();
    let height = (tile_size * gh as f32).floor();
    let x = container.x + (cw - width) / 2.0;
    let y = container.y + (ch - height) / 2.0;

    CanvasLayout {
        canvas: Viewport { x, y, width, height },
        tile_size,
        grid_width: gw,
        grid_height: gh,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
