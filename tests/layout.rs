use gridkeeper::renderer::utils::{FALLBACK_GRID, Viewport, fit_canvas};

#[test]
fn tile_size_is_limited_by_the_tighter_axis() {
    let tall = fit_canvas(Viewport::new(0.0, 0.0, 200.0, 1000.0), 10, 10);
    assert_eq!(tall.tile_size, 20.0);
    let wide = fit_canvas(Viewport::new(0.0, 0.0, 1000.0, 200.0), 10, 10);
    assert_eq!(wide.tile_size, 20.0);
}

#[test]
fn canvas_is_centred_in_the_container() {
    let l = fit_canvas(Viewport::new(0.0, 0.0, 400.0, 100.0), 4, 2);
    assert_eq!(l.tile_size, 50.0);
    assert_eq!(l.canvas, Viewport::new(100.0, 0.0, 200.0, 100.0));
    assert_eq!(l.cell_rect(1, 1), Viewport::new(150.0, 50.0, 50.0, 50.0));
}

#[test]
fn cells_tile_the_canvas_without_gaps() {
    let l = fit_canvas(Viewport::new(0.0, 0.0, 320.0, 240.0), 8, 6);
    assert_eq!(l.tile_size, 40.0);
    let last = l.cell_rect(7, 5);
    assert_eq!(last.x + last.width, l.canvas.x + l.canvas.width);
    assert_eq!(last.y + last.height, l.canvas.y + l.canvas.height);
}

#[test]
fn degenerate_grid_uses_fallback_dimensions() {
    let l = fit_canvas(Viewport::new(0.0, 0.0, 400.0, 300.0), 0, 7);
    assert_eq!((l.grid_width, l.grid_height), FALLBACK_GRID);
    assert_eq!(l.tile_size, 20.0);
}
