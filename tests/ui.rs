use gridkeeper::engine::Color;
use gridkeeper::input::{InputState, MouseButton};
use gridkeeper::maps::{MapManager, MapSnapshot, MemoryStorage};
use gridkeeper::renderer::atlas::{AtlasBuilder, SpriteSheet};
use gridkeeper::session::Session;
use gridkeeper::tiles::TileRegistry;
use gridkeeper::ui::panels::{DimensionForm, InspectorPanel, MapPanel, PanelAction};
use gridkeeper::ui::{Ui, font, rect_contains, word_wrap};

// ── word_wrap ────────────────────────────────────────────────────────────────

#[test]
fn wrap_empty_string_returns_no_lines() {
    assert!(word_wrap("", 10).is_empty());
}

#[test]
fn wrap_blank_whitespace_returns_no_lines() {
    assert!(word_wrap("   ", 10).is_empty());
}

#[test]
fn wrap_single_word_fits() {
    assert_eq!(word_wrap("hello", 10), vec!["hello"]);
}

#[test]
fn wrap_two_words_fit_on_one_line() {
    assert_eq!(word_wrap("hello world", 12), vec!["hello world"]);
}

#[test]
fn wrap_two_words_break_at_boundary() {
    assert_eq!(word_wrap("hello world", 8), vec!["hello", "world"]);
}

#[test]
fn wrap_exactly_at_limit_keeps_on_one_line() {
    // "ab cd" = 5 chars, limit = 5 → fits
    assert_eq!(word_wrap("ab cd", 5), vec!["ab cd"]);
}

#[test]
fn wrap_one_over_limit_breaks() {
    // "ab cd" = 5 chars, limit = 4 → must break
    let lines = word_wrap("ab cd", 4);
    assert_eq!(lines, vec!["ab", "cd"]);
}

#[test]
fn wrap_long_paragraph_no_line_exceeds_max_cols() {
    let text = "the quick brown fox jumps over the lazy dog and then runs away";
    let max_cols = 15;
    for line in word_wrap(text, max_cols) {
        assert!(line.len() <= max_cols, "line too long: '{line}'");
    }
}

#[test]
fn wrap_long_paragraph_preserves_all_words() {
    let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
    let lines = word_wrap(text, 12);
    let rebuilt = lines.join(" ");
    assert_eq!(rebuilt, text);
}

#[test]
fn wrap_single_word_longer_than_max_gets_split() {
    let lines = word_wrap("abcdefghij", 4);
    assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
}

#[test]
fn wrap_zero_max_cols_returns_empty() {
    assert!(word_wrap("anything", 0).is_empty());
}

#[test]
fn wrap_multiple_spaces_treated_as_one_separator() {
    // split_whitespace collapses runs of whitespace
    let lines = word_wrap("a   b   c", 10);
    assert_eq!(lines, vec!["a b c"]);
}

// ── rect_contains ────────────────────────────────────────────────────────────

#[test]
fn rect_contains_center_point() {
    assert!(rect_contains(0.0, 0.0, 100.0, 100.0, 50.0, 50.0));
}

#[test]
fn rect_contains_left_edge_inclusive() {
    assert!(rect_contains(10.0, 10.0, 100.0, 100.0, 10.0, 50.0));
}

#[test]
fn rect_contains_top_edge_inclusive() {
    assert!(rect_contains(10.0, 10.0, 100.0, 100.0, 50.0, 10.0));
}

#[test]
fn rect_contains_right_edge_exclusive() {
    assert!(!rect_contains(10.0, 10.0, 100.0, 100.0, 110.0, 50.0));
}

#[test]
fn rect_contains_bottom_edge_exclusive() {
    assert!(!rect_contains(10.0, 10.0, 100.0, 100.0, 50.0, 110.0));
}

#[test]
fn rect_contains_above_rect_returns_false() {
    assert!(!rect_contains(0.0, 50.0, 100.0, 100.0, 50.0, 10.0));
}

#[test]
fn rect_contains_left_of_rect_returns_false() {
    assert!(!rect_contains(50.0, 0.0, 100.0, 100.0, 10.0, 50.0));
}

#[test]
fn rect_contains_zero_size_rect_never_contains() {
    assert!(!rect_contains(10.0, 10.0, 0.0, 0.0, 10.0, 10.0));
}

// ── Ui text ──────────────────────────────────────────────────────────────────

fn sheet() -> SpriteSheet {
    let mut b = AtlasBuilder::new();
    font::add_glyphs(&mut b);
    b.build().sprites
}

#[test]
fn text_emits_one_quad_per_visible_glyph() {
    let mut ui = Ui::new(sheet(), 1.0);
    ui.ui_text(0.0, 0.0, "Ab c", Color::WHITE, Color::TRANSPARENT);
    assert_eq!(ui.quads.len(), 3);
    ui.clear();
    ui.ui_text(0.0, 0.0, "hi", Color::WHITE, Color::BLACK);
    assert_eq!(ui.take_quads().len(), 3);
    assert!(ui.quads.is_empty());
}

#[test]
fn wrapped_text_respects_height() {
    let mut ui = Ui::new(sheet(), 1.0);
    let used = ui.ui_text_wrapped(0.0, 0.0, 30.0, 25.0, "one two three four", Color::WHITE);
    assert_eq!(used, ui.char_h() * 2.0);
}

// ── Panels ───────────────────────────────────────────────────────────────────

fn session() -> Session {
    let mut s = Session::new(MapManager::new(Box::new(MemoryStorage::new())), TileRegistry::default());
    s.maps.add_map("startMap", MapSnapshot::blank(4, 4));
    s
}

fn click_at(x: f32, y: f32) -> InputState {
    let mut input = InputState::new();
    input.mouse_pos = [x, y];
    input.mouse_pressed.insert(MouseButton::Left);
    input.mouse_held.insert(MouseButton::Left);
    input
}

#[test]
fn closed_map_panel_draws_nothing() {
    let mut ui = Ui::new(sheet(), 1.0);
    let mut panel = MapPanel::new();
    let mut input = click_at(20.0, 30.0);
    assert_eq!(panel.draw(&mut ui, &mut input, 0.0, &session(), 0.0, 0.0, 600.0), None);
    assert!(ui.quads.is_empty());
    assert!(!input.mouse_consumed);
}

#[test]
fn first_map_panel_button_saves_the_current_map() {
    let mut ui = Ui::new(sheet(), 1.0);
    let mut panel = MapPanel::new();
    panel.toggle();
    let mut input = click_at(20.0, 30.0);
    let action = panel.draw(&mut ui, &mut input, 0.0, &session(), 0.0, 0.0, 600.0);
    assert_eq!(action, Some(PanelAction::SaveCurrentMap));
    assert!(input.mouse_consumed);
}

#[test]
fn click_on_empty_map_panel_space_is_consumed() {
    let mut ui = Ui::new(sheet(), 1.0);
    let mut panel = MapPanel::new();
    panel.toggle();
    let mut input = click_at(150.0, 400.0);
    assert_eq!(panel.draw(&mut ui, &mut input, 0.0, &session(), 0.0, 0.0, 600.0), None);
    assert!(input.mouse_consumed);

    let mut beside = click_at(MapPanel::WIDTH + 1.0, 400.0);
    panel.draw(&mut ui, &mut beside, 0.0, &session(), 0.0, 0.0, 600.0);
    assert!(!beside.mouse_consumed);
}

#[test]
fn map_panel_covers_only_its_column_while_open() {
    let mut panel = MapPanel::new();
    assert!(!panel.covers(150.0, 400.0));
    panel.toggle();
    assert!(panel.covers(150.0, 400.0));
    assert!(!panel.covers(MapPanel::WIDTH, 400.0));
}

#[test]
fn palette_click_starts_a_drag() {
    let mut ui = Ui::new(sheet(), 1.0);
    let mut inspector = InspectorPanel::new(260.0);
    let mut input = click_at(20.0, 95.0);
    let action = inspector.draw(&mut ui, &mut input, &session(), 0.0, 0.0, 600.0);
    assert_eq!(action, Some(PanelAction::BeginDrag("Tree".into())));
}

#[test]
fn start_button_uses_the_entered_dimensions() {
    let mut ui = Ui::new(sheet(), 1.0);
    let mut form = DimensionForm::new();
    form.set_values("12", "");
    let mut input = click_at(400.0, 320.0);
    let action = form.draw(&mut ui, &mut input, 0.0, 800.0, 600.0);
    assert_eq!(action, Some(PanelAction::Start { width: 12, height: 15 }));
}
