// ── Editor panels ────────────────────────────────────────────────────────────
//
// Each panel draws itself into the `Ui` overlay and reports at most one
// `PanelAction` per frame. The engine applies the action to the session, so
// panels only ever read from it.

use crate::engine::Color;
use crate::geometry::TilePos;
use crate::input::InputState;
use crate::session::Session;
use crate::state::OBJECT_KINDS;
use crate::tiles::TileId;
use crate::ui::Ui;
use crate::ui::widgets::{self, InputBox, InputBoxEvent};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelAction {
    SaveCurrentMap,
    LoadSavedMaps,
    SaveProject,
    LoadProject,
    LoadMap(String),
    AddMap(String),
    SetTile { pos: TilePos, id: TileId },
    /// Pick up an object kind from the palette.
    BeginDrag(String),
    /// Build the starting maps at the chosen size and play.
    Start { width: u32, height: u32 },
}

const PAD: f32 = 8.0;
const GAP: f32 = 4.0;

/// `"X: 3, Y: 4"`, or dashes when nothing is hovered.
pub fn hover_label(hover: Option<TilePos>) -> String {
    match hover {
        Some(p) => format!("X: {}, Y: {}", p.x, p.y),
        None => "X: -, Y: -".to_string(),
    }
}

// ── Map panel ────────────────────────────────────────────────────────────────

/// Map management sidebar, toggled with Tab.
pub struct MapPanel {
    open: bool,
    name: InputBox,
    status: String,
}

impl Default for MapPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl MapPanel {
    pub const WIDTH: f32 = 300.0;

    pub fn new() -> Self {
        Self { open: false, name: InputBox::new(24), status: String::new() }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
        self.name.is_focused = false;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.name.is_focused = false;
    }

    /// True when the open panel, docked at the left window edge, is under
    /// the pointer.
    pub fn covers(&self, px: f32, py: f32) -> bool {
        self.open && px >= 0.0 && px < Self::WIDTH && py >= 0.0
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Tab toggles and Escape closes. A focused name field gets Escape first.
    /// Returns true when the key was used.
    pub fn handle_keys(&mut self, input: &InputState) -> bool {
        use crate::input::KeyCode;
        if input.is_key_pressed(KeyCode::Escape) {
            if self.name.is_focused {
                self.name.is_focused = false;
                return true;
            }
            if self.open {
                self.close();
                return true;
            }
        }
        if input.is_key_pressed(KeyCode::Tab) && !self.name.is_focused {
            self.toggle();
            return true;
        }
        false
    }

    /// Take the typed name for a new map, clearing the field.
    fn take_name(&mut self) -> Option<String> {
        let name = self.name.value.trim().to_string();
        self.name.value.clear();
        (!name.is_empty()).then_some(name)
    }

    /// Draw the panel. A press anywhere on it is consumed, widget or not.
    pub fn draw(
        &mut self,
        ui: &mut Ui,
        input: &mut InputState,
        dt: f32,
        session: &Session,
        x: f32,
        y: f32,
        h: f32,
    ) -> Option<PanelAction> {
        if !self.open {
            return None;
        }
        let action = self.draw_contents(ui, input, dt, session, x, y, h);
        if input.is_mouse_over(x, y, Self::WIDTH, h) {
            input.mouse_consumed = true;
        }
        action
    }

    fn draw_contents(
        &mut self,
        ui: &mut Ui,
        input: &mut InputState,
        dt: f32,
        session: &Session,
        x: f32,
        y: f32,
        h: f32,
    ) -> Option<PanelAction> {
        let w = Self::WIDTH;
        let row = ui.char_h() + GAP;
        let inner_w = w - 2.0 * PAD;
        let mut action = None;

        ui.ui_rect(x, y, w, h, widgets::PANEL_BG);
        let mut cy = y + PAD;

        ui.ui_text(x + PAD, cy, "MAPS", widgets::ACCENT, Color::TRANSPARENT);
        let close_w = ui.char_w() * 3.0;
        if widgets::button(ui, input, x + w - PAD - close_w, cy, close_w, "X") {
            self.close();
            return None;
        }
        cy += row + GAP;

        let buttons = [
            ("Save Current Map", PanelAction::SaveCurrentMap),
            ("Load Saved Maps", PanelAction::LoadSavedMaps),
            ("Save Project", PanelAction::SaveProject),
            ("Load Project", PanelAction::LoadProject),
        ];
        for (label, act) in buttons {
            if widgets::button(ui, input, x + PAD, cy, inner_w, label) {
                action = Some(act);
            }
            cy += row;
        }
        cy += GAP;

        // Leave room below the list for the add row and the status line.
        let footer = 4.0 * row + PAD;
        ui.ui_text(x + PAD, cy, "Saved maps:", widgets::TEXT, Color::TRANSPARENT);
        cy += row;
        let current = session.maps.current();
        let mut hidden = 0;
        for name in session.maps.maps().keys() {
            if cy + row > y + h - footer {
                hidden += 1;
                continue;
            }
            let label = if Some(name.as_str()) == current { format!("> {name}") } else { name.clone() };
            if widgets::button(ui, input, x + PAD, cy, inner_w, &label) {
                action = Some(PanelAction::LoadMap(name.clone()));
            }
            cy += row;
        }
        if session.maps.is_empty() {
            ui.ui_text(x + PAD, cy, "(none)", widgets::DIM, Color::TRANSPARENT);
            cy += row;
        } else if hidden > 0 {
            ui.ui_text(x + PAD, cy, &format!("+{hidden} more"), widgets::DIM, Color::TRANSPARENT);
            cy += row;
        }
        cy += GAP;

        let add_w = ui.char_w() * 6.0;
        let box_w = inner_w - add_w - GAP;
        let submitted = self.name.draw(ui, input, dt, x + PAD, cy, box_w) == InputBoxEvent::Submitted;
        let clicked = widgets::button(ui, input, x + PAD + box_w + GAP, cy, add_w, "Add");
        if (submitted || clicked)
            && let Some(name) = self.take_name()
        {
            action = Some(PanelAction::AddMap(name));
        }
        cy += row + GAP;

        if !self.status.is_empty() {
            let remaining = (y + h - cy - PAD).max(0.0);
            ui.ui_text_wrapped(x + PAD, cy, inner_w, remaining, &self.status, widgets::DIM);
        }

        action
    }
}

// ── Inspector panel ──────────────────────────────────────────────────────────

/// Right-hand sidebar: hover readout, tile repaint buttons, object palette.
pub struct InspectorPanel {
    pub width: f32,
}

impl InspectorPanel {
    pub fn new(width: f32) -> Self {
        Self { width }
    }

    pub fn draw(
        &mut self,
        ui: &mut Ui,
        input: &mut InputState,
        session: &Session,
        x: f32,
        y: f32,
        h: f32,
    ) -> Option<PanelAction> {
        let w = self.width;
        let row = ui.char_h() + GAP;
        let inner_w = w - 2.0 * PAD;
        let mut action = None;

        ui.ui_rect(x, y, w, h, widgets::PANEL_BG);
        let mut cy = y + PAD;

        ui.ui_text(x + PAD, cy, "INSPECTOR", widgets::ACCENT, Color::TRANSPARENT);
        cy += row + GAP;

        let map_name = session.maps.current().unwrap_or("(unsaved)");
        ui.ui_text(x + PAD, cy, &format!("Map: {map_name}"), widgets::TEXT, Color::TRANSPARENT);
        cy += row;
        ui.ui_text(x + PAD, cy, &hover_label(session.state.hover_tile), widgets::TEXT, Color::TRANSPARENT);
        cy += row + GAP;

        match session.inspected() {
            Some((pos, id)) => {
                let name = session.registry.get(id).map_or("unknown", |t| t.name);
                ui.ui_text(x + PAD, cy, &format!("Tile ({}, {}): {name}", pos.x, pos.y), widgets::TEXT, Color::TRANSPARENT);
                cy += row;
                for (tid, tile) in session.registry.iter() {
                    let label = if tid == id { format!("> {}", tile.name) } else { tile.name.to_string() };
                    if widgets::button(ui, input, x + PAD, cy, inner_w, &label) && tid != id {
                        action = Some(PanelAction::SetTile { pos, id: tid });
                    }
                    cy += row;
                }
            }
            None => {
                ui.ui_text(x + PAD, cy, "Click a tile", widgets::DIM, Color::TRANSPARENT);
                cy += row;
            }
        }
        cy += GAP;

        ui.ui_text(x + PAD, cy, "Objects (drag):", widgets::TEXT, Color::TRANSPARENT);
        cy += row;
        for kind in OBJECT_KINDS {
            let bh = ui.char_h();
            let hovered = input.is_mouse_over(x + PAD, cy, inner_w, bh);
            if input.was_clicked(x + PAD, cy, inner_w, bh) {
                input.mouse_consumed = true;
                action = Some(PanelAction::BeginDrag(kind.to_string()));
            }
            let border = if hovered { widgets::BORDER_F } else { widgets::BORDER };
            ui.ui_box(x + PAD, cy, inner_w, bh, 1.0, border, widgets::BG);
            ui.ui_rect(x + PAD + 4.0, cy + 4.0, bh - 8.0, bh - 8.0, crate::renderer::frame::OBJECT);
            ui.ui_text(x + PAD + bh, cy, kind, widgets::TEXT, Color::TRANSPARENT);
            cy += row;
        }
        cy += GAP;

        for hint in ["Tab: maps", "Arrows/WASD: move", "F1: debug"] {
            if cy + row > y + h {
                break;
            }
            ui.ui_text(x + PAD, cy, hint, widgets::DIM, Color::TRANSPARENT);
            cy += row;
        }

        action
    }
}

// ── Dimension form ───────────────────────────────────────────────────────────

pub const DEFAULT_WIDTH: u32 = 20;
pub const DEFAULT_HEIGHT: u32 = 15;

/// Start screen asking for the grid size.
pub struct DimensionForm {
    width: InputBox,
    height: InputBox,
}

impl Default for DimensionForm {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionForm {
    pub fn new() -> Self {
        Self {
            width: InputBox::numeric(3, DEFAULT_WIDTH),
            height: InputBox::numeric(3, DEFAULT_HEIGHT),
        }
    }

    /// The entered size; empty, zero or unparsable fields use the defaults.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width.value_or(DEFAULT_WIDTH), self.height.value_or(DEFAULT_HEIGHT))
    }

    pub fn set_values(&mut self, width: &str, height: &str) {
        self.width.value = width.to_string();
        self.height.value = height.to_string();
    }

    pub fn draw(&mut self, ui: &mut Ui, input: &mut InputState, dt: f32, screen_w: f32, screen_h: f32) -> Option<PanelAction> {
        let row = ui.char_h() + GAP;
        let w = ui.char_w() * 24.0 + 2.0 * PAD;
        let h = row * 5.0 + 2.0 * PAD;
        let x = ((screen_w - w) / 2.0).max(0.0);
        let y = ((screen_h - h) / 2.0).max(0.0);

        ui.ui_box(x, y, w, h, 1.0, widgets::BORDER, widgets::PANEL_BG);
        let mut cy = y + PAD;
        ui.ui_text(x + PAD, cy, "NEW GAME", widgets::ACCENT, Color::TRANSPARENT);
        cy += row + GAP;

        let label_w = ui.char_w() * 8.0;
        let field_w = w - 2.0 * PAD - label_w;
        let mut submitted = false;

        ui.ui_text(x + PAD, cy, "Width:", widgets::TEXT, Color::TRANSPARENT);
        submitted |= self.width.draw(ui, input, dt, x + PAD + label_w, cy, field_w) == InputBoxEvent::Submitted;
        cy += row;
        ui.ui_text(x + PAD, cy, "Height:", widgets::TEXT, Color::TRANSPARENT);
        submitted |= self.height.draw(ui, input, dt, x + PAD + label_w, cy, field_w) == InputBoxEvent::Submitted;
        cy += row + GAP;

        let clicked = widgets::button(ui, input, x + PAD, cy, w - 2.0 * PAD, "Start");
        if clicked || submitted {
            let (width, height) = self.dimensions();
            return Some(PanelAction::Start { width, height });
        }
        None
    }
}
