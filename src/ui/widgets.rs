//! Immediate-mode widgets: `button` and `InputBox`.
//!
//! Call them once per frame while building the overlay. Persistent state
//! (text, focus) lives in the widget struct.
//!
//! # Click Consumption
//!
//! A widget that handles a mouse click sets `input.mouse_consumed`, so the
//! engine does not also treat the click as a canvas click.
//!
//! # Text Input
//!
//! A focused `InputBox` drains `input.chars_typed` and sets
//! `input.key_consumed`, which keeps typed letters from walking the player.

use crate::engine::Color;
use crate::input::{InputState, KeyCode, MouseButton};
use crate::ui::Ui;

// ── Shared widget palette ──────────────────────────────────────────────────────

pub const PANEL_BG: Color = Color([0.2, 0.2, 0.2, 0.96]);
pub const BG:       Color = Color([0.07, 0.10, 0.10, 1.0]);
pub const BG_HOV:   Color = Color([0.13, 0.20, 0.18, 1.0]);
pub const BG_FOC:   Color = Color([0.10, 0.16, 0.15, 1.0]);
pub const BORDER:   Color = Color([0.25, 0.65, 0.50, 1.0]);
pub const BORDER_F: Color = Color([0.45, 0.90, 0.72, 1.0]);
pub const TEXT:     Color = Color([0.85, 0.92, 0.88, 1.0]);
pub const DIM:      Color = Color([0.38, 0.48, 0.45, 1.0]);
pub const ACCENT:   Color = Color([0.95, 0.80, 0.35, 1.0]);

// ── Button ────────────────────────────────────────────────────────────────────

/// A one-line button `w` pixels wide. Returns true on the frame it is clicked.
pub fn button(ui: &mut Ui, input: &mut InputState, x: f32, y: f32, w: f32, label: &str) -> bool {
    let h = ui.char_h();
    let hovered = input.is_mouse_over(x, y, w, h);
    let clicked = input.was_clicked(x, y, w, h);
    if clicked {
        input.mouse_consumed = true;
    }

    let (bg, border) = if hovered { (BG_HOV, BORDER_F) } else { (BG, BORDER) };
    ui.ui_box(x, y, w, h, 1.0, border, bg);
    let tx = x + ((w - ui.text_width(label)) / 2.0).max(ui.char_w() / 2.0);
    ui.ui_text(tx, y, label, if hovered { TEXT } else { DIM }, Color::TRANSPARENT);
    clicked
}

// ── InputBox ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputBoxEvent {
    None,
    Changed,
    /// Enter was pressed while focused.
    Submitted,
}

/// Single-line text field. Click to focus, click elsewhere to blur.
pub struct InputBox {
    pub value: String,
    pub max_chars: usize,
    pub is_focused: bool,
    /// Accept ASCII digits only.
    pub numeric: bool,
    /// Blink timer [0, 1); caret visible when < 0.5.
    cursor_blink: f32,
}

impl InputBox {
    pub fn new(max_chars: usize) -> Self {
        Self {
            value: String::new(),
            max_chars: max_chars.max(1),
            is_focused: false,
            numeric: false,
            cursor_blink: 0.0,
        }
    }

    pub fn numeric(max_chars: usize, initial: u32) -> Self {
        let mut b = Self::new(max_chars);
        b.numeric = true;
        b.value = initial.to_string();
        b
    }

    /// The value as a positive number, or `default` when empty, zero or
    /// unparsable.
    pub fn value_or(&self, default: u32) -> u32 {
        match self.value.trim().parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => default,
        }
    }

    /// Apply this frame's keyboard input. Separate from drawing so it can run
    /// without a renderer.
    pub fn handle_input(&mut self, input: &mut InputState, dt: f32) -> InputBoxEvent {
        if !self.is_focused {
            self.cursor_blink = 0.0;
            return InputBoxEvent::None;
        }
        input.key_consumed = true;
        self.cursor_blink = (self.cursor_blink + dt) % 1.0;

        let mut event = InputBoxEvent::None;
        let incoming: Vec<char> = input.chars_typed.drain(..).collect();
        for ch in incoming {
            if self.numeric && !ch.is_ascii_digit() {
                continue;
            }
            if self.value.chars().count() < self.max_chars {
                self.value.push(ch);
                event = InputBoxEvent::Changed;
            }
        }
        if input.is_key_pressed(KeyCode::Backspace) && self.value.pop().is_some() {
            event = InputBoxEvent::Changed;
        }
        if input.is_key_pressed(KeyCode::Enter) || input.is_key_pressed(KeyCode::NumpadEnter) {
            event = InputBoxEvent::Submitted;
        }
        event
    }

    /// Draw at `(x, y)` with width `w`, handling focus and typing.
    pub fn draw(&mut self, ui: &mut Ui, input: &mut InputState, dt: f32, x: f32, y: f32, w: f32) -> InputBoxEvent {
        let h = ui.char_h();
        let hovered = input.is_mouse_over(x, y, w, h);
        if input.was_clicked(x, y, w, h) {
            self.is_focused = true;
            input.mouse_consumed = true;
        } else if input.is_mouse_pressed(MouseButton::Left) && !hovered {
            self.is_focused = false;
        }

        let event = self.handle_input(input, dt);

        let border = if self.is_focused { BORDER_F } else if hovered { BORDER } else { DIM };
        let bg = if self.is_focused { BG_FOC } else { BG };
        ui.ui_box(x, y, w, h, 1.0, border, bg);

        // Show the tail of the text so the last typed character stays visible.
        let cw = ui.char_w();
        let max_visible = ((w / cw) as usize).saturating_sub(1);
        let caret = if self.is_focused && self.cursor_blink < 0.5 { "_" } else { " " };
        let count = self.value.chars().count();
        let skip = (count + 1).saturating_sub(max_visible);
        let display: String = self.value.chars().skip(skip).collect::<String>() + caret;

        let fg = if self.is_focused || hovered { TEXT } else { DIM };
        ui.ui_text(x + cw / 2.0, y, &display, fg, Color::TRANSPARENT);
        event
    }
}
