// ── UI types & pure helpers ──────────────────────────────────────────────────

pub mod font;
pub mod panels;
pub mod widgets;

use crate::engine::Color;
use crate::renderer::atlas::SpriteSheet;
use crate::renderer::pipeline::QuadInstance;
use crate::renderer::utils::Viewport;

/// Word-wrap `text` so every returned line is at most `max_cols` characters.
/// Words are split on ASCII whitespace; a word longer than `max_cols` is
/// hard-split.
pub fn word_wrap(text: &str, max_cols: usize) -> Vec<String> {
    if max_cols == 0 { return vec![]; }
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let space = if current.is_empty() { 0 } else { 1 };
        if !current.is_empty() && current.chars().count() + space + word.chars().count() > max_cols {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() { current.push(' '); }
        current.push_str(word);
        while current.chars().count() > max_cols {
            let head: String = current.chars().take(max_cols).collect();
            let rest: String = current.chars().skip(max_cols).collect();
            lines.push(head);
            current = rest;
        }
    }
    if !current.is_empty() { lines.push(current); }
    lines
}

/// Returns `true` if pixel point `(px, py)` falls inside the rectangle
/// defined by origin `(rx, ry)` and size `(rw, rh)` using half-open intervals.
pub fn rect_contains(rx: f32, ry: f32, rw: f32, rh: f32, px: f32, py: f32) -> bool {
    px >= rx && px < rx + rw && py >= ry && py < ry + rh
}

// ── Ui ────────────────────────────────────────────────────────────────────────

/// Screen-space overlay drawn after the world, one quad per rect or glyph.
///
/// Text uses the built-in font: every character occupies a `char_w()` ×
/// `char_h()` cell, the 5×7 glyph scaled by `scale` with one scaled pixel of
/// spacing around it.
pub struct Ui {
    /// Quads accumulated this frame; cleared by `clear`.
    pub quads: Vec<QuadInstance>,
    sheet: SpriteSheet,
    scale: f32,
}

impl Ui {
    pub fn new(sheet: SpriteSheet, scale: f32) -> Self {
        Self { quads: Vec::new(), sheet, scale: scale.max(1.0) }
    }

    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    pub fn char_w(&self) -> f32 { (font::GLYPH_W + 1) as f32 * self.scale }
    pub fn char_h(&self) -> f32 { (font::GLYPH_H + 3) as f32 * self.scale }

    /// Pixel width of `text` on one line.
    pub fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_w()
    }

    pub fn clear(&mut self) {
        self.quads.clear();
    }

    /// Hand the frame's quads to the renderer, leaving the list empty.
    pub fn take_quads(&mut self) -> Vec<QuadInstance> {
        std::mem::take(&mut self.quads)
    }

    // ── Drawing ────────────────────────────────────────────────────────────

    pub fn ui_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        if w <= 0.0 || h <= 0.0 { return; }
        let white = self.sheet.white();
        self.quads.push(QuadInstance::solid(Viewport::new(x, y, w, h), white, color));
    }

    fn ui_char_at(&mut self, px: f32, py: f32, ch: char, fg: Color) {
        if ch == ' ' { return; }
        let Some(sprite) = self.sheet.get(&font::glyph_name(ch)) else { return };
        let s = self.scale;
        let rect = Viewport::new(
            px + s * 0.5,
            py + s * 1.5,
            font::GLYPH_W as f32 * s,
            font::GLYPH_H as f32 * s,
        );
        self.quads.push(QuadInstance::sprite(rect, sprite, fg));
    }

    /// Draw a single line of text. `bg` alpha 0 → no background rect.
    pub fn ui_text(&mut self, x: f32, y: f32, text: &str, fg: Color, bg: Color) {
        let n = text.chars().count();
        if n == 0 { return; }
        if bg.0[3] > 0.0 {
            self.ui_rect(x, y, n as f32 * self.char_w(), self.char_h(), bg);
        }
        let cw = self.char_w();
        for (i, ch) in text.chars().enumerate() {
            self.ui_char_at(x + i as f32 * cw, y, ch, fg);
        }
    }

    /// Word-wrapped text clipped to `max_h`. Returns the height used.
    pub fn ui_text_wrapped(&mut self, x: f32, y: f32, max_w: f32, max_h: f32, text: &str, fg: Color) -> f32 {
        let ch = self.char_h();
        let max_cols = (max_w / self.char_w()) as usize;
        let max_rows = (max_h / ch) as usize;
        let mut used = 0.0;
        for (row, line) in word_wrap(text, max_cols).into_iter().enumerate().take(max_rows) {
            self.ui_text(x, y + row as f32 * ch, &line, fg, Color::TRANSPARENT);
            used += ch;
        }
        used
    }

    /// A filled box with a `border`-pixel outline.
    pub fn ui_box(&mut self, x: f32, y: f32, w: f32, h: f32, border: f32, fg: Color, bg: Color) {
        if bg.0[3] > 0.0 {
            self.ui_rect(x, y, w, h, bg);
        }
        let b = border.min(w / 2.0).min(h / 2.0);
        if b <= 0.0 { return; }
        self.ui_rect(x, y, w, b, fg);
        self.ui_rect(x, y + h - b, w, b, fg);
        self.ui_rect(x, y + b, b, h - 2.0 * b, fg);
        self.ui_rect(x + w - b, y + b, b, h - 2.0 * b, fg);
    }
}
