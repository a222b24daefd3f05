use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use image::RgbaImage;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::EditorConfig;
use crate::input::{DragState, InputEvent, InputState};
use crate::maps::{FileStorage, MapManager, MemoryStorage, Storage};
use crate::renderer::Renderer;
use crate::renderer::atlas::AtlasBuilder;
use crate::renderer::frame::{self, BACKGROUND};
use crate::renderer::utils::Viewport;
use crate::session::{InputOutcome, Session};
use crate::tiles::TileRegistry;
use crate::ui::panels::{DimensionForm, InspectorPanel, MapPanel, PanelAction};
use crate::ui::{Ui, font, widgets};

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
    pub const GRAY: Self = Self([0.6, 0.6, 0.6, 1.0]);
    pub const DARK_GRAY: Self = Self([0.2, 0.2, 0.2, 1.0]);
    pub const RED: Self = Self([1.0, 0.0, 0.0, 1.0]);
    pub const YELLOW: Self = Self([1.0, 1.0, 0.0, 1.0]);
    pub const MAGENTA: Self = Self([1.0, 0.0, 1.0, 1.0]);
    pub const TRANSPARENT: Self = Self([0.0, 0.0, 0.0, 0.0]);

    /// Same colour with alpha replaced.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self([self.0[0], self.0[1], self.0[2], a])
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Pixel scale of the built-in font.
const UI_SCALE: f32 = 2.0;
/// Size of maps created from the map panel.
const NEW_MAP_SIZE: (u32, u32) = (10, 10);

/// Average frame rate over the recorded frame times.
pub fn average_fps(frame_times: &VecDeque<f32>) -> f32 {
    let total: f32 = frame_times.iter().sum();
    if total <= 0.0 { 0.0 } else { frame_times.len() as f32 / total }
}

// ── EditorBuilder ───────────────────────────────────────────────────────────

pub struct EditorBuilder {
    config: EditorConfig,
    registry: TileRegistry,
}

impl EditorBuilder {
    pub fn new(config: EditorConfig) -> Self {
        Self { config, registry: TileRegistry::default() }
    }

    pub fn with_title(mut self, title: &str) -> Self { self.config.title = title.into(); self }
    pub fn with_size(mut self, width: u32, height: u32) -> Self { self.config.width = width; self.config.height = height; self }
    pub fn with_ups(mut self, ups: u32) -> Self { self.config.ups = ups.max(1); self }
    pub fn with_registry(mut self, registry: TileRegistry) -> Self { self.registry = registry; self }

    /// Build the session and atlas, then hand control to the window loop.
    /// Returns when the window is closed.
    pub fn run(self) -> Result<(), EngineError> {
        let Self { config, registry } = self;

        let storage: Box<dyn Storage> = if config.persist {
            tracing::info!(dir = %config.data_dir.display(), "saving maps to disk");
            Box::new(FileStorage::new(&config.data_dir))
        } else {
            tracing::info!("persistence disabled; maps live in memory");
            Box::new(MemoryStorage::new())
        };
        let mut session = Session::new(MapManager::new(storage), registry);

        let form = open_start_map(&mut session, &config.start_map);

        let mut builder = AtlasBuilder::new();
        let glyphs = font::add_glyphs(&mut builder);
        let textures = config.assets.as_deref().map_or(0, |dir| builder.load_folder(dir));
        let atlas = builder.build();
        tracing::info!(glyphs, textures, sprites = atlas.sprites.len(), "atlas built");

        let event_loop = EventLoop::new()?;
        let mut app = App {
            fixed_dt: config.fixed_dt(),
            inspector: InspectorPanel::new(config.inspector_width),
            config,
            session,
            atlas_image: atlas.image,
            ui: Ui::new(atlas.sprites, UI_SCALE),
            renderer: None,
            input: InputState::new(),
            drag: DragState::default(),
            pending_keys: Vec::new(),
            map_panel: MapPanel::new(),
            form,
            debug_visible: false,
            frame_times: VecDeque::with_capacity(60),
            last_instant: None,
            accumulator: 0.0,
        };
        event_loop.run_app(&mut app)?;
        Ok(())
    }
}

/// Load the saved collection and enter `start_map` when it exists. Otherwise
/// return the dimension form for a new game.
fn open_start_map(session: &mut Session, start_map: &str) -> Option<DimensionForm> {
    match session.load_saved_maps() {
        Ok(true) => tracing::info!(maps = session.maps.len(), "restored saved maps"),
        Ok(false) => tracing::info!("no saved maps"),
        Err(e) => tracing::warn!(error = %e, "could not read saved maps"),
    }
    if session.maps.contains(start_map) && session.load_map(start_map).is_ok() {
        None
    } else {
        Some(DimensionForm::new())
    }
}

/// Hover under the open map panel counts as leaving the canvas.
fn pointer_event(panel: &MapPanel, x: f32, y: f32) -> InputEvent {
    if panel.covers(x, y) { InputEvent::PointerLeft } else { InputEvent::PointerMoved { x, y } }
}

/// Hand a finished palette drag to the session. Drops released over the
/// open map panel are discarded.
fn deliver_drop(session: &mut Session, panel: &MapPanel, drop: InputEvent) -> InputOutcome {
    if let InputEvent::Dropped { x, y, .. } = drop
        && panel.covers(x, y)
    {
        tracing::debug!(x, y, "drop over the map panel discarded");
        return InputOutcome::Ignored;
    }
    session.handle_event(drop)
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct App {
    config: EditorConfig,
    session: Session,
    atlas_image: RgbaImage,
    ui: Ui,
    renderer: Option<Renderer>,
    input: InputState,
    drag: DragState,
    /// Key events held until the UI has had a chance to consume them.
    pending_keys: Vec<InputEvent>,
    map_panel: MapPanel,
    inspector: InspectorPanel,
    /// The start screen; `Some` until a game is started.
    form: Option<DimensionForm>,
    debug_visible: bool,
    frame_times: VecDeque<f32>,
    last_instant: Option<Instant>,
    accumulator: f32,
    fixed_dt: f32,
}

impl App {
    /// The canvas gets everything left of the inspector.
    fn canvas_container(&self, width: u32, height: u32) -> Viewport {
        let w = (width as f32 - self.config.inspector_width).max(0.0);
        Viewport::new(0.0, 0.0, w, height as f32)
    }

    fn apply(&mut self, action: PanelAction) {
        let session = &mut self.session;
        let status = match action {
            PanelAction::SaveCurrentMap => match session.save_current_map() {
                Ok(true) => format!("Saved {}", session.maps.current().unwrap_or_default()),
                Ok(false) => "No map loaded".to_string(),
                Err(e) => {
                    tracing::error!(error = %e, "save failed");
                    format!("Save failed: {e}")
                }
            },
            PanelAction::LoadSavedMaps => match session.load_saved_maps() {
                Ok(true) => format!("Loaded {} maps", session.maps.len()),
                Ok(false) => "No saved maps".to_string(),
                Err(e) => {
                    tracing::warn!(error = %e, "load failed");
                    format!("Load failed: {e}")
                }
            },
            PanelAction::SaveProject => match session.save_project() {
                Ok(()) => "Project saved".to_string(),
                Err(e) => {
                    tracing::error!(error = %e, "project save failed");
                    format!("Save failed: {e}")
                }
            },
            PanelAction::LoadProject => match session.load_project() {
                Ok(true) => "Project loaded".to_string(),
                Ok(false) => "No saved project".to_string(),
                Err(e) => {
                    tracing::warn!(error = %e, "project load failed");
                    format!("Load failed: {e}")
                }
            },
            PanelAction::LoadMap(name) => match session.load_map(&name) {
                Ok(()) => format!("Playing {name}"),
                Err(e) => e.to_string(),
            },
            PanelAction::AddMap(name) => {
                let (w, h) = NEW_MAP_SIZE;
                if session.new_map(&name, w, h) {
                    format!("Added {name}")
                } else {
                    format!("{name} already exists")
                }
            }
            PanelAction::SetTile { pos, id } => {
                session.set_tile(pos, id);
                return;
            }
            PanelAction::BeginDrag(kind) => {
                self.drag.begin(&kind);
                return;
            }
            PanelAction::Start { width, height } => {
                if let Err(e) = session.start_new_game(&self.config.start_map, width, height) {
                    tracing::error!(error = %e, "could not save the new maps");
                }
                if session.maps.current().is_some() {
                    self.form = None;
                }
                return;
            }
        };
        self.map_panel.set_status(status);
    }

    /// Feed this frame's pointer and key input to the session. Runs after
    /// the panels so clicks and keys they used are skipped.
    fn dispatch_to_session(&mut self) {
        let [mx, my] = self.input.mouse_pos;

        if self.input.is_mouse_pressed(MouseButton::Left) && !self.input.mouse_consumed && !self.drag.is_active() {
            self.session.handle_event(InputEvent::PointerClicked { x: mx, y: my });
        }
        if self.input.is_mouse_released(MouseButton::Left)
            && let Some(drop) = self.drag.release(mx, my)
            && let InputOutcome::Ignored = deliver_drop(&mut self.session, &self.map_panel, drop)
        {
            tracing::debug!(x = mx, y = my, "drop outside the canvas");
        }

        let consumed = self.input.key_consumed;
        for event in self.pending_keys.drain(..) {
            if consumed && matches!(event, InputEvent::KeyDown(_)) {
                continue;
            }
            self.session.handle_event(event);
        }
    }

    /// Build the overlay for this frame and return what the user asked for.
    fn draw_panels(&mut self, width: f32, height: f32, dt: f32) -> Option<PanelAction> {
        if let Some(form) = self.form.as_mut() {
            return form.draw(&mut self.ui, &mut self.input, dt, width, height);
        }

        if self.input.is_key_pressed(KeyCode::Escape) && self.drag.is_active() {
            self.drag.cancel();
        } else {
            self.map_panel.handle_keys(&self.input);
        }

        let iw = self.inspector.width;
        let mut action = self.inspector.draw(&mut self.ui, &mut self.input, &self.session, width - iw, 0.0, height);
        if let Some(a) = self.map_panel.draw(&mut self.ui, &mut self.input, dt, &self.session, 0.0, 0.0, height) {
            action = Some(a);
        }

        if let Some(kind) = self.drag.carrying() {
            let [mx, my] = self.input.mouse_pos;
            let s = self.ui.char_h();
            self.ui.ui_rect(mx - s / 2.0, my - s / 2.0, s, s, frame::OBJECT.with_alpha(0.8));
            self.ui.ui_text(mx + s, my - s / 2.0, kind, widgets::TEXT, widgets::PANEL_BG);
        }

        if self.debug_visible {
            let player = self.session.state.player;
            let line = format!(
                "{:.0} FPS  MAP: {}  PLAYER: {}, {}",
                average_fps(&self.frame_times),
                self.session.maps.current().unwrap_or("-"),
                player.x,
                player.y,
            );
            let x = if self.map_panel.is_open() { MapPanel::WIDTH + 4.0 } else { 4.0 };
            self.ui.ui_text(x, 4.0, &line, Color::YELLOW, Color::BLACK.with_alpha(0.6));
        }

        action
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(self.config.width, self.config.height));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!(error = %e, "could not open a window");
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(Renderer::new(window, &self.atlas_image)) {
            Ok(renderer) => {
                let size = renderer.size();
                let container = self.canvas_container(size.width, size.height);
                self.session.set_container(container);
                self.renderer = Some(renderer);
            }
            Err(e) => {
                tracing::error!(error = %e, "renderer initialisation failed");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_ref() {
            renderer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.renderer.is_none() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                }
                let container = self.canvas_container(size.width, size.height);
                self.session.set_container(container);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                self.input.mouse_pos = [x, y];
                if self.form.is_none() {
                    self.session.handle_event(pointer_event(&self.map_panel, x, y));
                }
            }

            WindowEvent::CursorLeft { .. } => {
                self.session.handle_event(InputEvent::PointerLeft);
            }

            WindowEvent::MouseInput { button, state, .. } => match state {
                ElementState::Pressed => {
                    if self.input.mouse_held.insert(button) {
                        self.input.mouse_pressed.insert(button);
                    }
                }
                ElementState::Released => {
                    self.input.mouse_held.remove(&button);
                    self.input.mouse_released.insert(button);
                }
            },

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed = match self.last_instant {
                    Some(prev) => now.duration_since(prev).as_secs_f32().min(0.25),
                    None => self.fixed_dt,
                };
                self.last_instant = Some(now);

                if self.frame_times.len() >= 60 {
                    self.frame_times.pop_front();
                }
                self.frame_times.push_back(elapsed);

                let Some(size) = self.renderer.as_ref().map(Renderer::size) else { return };
                self.ui.clear();
                let action = self.draw_panels(size.width as f32, size.height as f32, elapsed);

                if self.form.is_none() {
                    self.dispatch_to_session();
                    self.accumulator += elapsed;
                    while self.accumulator >= self.fixed_dt {
                        self.session.tick();
                        self.accumulator -= self.fixed_dt;
                    }
                } else {
                    self.pending_keys.clear();
                }

                if let Some(action) = action {
                    self.apply(action);
                }

                let mut quads = if self.form.is_none() {
                    frame::build_world(&self.session.state, &self.session.registry, self.session.layout(), self.ui.sheet())
                } else {
                    Vec::new()
                };
                quads.extend(self.ui.take_quads());

                if let Some(renderer) = self.renderer.as_mut() {
                    match renderer.render(&quads, BACKGROUND) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            tracing::error!("GPU out of memory");
                            event_loop.exit();
                        }
                        Err(e) => tracing::warn!(error = %e, "frame skipped"),
                    }
                }

                self.input.clear_frame_state();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ref text,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    if self.input.keys_held.insert(code) {
                        self.input.keys_pressed.insert(code);
                    }
                    // Repeats re-arm the key so holding it keeps walking.
                    self.pending_keys.push(InputEvent::KeyDown(code));

                    if code == KeyCode::F1 && self.config.debug {
                        self.debug_visible = !self.debug_visible;
                    }

                    if let Some(t) = text {
                        for ch in t.chars() {
                            if !ch.is_control() {
                                self.input.chars_typed.push(ch);
                            }
                        }
                    }
                }
                ElementState::Released => {
                    self.input.keys_held.remove(&code);
                    self.input.keys_released.insert(code);
                    self.pending_keys.push(InputEvent::KeyUp(code));
                }
            },

            _ => {}
        }
    }
}
