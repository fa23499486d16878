use crate::controller::{KeyCommand, PanDirection, PointerKind, ViewportController};
use crate::error::ConfigLoadError;
use crate::gallery::{DetailOverlay, GalleryView, OpenDetail};
use crate::geometry::{Size, ViewState};
use crate::models::{MapConfig, MapData, MapView, Pin};
use crate::pins::{PinPlacement, PinRegistry};
use crate::scheduler::RenderScheduler;

/// Raw input, already translated to container-relative coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MouseDown { x: f64, y: f64, primary: bool },
    MouseMove { x: f64, y: f64 },
    MouseUp,
    MouseLeave,
    TouchStart(Vec<(f64, f64)>),
    TouchMove(Vec<(f64, f64)>),
    /// Touches still down after an end or cancel.
    TouchEnd(Vec<(f64, f64)>),
    Wheel { delta_y: f64, x: f64, y: f64 },
    /// Linear zoom slider value.
    ZoomSlider(f64),
    PinScaleSlider(f64),
    Pan(PanDirection),
    Key { key: String, text_input_focused: bool },
    DoubleClick,
    /// Reset button.
    ResetView,
    Resize,
}

/// Everything the rendering collaborator needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub view: ViewState,
    pub pins: Vec<PinPlacement>,
    /// Linear zoom slider position matching `view.scale`.
    pub zoom_slider: f64,
    pub zoom_percent: u32,
    pub pin_scale: f64,
    /// Another frame has been requested (a pan animation is running).
    pub needs_next_frame: bool,
}

/// Startup state exposed to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Failed(ConfigLoadError),
}

impl<T> LoadState<T> {
    pub fn controls_enabled(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            LoadState::Failed(e) => Some(format!("Failed to load map data: {e}")),
            _ => None,
        }
    }
}

impl<T> From<Result<T, ConfigLoadError>> for LoadState<T> {
    fn from(result: Result<T, ConfigLoadError>) -> Self {
        match result {
            Ok(v) => LoadState::Ready(v),
            Err(e) => LoadState::Failed(e),
        }
    }
}

/// Application context, created once the configuration document has loaded.
///
/// All view and gallery mutation goes through here. Methods that change what
/// is on screen return `true` when the host must schedule a frame callback;
/// the callback calls [`MapSession::render_frame`].
#[derive(Debug, Clone)]
pub struct MapSession {
    config: MapConfig,
    controller: ViewportController,
    pins: PinRegistry,
    overlay: DetailOverlay,
    scheduler: RenderScheduler,
    map_views: Vec<MapView>,
    active_view: Option<usize>,
}

impl MapSession {
    pub fn new(data: MapData, viewport: Size) -> Self {
        let MapData {
            config,
            pins,
            map_views,
        } = data;
        let controller = ViewportController::new(&config, viewport);
        let pins = PinRegistry::new(pins, &config);
        let active_view = if map_views.is_empty() { None } else { Some(0) };
        Self {
            config,
            controller,
            pins,
            overlay: DetailOverlay::default(),
            scheduler: RenderScheduler::new(),
            map_views,
            active_view,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn view(&self) -> ViewState {
        self.controller.view()
    }

    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    pub fn pins(&self) -> &PinRegistry {
        &self.pins
    }

    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    pub fn map_views(&self) -> &[MapView] {
        &self.map_views
    }

    pub fn active_view_index(&self) -> Option<usize> {
        self.active_view
    }

    pub fn active_view(&self) -> Option<&MapView> {
        self.active_view.and_then(|i| self.map_views.get(i))
    }

    pub fn detail(&self) -> Option<&OpenDetail> {
        self.overlay.current()
    }

    pub fn gallery_view(&self) -> Option<GalleryView> {
        self.overlay.gallery_view()
    }

    /// Mark the view dirty. True when the caller must schedule a frame.
    pub fn request_render(&mut self) -> bool {
        self.scheduler.request()
    }

    /// Feed one input event. `now_ms` is only used to start pan animations.
    pub fn handle(&mut self, input: InputEvent, now_ms: f64) -> bool {
        let changed = match input {
            InputEvent::MouseDown { x, y, primary } => {
                if primary && !self.overlay.is_open() {
                    self.controller.pointer_down(x, y, PointerKind::Mouse);
                }
                false
            }
            InputEvent::MouseMove { x, y } => self.controller.pointer_move(x, y),
            InputEvent::MouseUp => {
                self.controller.pointer_up();
                false
            }
            InputEvent::MouseLeave => {
                self.controller.pointer_leave();
                false
            }
            InputEvent::TouchStart(touches) => {
                if !self.overlay.is_open() {
                    self.controller.touch_start(&touches);
                }
                false
            }
            InputEvent::TouchMove(touches) => self.controller.touch_move(&touches, &self.config),
            InputEvent::TouchEnd(remaining) => {
                self.controller.touch_end(&remaining);
                false
            }
            InputEvent::Wheel { delta_y, x, y } => {
                self.controller.wheel(delta_y, x, y, &self.config)
            }
            InputEvent::ZoomSlider(linear) => self.controller.slider_zoom(linear, &self.config),
            InputEvent::PinScaleSlider(scale) => {
                let before = self.pins.scale();
                self.pins.set_scale(scale, &self.config) != before
            }
            InputEvent::Pan(direction) => self.controller.start_pan(direction, now_ms, &self.config),
            InputEvent::Key {
                key,
                text_input_focused,
            } => self.handle_key(&key, text_input_focused, now_ms),
            InputEvent::DoubleClick | InputEvent::ResetView => {
                if self.overlay.is_open() {
                    false
                } else {
                    self.controller.reset(&self.config);
                    true
                }
            }
            InputEvent::Resize => true,
        };
        changed && self.scheduler.request()
    }

    fn handle_key(&mut self, key: &str, text_input_focused: bool, now_ms: f64) -> bool {
        let Some(cmd) = KeyCommand::from_key(key) else {
            return false;
        };
        if cmd == KeyCommand::CloseDetail {
            self.close_detail();
            return false;
        }
        if text_input_focused || self.overlay.is_open() {
            return false;
        }
        match cmd {
            KeyCommand::Pan(direction) => self.controller.start_pan(direction, now_ms, &self.config),
            KeyCommand::ZoomIn => self.controller.step_zoom(1.0, &self.config),
            KeyCommand::ZoomOut => self.controller.step_zoom(-1.0, &self.config),
            KeyCommand::ResetView => {
                self.controller.reset(&self.config);
                true
            }
            KeyCommand::CloseDetail => false,
        }
    }

    /// The frame callback: clamp, project pins, and report what to draw.
    pub fn render_frame(&mut self, viewport: Size, now_ms: f64) -> FrameOutput {
        if !self.scheduler.begin_frame() {
            tracing::trace!("render without a pending request");
        }
        self.controller.set_viewport(viewport);
        let animating = self.controller.settle(now_ms, &self.config);
        let view = self.controller.view();
        self.pins.project(&view);

        let needs_next_frame = animating && self.scheduler.request();
        tracing::trace!(
            frames = self.scheduler.frames(),
            coalesced = self.scheduler.coalesced(),
            "rendered frame"
        );

        FrameOutput {
            view,
            pins: self.pins.placements(),
            zoom_slider: self.controller.slider_value(&self.config),
            zoom_percent: (view.scale * 100.0).round() as u32,
            pin_scale: self.pins.scale(),
            needs_next_frame,
        }
    }

    /// Pin click/tap. Ignored when the press that produced it was a drag.
    pub fn select_pin(&mut self, id: &str) -> Option<GalleryView> {
        if self.controller.suppresses_tap() {
            return None;
        }
        self.open_pin(id)
    }

    /// Open the detail popup for `id` unconditionally.
    pub fn open_pin(&mut self, id: &str) -> Option<GalleryView> {
        let pin: &Pin = self.pins.get(id)?;
        self.overlay.open(pin).gallery.view()
    }

    pub fn close_detail(&mut self) -> bool {
        self.overlay.close()
    }

    pub fn cycle_image(&mut self, direction: i64) -> Option<GalleryView> {
        self.overlay.cycle(direction)
    }

    pub fn jump_to_image(&mut self, index: usize) -> Option<GalleryView> {
        self.overlay.jump_to(index)
    }

    /// Show or hide all pins. True when the caller must schedule a frame.
    pub fn set_pins_visible(&mut self, visible: bool) -> bool {
        if self.pins.visible() == visible {
            return false;
        }
        self.pins.set_visible(visible);
        self.scheduler.request()
    }

    /// Switch the background layer. Out-of-range indices are ignored.
    pub fn select_map_view(&mut self, index: usize) -> Option<&MapView> {
        let view = self.map_views.get(index)?;
        tracing::debug!(view = %view.name, "switching map view");
        self.active_view = Some(index);
        Some(view)
    }
}
