use crate::geometry::{self, Size, ViewState};
use crate::models::MapConfig;

/// Drag threshold in pixels. Movement at or below this still counts as a click.
pub const MOUSE_DRAG_THRESHOLD: f64 = 3.0;

/// Touch drag threshold, larger than mouse because touch is less precise.
pub const TOUCH_DRAG_THRESHOLD: f64 = 5.0;

/// Relative scale change per wheel tick.
pub const WHEEL_ZOOM_FACTOR: f64 = 0.15;

/// Duration of the eased keyboard/button pan.
pub const PAN_ANIMATION_MS: f64 = 300.0;

/// Pinches starting closer than this are ignored.
const MIN_PINCH_DISTANCE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

impl PointerKind {
    fn drag_threshold(self) -> f64 {
        match self {
            PointerKind::Mouse => MOUSE_DRAG_THRESHOLD,
            PointerKind::Touch => TOUCH_DRAG_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PanDirection {
    /// Offset change for a pan of `amount` pixels. Panning up reveals the top
    /// of the map, so the map itself moves down.
    pub fn offset_delta(self, amount: f64) -> (f64, f64) {
        match self {
            PanDirection::Up => (0.0, amount),
            PanDirection::Down => (0.0, -amount),
            PanDirection::Left => (amount, 0.0),
            PanDirection::Right => (-amount, 0.0),
        }
    }
}

/// Keyboard shortcuts understood by the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Pan(PanDirection),
    ZoomIn,
    ZoomOut,
    ResetView,
    CloseDetail,
}

impl KeyCommand {
    /// Map a DOM `KeyboardEvent.key` value to a command.
    pub fn from_key(key: &str) -> Option<Self> {
        let cmd = match key {
            "ArrowUp" | "w" | "W" => KeyCommand::Pan(PanDirection::Up),
            "ArrowDown" | "s" | "S" => KeyCommand::Pan(PanDirection::Down),
            "ArrowLeft" | "a" | "A" => KeyCommand::Pan(PanDirection::Left),
            "ArrowRight" | "d" | "D" => KeyCommand::Pan(PanDirection::Right),
            "+" | "=" => KeyCommand::ZoomIn,
            "-" | "_" => KeyCommand::ZoomOut,
            "0" => KeyCommand::ResetView,
            "Escape" => KeyCommand::CloseDetail,
            _ => return None,
        };
        Some(cmd)
    }
}

/// Gesture state of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    Panning {
        kind: PointerKind,
        anchor: (f64, f64),
        anchor_offset: (f64, f64),
        last: (f64, f64),
    },
    Pinching {
        start_distance: f64,
        start_scale: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PanAnimation {
    from: (f64, f64),
    to: (f64, f64),
    started_ms: f64,
}

impl PanAnimation {
    /// Offset at `now_ms`, and whether the animation has finished.
    fn sample(&self, now_ms: f64) -> ((f64, f64), bool) {
        let progress = ((now_ms - self.started_ms) / PAN_ANIMATION_MS).clamp(0.0, 1.0);
        let ease = geometry::ease_out_cubic(progress);
        let offset = (
            self.from.0 + (self.to.0 - self.from.0) * ease,
            self.from.1 + (self.to.1 - self.from.1) * ease,
        );
        (offset, progress >= 1.0)
    }
}

/// Owns the view state and turns raw input into transform updates.
///
/// Offsets written by gestures are not clamped immediately; [`settle`] runs
/// once per rendered frame and restores the clamp invariant.
///
/// [`settle`]: ViewportController::settle
#[derive(Debug, Clone)]
pub struct ViewportController {
    view: ViewState,
    viewport: Size,
    base: Size,
    gesture: Gesture,
    moved: bool,
    animation: Option<PanAnimation>,
}

impl ViewportController {
    pub fn new(config: &MapConfig, viewport: Size) -> Self {
        let base = Size::new(config.base_width, config.base_height);
        let view = geometry::clamp_offset(
            &geometry::centered(config.initial_scale(), viewport, base),
            viewport,
            base,
        );
        Self {
            view,
            viewport,
            base,
            gesture: Gesture::Idle,
            moved: false,
            animation: None,
        }
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// True when the last press turned into a drag or pinch, so the release
    /// must not be treated as a click on whatever is underneath.
    pub fn suppresses_tap(&self) -> bool {
        self.moved
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Record the container size. The first non-empty size recenters the map,
    /// since the container has no layout before the first frame.
    pub fn set_viewport(&mut self, viewport: Size) {
        let was_empty = self.viewport.width <= 0.0 || self.viewport.height <= 0.0;
        self.viewport = viewport;
        if was_empty && viewport.width > 0.0 && viewport.height > 0.0 {
            self.view = geometry::centered(self.view.scale, viewport, self.base);
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, kind: PointerKind) {
        self.animation = None;
        self.moved = false;
        self.gesture = Gesture::Panning {
            kind,
            anchor: (x, y),
            anchor_offset: self.view.offset(),
            last: (x, y),
        };
    }

    /// Drag the map. Returns true if the view changed.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        let Gesture::Panning {
            kind,
            anchor,
            anchor_offset,
            ..
        } = self.gesture
        else {
            return false;
        };

        let dx = x - anchor.0;
        let dy = y - anchor.1;
        let threshold = kind.drag_threshold();
        if dx.abs() > threshold || dy.abs() > threshold {
            self.moved = true;
        }

        self.gesture = Gesture::Panning {
            kind,
            anchor,
            anchor_offset,
            last: (x, y),
        };
        let before = self.view;
        self.view = self.view.with_offset(anchor_offset.0 + dx, anchor_offset.1 + dy);
        self.view != before
    }

    /// End a mouse drag. Returns true if the press was a click rather than a drag.
    pub fn pointer_up(&mut self) -> bool {
        let was_panning = matches!(self.gesture, Gesture::Panning { .. });
        if was_panning {
            self.gesture = Gesture::Idle;
        }
        was_panning && !self.moved
    }

    /// Pointer left the container; abandon any drag.
    pub fn pointer_leave(&mut self) {
        if matches!(self.gesture, Gesture::Panning { .. }) {
            self.gesture = Gesture::Idle;
        }
    }

    pub fn touch_start(&mut self, touches: &[(f64, f64)]) {
        match touches {
            [] => {}
            [only] => self.pointer_down(only.0, only.1, PointerKind::Touch),
            [a, b, ..] => {
                self.animation = None;
                self.moved = true;
                self.gesture = Gesture::Pinching {
                    start_distance: geometry::point_distance(*a, *b),
                    start_scale: self.view.scale,
                };
            }
        }
    }

    /// Returns true if the view changed.
    pub fn touch_move(&mut self, touches: &[(f64, f64)], config: &MapConfig) -> bool {
        match (self.gesture, touches) {
            (
                Gesture::Pinching {
                    start_distance,
                    start_scale,
                },
                [a, b, ..],
            ) => {
                if start_distance < MIN_PINCH_DISTANCE {
                    return false;
                }
                let factor = geometry::point_distance(*a, *b) / start_distance;
                let (cx, cy) = geometry::midpoint(*a, *b);
                self.zoom_to(start_scale * factor, cx, cy, config)
            }
            (Gesture::Panning { .. }, [only]) => self.pointer_move(only.0, only.1),
            _ => false,
        }
    }

    /// `remaining` are the touches still on the surface after the end/cancel.
    pub fn touch_end(&mut self, remaining: &[(f64, f64)]) {
        match self.gesture {
            Gesture::Pinching { .. } if remaining.len() >= 2 => {}
            _ => self.gesture = Gesture::Idle,
        }
    }

    /// One wheel tick about the cursor. Positive `delta_y` zooms out.
    pub fn wheel(&mut self, delta_y: f64, x: f64, y: f64, config: &MapConfig) -> bool {
        if delta_y == 0.0 || delta_y.is_nan() {
            return false;
        }
        let direction = if delta_y > 0.0 { -1.0 } else { 1.0 };
        let target = self.view.scale * (1.0 + direction * WHEEL_ZOOM_FACTOR);
        self.zoom_to(target, x, y, config)
    }

    /// Set zoom from the linear slider value, about the viewport center.
    pub fn slider_zoom(&mut self, linear: f64, config: &MapConfig) -> bool {
        let linear = config.clamp_zoom(linear);
        let scale = geometry::slider_to_scale(linear, config.min_zoom, config.max_zoom);
        let (cx, cy) = self.viewport.center();
        self.zoom_to(scale, cx, cy, config)
    }

    /// Move the slider by `steps` increments of `ZOOM_STEP`.
    pub fn step_zoom(&mut self, steps: f64, config: &MapConfig) -> bool {
        let linear = self.slider_value(config) + steps * config.zoom_step;
        self.slider_zoom(linear, config)
    }

    /// Linear slider position that corresponds to the current scale.
    pub fn slider_value(&self, config: &MapConfig) -> f64 {
        geometry::scale_to_slider(self.view.scale, config.min_zoom, config.max_zoom)
    }

    /// Start an eased pan of `PAN_AMOUNT` pixels. The target is clamped up
    /// front so the animation ends at rest inside the pan limits.
    pub fn start_pan(&mut self, direction: PanDirection, now_ms: f64, config: &MapConfig) -> bool {
        let from = self.view.offset();
        let (dx, dy) = direction.offset_delta(config.pan_amount);
        let target = geometry::clamp_offset(
            &self.view.with_offset(from.0 + dx, from.1 + dy),
            self.viewport,
            self.base,
        );
        let to = target.offset();
        if to == from {
            self.animation = None;
            return false;
        }
        self.animation = Some(PanAnimation {
            from,
            to,
            started_ms: now_ms,
        });
        true
    }

    /// Back to the initial zoom, centered.
    pub fn reset(&mut self, config: &MapConfig) {
        self.animation = None;
        self.gesture = Gesture::Idle;
        self.view = geometry::centered(config.initial_scale(), self.viewport, self.base);
    }

    /// Per-frame step: advance any pan animation, then clamp scale and offset.
    /// Returns true while an animation still needs frames.
    pub fn settle(&mut self, now_ms: f64, config: &MapConfig) -> bool {
        let mut animating = false;
        if let Some(anim) = self.animation {
            let ((x, y), done) = anim.sample(now_ms);
            self.view = self.view.with_offset(x, y);
            if done {
                self.animation = None;
            } else {
                animating = true;
            }
        }
        self.view.scale = config.clamp_zoom(self.view.scale);
        self.view = geometry::clamp_offset(&self.view, self.viewport, self.base);
        animating
    }

    fn zoom_to(&mut self, scale: f64, x: f64, y: f64, config: &MapConfig) -> bool {
        let before = self.view;
        self.animation = None;
        // Zoom about what is on screen; a drag may have left the offset past
        // the edge until the next settle.
        let shown = geometry::clamp_offset(&self.view, self.viewport, self.base);
        self.view = geometry::zoom_about_point(&shown, scale, x, y, config);
        self.rebase_pan();
        self.view != before
    }

    /// Re-anchor an in-progress drag at the current pointer so a zoom during
    /// the drag is not undone by the next move.
    fn rebase_pan(&mut self) {
        if let Gesture::Panning { kind, last, .. } = self.gesture {
            self.gesture = Gesture::Panning {
                kind,
                anchor: last,
                anchor_offset: self.view.offset(),
                last,
            };
        }
    }
}
