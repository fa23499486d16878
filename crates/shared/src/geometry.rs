//! Viewport transform math.
//!
//! Three coordinate spaces are involved:
//! - world: pixels of the unscaled base map image,
//! - screen: pixels relative to the visible map container,
//! - slider: the linear value shown on the zoom slider.
//!
//! World maps to screen through `screen = world * scale + offset` (uniform
//! scale, no rotation). Everything here is pure.

use crate::models::MapConfig;

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn scaled(&self, scale: f64) -> Self {
        Self::new(self.width * scale, self.height * scale)
    }
}

/// Current world-to-screen transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ViewState {
    pub fn new(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    pub fn with_offset(self, offset_x: f64, offset_y: f64) -> Self {
        Self {
            offset_x,
            offset_y,
            ..self
        }
    }
}

pub fn world_to_screen(world_x: f64, world_y: f64, view: &ViewState) -> (f64, f64) {
    (
        world_x * view.scale + view.offset_x,
        world_y * view.scale + view.offset_y,
    )
}

pub fn screen_to_world(screen_x: f64, screen_y: f64, view: &ViewState) -> (f64, f64) {
    (
        (screen_x - view.offset_x) / view.scale,
        (screen_y - view.offset_y) / view.scale,
    )
}

/// Change the scale while keeping the world point under `(screen_x, screen_y)`
/// fixed on screen. `new_scale` is clamped to the configured zoom range first.
pub fn zoom_about_point(
    view: &ViewState,
    new_scale: f64,
    screen_x: f64,
    screen_y: f64,
    config: &MapConfig,
) -> ViewState {
    let scale = config.clamp_zoom(new_scale);
    let (world_x, world_y) = screen_to_world(screen_x, screen_y, view);
    ViewState {
        scale,
        offset_x: screen_x - world_x * scale,
        offset_y: screen_y - world_y * scale,
    }
}

/// Clamp one axis: center the map if it is smaller than the viewport,
/// otherwise keep the viewport fully covered.
fn clamp_axis(offset: f64, viewport: f64, map: f64) -> f64 {
    if map <= viewport {
        (viewport - map) / 2.0
    } else {
        offset.clamp(viewport - map, 0.0)
    }
}

/// Apply the pan limits for a map of `base` world size shown in `viewport`.
pub fn clamp_offset(view: &ViewState, viewport: Size, base: Size) -> ViewState {
    let map = base.scaled(view.scale);
    ViewState {
        scale: view.scale,
        offset_x: clamp_axis(view.offset_x, viewport.width, map.width),
        offset_y: clamp_axis(view.offset_y, viewport.height, map.height),
    }
}

/// View at `scale` with the map centered in the viewport.
pub fn centered(scale: f64, viewport: Size, base: Size) -> ViewState {
    let map = base.scaled(scale);
    ViewState {
        scale,
        offset_x: (viewport.width - map.width) / 2.0,
        offset_y: (viewport.height - map.height) / 2.0,
    }
}

/// Map a linear slider value to a zoom scale through a quadratic curve, giving
/// finer control at low zoom.
pub fn slider_to_scale(linear: f64, min_zoom: f64, max_zoom: f64) -> f64 {
    let span = max_zoom - min_zoom;
    if span <= 0.0 {
        return min_zoom;
    }
    let p = ((linear - min_zoom) / span).clamp(0.0, 1.0);
    min_zoom + p * p * span
}

/// Inverse of [`slider_to_scale`].
pub fn scale_to_slider(scale: f64, min_zoom: f64, max_zoom: f64) -> f64 {
    let span = max_zoom - min_zoom;
    if span <= 0.0 {
        return min_zoom;
    }
    let p = ((scale - min_zoom) / span).clamp(0.0, 1.0);
    min_zoom + p.sqrt() * span
}

/// Euclidean distance between two screen points.
pub fn point_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

pub fn midpoint(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

/// Cubic ease-out over `t` in `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;

    const EPS: f64 = 1e-9;

    fn viewport() -> Size {
        Size::new(800.0, 600.0)
    }

    fn base() -> Size {
        Size::new(1000.0, 1000.0)
    }

    #[test]
    fn test_world_screen_roundtrip() {
        let views = [
            ViewState::new(1.0, 0.0, 0.0),
            ViewState::new(0.37, -120.5, 88.25),
            ViewState::new(3.9, -2400.0, -1800.0),
        ];
        for view in &views {
            for &(wx, wy) in &[(0.0, 0.0), (123.4, 987.6), (-50.0, 1e4)] {
                let (sx, sy) = world_to_screen(wx, wy, view);
                let (bx, by) = screen_to_world(sx, sy, view);
                assert!((bx - wx).abs() < 1e-6, "x roundtrip for {view:?}");
                assert!((by - wy).abs() < 1e-6, "y roundtrip for {view:?}");
            }
        }
    }

    #[test]
    fn test_zoom_about_point_keeps_world_point_fixed() {
        let config = fixtures::config();
        let view = ViewState::new(1.0, -37.0, 12.0);
        for &target in &[0.25, 0.6, 1.0, 1.15, 2.5, 4.0] {
            for &(sx, sy) in &[(0.0, 0.0), (400.0, 300.0), (799.0, 12.5)] {
                let before = screen_to_world(sx, sy, &view);
                let zoomed = zoom_about_point(&view, target, sx, sy, &config);
                let after = screen_to_world(sx, sy, &zoomed);
                assert!((before.0 - after.0).abs() < 1e-6);
                assert!((before.1 - after.1).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_wheel_zoom_scenario_at_cursor() {
        let config = fixtures::config();
        let view = ViewState::new(1.0, 0.0, 0.0);
        let zoomed = zoom_about_point(&view, 1.15, 400.0, 300.0, &config);
        assert!((zoomed.scale - 1.15).abs() < EPS);
        let (sx, sy) = world_to_screen(400.0, 300.0, &zoomed);
        assert!((sx - 400.0).abs() < 1e-6);
        assert!((sy - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_about_point_clamps_scale() {
        let config = fixtures::config();
        let view = ViewState::new(1.0, 0.0, 0.0);
        assert!((zoom_about_point(&view, 100.0, 10.0, 10.0, &config).scale - 4.0).abs() < EPS);
        assert!((zoom_about_point(&view, 0.01, 10.0, 10.0, &config).scale - 0.25).abs() < EPS);
    }

    #[test]
    fn test_clamp_centers_small_map() {
        let view = ViewState::new(0.5, 0.0, 0.0);
        let clamped = clamp_offset(&view, viewport(), base());
        assert!((clamped.offset_x - 150.0).abs() < EPS);
        assert!((clamped.offset_y - 50.0).abs() < EPS);
    }

    #[test]
    fn test_clamp_large_map_covers_viewport() {
        let view = ViewState::new(2.0, 150.0, 50.0);
        let clamped = clamp_offset(&view, viewport(), base());
        assert!(clamped.offset_x >= -1200.0 && clamped.offset_x <= 0.0);
        assert!(clamped.offset_y >= -1400.0 && clamped.offset_y <= 0.0);
        assert!((clamped.offset_x - 0.0).abs() < EPS);

        let far = ViewState::new(2.0, -5000.0, -5000.0);
        let clamped = clamp_offset(&far, viewport(), base());
        assert!((clamped.offset_x + 1200.0).abs() < EPS);
        assert!((clamped.offset_y + 1400.0).abs() < EPS);
    }

    #[test]
    fn test_clamp_mixed_axes() {
        // 1000x1000 at 0.7 is 700x700: narrower than 800, taller than 600.
        let view = ViewState::new(0.7, -300.0, 40.0);
        let clamped = clamp_offset(&view, viewport(), base());
        assert!((clamped.offset_x - 50.0).abs() < EPS);
        assert!((clamped.offset_y - 0.0).abs() < EPS);
    }

    #[test]
    fn test_clamp_is_idempotent() {
        let views = [
            ViewState::new(0.5, 999.0, -999.0),
            ViewState::new(2.0, 150.0, 50.0),
            ViewState::new(3.3, -777.7, -10.0),
            ViewState::new(0.7, -300.0, 40.0),
        ];
        for view in &views {
            let once = clamp_offset(view, viewport(), base());
            let twice = clamp_offset(&once, viewport(), base());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_centered_matches_clamp_for_small_map() {
        let view = centered(0.5, viewport(), base());
        assert_eq!(view, clamp_offset(&view, viewport(), base()));
    }

    #[test]
    fn test_slider_curve_endpoints() {
        assert!((slider_to_scale(0.25, 0.25, 4.0) - 0.25).abs() < EPS);
        assert!((slider_to_scale(4.0, 0.25, 4.0) - 4.0).abs() < EPS);
        // Halfway along the slider is a quarter of the way in scale.
        let mid = slider_to_scale(2.125, 0.25, 4.0);
        assert!((mid - (0.25 + 0.25 * 3.75)).abs() < EPS);
    }

    #[test]
    fn test_slider_curve_is_monotonic() {
        let mut prev = f64::NEG_INFINITY;
        let mut linear = 0.25;
        while linear <= 4.0 {
            let scale = slider_to_scale(linear, 0.25, 4.0);
            assert!(scale > prev, "curve not increasing at {linear}");
            prev = scale;
            linear += 0.05;
        }
    }

    #[test]
    fn test_slider_curve_inverse() {
        for &linear in &[0.25, 0.3, 1.0, 2.0, 3.999, 4.0] {
            let scale = slider_to_scale(linear, 0.25, 4.0);
            assert!((scale_to_slider(scale, 0.25, 4.0) - linear).abs() < 1e-9);
        }
    }

    #[test]
    fn test_slider_curve_degenerate_range() {
        assert!((slider_to_scale(3.0, 1.0, 1.0) - 1.0).abs() < EPS);
        assert!((scale_to_slider(3.0, 1.0, 1.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_ease_out_cubic_bounds() {
        assert!((ease_out_cubic(0.0)).abs() < EPS);
        assert!((ease_out_cubic(1.0) - 1.0).abs() < EPS);
        assert!((ease_out_cubic(2.0) - 1.0).abs() < EPS);
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn test_pinch_helpers() {
        assert!((point_distance((0.0, 0.0), (3.0, 4.0)) - 5.0).abs() < EPS);
        assert_eq!(midpoint((10.0, 20.0), (30.0, 40.0)), (20.0, 30.0));
    }
}
