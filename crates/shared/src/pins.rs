use std::collections::HashMap;

use crate::geometry::{self, ViewState};
use crate::models::{MapConfig, Pin};

/// Where one pin should be drawn this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PinPlacement {
    pub id: String,
    pub screen_x: f64,
    pub screen_y: f64,
    pub scale: f64,
}

/// The loaded pins, the user's pin display settings, and the screen positions
/// computed by the last render.
#[derive(Debug, Clone)]
pub struct PinRegistry {
    pins: Vec<Pin>,
    index: HashMap<String, usize>,
    screen: Vec<(f64, f64)>,
    scale: f64,
    visible: bool,
}

impl PinRegistry {
    /// `pins` must have unique ids (checked by `MapData::validate`); a repeated
    /// id resolves to its first occurrence.
    pub fn new(pins: Vec<Pin>, config: &MapConfig) -> Self {
        let mut index = HashMap::with_capacity(pins.len());
        for (i, pin) in pins.iter().enumerate() {
            index.entry(pin.id.clone()).or_insert(i);
        }
        let screen = vec![(0.0, 0.0); pins.len()];
        Self {
            pins,
            index,
            screen,
            scale: config.initial_pin_scale(),
            visible: true,
        }
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Pin> {
        self.index.get(id).map(|&i| &self.pins[i])
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the pin scale; out-of-range values are clamped.
    pub fn set_scale(&mut self, scale: f64, config: &MapConfig) -> f64 {
        self.scale = config.clamp_pin_scale(scale);
        self.scale
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Recompute every pin's screen position. Runs regardless of visibility so
    /// showing the pins again never displays stale positions.
    pub fn project(&mut self, view: &ViewState) {
        for (slot, pin) in self.screen.iter_mut().zip(&self.pins) {
            *slot = geometry::world_to_screen(pin.x, pin.y, view);
        }
    }

    /// Position from the last [`project`](PinRegistry::project) call.
    pub fn screen_position(&self, id: &str) -> Option<(f64, f64)> {
        self.index.get(id).map(|&i| self.screen[i])
    }

    /// Placements to draw, in load order. Empty while pins are hidden.
    pub fn placements(&self) -> Vec<PinPlacement> {
        if !self.visible {
            return Vec::new();
        }
        self.pins
            .iter()
            .zip(&self.screen)
            .map(|(pin, &(x, y))| PinPlacement {
                id: pin.id.clone(),
                screen_x: x,
                screen_y: y,
                scale: self.scale,
            })
            .collect()
    }
}
