use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigLoadError;

fn default_pin_scale_step() -> f64 {
    0.1
}

fn default_icon_size() -> f64 {
    32.0
}

/// Immutable map settings, loaded once from the `CONFIG` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MapConfig {
    pub base_width: f64,
    pub base_height: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    pub initial_zoom: f64,
    pub pin_min_scale: f64,
    pub pin_max_scale: f64,
    #[serde(default = "default_pin_scale_step")]
    pub pin_scale_step: f64,
    pub pin_default_scale: f64,
    pub pan_amount: f64,
}

impl MapConfig {
    pub fn clamp_zoom(&self, scale: f64) -> f64 {
        clamp_finite(scale, self.min_zoom, self.max_zoom)
    }

    pub fn clamp_pin_scale(&self, scale: f64) -> f64 {
        clamp_finite(scale, self.pin_min_scale, self.pin_max_scale)
    }

    /// Starting zoom, pulled into `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn initial_scale(&self) -> f64 {
        self.clamp_zoom(self.initial_zoom)
    }

    /// Starting pin scale, pulled into `[PIN_MIN_SCALE, PIN_MAX_SCALE]`.
    pub fn initial_pin_scale(&self) -> f64 {
        self.clamp_pin_scale(self.pin_default_scale)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.base_width) || !positive(self.base_height) {
            return Err(invalid(format!(
                "base size must be positive, got {}x{}",
                self.base_width, self.base_height
            )));
        }
        if !positive(self.min_zoom) || !self.max_zoom.is_finite() || self.min_zoom > self.max_zoom {
            return Err(invalid(format!(
                "zoom range [{}, {}] is not a positive interval",
                self.min_zoom, self.max_zoom
            )));
        }
        if !positive(self.zoom_step) {
            return Err(invalid(format!("ZOOM_STEP must be positive, got {}", self.zoom_step)));
        }
        if !positive(self.pin_min_scale)
            || !self.pin_max_scale.is_finite()
            || self.pin_min_scale > self.pin_max_scale
        {
            return Err(invalid(format!(
                "pin scale range [{}, {}] is not a positive interval",
                self.pin_min_scale, self.pin_max_scale
            )));
        }
        if !self.pan_amount.is_finite() || self.pan_amount < 0.0 {
            return Err(invalid(format!("PAN_AMOUNT must be >= 0, got {}", self.pan_amount)));
        }
        Ok(())
    }
}

/// Clamp that also maps NaN to the lower bound, so garbage input never leaks
/// into the view state.
fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

fn invalid(msg: String) -> ConfigLoadError {
    ConfigLoadError::Invalid(msg)
}

/// A point of interest anchored in world (base map pixel) coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub primary_icon_url: String,
    #[serde(default = "default_icon_size")]
    pub icon_size_x: f64,
    #[serde(default = "default_icon_size")]
    pub icon_size_y: f64,
    #[serde(default)]
    pub detail_images: Vec<String>,
    #[serde(default)]
    pub additional_icons: Vec<String>,
}

impl Pin {
    /// Images for the detail gallery. Blank entries are skipped; a pin without
    /// detail images shows its primary icon.
    pub fn gallery_images(&self) -> Vec<String> {
        let images: Vec<String> = self
            .detail_images
            .iter()
            .filter(|url| !url.trim().is_empty())
            .cloned()
            .collect();
        if images.is_empty() {
            vec![self.primary_icon_url.clone()]
        } else {
            images
        }
    }
}

/// A selectable background image layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub name: String,
    pub url: String,
}

/// The configuration document: everything the map needs at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MapData {
    pub config: MapConfig,
    #[serde(default)]
    pub pins: Vec<Pin>,
    #[serde(default)]
    pub map_views: Vec<MapView>,
}

impl MapData {
    /// Parse and validate a `map_data.json` document.
    pub fn from_json(text: &str) -> Result<Self, ConfigLoadError> {
        let data: MapData = serde_json::from_str(text)?;
        data.validate()?;
        Ok(data)
    }

    /// Same as [`MapData::from_json`] for an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigLoadError> {
        let data: MapData = serde_json::from_value(value)?;
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        self.config.validate()?;

        let mut seen = HashSet::with_capacity(self.pins.len());
        for pin in &self.pins {
            if pin.id.trim().is_empty() {
                return Err(invalid(format!("pin \"{}\" has an empty id", pin.title)));
            }
            if !seen.insert(pin.id.as_str()) {
                return Err(invalid(format!("duplicate pin id \"{}\"", pin.id)));
            }
            if !pin.x.is_finite() || !pin.y.is_finite() {
                return Err(invalid(format!("pin \"{}\" has non-finite coordinates", pin.id)));
            }
        }
        Ok(())
    }

    /// Every detail image url across all pins, in load order, for preloading.
    pub fn detail_image_urls(&self) -> Vec<&str> {
        self.pins
            .iter()
            .flat_map(|p| p.detail_images.iter())
            .map(String::as_str)
            .filter(|url| !url.trim().is_empty())
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures;
    use super::*;

    const DOCUMENT: &str = r#"{
        "CONFIG": {
            "BASE_WIDTH": 4000, "BASE_HEIGHT": 3000,
            "MIN_ZOOM": 0.1, "MAX_ZOOM": 3, "ZOOM_STEP": 0.05, "INITIAL_ZOOM": 0.3,
            "PIN_MIN_SCALE": 0.5, "PIN_MAX_SCALE": 3, "PIN_DEFAULT_SCALE": 1.5,
            "PAN_AMOUNT": 150
        },
        "PINS": [
            {
                "id": "mill", "x": 1200, "y": 800, "title": "Old Mill",
                "description": "Water-driven.", "primaryIconUrl": "icons/mill.png",
                "iconSizeX": 40, "iconSizeY": 48,
                "detailImages": ["img/mill-1.jpg", "", "img/mill-2.jpg"]
            },
            { "id": "bridge", "x": 10, "y": 20, "title": "Bridge", "primaryIconUrl": "icons/bridge.png" }
        ],
        "MAP_VIEWS": [ { "name": "Summer", "url": "maps/summer.webp" } ]
    }"#;

    #[test]
    fn test_parse_document() {
        let data = MapData::from_json(DOCUMENT).unwrap();
        assert_eq!(data.pins.len(), 2);
        assert_eq!(data.map_views[0].name, "Summer");
        assert!((data.config.base_width - 4000.0).abs() < 1e-9);
        assert!((data.config.pin_scale_step - 0.1).abs() < 1e-9);
        assert!((data.pins[0].icon_size_y - 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_optional_pin_fields_default() {
        let data = MapData::from_json(DOCUMENT).unwrap();
        let bridge = &data.pins[1];
        assert!(bridge.description.is_empty());
        assert!(bridge.detail_images.is_empty());
        assert!(bridge.additional_icons.is_empty());
        assert!((bridge.icon_size_x - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_gallery_images_skip_blank_entries() {
        let data = MapData::from_json(DOCUMENT).unwrap();
        assert_eq!(
            data.pins[0].gallery_images(),
            vec!["img/mill-1.jpg".to_string(), "img/mill-2.jpg".to_string()]
        );
    }

    #[test]
    fn test_gallery_images_fall_back_to_primary_icon() {
        let data = MapData::from_json(DOCUMENT).unwrap();
        assert_eq!(data.pins[1].gallery_images(), vec!["icons/bridge.png".to_string()]);
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let err = MapData::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Malformed(_)));
    }

    #[test]
    fn test_missing_config_is_malformed() {
        let err = MapData::from_json(r#"{ "PINS": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Malformed(_)));
    }

    #[test]
    fn test_duplicate_pin_ids_rejected() {
        let mut data = fixtures::map_data();
        data.pins.push(fixtures::pin("well", 1.0, 1.0));
        let err = data.validate().unwrap_err();
        assert!(matches!(err, ConfigLoadError::Invalid(msg) if msg.contains("well")));
    }

    #[test]
    fn test_inverted_zoom_range_rejected() {
        let mut data = fixtures::map_data();
        data.config.min_zoom = 5.0;
        assert!(matches!(data.validate(), Err(ConfigLoadError::Invalid(_))));
    }

    #[test]
    fn test_out_of_range_initial_values_are_clamped_not_rejected() {
        let mut config = fixtures::config();
        config.initial_zoom = 50.0;
        config.pin_default_scale = 0.0;
        assert!(config.validate().is_ok());
        assert!((config.initial_scale() - 4.0).abs() < 1e-9);
        assert!((config.initial_pin_scale() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_zoom_nan_goes_to_min() {
        let config = fixtures::config();
        assert!((config.clamp_zoom(f64::NAN) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_detail_image_urls_in_load_order() {
        let data = MapData::from_json(DOCUMENT).unwrap();
        assert_eq!(data.detail_image_urls(), vec!["img/mill-1.jpg", "img/mill-2.jpg"]);
    }

    #[test]
    fn test_document_roundtrips_wire_names() {
        let data = fixtures::map_data();
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("CONFIG").unwrap().get("BASE_WIDTH").is_some());
        assert!(json.get("PINS").unwrap()[0].get("primaryIconUrl").is_some());
        assert_eq!(MapData::from_value(json).unwrap(), data);
    }
}
