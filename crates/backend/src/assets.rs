use std::path::{Path, PathBuf};

use pinmap_shared::models::{MapData, MapView, Pin};
use pinmap_shared::ConfigLoadError;
use thiserror::Error;

/// File name of the configuration document inside the assets directory.
pub const MAP_DATA_FILE: &str = "map_data.json";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: ConfigLoadError,
    },
}

/// The validated configuration document, loaded once at startup.
pub struct Assets {
    pub map_data: MapData,
}

impl Assets {
    pub fn load(assets_dir: &Path) -> Result<Self, AssetError> {
        let path = assets_dir.join(MAP_DATA_FILE);
        let text = std::fs::read_to_string(&path).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;
        let map_data =
            MapData::from_json(&text).map_err(|source| AssetError::Document { path, source })?;

        tracing::info!(
            pins = map_data.pins.len(),
            map_views = map_data.map_views.len(),
            "Loaded map data"
        );

        Ok(Assets { map_data })
    }

    pub fn find_pin(&self, id: &str) -> Option<&Pin> {
        self.map_data.pins.iter().find(|p| p.id == id)
    }

    pub fn map_views(&self) -> &[MapView] {
        &self.map_data.map_views
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const SAMPLE: &str = r#"{
        "CONFIG": {
            "BASE_WIDTH": 2000, "BASE_HEIGHT": 1500,
            "MIN_ZOOM": 0.2, "MAX_ZOOM": 4, "ZOOM_STEP": 0.05, "INITIAL_ZOOM": 0.5,
            "PIN_MIN_SCALE": 0.5, "PIN_MAX_SCALE": 3, "PIN_DEFAULT_SCALE": 1.5,
            "PAN_AMOUNT": 120
        },
        "PINS": [
            { "id": "harbor", "x": 400, "y": 900, "title": "Harbor",
              "primaryIconUrl": "icons/anchor.png",
              "detailImages": ["img/harbor-1.jpg", "img/harbor-2.jpg"] }
        ],
        "MAP_VIEWS": [
            { "name": "Terrain", "url": "maps/terrain.webp" },
            { "name": "Political", "url": "maps/political.webp" }
        ]
    }"#;

    pub fn sample_assets() -> Assets {
        Assets {
            map_data: MapData::from_json(SAMPLE).unwrap(),
        }
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MAP_DATA_FILE), SAMPLE).unwrap();
        let assets = Assets::load(dir.path()).unwrap();
        assert_eq!(assets.map_views().len(), 2);
        assert_eq!(assets.find_pin("harbor").unwrap().title, "Harbor");
        assert!(assets.find_pin("lighthouse").is_none());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Assets::load(dir.path()).err().unwrap();
        assert!(matches!(err, AssetError::Io { .. }));
        assert!(err.to_string().contains(MAP_DATA_FILE));
    }

    #[test]
    fn test_invalid_document_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let broken = SAMPLE.replace("\"MIN_ZOOM\": 0.2", "\"MIN_ZOOM\": 9");
        std::fs::write(dir.path().join(MAP_DATA_FILE), broken).unwrap();
        let err = Assets::load(dir.path()).err().unwrap();
        assert!(matches!(
            err,
            AssetError::Document {
                source: ConfigLoadError::Invalid(_),
                ..
            }
        ));
    }
}
