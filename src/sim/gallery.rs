//! Gallery layouts for the scroll simulator
//!
//! A layout is a list of image tiles in document coordinates, either read
//! from JSON or generated as a regular grid:
//!
//! ```json
//! { "items": [ { "url": "moments/1.jpg", "x": 0, "y": 0, "width": 200, "height": 200 } ] }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::geometry::Rect;

/// One image tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub url: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl GalleryItem {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A page worth of image tiles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryLayout {
    #[serde(default)]
    pub items: Vec<GalleryItem>,
}

/// Layout loading errors
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Failed to read layout {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse layout {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

impl GalleryLayout {
    /// Read a JSON layout file
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let content = std::fs::read_to_string(path).map_err(|e| LayoutError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| LayoutError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Regular grid of square tiles, one moments photo per tile
    pub fn grid(columns: usize, rows: usize, tile: f64, gap: f64) -> Self {
        let items = (0..rows)
            .flat_map(|row| (0..columns).map(move |col| (row, col)))
            .map(|(row, col)| GalleryItem {
                url: format!("/api/media/moments/{}-{}.jpg", row, col),
                x: col as f64 * (tile + gap),
                y: row as f64 * (tile + gap),
                width: tile,
                height: tile,
            })
            .collect();

        Self { items }
    }

    /// Document height needed to show every tile
    pub fn height(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.bounds().bottom())
            .fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid() {
        let layout = GalleryLayout::grid(3, 2, 200.0, 10.0);

        assert_eq!(layout.len(), 6);
        assert_eq!(layout.items[4].url, "/api/media/moments/1-1.jpg");
        assert_eq!(layout.items[4].bounds(), Rect::new(210.0, 210.0, 200.0, 200.0));
        assert_eq!(layout.height(), 410.0);
    }

    #[test]
    fn test_empty_layout() {
        let layout = GalleryLayout::default();
        assert!(layout.is_empty());
        assert_eq!(layout.height(), 0.0);
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(
            &path,
            r#"{ "items": [ { "url": "a.jpg", "x": 0, "y": 900, "width": 100, "height": 50 } ] }"#,
        )
        .unwrap();

        let layout = GalleryLayout::load(&path).unwrap();
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.height(), 950.0);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            GalleryLayout::load(&path),
            Err(LayoutError::Parse { .. })
        ));
    }
}
