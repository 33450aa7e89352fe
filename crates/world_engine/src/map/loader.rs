//! Map file loading
//!
//! Maps and tile sets are RON documents under the configured worlds
//! directory. Tile set sources are resolved relative to that directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::description::{MapDescription, TilesetDescription};
use super::error::MapLoadError;
use crate::config::AssetConfig;

/// Supplies tile set descriptions by source name
pub trait TilesetSource {
    /// Load the tile set referenced as `source`
    fn tileset(&self, source: &str) -> Result<TilesetDescription, MapLoadError>;
}

impl TilesetSource for HashMap<String, TilesetDescription> {
    fn tileset(&self, source: &str) -> Result<TilesetDescription, MapLoadError> {
        self.get(source)
            .cloned()
            .ok_or_else(|| MapLoadError::MissingTileset(source.to_string()))
    }
}

/// Reads map and tile set descriptions from disk
#[derive(Debug, Clone)]
pub struct MapLoader {
    worlds_dir: PathBuf,
    map_extension: String,
}

impl MapLoader {
    /// Create a loader for a worlds directory
    pub fn new(worlds_dir: impl Into<PathBuf>) -> Self {
        Self {
            worlds_dir: worlds_dir.into(),
            map_extension: "ron".to_string(),
        }
    }

    /// Create a loader from asset configuration
    pub fn from_config(config: &AssetConfig) -> Self {
        Self {
            worlds_dir: config.worlds_dir.clone(),
            map_extension: config.map_extension.clone(),
        }
    }

    /// Directory maps and tile sets are resolved against
    pub fn worlds_dir(&self) -> &Path {
        &self.worlds_dir
    }

    /// File a map name resolves to
    pub fn map_path(&self, name: &str) -> PathBuf {
        self.worlds_dir.join(format!("{name}.{}", self.map_extension))
    }

    /// Read and parse a map by name
    pub fn load_map(&self, name: &str) -> Result<MapDescription, MapLoadError> {
        read_ron(&self.map_path(name))
    }
}

impl TilesetSource for MapLoader {
    fn tileset(&self, source: &str) -> Result<TilesetDescription, MapLoadError> {
        read_ron(&self.worlds_dir.join(source))
    }
}

fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, MapLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| MapLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|e| MapLoadError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
