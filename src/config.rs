//! Grid configuration
//!
//! Loaded from JSON. Missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{LibraryEntry, TileKind};

/// Board geometry plus the tile library used for refills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,

    // === World layout ===
    /// Column pitch in world units
    pub tile_width: f32,
    /// Row pitch in world units
    pub tile_height: f32,
    /// World position of the grid center
    pub center: [f32; 3],

    // === Tile supply ===
    /// Seed for the tile library RNG
    pub seed: u64,
    /// Weighted tile kinds
    pub library: Vec<LibraryEntry>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,

            tile_width: DEFAULT_TILE_SIZE,
            tile_height: DEFAULT_TILE_SIZE,
            center: [0.0; 3],

            seed: 0,
            library: (0..DEFAULT_TILE_KINDS)
                .map(|k| LibraryEntry {
                    kind: TileKind(k),
                    weight: 1,
                })
                .collect(),
        }
    }
}

impl GridConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load from a JSON file, falling back to defaults if it is missing or malformed
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded grid config from {}", path.display());
                    config
                }
                Err(err) => {
                    log::warn!("Malformed grid config {}: {}, using defaults", path.display(), err);
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Cannot read grid config {}: {}, using defaults", path.display(), err);
                Self::default()
            }
        }
    }
}
