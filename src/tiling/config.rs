//! Configuration for cube conversion, the tile pyramid and the preview.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a [`TilingConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("At least one pyramid level is required")]
    NoLevels,
    #[error("Level {0} has a zero face or tile size")]
    ZeroSize(u32),
    #[error("Level {0} is listed more than once")]
    DuplicateLevel(u32),
    #[error("Level face sizes must strictly increase: {prev} then {next}")]
    UnorderedLevels { prev: u32, next: u32 },
    #[error("Base face size must be greater than zero")]
    ZeroBaseFaceSize,
    #[error("Preview size must be greater than zero")]
    ZeroPreviewSize,
    #[error("JPEG quality must be in 1..=100, got {0}")]
    InvalidQuality(u8),
    #[error("Level {level} needs {tiles} tiles per face, more than {}", MAX_TILES_PER_FACE)]
    TooManyTiles { level: u32, tiles: u64 },
}

/// Largest tile count a single face may have at one level.
pub const MAX_TILES_PER_FACE: u64 = u32::MAX as u64;

/// Output resolution and tile granularity for one pyramid level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
    /// Level index, used as the top-level directory name.
    pub level: u32,
    /// Side length of every face at this level, in pixels.
    pub face_size: u32,
    /// Side length of every tile at this level, in pixels.
    pub tile_size: u32,
}

impl LevelSpec {
    /// Creates a level spec.
    pub const fn new(level: u32, face_size: u32, tile_size: u32) -> Self {
        Self {
            level,
            face_size,
            tile_size,
        }
    }

    /// Number of tiles along each axis of a face, rounding partial tiles up.
    pub fn grid_size(&self) -> u32 {
        self.face_size.div_ceil(self.tile_size).max(1)
    }

    /// Total number of tiles this level produces for a single face.
    pub fn tiles_per_face(&self) -> u64 {
        let grid = self.grid_size() as u64;
        grid * grid
    }
}

/// The four-level scheme consumed by the tour viewer.
pub const REFERENCE_LEVELS: [LevelSpec; 4] = [
    LevelSpec::new(0, 256, 256),
    LevelSpec::new(1, 512, 512),
    LevelSpec::new(2, 1024, 512),
    LevelSpec::new(3, 2048, 512),
];

/// Parameters for a full scene: cube conversion, tile pyramid and preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilingConfig {
    /// Side length of the rasterized cube faces every level is resized from.
    pub base_face_size: u32,
    /// Pyramid levels, ordered by increasing face size.
    pub levels: Vec<LevelSpec>,
    /// JPEG quality for tiles.
    pub tile_quality: u8,
    /// Side length of each face in the preview cross.
    pub preview_size: u32,
    /// JPEG quality for the preview.
    pub preview_quality: u8,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            base_face_size: 2048,
            levels: REFERENCE_LEVELS.to_vec(),
            tile_quality: 90,
            preview_size: 256,
            preview_quality: 85,
        }
    }
}

impl TilingConfig {
    /// Returns the reference configuration.
    pub fn reference() -> Self {
        Self::default()
    }

    /// Returns a copy with a different base face size.
    pub fn with_base_face_size(mut self, base_face_size: u32) -> Self {
        self.base_face_size = base_face_size;
        self
    }

    /// Loads a configuration from a JSON file. Missing fields take reference values.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants every stage relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_face_size == 0 {
            return Err(ConfigError::ZeroBaseFaceSize);
        }
        if self.preview_size == 0 {
            return Err(ConfigError::ZeroPreviewSize);
        }
        for quality in [self.tile_quality, self.preview_quality] {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::InvalidQuality(quality));
            }
        }
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }

        let mut seen = HashSet::new();
        for spec in &self.levels {
            if spec.face_size == 0 || spec.tile_size == 0 {
                return Err(ConfigError::ZeroSize(spec.level));
            }
            if !seen.insert(spec.level) {
                return Err(ConfigError::DuplicateLevel(spec.level));
            }
            let tiles = spec.tiles_per_face();
            if tiles > MAX_TILES_PER_FACE {
                return Err(ConfigError::TooManyTiles {
                    level: spec.level,
                    tiles,
                });
            }
        }
        for pair in self.levels.windows(2) {
            if pair[1].face_size <= pair[0].face_size {
                return Err(ConfigError::UnorderedLevels {
                    prev: pair[0].face_size,
                    next: pair[1].face_size,
                });
            }
        }

        Ok(())
    }

    /// Number of tile files one scene produces, saturating at `u64::MAX`.
    pub fn tiles_per_scene(&self) -> u64 {
        self.levels.iter().fold(0u64, |total, l| {
            total.saturating_add(l.tiles_per_face().saturating_mul(6))
        })
    }
}
