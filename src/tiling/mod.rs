//! Tile pyramid module.
//!
//! Resizes each cube face to every configured level and slices it into
//! fixed-size, black-padded JPEG tiles.

mod config;
mod pyramid;

pub use config::{ConfigError, LevelSpec, TilingConfig, MAX_TILES_PER_FACE, REFERENCE_LEVELS};
pub use pyramid::{
    build_level_tiles, generate_pyramid, slice_into_tiles, tile_path, write_level_tiles, Tile,
};
