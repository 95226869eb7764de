//! Equirectangular panorama to cube-map tile pyramid generator.
//!
//! This crate converts 360° equirectangular panoramas into six cube faces,
//! resizes them into a multi-resolution pyramid of fixed-size JPEG tiles and
//! writes a cross-layout preview thumbnail for a multires tour viewer.

pub mod cube;
pub mod export;
pub mod geometry;
pub mod logging;
pub mod pipeline;
pub mod source;
pub mod tiling;

pub use cube::{convert_to_cube, CubeFace, CubeFaceSet};
pub use geometry::CubeFaceId;
pub use pipeline::{
    generate_from_folder, BatchReport, ErrorKind, SceneError, SceneGenerator, SceneSummary,
};
pub use source::SourceImage;
pub use tiling::{LevelSpec, TilingConfig};
