//! Cube-map construction.
//!
//! Provides the CubeFace and CubeFaceSet data structures and the
//! inverse-sampling rasterizer that fills them from a panorama.

mod face;
mod rasterize;

pub use face::{CubeFace, CubeFaceSet, FaceSetError};
pub use rasterize::{convert_to_cube, equirect_to_source_pixel, rasterize_face, sample_face_pixel};
