//! Cube-map geometry module.
//!
//! Provides face identification and the projections between cube-face
//! pixels, 3-D view directions and equirectangular texture coordinates.

mod face;
mod projection;

pub use face::CubeFaceId;
pub use projection::{
    Direction, direction_to_equirect, equirect_to_direction, face_basis,
    face_coord_to_direction, pixel_to_face_plane,
};
