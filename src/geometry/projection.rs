//! Mapping between cube-face pixels, view directions and equirectangular UVs.

use std::f64::consts::PI;

use glam::DVec3;

use super::face::CubeFaceId;

/// A 3-D unit view direction.
pub type Direction = DVec3;

/// Maps a pixel index to the face-plane coordinate of the pixel center.
///
/// The result lies in `[-1, 1)`.
#[inline]
pub fn pixel_to_face_plane(coord: u32, size: u32) -> f64 {
    (coord as f64 + 0.5) / size as f64 * 2.0 - 1.0
}

/// Returns the unnormalized point on the unit cube for face-plane
/// coordinates `(s, t)`, `t` growing downwards in image space.
///
/// The per-face axis table matches the Three.js `BoxGeometry` convention
/// the tile viewer renders with.
pub fn face_basis(face: CubeFaceId, s: f64, t: f64) -> DVec3 {
    match face {
        CubeFaceId::Right => DVec3::new(1.0, -t, -s),
        CubeFaceId::Left => DVec3::new(-1.0, -t, s),
        CubeFaceId::Up => DVec3::new(s, 1.0, t),
        CubeFaceId::Down => DVec3::new(s, -1.0, -t),
        CubeFaceId::Front => DVec3::new(s, -t, 1.0),
        CubeFaceId::Back => DVec3::new(-s, -t, -1.0),
    }
}

/// Converts a pixel on a `size × size` cube face to a unit direction.
///
/// # Example
/// ```
/// use panotile::geometry::{face_coord_to_direction, CubeFaceId};
///
/// let dir = face_coord_to_direction(CubeFaceId::Right, 0, 1023, 2048);
/// assert!((dir.length() - 1.0).abs() < 1e-9);
/// assert!(dir.x > 0.0);
/// ```
pub fn face_coord_to_direction(face: CubeFaceId, x: u32, y: u32, size: u32) -> Direction {
    let s = pixel_to_face_plane(x, size);
    let t = pixel_to_face_plane(y, size);
    face_basis(face, s, t).normalize()
}

/// Converts a unit direction to equirectangular `(u, v)` in `[0, 1]`.
///
/// `u = 0.5` looks down +Z, `v = 0` is the top pole and `v = 1` the bottom pole.
pub fn direction_to_equirect(dir: Direction) -> (f64, f64) {
    let u = 0.5 + dir.x.atan2(dir.z) / (2.0 * PI);
    // Rounding can push |y| a hair past 1.0, which would make asin NaN.
    let v = 0.5 - dir.y.clamp(-1.0, 1.0).asin() / PI;
    (u, v)
}

/// Converts equirectangular `(u, v)` back to a unit direction.
pub fn equirect_to_direction(u: f64, v: f64) -> Direction {
    let lon = (u - 0.5) * 2.0 * PI;
    let lat = (0.5 - v) * PI;
    let (slon, clon) = lon.sin_cos();
    let (slat, clat) = lat.sin_cos();
    DVec3::new(clat * slon, slat, clat * clon)
}
