//! Inverse-sampling an equirectangular panorama onto cube faces.

use image::{Rgb, RgbImage};
use rayon::prelude::*;

use crate::geometry::{direction_to_equirect, face_coord_to_direction, CubeFaceId};
use crate::source::SourceImage;

use super::face::{CubeFace, CubeFaceSet};

/// Maps equirectangular `(u, v)` to the nearest source pixel.
///
/// Indices are clamped to the image even though `u, v ∈ [0, 1]` already
/// keeps them in range, so rounding can never step one past the edge.
#[inline]
pub fn equirect_to_source_pixel(u: f64, v: f64, width: u32, height: u32) -> (u32, u32) {
    let max_x = width.saturating_sub(1);
    let max_y = height.saturating_sub(1);
    // `as u32` saturates negatives and NaN to zero.
    let x = ((u * max_x as f64).floor() as u32).min(max_x);
    let y = ((v * max_y as f64).floor() as u32).min(max_y);
    (x, y)
}

/// Samples the source color seen through pixel `(x, y)` of a `size × size` face.
///
/// Nearest-neighbor, no interpolation.
#[inline]
pub fn sample_face_pixel(source: &SourceImage, face: CubeFaceId, x: u32, y: u32, size: u32) -> Rgb<u8> {
    let dir = face_coord_to_direction(face, x, y, size);
    let (u, v) = direction_to_equirect(dir);
    let (sx, sy) = equirect_to_source_pixel(u, v, source.width(), source.height());
    source.pixel(sx, sy)
}

/// Rasterizes one `size × size` cube face from the source panorama.
///
/// Rows are filled in parallel using rayon.
pub fn rasterize_face(source: &SourceImage, face: CubeFaceId, size: u32) -> CubeFace {
    let mut image = RgbImage::new(size, size);
    if size == 0 {
        return CubeFace::new(face, image);
    }

    let row_len = size as usize * 3;
    image
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(3).enumerate() {
                let Rgb(rgb) = sample_face_pixel(source, face, x as u32, y as u32, size);
                px.copy_from_slice(&rgb);
            }
        });

    CubeFace::new(face, image)
}

/// Converts a panorama into all six cube faces at `face_size`.
///
/// Faces are rasterized in parallel; `on_face` is called from worker
/// threads as each face completes.
pub fn convert_to_cube<F>(source: &SourceImage, face_size: u32, on_face: F) -> CubeFaceSet
where
    F: Fn(CubeFaceId) + Sync,
{
    let mut faces = CubeFaceId::all().map(|id| CubeFace::new(id, RgbImage::default()));

    faces.par_iter_mut().for_each(|face| {
        *face = rasterize_face(source, face.id, face_size);
        on_face(face.id);
    });

    CubeFaceSet::from_ordered(faces)
}
