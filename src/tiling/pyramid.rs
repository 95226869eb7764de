//! Multi-resolution tile pyramid generation.

use std::path::{Path, PathBuf};

use image::imageops;
use image::RgbImage;
use rayon::prelude::*;

use crate::cube::{CubeFace, CubeFaceSet};
use crate::export::{write_jpeg, ExportError};
use crate::geometry::CubeFaceId;

use super::config::LevelSpec;

/// One `tile_size × tile_size` slice of a face at one pyramid level.
#[derive(Debug, Clone)]
pub struct Tile {
    pub face: CubeFaceId,
    pub level: u32,
    pub row: u32,
    pub col: u32,
    pub image: RgbImage,
}

/// Returns `output_dir/level/face/row/col.jpg`.
pub fn tile_path(output_dir: &Path, level: u32, face: CubeFaceId, row: u32, col: u32) -> PathBuf {
    output_dir
        .join(level.to_string())
        .join(face.short_name())
        .join(row.to_string())
        .join(format!("{}.jpg", col))
}

/// Cuts `image` into a `grid × grid` set of tiles for `spec`.
///
/// Cells that run past the right or bottom edge are pasted at the top-left
/// of a black `tile_size × tile_size` canvas, so every tile has full size.
pub fn slice_into_tiles(image: &RgbImage, face: CubeFaceId, spec: &LevelSpec) -> Vec<Tile> {
    let tile_size = spec.tile_size;
    let grid = spec.grid_size();
    let (width, height) = image.dimensions();

    let mut tiles = Vec::with_capacity(spec.tiles_per_face() as usize);
    for row in 0..grid {
        for col in 0..grid {
            let left = col * tile_size;
            let top = row * tile_size;
            let w = tile_size.min(width.saturating_sub(left));
            let h = tile_size.min(height.saturating_sub(top));

            let crop = imageops::crop_imm(image, left, top, w, h).to_image();
            let tile_image = if (w, h) == (tile_size, tile_size) {
                crop
            } else {
                let mut padded = RgbImage::new(tile_size, tile_size);
                imageops::replace(&mut padded, &crop, 0, 0);
                padded
            };

            tiles.push(Tile {
                face,
                level: spec.level,
                row,
                col,
                image: tile_image,
            });
        }
    }

    tiles
}

/// Resizes `face` to the level's face size and slices it into tiles.
pub fn build_level_tiles(face: &CubeFace, spec: &LevelSpec) -> Vec<Tile> {
    let resized = face.resized(spec.face_size);
    slice_into_tiles(&resized, face.id, spec)
}

/// Builds and writes every tile of one face at one level.
///
/// Returns the number of tiles written.
pub fn write_level_tiles(
    face: &CubeFace,
    spec: &LevelSpec,
    output_dir: &Path,
    quality: u8,
) -> Result<usize, ExportError> {
    let tiles = build_level_tiles(face, spec);
    for tile in &tiles {
        let path = tile_path(output_dir, tile.level, tile.face, tile.row, tile.col);
        write_jpeg(&tile.image, &path, quality)?;
    }
    Ok(tiles.len())
}

/// Writes the full pyramid for every level and face.
///
/// Each (level, face) pair resizes from the base face set independently,
/// so all pairs run in parallel. `on_level_face` receives
/// `(level, face, tiles_written)` from worker threads. Returns the total
/// number of tiles written, or the first error encountered.
pub fn generate_pyramid<F>(
    faces: &CubeFaceSet,
    levels: &[LevelSpec],
    output_dir: &Path,
    quality: u8,
    on_level_face: F,
) -> Result<usize, ExportError>
where
    F: Fn(u32, CubeFaceId, usize) + Sync,
{
    let jobs: Vec<(&LevelSpec, &CubeFace)> = levels
        .iter()
        .flat_map(move |spec| faces.iter().map(move |face| (spec, face)))
        .collect();

    let counts = jobs
        .par_iter()
        .map(|&(spec, face)| {
            let written = write_level_tiles(face, spec, output_dir, quality)?;
            on_level_face(spec.level, face.id, written);
            Ok::<usize, ExportError>(written)
        })
        .collect::<Result<Vec<usize>, ExportError>>()?;

    Ok(counts.into_iter().sum())
}
