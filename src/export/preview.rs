//! Cross-layout preview thumbnail of a cube map.
//!
//! ```text
//!       [u]
//!   [l] [f] [r] [b]
//!       [d]
//! ```

use std::path::{Path, PathBuf};

use image::imageops;
use image::RgbImage;

use crate::cube::CubeFaceSet;
use crate::geometry::CubeFaceId;

use super::jpeg::{write_jpeg, ExportError};

/// File name of the preview inside a scene directory.
pub const PREVIEW_FILE_NAME: &str = "preview.jpg";

/// Grid cell `(column, row)` of each face in the 4x3 preview cross.
pub const PREVIEW_LAYOUT: [(CubeFaceId, u32, u32); 6] = [
    (CubeFaceId::Up, 1, 0),
    (CubeFaceId::Left, 0, 1),
    (CubeFaceId::Front, 1, 1),
    (CubeFaceId::Right, 2, 1),
    (CubeFaceId::Back, 3, 1),
    (CubeFaceId::Down, 1, 2),
];

/// Composes the `4·size × 3·size` preview cross. Unused cells stay black.
pub fn compose_preview(faces: &CubeFaceSet, preview_size: u32) -> RgbImage {
    let mut canvas = RgbImage::new(preview_size * 4, preview_size * 3);

    for (id, col, row) in PREVIEW_LAYOUT {
        let resized = faces.face(id).resized(preview_size);
        imageops::replace(
            &mut canvas,
            &resized,
            (col * preview_size) as i64,
            (row * preview_size) as i64,
        );
    }

    canvas
}

/// Composes the preview and writes it as `preview.jpg` in `output_dir`.
///
/// Returns the path written.
pub fn write_preview(
    faces: &CubeFaceSet,
    output_dir: &Path,
    preview_size: u32,
    quality: u8,
) -> Result<PathBuf, ExportError> {
    let canvas = compose_preview(faces, preview_size);
    let path = output_dir.join(PREVIEW_FILE_NAME);
    write_jpeg(&canvas, &path, quality)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::CubeFace;
    use image::Rgb;
    use tempfile::tempdir;

    fn face_color(id: CubeFaceId) -> Rgb<u8> {
        match id {
            CubeFaceId::Front => Rgb([255, 0, 0]),
            CubeFaceId::Right => Rgb([0, 255, 0]),
            CubeFaceId::Back => Rgb([0, 0, 255]),
            CubeFaceId::Left => Rgb([255, 255, 0]),
            CubeFaceId::Up => Rgb([0, 255, 255]),
            CubeFaceId::Down => Rgb([255, 0, 255]),
        }
    }

    fn solid_set(size: u32) -> CubeFaceSet {
        CubeFaceSet::from_faces(
            CubeFaceId::all()
                .into_iter()
                .map(|id| CubeFace::filled(id, size, face_color(id))),
        )
        .unwrap()
    }

    fn cell_pixels(img: &RgbImage, col: u32, row: u32, size: u32) -> impl Iterator<Item = Rgb<u8>> + '_ {
        (0..size).flat_map(move |y| {
            (0..size).map(move |x| *img.get_pixel(col * size + x, row * size + y))
        })
    }

    #[test]
    fn test_compose_preview_layout() {
        let preview = compose_preview(&solid_set(256), 256);
        assert_eq!(preview.dimensions(), (1024, 768));

        for (id, col, row) in PREVIEW_LAYOUT {
            assert!(
                cell_pixels(&preview, col, row, 256).all(|p| p == face_color(id)),
                "cell ({}, {}) should be face {:?}",
                col,
                row,
                id
            );
        }

        for (col, row) in [(0, 0), (2, 0), (3, 0), (0, 2), (2, 2), (3, 2)] {
            assert!(
                cell_pixels(&preview, col, row, 256).all(|p| p == Rgb([0, 0, 0])),
                "cell ({}, {}) should be black",
                col,
                row
            );
        }
    }

    #[test]
    fn test_compose_preview_resizes_faces() {
        let preview = compose_preview(&solid_set(40), 16);
        assert_eq!(preview.dimensions(), (64, 48));

        // Lanczos on a flat face may be off by a rounding step.
        for (id, col, row) in PREVIEW_LAYOUT {
            let expected = face_color(id);
            for p in cell_pixels(&preview, col, row, 16) {
                for (a, b) in p.0.iter().zip(expected.0) {
                    assert!((*a as i32 - b as i32).abs() <= 1, "{:?} vs {:?}", p, expected);
                }
            }
        }
        assert!(cell_pixels(&preview, 0, 0, 16).all(|p| p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_write_preview() {
        let dir = tempdir().unwrap();
        let path = write_preview(&solid_set(32), dir.path(), 32, 85).unwrap();

        assert_eq!(path, dir.path().join("preview.jpg"));
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (128, 96));
    }
}
