//! Cube face images and the six-face set.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use thiserror::Error;

use crate::geometry::CubeFaceId;

/// Errors raised when assembling a [`CubeFaceSet`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FaceSetError {
    #[error("Missing cube face '{0}'")]
    MissingFace(CubeFaceId),
    #[error("Cube face '{0}' supplied more than once")]
    DuplicateFace(CubeFaceId),
    #[error("Cube face '{face}' is not square ({width}x{height})")]
    NotSquare {
        face: CubeFaceId,
        width: u32,
        height: u32,
    },
    #[error("Cube face '{face}' is {found}px, expected {expected}px")]
    SizeMismatch {
        face: CubeFaceId,
        expected: u32,
        found: u32,
    },
}

/// A single square face of the cube map.
#[derive(Debug, Clone)]
pub struct CubeFace {
    /// Which face of the cube this represents.
    pub id: CubeFaceId,
    /// RGB pixels in row-major order.
    pub image: RgbImage,
}

impl CubeFace {
    /// Creates a face from an existing image.
    pub fn new(id: CubeFaceId, image: RgbImage) -> Self {
        Self { id, image }
    }

    /// Creates a `size × size` face filled with one color.
    pub fn filled(id: CubeFaceId, size: u32, color: Rgb<u8>) -> Self {
        Self::new(id, RgbImage::from_pixel(size, size, color))
    }

    /// Side length in pixels.
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    /// Returns the face resampled to `size × size` with a Lanczos3 filter.
    ///
    /// A face already at the requested size is copied unchanged.
    pub fn resized(&self, size: u32) -> RgbImage {
        if self.image.dimensions() == (size, size) {
            return self.image.clone();
        }
        imageops::resize(&self.image, size, size, FilterType::Lanczos3)
    }
}

/// All six faces of a cube map, keyed by [`CubeFaceId`], sharing one side length.
#[derive(Debug, Clone)]
pub struct CubeFaceSet {
    faces: [CubeFace; 6],
}

impl CubeFaceSet {
    /// Assembles a set, checking that each face appears exactly once and
    /// that all faces are square with the same side length.
    pub fn from_faces<I>(faces: I) -> Result<Self, FaceSetError>
    where
        I: IntoIterator<Item = CubeFace>,
    {
        let mut slots: [Option<CubeFace>; 6] = Default::default();

        for face in faces {
            let (width, height) = face.image.dimensions();
            if width != height {
                return Err(FaceSetError::NotSquare {
                    face: face.id,
                    width,
                    height,
                });
            }
            let slot = &mut slots[face.id.index()];
            if slot.is_some() {
                return Err(FaceSetError::DuplicateFace(face.id));
            }
            *slot = Some(face);
        }

        // Slots are in CubeFaceId order; the first empty one is reported.
        let missing = FaceSetError::MissingFace;
        let [f, r, b, l, u, d] = slots;
        let faces = [
            f.ok_or(missing(CubeFaceId::Front))?,
            r.ok_or(missing(CubeFaceId::Right))?,
            b.ok_or(missing(CubeFaceId::Back))?,
            l.ok_or(missing(CubeFaceId::Left))?,
            u.ok_or(missing(CubeFaceId::Up))?,
            d.ok_or(missing(CubeFaceId::Down))?,
        ];

        let expected = faces[0].size();
        if let Some(face) = faces.iter().find(|f| f.size() != expected) {
            return Err(FaceSetError::SizeMismatch {
                face: face.id,
                expected,
                found: face.size(),
            });
        }

        Ok(Self { faces })
    }

    /// Wraps faces already stored in [`CubeFaceId`] order at one size.
    pub(crate) fn from_ordered(faces: [CubeFace; 6]) -> Self {
        debug_assert!(faces.iter().enumerate().all(|(i, f)| f.id.index() == i));
        debug_assert!(faces.iter().all(|f| f.size() == faces[0].size()));
        Self { faces }
    }

    /// Returns a reference to a specific face.
    pub fn face(&self, id: CubeFaceId) -> &CubeFace {
        &self.faces[id.index()]
    }

    /// Side length shared by all faces.
    pub fn face_size(&self) -> u32 {
        self.faces[0].size()
    }

    /// Iterates the faces in [`CubeFaceId::all`] order.
    pub fn iter(&self) -> impl Iterator<Item = &CubeFace> {
        self.faces.iter()
    }
}
