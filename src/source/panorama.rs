//! Loading equirectangular source panoramas.

use std::path::{Path, PathBuf};

use image::{ImageError, ImageReader, Rgb, RgbImage};
use thiserror::Error;

/// Errors that can occur while loading a source panorama.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Input not found: {0}")]
    NotFound(PathBuf),
    #[error("Unsupported image format for {path}: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Source image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

impl LoadError {
    fn from_image_error(path: &Path, err: ImageError) -> Self {
        let path = path.to_path_buf();
        match err {
            ImageError::Unsupported(e) => LoadError::UnsupportedFormat {
                path,
                reason: e.to_string(),
            },
            // Truncated or garbled streams surface as IO errors from the decoders.
            ImageError::IoError(source)
                if matches!(
                    source.kind(),
                    std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::InvalidData
                ) =>
            {
                LoadError::Decode {
                    path,
                    reason: source.to_string(),
                }
            }
            ImageError::IoError(source) => LoadError::Io { path, source },
            other => LoadError::Decode {
                path,
                reason: other.to_string(),
            },
        }
    }

    fn from_io_error(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound(path.to_path_buf())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// An immutable equirectangular RGB panorama, origin at the top-left.
///
/// Alpha is dropped on load.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: RgbImage,
}

impl SourceImage {
    /// Wraps an RGB buffer. Fails if the buffer has no pixels.
    pub fn new(pixels: RgbImage) -> Result<Self, LoadError> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(LoadError::Empty { width, height });
        }
        Ok(Self { pixels })
    }

    /// Reads and decodes a JPEG or PNG file.
    ///
    /// The format is sniffed from the file contents, falling back to the extension.
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        if !path.is_file() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let decoded = ImageReader::open(path)
            .map_err(|e| LoadError::from_io_error(path, e))?
            .with_guessed_format()
            .map_err(|e| LoadError::from_io_error(path, e))?
            .decode()
            .map_err(|e| LoadError::from_image_error(path, e))?;

        Self::new(decoded.into_rgb8())
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Returns the pixel at column `x`, row `y`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.pixels.get_pixel(x, y)
    }
}
