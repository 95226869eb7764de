//! JPEG export for tiles and previews.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::RgbImage;
use jpeg_encoder::{ColorType, Encoder, EncodingError};
use thiserror::Error;

/// Errors that can occur while writing output images.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: EncodingError,
    },
    #[error("Cannot encode {path}: {width}x{height} exceeds the JPEG limit of 65535")]
    Dimensions { path: PathBuf, width: u32, height: u32 },
}

/// Writes an RGB image as a JPEG with optimized Huffman tables, creating
/// parent directories.
///
/// # Arguments
/// * `image` - Pixels to encode
/// * `path` - Output file path
/// * `quality` - JPEG quality (1-100)
pub fn write_jpeg(image: &RgbImage, path: &Path, quality: u8) -> Result<(), ExportError> {
    let (width, height) = image.dimensions();
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(ExportError::Dimensions {
            path: path.to_path_buf(),
            width,
            height,
        });
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let write_err = |source: std::io::Error| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);

    let mut encoder = Encoder::new(&mut writer, quality);
    encoder.set_optimized_huffman_tables(true);
    encoder
        .encode(image.as_raw(), w, h, ColorType::Rgb)
        .map_err(|e| match e {
            EncodingError::IoError(source) => write_err(source),
            other => ExportError::Encode {
                path: path.to_path_buf(),
                source: other,
            },
        })?;

    writer.flush().map_err(write_err)?;
    Ok(())
}
