//! Export module for writing tiles and previews to disk.
//!
//! Everything is written as baseline RGB JPEG.

mod jpeg;
mod preview;

pub use jpeg::{write_jpeg, ExportError};
pub use preview::{compose_preview, write_preview, PREVIEW_FILE_NAME, PREVIEW_LAYOUT};
