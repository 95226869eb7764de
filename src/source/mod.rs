//! Source panorama module.
//!
//! Reads equirectangular JPEG/PNG files into an immutable RGB grid and
//! classifies the ways that can fail.

mod panorama;

pub use panorama::{LoadError, SourceImage};
