//! Cube face identification and enumeration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies which face of the cube map a pixel belongs to.
///
/// The order of the variants is the order faces are written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CubeFaceId {
    /// +Z face
    Front = 0,
    /// +X face
    Right = 1,
    /// -Z face
    Back = 2,
    /// -X face
    Left = 3,
    /// +Y face
    Up = 4,
    /// -Y face
    Down = 5,
}

impl CubeFaceId {
    /// Returns all six cube faces in order.
    pub const fn all() -> [CubeFaceId; 6] {
        [
            CubeFaceId::Front,
            CubeFaceId::Right,
            CubeFaceId::Back,
            CubeFaceId::Left,
            CubeFaceId::Up,
            CubeFaceId::Down,
        ]
    }

    /// Returns the face index (0-5).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the one-letter label used as the face directory name.
    pub const fn short_name(self) -> &'static str {
        match self {
            CubeFaceId::Front => "f",
            CubeFaceId::Right => "r",
            CubeFaceId::Back => "b",
            CubeFaceId::Left => "l",
            CubeFaceId::Up => "u",
            CubeFaceId::Down => "d",
        }
    }
}

impl fmt::Display for CubeFaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
