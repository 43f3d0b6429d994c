//! Colour used to clear each frame

use serde::{Deserialize, Serialize};

/// RGBA colour, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Opaque colour
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Colour with explicit alpha
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
