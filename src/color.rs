use std::ops::Add;

use crate::error::{Error, Result};

/// 8-bit RGBA color. Every operation saturates into `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    /// Opaque black, the background of every scene.
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    /// Fully transparent black. Contributes nothing to an additive combine.
    pub const ZERO: Color = Color::rgba(0, 0, 0, 0);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Scale the color channels by `factor`, truncating toward zero.
    /// The result is a fresh opaque color; alpha is not scaled.
    pub fn scale(self, factor: f32) -> Self {
        Self::new(
            scale_channel(self.r, factor),
            scale_channel(self.g, factor),
            scale_channel(self.b, factor),
        )
    }

    /// Per-channel linear interpolation toward `other`, rounded to nearest.
    pub fn lerp(self, other: Color, t: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&t) {
            return Err(Error::InvalidBlendFactor { factor: t });
        }
        let channel = |x: u8, y: u8| {
            let v = x as f32 * (1.0 - t) + y as f32 * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Ok(Self::rgba(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
            channel(self.a, other.a),
        ))
    }

    /// Per-channel product, saturating at 255. Alpha stays opaque.
    pub fn mul_clamped(self, other: Color) -> Self {
        let channel = |x: u8, y: u8| (x as u32 * y as u32).min(255) as u8;
        Self::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    pub fn saturating_add(self, other: Color) -> Self {
        Self::rgba(
            self.r.saturating_add(other.r),
            self.g.saturating_add(other.g),
            self.b.saturating_add(other.b),
            self.a.saturating_add(other.a),
        )
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn scale_channel(channel: u8, factor: f32) -> u8 {
    // `as u8` truncates and maps NaN to zero.
    (channel as f32 * factor).clamp(0.0, 255.0) as u8
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        self.saturating_add(rhs)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(color: Color) -> Self {
        image::Rgba(color.to_rgba())
    }
}
