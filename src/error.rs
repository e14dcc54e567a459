use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A zero-length (or non-finite) vector was about to be normalized.
    #[error("cannot normalize degenerate vector {vector:?}")]
    DegenerateVector { vector: glam::Vec3 },
    #[error("sphere radius must be positive and finite, got {radius}")]
    InvalidSphere { radius: f32 },
    #[error("resolution must be non-zero, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },
    #[error("field of view must be within (0, 180) degrees, got {fov}")]
    InvalidFieldOfView { fov: f32 },
    #[error("blend factor must be within [0, 1], got {factor}")]
    InvalidBlendFactor { factor: f32 },
    #[error("pixel ({x}, {y}) is outside of the {width}x{height} frame")]
    PixelOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("failed to read scene file {path:?}: {source}")]
    SceneFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scene file: {0}")]
    SceneParse(#[from] toml::de::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
