//! Error types for scene construction and texture loading.

use thiserror::Error;

/// Errors raised while assembling a scene.
///
/// Degenerate geometry is rejected when a primitive is built; there is no
/// recovery path, the caller fixes the scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("sphere radius must be positive (got {0})")]
    NonPositiveRadius(f32),

    #[error("motion interval is degenerate (shutter times {0} and {1})")]
    DegenerateMotion(f32, f32),

    #[error("rectangle bounds are inverted or empty ({r0}..{r1} x {s0}..{s1})")]
    InvertedRect { r0: f32, r1: f32, s0: f32, s1: f32 },

    #[error("box corners must satisfy p0 < p1 on every axis")]
    InvertedBox,

    #[error("medium density must be positive (got {0})")]
    NonPositiveDensity(f32),

    #[error("cannot build a BVH from an empty object list")]
    EmptyBvh,
}

/// Errors that can occur while loading a texture image.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to load texture image: {0}")]
    Image(#[from] image::ImageError),

    #[error("pixel buffer holds {got} bytes but {width}x{height} RGB needs {need}")]
    BadDimensions {
        width: u32,
        height: u32,
        got: usize,
        need: usize,
    },
}
