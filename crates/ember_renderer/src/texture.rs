//! Textures: solid color, checker, Perlin noise, and image-backed.

use crate::perlin::Perlin;
use crate::{Color, TextureError};
use ember_math::Vec3;
use rand::RngCore;
use std::path::Path;
use std::sync::Arc;

/// A color field over surface coordinates and world position.
pub trait Texture: Send + Sync {
    /// Sample the texture at UV coordinates `(u, v)` and hit point `p`.
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A single uniform color.
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    /// Create a solid texture from a color.
    pub fn from_color(color: Color) -> Self {
        Self { color }
    }

    /// Create a solid texture from RGB components.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            color: Color::new(r, g, b),
        }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// A 3D checker pattern alternating between two textures.
pub struct Checker {
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl Checker {
    /// Create a checker from two textures.
    pub fn new(even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self { even, odd }
    }

    /// Create a checker from two solid colors.
    pub fn from_colors(even: Color, odd: Color) -> Self {
        Self {
            even: Arc::new(SolidColor::from_color(even)),
            odd: Arc::new(SolidColor::from_color(odd)),
        }
    }
}

impl Texture for Checker {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
        if sines > 0.0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Marble-like texture: a sine phase-modulated by Perlin turbulence.
pub struct Noise {
    perlin: Perlin,
    scale: f32,
}

impl Noise {
    /// Create a noise texture; `scale` stretches the pattern in space.
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            perlin: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for Noise {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        0.5 * Color::ONE * (1.0 + (self.scale * p.z + 10.0 * self.perlin.turbulence(p, 7)).sin())
    }
}

/// A texture backed by an RGB8 image in memory.
///
/// Rows are stored top-first, 3 bytes per pixel.
pub struct ImageTexture {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl ImageTexture {
    /// Wrap an RGB8 pixel buffer. `data` must hold exactly
    /// `width * height * 3` bytes in row-major order, top row first.
    pub fn from_rgb8(data: Vec<u8>, width: u32, height: u32) -> Result<Self, TextureError> {
        let need = (width * height * 3) as usize;
        if width == 0 || height == 0 || data.len() != need {
            return Err(TextureError::BadDimensions {
                width,
                height,
                got: data.len(),
                need,
            });
        }

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Load a texture image from a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let image = image::open(path)?.to_rgb8();
        let (width, height) = image.dimensions();
        Self::from_rgb8(image.into_raw(), width, height)
    }

    /// Load a texture image, substituting solid black if loading fails so
    /// rendering can continue.
    pub fn open_or_black(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(texture) => texture,
            Err(err) => {
                log::error!(
                    "could not load texture image {}: {}; using black",
                    path.display(),
                    err
                );
                Self {
                    data: vec![0, 0, 0],
                    width: 1,
                    height: 1,
                }
            }
        }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        // Clamp to [0,1] and flip v so v=0 maps to the bottom row.
        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0);

        let i = ((u * self.width as f32) as u32).min(self.width - 1);
        let j = ((v * self.height as f32) as u32).min(self.height - 1);

        let index = ((j * self.width + i) * 3) as usize;
        Color::new(
            self.data[index] as f32,
            self.data[index + 1] as f32,
            self.data[index + 2] as f32,
        ) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_solid_color() {
        let tex = SolidColor::new(1.0, 0.5, 0.0);
        let sample = tex.value(0.3, 0.9, Vec3::new(7.0, -2.0, 0.1));
        assert_eq!(sample, Color::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_checker_alternates() {
        let tex = Checker::from_colors(Color::ONE, Color::ZERO);

        // sin(10 * 0.157..) > 0 on all axes near pi/20
        let a = tex.value(0.0, 0.0, Vec3::splat(0.157));
        // Flipping one axis sign flips the parity
        let b = tex.value(0.0, 0.0, Vec3::new(-0.157, 0.157, 0.157));
        assert_ne!(a, b);
    }

    #[test]
    fn test_noise_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let tex = Noise::new(4.0, &mut rng);

        for i in 0..200 {
            let p = Vec3::new(i as f32 * 0.13, i as f32 * 0.29, i as f32 * -0.07);
            let c = tex.value(0.0, 0.0, p);
            assert!(c.x >= 0.0 && c.x <= 1.0);
            // Gray-scale output
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
        }
    }

    #[test]
    fn test_image_texture_sampling() {
        // 2x2 image: top row red, green; bottom row blue, white
        let data = vec![
            255, 0, 0, /* */ 0, 255, 0, //
            0, 0, 255, /* */ 255, 255, 255,
        ];
        let tex = ImageTexture::from_rgb8(data, 2, 2).unwrap();

        // v=1 is the top row after the flip
        let top_left = tex.value(0.0, 1.0, Vec3::ZERO);
        assert!((top_left - Color::new(1.0, 0.0, 0.0)).length() < 1e-4);

        let bottom_left = tex.value(0.0, 0.0, Vec3::ZERO);
        assert!((bottom_left - Color::new(0.0, 0.0, 1.0)).length() < 1e-4);

        let bottom_right = tex.value(1.0, 0.0, Vec3::ZERO);
        assert!((bottom_right - Color::ONE).length() < 1e-4);
    }

    #[test]
    fn test_image_texture_clamps_uv() {
        let data = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let tex = ImageTexture::from_rgb8(data, 2, 2).unwrap();

        // Out-of-range coordinates clamp instead of wrapping
        let clamped = tex.value(5.0, 3.0, Vec3::ZERO);
        let corner = tex.value(1.0, 1.0, Vec3::ZERO);
        assert_eq!(clamped, corner);
    }

    #[test]
    fn test_image_texture_bad_dimensions() {
        assert!(matches!(
            ImageTexture::from_rgb8(vec![0, 0, 0], 2, 2),
            Err(TextureError::BadDimensions { .. })
        ));
    }

    #[test]
    fn test_missing_image_falls_back_to_black() {
        let tex = ImageTexture::open_or_black("/definitely/not/a/real/texture.png");
        assert_eq!(tex.value(0.5, 0.5, Vec3::ZERO), Color::ZERO);
    }
}
