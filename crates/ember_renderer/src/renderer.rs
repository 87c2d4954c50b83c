//! Core path tracing renderer.
//!
//! `ray_color` is the recursive radiance estimator. Emission is collected at
//! every hit; specular materials continue along their single scattered ray,
//! and diffuse materials sample an outgoing direction from a 50/50 mixture of
//! the material's own distribution and direct light sampling, dividing by the
//! mixture density to keep the estimator unbiased.

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::pdf::{HittablePdf, MixturePdf, Pdf};
use crate::rng::gen_f32;
use crate::{Camera, Color, Ray, ScatterRecord};
use ember_math::Interval;
use rand::RngCore;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Background color when a ray escapes the scene
    pub background: Color,
    /// Global seed; every worker RNG stream derives from it
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            samples_per_pixel: 100,
            max_depth: 50,
            background: Color::ZERO,
            seed: 0,
        }
    }
}

/// Compute the color seen by a ray.
///
/// `lights` are the importance-sampling targets; pass an empty list to fall
/// back to pure material sampling.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    lights: &HittableList,
    background: Color,
    depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    // Bounce limit exhausted: no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();

    // The 0.001 floor keeps scattered rays from re-hitting their origin
    // surface through floating point roundoff (shadow acne).
    if !world.hit(ray, Interval::new(0.001, f32::INFINITY), &mut rec, rng) {
        return background;
    }

    let emitted = rec.material.emitted(rec.u, rec.v, rec.p, &rec);

    let Some(scatter) = rec.material.scatter(ray, &rec, rng) else {
        // Absorbed: emitters end the path here
        return emitted;
    };

    match scatter {
        ScatterRecord::Specular { ray: specular_ray, attenuation } => {
            // The outgoing ray is fully determined; no density weighting
            emitted
                + attenuation
                    * ray_color(&specular_ray, world, lights, background, depth - 1, rng)
        }
        ScatterRecord::Diffuse { pdf, attenuation } => {
            let (direction, pdf_value) = if lights.is_empty() {
                let direction = pdf.sample(rng);
                let value = pdf.value(direction, rng);
                (direction, value)
            } else {
                let light_pdf = HittablePdf::new(lights, rec.p);
                let mixture = MixturePdf::new(&light_pdf, pdf.as_ref());
                let direction = mixture.sample(rng);
                let value = mixture.value(direction, rng);
                (direction, value)
            };

            // A zero density would blow up the estimator; such samples
            // contribute nothing.
            if pdf_value <= 0.0 {
                return emitted;
            }

            let scattered = Ray::new(rec.p, direction, ray.time);
            let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);

            emitted
                + attenuation
                    * scattering_pdf
                    * ray_color(&scattered, world, lights, background, depth - 1, rng)
                    / pdf_value
        }
    }
}

/// Render a single pixel with multi-sampling, returning the average linear
/// color. Pixel (0, 0) is the top-left corner.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    lights: &HittableList,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / (config.width - 1) as f32;
        let t = ((config.height - 1 - y) as f32 + gen_f32(rng)) / (config.height - 1) as f32;

        let ray = camera.ray(s, t, rng);
        pixel_color += ray_color(&ray, world, lights, config.background, config.max_depth, rng);
    }

    pixel_color / config.samples_per_pixel as f32
}

/// Convert an averaged linear color to 8-bit RGB.
///
/// NaN channels (0/0 in the estimator) become black, then gamma-2 correction
/// and a clamp to [0, 0.999] map each channel to an integer in [0, 255].
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let mut out = [0u8; 3];
    for (slot, channel) in out.iter_mut().zip([color.x, color.y, color.z]) {
        let linear = if channel.is_nan() { 0.0 } else { channel };
        let gamma = linear.max(0.0).sqrt();
        *slot = (256.0 * gamma.clamp(0.0, 0.999)) as u8;
    }
    out
}

/// Simple image buffer for storing render output.
///
/// Pixels are linear colors in row-major order, top row first.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to 8-bit RGB bytes, top row first.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 3) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color));
        }
        bytes
    }
}
