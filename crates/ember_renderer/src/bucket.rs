//! Bucket-based tile rendering.
//!
//! The image is divided into tiles (buckets) that render independently. Each
//! bucket owns an RNG stream seeded from the global seed and the bucket's
//! coordinates, so the output is byte-identical no matter how many workers
//! run or in what order buckets complete.

use crate::hittable::{Hittable, HittableList};
use crate::renderer::{render_pixel, ImageBuffer, RenderConfig};
use crate::{Camera, Color};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    /// X coordinate of the bucket's top-left corner
    pub x: u32,
    /// Y coordinate of the bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate the grid of buckets covering an image, row-major.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh));
            x += bucket_size;
        }
        y += bucket_size;
    }

    buckets
}

/// The RNG stream for one bucket.
///
/// Seeded from the global seed and the bucket coordinates, not the bucket's
/// position in the work queue, so scheduling cannot change the image.
fn bucket_rng(seed: u64, bucket: &Bucket) -> Xoshiro256PlusPlus {
    let coords = ((bucket.x as u64) << 32) | bucket.y as u64;
    Xoshiro256PlusPlus::seed_from_u64(seed ^ coords.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Render a single bucket to a vector of colors.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    lights: &HittableList,
    config: &RenderConfig,
) -> Vec<Color> {
    let mut rng = bucket_rng(config.seed, bucket);
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            pixels.push(render_pixel(
                camera, world, lights, global_x, global_y, config, &mut rng,
            ));
        }
    }

    pixels
}

/// Copy a rendered bucket into the output image.
fn blit(image: &mut ImageBuffer, bucket: &Bucket, pixels: &[Color]) {
    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let color = pixels[(local_y * bucket.width + local_x) as usize];
            image.set(bucket.x + local_x, bucket.y + local_y, color);
        }
    }
}

/// Render the scene on the calling thread.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    lights: &HittableList,
    config: &RenderConfig,
) -> ImageBuffer {
    let buckets = generate_buckets(config.width, config.height, DEFAULT_BUCKET_SIZE);
    let mut image = ImageBuffer::new(config.width, config.height);

    for bucket in &buckets {
        let pixels = render_bucket(bucket, camera, world, lights, config);
        blit(&mut image, bucket, &pixels);
    }

    image
}

/// Render the scene with buckets fanned out across the rayon thread pool.
///
/// Produces exactly the same image as `render` with the same config.
pub fn render_parallel(
    camera: &Camera,
    world: &(dyn Hittable),
    lights: &HittableList,
    config: &RenderConfig,
) -> ImageBuffer {
    let buckets = generate_buckets(config.width, config.height, DEFAULT_BUCKET_SIZE);

    let results: Vec<(Bucket, Vec<Color>)> = buckets
        .par_iter()
        .map(|bucket| {
            let pixels = render_bucket(bucket, camera, world, lights, config);
            (*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(config.width, config.height);
    for (bucket, pixels) in &results {
        blit(&mut image, bucket, pixels);
    }

    image
}
