//! Ember renderer - CPU path tracing
//!
//! A Monte Carlo path tracer for physically-based rendering. Camera rays walk
//! the scene by recursive scattering; diffuse bounces are importance-sampled
//! with a mixture of the material's own distribution and direct light
//! sampling.

mod bucket;
mod bvh;
mod camera;
mod cuboid;
mod error;
mod hittable;
mod instance;
mod material;
mod medium;
mod pdf;
mod perlin;
mod ppm;
mod rect;
mod renderer;
mod rng;
mod sphere;
mod texture;

pub use bucket::{generate_buckets, render, render_parallel, Bucket, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use cuboid::Cuboid;
pub use error::{SceneError, TextureError};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{Axis, FlipFace, Rotate, Translate};
pub use material::{
    reflect, refract, Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal,
    ScatterRecord,
};
pub use medium::ConstantMedium;
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf, SpherePdf};
pub use perlin::Perlin;
pub use ppm::{save_ppm, write_ppm};
pub use rect::{AaRect, Plane};
pub use renderer::{color_to_rgb, ray_color, render_pixel, ImageBuffer, RenderConfig};
pub use rng::gen_f32;
pub use sphere::Sphere;
pub use texture::{Checker, ImageTexture, Noise, SolidColor, Texture};

/// Re-export common math types from ember_math
pub use ember_math::{Aabb, Interval, Onb, Ray, Vec3};
