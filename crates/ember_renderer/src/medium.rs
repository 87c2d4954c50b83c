//! Constant-density participating medium (fog, smoke).

use crate::hittable::{HitRecord, Hittable};
use crate::material::Isotropic;
use crate::rng::gen_f32;
use crate::texture::Texture;
use crate::{Color, Material, Ray, SceneError};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A volume of uniform density bounded by another hittable.
///
/// Instead of hitting a surface, a ray entering the boundary scatters after a
/// probabilistically sampled distance; if that distance overshoots the exit
/// point, the ray passes through untouched.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    phase: Arc<dyn Material>,
    density: f32,
}

impl ConstantMedium {
    /// Create a medium from a boundary, a density, and an albedo texture for
    /// the isotropic phase function.
    pub fn new(
        boundary: Arc<dyn Hittable>,
        density: f32,
        albedo: Arc<dyn Texture>,
    ) -> Result<Self, SceneError> {
        if density <= 0.0 {
            return Err(SceneError::NonPositiveDensity(density));
        }

        Ok(Self {
            boundary,
            phase: Arc::new(Isotropic::new(albedo)),
            density,
        })
    }

    /// Convenience constructor for a solid-color medium.
    pub fn from_color(
        boundary: Arc<dyn Hittable>,
        density: f32,
        color: Color,
    ) -> Result<Self, SceneError> {
        Self::new(
            boundary,
            density,
            Arc::new(crate::texture::SolidColor::from_color(color)),
        )
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        // Find where the ray enters and leaves the boundary. The entry search
        // spans the whole line so a ray starting inside still registers.
        let mut rec1 = HitRecord::default();
        let mut rec2 = HitRecord::default();

        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut rec1, rng) {
            return false;
        }
        if !self.boundary.hit(
            ray,
            Interval::new(rec1.t + 0.0001, f32::INFINITY),
            &mut rec2,
            rng,
        ) {
            return false;
        }

        let t_enter = rec1.t.max(ray_t.min).max(0.0);
        let t_exit = rec2.t.min(ray_t.max);
        if t_enter >= t_exit {
            return false;
        }

        // Sample an exponential free path; the ray scatters only if the
        // sampled distance fits inside the boundary.
        let ray_length = ray.direction.length();
        let distance_inside = (t_exit - t_enter) * ray_length;
        let hit_distance = -(1.0 - gen_f32(rng)).ln() / self.density;

        if hit_distance > distance_inside {
            return false;
        }

        rec.t = t_enter + hit_distance / ray_length;
        rec.p = ray.at(rec.t);
        // Scattering happens in the volume; the normal is arbitrary.
        rec.normal = Vec3::X;
        rec.front_face = true;
        rec.material = &*self.phase;

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
