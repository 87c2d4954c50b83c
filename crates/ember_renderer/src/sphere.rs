//! Sphere primitive, with an optionally moving center for motion blur.

use crate::hittable::{HitRecord, Hittable};
use crate::rng::gen_f32;
use crate::{Material, Ray, SceneError};
use ember_math::{Aabb, Interval, Onb, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// A sphere whose center interpolates linearly over a time interval.
///
/// A static sphere is the degenerate case with both endpoints equal.
pub struct Sphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a static sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Result<Self, SceneError> {
        Self::moving(center, center, 0.0, 1.0, radius, material)
    }

    /// Create a sphere whose center moves from `center0` at `time0` to
    /// `center1` at `time1`.
    pub fn moving(
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: Arc<dyn Material>,
    ) -> Result<Self, SceneError> {
        if radius <= 0.0 {
            return Err(SceneError::NonPositiveRadius(radius));
        }
        if time0 == time1 {
            return Err(SceneError::DegenerateMotion(time0, time1));
        }

        let rvec = Vec3::splat(radius);
        let box0 = Aabb::from_points(center0 - rvec, center0 + rvec);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);

        Ok(Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        })
    }

    /// Center of the sphere at the given time.
    pub fn center(&self, time: f32) -> Vec3 {
        self.center0 + (time - self.time0) / (self.time1 - self.time0) * (self.center1 - self.center0)
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // p is a point on the unit sphere centered at origin
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        let u = phi / (2.0 * PI);
        let v = theta / PI;
        (u, v)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let center = self.center(ray.time);
        let oc = center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::get_sphere_uv(outward_normal);
        rec.material = &*self.material;

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        // Only directions that actually reach the sphere carry density.
        let ray = Ray::new(origin, direction, 0.0);
        let mut rec = HitRecord::default();
        if !self.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, rng) {
            return 0.0;
        }

        // Uniform over the solid angle of the cone the sphere subtends.
        let dist_sq = (self.center0 - origin).length_squared();
        let cos_theta_max = (1.0 - self.radius * self.radius / dist_sq).max(0.0).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        if solid_angle <= 0.0 {
            return 0.0;
        }

        1.0 / solid_angle
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center0 - origin;
        let dist_sq = direction.length_squared();
        if dist_sq <= self.radius * self.radius {
            // Origin is inside the sphere; any direction reaches the surface.
            return direction;
        }

        // Sample the cone subtended by the sphere as seen from the origin.
        let r1 = gen_f32(rng);
        let r2 = gen_f32(rng);
        let phi = 2.0 * PI * r1;

        let cos_theta_max = (1.0 - self.radius * self.radius / dist_sq).sqrt();
        let z = 1.0 + r2 * (cos_theta_max - 1.0);
        let x = phi.cos() * (1.0 - z * z).sqrt();
        let y = phi.sin() * (1.0 - z * z).sqrt();

        Onb::new(direction).local(Vec3::new(x, y, z))
    }
}
