//! Axis-aligned rectangle primitive.

use crate::hittable::{HitRecord, Hittable};
use crate::rng::gen_range;
use crate::{Material, Ray, SceneError};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// The coordinate plane a rectangle lies parallel to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    Xy,
    Xz,
    Yz,
}

impl Plane {
    /// Axis indices (first in-plane axis, second in-plane axis, normal axis).
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::Xy => (0, 1, 2),
            Plane::Xz => (0, 2, 1),
            Plane::Yz => (1, 2, 0),
        }
    }

    /// Unit outward normal of the plane.
    fn normal(self) -> Vec3 {
        match self {
            Plane::Xy => Vec3::Z,
            Plane::Xz => Vec3::Y,
            Plane::Yz => Vec3::X,
        }
    }
}

/// An axis-aligned rectangle spanning `[r0, r1] x [s0, s1]` in its plane,
/// offset by `k` along the plane's normal axis.
pub struct AaRect {
    plane: Plane,
    r0: f32,
    r1: f32,
    s0: f32,
    s1: f32,
    k: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl AaRect {
    /// Create a new axis-aligned rectangle.
    pub fn new(
        plane: Plane,
        r0: f32,
        r1: f32,
        s0: f32,
        s1: f32,
        k: f32,
        material: Arc<dyn Material>,
    ) -> Result<Self, SceneError> {
        if r0 >= r1 || s0 >= s1 {
            return Err(SceneError::InvertedRect { r0, r1, s0, s1 });
        }

        // The box cannot have zero width, so leave a little room on the
        // normal axis.
        let (a0, a1, ka) = plane.axes();
        let mut min = Vec3::ZERO;
        let mut max = Vec3::ZERO;
        min[a0] = r0;
        max[a0] = r1;
        min[a1] = s0;
        max[a1] = s1;
        min[ka] = k - 0.0001;
        max[ka] = k + 0.0001;

        Ok(Self {
            plane,
            r0,
            r1,
            s0,
            s1,
            k,
            material,
            bbox: Aabb::from_points(min, max),
        })
    }

    /// Area of the rectangle.
    pub fn area(&self) -> f32 {
        (self.r1 - self.r0) * (self.s1 - self.s0)
    }
}

impl Hittable for AaRect {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let (a0, a1, ka) = self.plane.axes();

        // Solve for the time the ray crosses the rectangle's plane.
        let t = (self.k - ray.origin[ka]) / ray.direction[ka];
        if !ray_t.surrounds(t) {
            return false;
        }

        let p = ray.at(t);
        let a = p[a0];
        let b = p[a1];
        if a < self.r0 || a > self.r1 || b < self.s0 || b > self.s1 {
            return false;
        }

        rec.u = (a - self.r0) / (self.r1 - self.r0);
        rec.v = (b - self.s0) / (self.s1 - self.s0);
        rec.t = t;
        rec.p = p;
        rec.set_face_normal(ray, self.plane.normal());
        rec.material = &*self.material;

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        let ray = Ray::new(origin, direction, 0.0);
        let mut rec = HitRecord::default();
        if !self.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, rng) {
            return 0.0;
        }

        // Convert the uniform area density 1/A to a solid-angle density:
        // pdf = d^2 / (|cos(alpha)| * A).
        let distance = rec.t * direction.length();
        let cosine = (direction.dot(rec.normal) / direction.length()).abs();
        if cosine < 1e-8 {
            return 0.0;
        }

        distance * distance / (cosine * self.area())
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let (a0, a1, ka) = self.plane.axes();

        let mut point = Vec3::ZERO;
        point[a0] = gen_range(rng, self.r0, self.r1);
        point[a1] = gen_range(rng, self.s0, self.s1);
        point[ka] = self.k;

        point - origin
    }
}
