//! Axis-aligned box built from six rectangles.

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::rect::{AaRect, Plane};
use crate::{Material, Ray, SceneError};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// An axis-aligned box between two opposite corners.
///
/// Intersection delegates to a list of six axis-aligned rectangles, two per
/// axis pair.
pub struct Cuboid {
    p0: Vec3,
    p1: Vec3,
    sides: HittableList,
}

impl Cuboid {
    /// Create a box spanning `p0` to `p1`. The corners must satisfy
    /// `p0 < p1` componentwise.
    pub fn new(p0: Vec3, p1: Vec3, material: Arc<dyn Material>) -> Result<Self, SceneError> {
        if p0.x >= p1.x || p0.y >= p1.y || p0.z >= p1.z {
            return Err(SceneError::InvertedBox);
        }

        let mut sides = HittableList::new();

        sides.add(Arc::new(AaRect::new(
            Plane::Xy,
            p0.x,
            p1.x,
            p0.y,
            p1.y,
            p1.z,
            material.clone(),
        )?));
        sides.add(Arc::new(AaRect::new(
            Plane::Xy,
            p0.x,
            p1.x,
            p0.y,
            p1.y,
            p0.z,
            material.clone(),
        )?));

        sides.add(Arc::new(AaRect::new(
            Plane::Xz,
            p0.x,
            p1.x,
            p0.z,
            p1.z,
            p1.y,
            material.clone(),
        )?));
        sides.add(Arc::new(AaRect::new(
            Plane::Xz,
            p0.x,
            p1.x,
            p0.z,
            p1.z,
            p0.y,
            material.clone(),
        )?));

        sides.add(Arc::new(AaRect::new(
            Plane::Yz,
            p0.y,
            p1.y,
            p0.z,
            p1.z,
            p1.x,
            material.clone(),
        )?));
        sides.add(Arc::new(AaRect::new(
            Plane::Yz,
            p0.y,
            p1.y,
            p0.z,
            p1.z,
            p0.x,
            material,
        )?));

        Ok(Self { p0, p1, sides })
    }
}

impl Hittable for Cuboid {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        self.sides.hit(ray, ray_t, rec, rng)
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.p0, self.p1)
    }
}
