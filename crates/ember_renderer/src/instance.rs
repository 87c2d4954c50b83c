//! Instancing wrappers: translate, rotate, and normal-flip.
//!
//! Rather than transforming geometry, each wrapper owns a child hittable and
//! transforms the ray before delegation and the hit record after. A wrapper
//! never changes the child's identity or material.

use crate::hittable::{HitRecord, Hittable};
use crate::Ray;
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A coordinate axis to rotate about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// The two axes the rotation mixes, in order.
    fn others(self) -> (usize, usize) {
        match self {
            Axis::X => (1, 2),
            Axis::Y => (0, 2),
            Axis::Z => (0, 1),
        }
    }
}

/// A hittable displaced by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    /// Wrap `object`, moving it by `offset`.
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        // Moving the object by offset equals moving the ray by -offset.
        let moved = Ray::new(ray.origin - self.offset, ray.direction, ray.time);
        if !self.object.hit(&moved, ray_t, rec, rng) {
            return false;
        }

        rec.p += self.offset;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A hittable rotated by a fixed angle about a coordinate axis.
pub struct Rotate {
    object: Arc<dyn Hittable>,
    axis: Axis,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Aabb,
}

impl Rotate {
    /// Wrap `object`, rotating it by `degrees` about `axis`.
    pub fn new(object: Arc<dyn Hittable>, axis: Axis, degrees: f32) -> Self {
        let radians = degrees.to_radians();
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        // The rotated object's AABB is the min/max sweep of the child box's
        // eight rotated corners.
        let child_box = object.bounding_box();
        let (lo, hi) = (child_box.min(), child_box.max());

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        let rotate = Self {
            object,
            axis,
            sin_theta,
            cos_theta,
            bbox: Aabb::EMPTY,
        };

        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let corner = Vec3::new(
                        if i == 0 { lo.x } else { hi.x },
                        if j == 0 { lo.y } else { hi.y },
                        if k == 0 { lo.z } else { hi.z },
                    );
                    let rotated = rotate.to_world(corner);

                    min = min.min(rotated);
                    max = max.max(rotated);
                }
            }
        }

        Self {
            bbox: Aabb::from_points(min, max),
            ..rotate
        }
    }

    /// Rotate a vector from object space to world space (+theta).
    fn to_world(&self, v: Vec3) -> Vec3 {
        let (a1, a2) = self.axis.others();
        let mut out = v;
        out[a1] = self.cos_theta * v[a1] + self.sin_theta * v[a2];
        out[a2] = -self.sin_theta * v[a1] + self.cos_theta * v[a2];
        out
    }

    /// Rotate a vector from world space to object space (-theta).
    fn to_object(&self, v: Vec3) -> Vec3 {
        let (a1, a2) = self.axis.others();
        let mut out = v;
        out[a1] = self.cos_theta * v[a1] - self.sin_theta * v[a2];
        out[a2] = self.sin_theta * v[a1] + self.cos_theta * v[a2];
        out
    }
}

impl Hittable for Rotate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        // Rotate the ray into object space, intersect, then rotate the hit
        // back out. Rotation preserves dot products, so the child's
        // front-face orientation is still valid in world space.
        let rotated = Ray::new(
            self.to_object(ray.origin),
            self.to_object(ray.direction),
            ray.time,
        );
        if !self.object.hit(&rotated, ray_t, rec, rng) {
            return false;
        }

        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A hittable whose reported face orientation is inverted.
///
/// Used for one-sided emitters: a ceiling light built from an XZ rectangle
/// has its outward normal pointing up, and flipping it makes the downward
/// side the emitting front face.
pub struct FlipFace {
    object: Arc<dyn Hittable>,
}

impl FlipFace {
    /// Wrap `object`, inverting its front/back classification.
    pub fn new(object: Arc<dyn Hittable>) -> Self {
        Self { object }
    }
}

impl Hittable for FlipFace {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        if !self.object.hit(ray, ray_t, rec, rng) {
            return false;
        }

        rec.front_face = !rec.front_face;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.object.bounding_box()
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        self.object.pdf_value(origin, direction, rng)
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random_direction(origin, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::{AaRect, Plane};
    use crate::{Color, Cuboid, Lambertian, Material, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::from_color(Color::splat(0.5)))
    }

    fn unit_interval() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_translate_shifts_hit_point() {
        let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::ZERO, 1.0, gray()).unwrap());
        let moved = Translate::new(sphere, Vec3::new(5.0, 0.0, 0.0));
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new(Vec3::new(5.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rec = HitRecord::default();

        assert!(moved.hit(&ray, unit_interval(), &mut rec, &mut rng));
        assert!((rec.p - Vec3::new(5.0, 0.0, 1.0)).length() < 1e-4);

        // Bounding box moved along
        let bbox = moved.bounding_box();
        assert!((bbox.x.min - 4.0).abs() < 1e-3);
        assert!((bbox.x.max - 6.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        // A box off to +X, rotated a quarter turn about Y, ends up along -Z
        // (right-handed rotation through the +theta corner transform).
        let cuboid: Arc<dyn Hittable> = Arc::new(
            Cuboid::new(Vec3::new(2.0, -0.5, -0.5), Vec3::new(3.0, 0.5, 0.5), gray()).unwrap(),
        );
        let rotated = Rotate::new(cuboid, Axis::Y, 90.0);
        let bbox = rotated.bounding_box();

        // Corner (2.5, 0, 0) maps to roughly (0, 0, -2.5)
        assert!(bbox.z.min < -1.9, "bbox {:?}", bbox);
        assert!(bbox.x.min.abs() < 1.1, "bbox {:?}", bbox);

        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        let mut rec = HitRecord::default();
        assert!(rotated.hit(&ray, unit_interval(), &mut rec, &mut rng));
        assert!(ray.direction.dot(rec.normal) <= 0.0);
    }

    #[test]
    fn test_rotate_preserves_distance_to_axis() {
        let sphere: Arc<dyn Hittable> =
            Arc::new(Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0, gray()).unwrap());
        let rotated = Rotate::new(sphere, Axis::Y, 45.0);
        let mut rng = StdRng::seed_from_u64(1);

        // The rotated sphere center keeps its distance from the Y axis.
        let bbox = rotated.bounding_box();
        let center = (bbox.min() + bbox.max()) / 2.0;
        assert!((Vec3::new(center.x, 0.0, center.z).length() - 3.0).abs() < 1e-2);

        // And a ray through the rotated center hits it.
        let ray = Ray::new(
            Vec3::new(center.x, 0.0, center.z) * 2.0,
            -Vec3::new(center.x, 0.0, center.z),
            0.0,
        );
        let mut rec = HitRecord::default();
        assert!(rotated.hit(&ray, unit_interval(), &mut rec, &mut rng));
    }

    #[test]
    fn test_flip_face_inverts_orientation() {
        let rect: Arc<dyn Hittable> =
            Arc::new(AaRect::new(Plane::Xz, -1.0, 1.0, -1.0, 1.0, 0.0, gray()).unwrap());
        let flipped = FlipFace::new(rect.clone());
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 0.0);

        let mut rec = HitRecord::default();
        assert!(rect.hit(&ray, unit_interval(), &mut rec, &mut rng));
        assert!(rec.front_face);

        let mut rec = HitRecord::default();
        assert!(flipped.hit(&ray, unit_interval(), &mut rec, &mut rng));
        assert!(!rec.front_face);
    }

    #[test]
    fn test_flip_face_forwards_pdf() {
        let rect: Arc<dyn Hittable> =
            Arc::new(AaRect::new(Plane::Xz, -0.5, 0.5, -0.5, 0.5, 1.0, gray()).unwrap());
        let flipped = FlipFace::new(rect.clone());
        let mut rng = StdRng::seed_from_u64(1);

        let direct = rect.pdf_value(Vec3::ZERO, Vec3::Y, &mut rng);
        let through = flipped.pdf_value(Vec3::ZERO, Vec3::Y, &mut rng);
        assert!((direct - through).abs() < 1e-6);
        assert!(through > 0.0);
    }
}
