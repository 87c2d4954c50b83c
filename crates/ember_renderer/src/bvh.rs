//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over shared hittable handles. Each split sorts by bounding
//! box minimum along a randomly chosen axis and halves the list; the random
//! axis trades asymptotic optimality for construction simplicity, which is
//! fine for scenes built once before rendering.

use crate::hittable::{HitRecord, Hittable};
use crate::rng::gen_index;
use crate::{Ray, SceneError};
use ember_math::{Aabb, Interval};
use rand::RngCore;
use std::cmp::Ordering;
use std::sync::Arc;

/// Internal node of the hierarchy.
///
/// A node always has two children; a single-object subtree stores the same
/// handle on both sides.
pub struct BvhNode {
    left: Arc<dyn Hittable>,
    right: Arc<dyn Hittable>,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Arc<dyn Hittable>>, rng: &mut dyn RngCore) -> Result<Self, SceneError> {
        if objects.is_empty() {
            return Err(SceneError::EmptyBvh);
        }
        Ok(Self::build(objects, rng))
    }

    /// Recursive BVH construction. `objects` is nonempty.
    fn build(mut objects: Vec<Arc<dyn Hittable>>, rng: &mut dyn RngCore) -> Self {
        let axis = gen_index(rng, 3);

        let (left, right): (Arc<dyn Hittable>, Arc<dyn Hittable>) = match objects.len() {
            1 => {
                let object = objects.swap_remove(0);
                (object.clone(), object)
            }
            2 => {
                let b = objects.swap_remove(1);
                let a = objects.swap_remove(0);
                match Self::box_compare(&a, &b, axis) {
                    Ordering::Greater => (b, a),
                    _ => (a, b),
                }
            }
            _ => {
                objects.sort_unstable_by(|a, b| Self::box_compare(a, b, axis));

                let right_half = objects.split_off(objects.len() / 2);
                (
                    Arc::new(Self::build(objects, rng)),
                    Arc::new(Self::build(right_half, rng)),
                )
            }
        };

        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
        Self { left, right, bbox }
    }

    /// Order two hittables by bounding box minimum on the given axis.
    fn box_compare(a: &Arc<dyn Hittable>, b: &Arc<dyn Hittable>, axis: usize) -> Ordering {
        let a_min = a.bounding_box().axis_interval(axis).min;
        let b_min = b.bounding_box().axis_interval(axis).min;
        a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        if !self.bbox.hit(ray, ray_t) {
            return false;
        }

        let hit_left = self.left.hit(ray, ray_t, rec, rng);

        // Only check right up to the closest hit so far; the record keeps
        // whichever side lands nearer.
        let right_max = if hit_left { rec.t } else { ray_t.max };
        let hit_right = self
            .right
            .hit(ray, Interval::new(ray_t.min, right_max), rec, rng);

        hit_left || hit_right
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
