//! Probability density functions over directions.
//!
//! A PDF both generates random directions following its distribution and
//! reports the density it assigns to any given direction. The integrator
//! divides sampled radiance by that density, so the two sides must agree.

use crate::hittable::Hittable;
use crate::rng::{cosine_direction, gen_f32, random_unit_vector};
use ember_math::{Onb, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

/// A sampleable distribution over directions.
pub trait Pdf {
    /// Draw a random direction following the distribution.
    fn sample(&self, rng: &mut dyn RngCore) -> Vec3;

    /// Density of the distribution in the given direction.
    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32;
}

/// Cosine-weighted hemisphere distribution around a normal.
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    /// Create a cosine distribution with its pole along `w`.
    pub fn new(w: Vec3) -> Self {
        Self { uvw: Onb::new(w) }
    }
}

impl Pdf for CosinePdf {
    fn sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.local(cosine_direction(rng))
    }

    fn value(&self, direction: Vec3, _rng: &mut dyn RngCore) -> f32 {
        let cosine = direction.normalize().dot(self.uvw.w);
        cosine.max(0.0) / PI
    }
}

/// Uniform distribution over the whole sphere of directions.
pub struct SpherePdf;

impl Pdf for SpherePdf {
    fn sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        random_unit_vector(rng)
    }

    fn value(&self, _direction: Vec3, _rng: &mut dyn RngCore) -> f32 {
        1.0 / (4.0 * PI)
    }
}

/// Distribution of directions from an origin towards a hittable's surface.
///
/// Used to aim rays at lights: sampling produces directions that reach the
/// object, and the value is the object's solid-angle density.
pub struct HittablePdf<'a> {
    objects: &'a dyn Hittable,
    origin: Vec3,
}

impl<'a> HittablePdf<'a> {
    /// Create a distribution towards `objects` as seen from `origin`.
    pub fn new(objects: &'a dyn Hittable, origin: Vec3) -> Self {
        Self { objects, origin }
    }
}

impl<'a> Pdf for HittablePdf<'a> {
    fn sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.objects.random_direction(self.origin, rng)
    }

    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        self.objects.pdf_value(self.origin, direction, rng)
    }
}

/// An even 50/50 mixture of two distributions.
pub struct MixturePdf<'a> {
    p: &'a dyn Pdf,
    q: &'a dyn Pdf,
}

impl<'a> MixturePdf<'a> {
    /// Mix two distributions with equal weight.
    pub fn new(p: &'a dyn Pdf, q: &'a dyn Pdf) -> Self {
        Self { p, q }
    }
}

impl<'a> Pdf for MixturePdf<'a> {
    fn sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        if gen_f32(rng) < 0.5 {
            self.p.sample(rng)
        } else {
            self.q.sample(rng)
        }
    }

    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        0.5 * (self.p.value(direction, rng) + self.q.value(direction, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::{AaRect, Plane};
    use crate::{Color, Lambertian, Material};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn test_cosine_pdf_value() {
        let pdf = CosinePdf::new(Vec3::Z);
        let mut rng = StdRng::seed_from_u64(1);

        assert!((pdf.value(Vec3::Z, &mut rng) - 1.0 / PI).abs() < 1e-6);
        assert_eq!(pdf.value(-Vec3::Z, &mut rng), 0.0);

        // 45 degrees: cos = 1/sqrt(2)
        let diagonal = Vec3::new(1.0, 0.0, 1.0);
        let expected = (1.0 / 2.0_f32.sqrt()) / PI;
        assert!((pdf.value(diagonal, &mut rng) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_pdf_monte_carlo_integrates_pi() {
        // E[cos(theta) / pdf(theta)] over the cosine distribution is the
        // integral of cos over the hemisphere, which is pi.
        let pdf = CosinePdf::new(Vec3::Z);
        let mut rng = StdRng::seed_from_u64(42);

        let n = 100_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let dir = pdf.sample(&mut rng);
            let value = pdf.value(dir, &mut rng);
            assert!(value > 0.0);
            sum += dir.normalize().z / value;
        }

        let estimate = sum / n as f32;
        assert!((estimate - PI).abs() < 0.05, "estimate {}", estimate);
    }

    #[test]
    fn test_sphere_pdf_uniform() {
        let pdf = SpherePdf;
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..100 {
            let dir = pdf.sample(&mut rng);
            assert!((dir.length() - 1.0).abs() < 1e-4);
            assert!((pdf.value(dir, &mut rng) - 1.0 / (4.0 * PI)).abs() < 1e-7);
        }
    }

    #[test]
    fn test_mixture_pdf_is_average() {
        // A cosine hemisphere around +Z mixed with a hittable PDF over a unit
        // rectangle directly above: the mixture value is exactly the average.
        let gray: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::splat(0.5)));
        let rect = AaRect::new(Plane::Xy, -0.5, 0.5, -0.5, 0.5, 2.0, gray).unwrap();

        let cosine = CosinePdf::new(Vec3::Z);
        let towards = HittablePdf::new(&rect, Vec3::ZERO);
        let mixture = MixturePdf::new(&cosine, &towards);

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let dir = mixture.sample(&mut rng);
            let expected =
                0.5 * (cosine.value(dir, &mut rng) + towards.value(dir, &mut rng));
            let got = mixture.value(dir, &mut rng);
            assert!((got - expected).abs() < 1e-6, "{} vs {}", got, expected);
        }

        // Also for directions not drawn from the mixture itself
        for dir in [Vec3::Z, Vec3::new(0.3, -0.2, 0.9), Vec3::X, -Vec3::Z] {
            let expected =
                0.5 * (cosine.value(dir, &mut rng) + towards.value(dir, &mut rng));
            let got = mixture.value(dir, &mut rng);
            assert!((got - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_mixture_pdf_samples_both_components() {
        let gray: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::splat(0.5)));
        let rect = AaRect::new(Plane::Xy, 10.0, 11.0, 10.0, 11.0, 5.0, gray).unwrap();

        let cosine = CosinePdf::new(Vec3::Z);
        let towards = HittablePdf::new(&rect, Vec3::ZERO);
        let mixture = MixturePdf::new(&cosine, &towards);

        // The rectangle sits far off-axis; samples pointing at it can only
        // come from the hittable component.
        let mut rng = StdRng::seed_from_u64(9);
        let mut towards_rect = 0;
        for _ in 0..400 {
            let dir = mixture.sample(&mut rng);
            if towards.value(dir, &mut rng) > 0.0 {
                towards_rect += 1;
            }
        }

        // Roughly half the samples should come from each component
        assert!(towards_rect > 100, "only {} of 400 aimed at rect", towards_rect);
        assert!(towards_rect < 300, "{} of 400 aimed at rect", towards_rect);
    }
}
