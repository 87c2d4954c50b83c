//! Sampling helpers over an object-safe RNG.
//!
//! Materials, primitives and PDFs all take `&mut dyn RngCore` so they stay
//! object safe behind trait objects; these helpers turn the raw bit stream
//! into the distributions the tracer needs.

use ember_math::Vec3;
use rand::RngCore;
use std::f32::consts::PI;

/// Generate a random f32 in [0, 1) from an RngCore.
///
/// This is needed because `dyn RngCore` can't use `Rng::gen()` directly.
/// Same algorithm as rand's Standard distribution for f32.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    let bits = rng.next_u32();
    (bits >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Generate a random f32 in [min, max).
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Pick a uniform index in [0, n). `n` must be nonzero.
#[inline]
pub fn gen_index(rng: &mut dyn RngCore, n: usize) -> usize {
    ((gen_f32(rng) * n as f32) as usize).min(n - 1)
}

/// Generate a random point inside the unit sphere.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Generate a random unit vector on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_in_unit_sphere(rng);
        let len_sq = p.length_squared();
        if len_sq > 1e-6 {
            return p / len_sq.sqrt();
        }
    }
}

/// Generate a random point in the unit disk (z = 0).
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f32(rng) * 2.0 - 1.0, gen_f32(rng) * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Sample a direction from the cosine-weighted hemisphere around +Z.
pub fn cosine_direction(rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);

    let phi = 2.0 * PI * r1;
    let x = phi.cos() * r2.sqrt();
    let y = phi.sin() * r2.sqrt();
    let z = (1.0 - r2).sqrt();

    Vec3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gen_f32_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let x = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_gen_index_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 1..=8 {
            for _ in 0..1_000 {
                assert!(gen_index(&mut rng, n) < n);
            }
        }
    }

    #[test]
    fn test_unit_sphere_points_inside() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            assert!(random_in_unit_sphere(&mut rng).length() < 1.0);
        }
    }

    #[test]
    fn test_unit_vector_normalized() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_unit_disk_flat() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let p = random_in_unit_disk(&mut rng);
            assert_eq!(p.z, 0.0);
            assert!(p.length() < 1.0);
        }
    }

    #[test]
    fn test_cosine_direction_upper_hemisphere() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let d = cosine_direction(&mut rng);
            assert!(d.z >= 0.0);
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }
}
