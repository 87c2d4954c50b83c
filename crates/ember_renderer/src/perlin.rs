//! Perlin gradient noise and turbulence.

use crate::rng::{gen_index, random_unit_vector};
use ember_math::Vec3;
use rand::RngCore;

const POINT_COUNT: usize = 256;

/// A lattice of random gradient vectors with per-axis index scrambling.
pub struct Perlin {
    ranvec: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    /// Build the noise tables from the given RNG.
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let ranvec = (0..POINT_COUNT).map(|_| random_unit_vector(rng)).collect();

        Self {
            ranvec,
            perm_x: Self::generate_perm(rng),
            perm_y: Self::generate_perm(rng),
            perm_z: Self::generate_perm(rng),
        }
    }

    /// Smoothed gradient noise at a point, in [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        let i = p.x.floor() as i32;
        let j = p.y.floor() as i32;
        let k = p.z.floor() as i32;

        // Gather the gradient at each corner of the lattice cell. The & 255
        // mask wraps negative indices into table range.
        let mut corners = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in corners.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let index = self.perm_x[((i + di as i32) & 255) as usize]
                        ^ self.perm_y[((j + dj as i32) & 255) as usize]
                        ^ self.perm_z[((k + dk as i32) & 255) as usize];
                    *cell = self.ranvec[index];
                }
            }
        }

        Self::interpolate(&corners, u, v, w)
    }

    /// Octave sum of noise with doubling frequency and halving amplitude.
    pub fn turbulence(&self, p: Vec3, depth: u32) -> f32 {
        let mut sum = 0.0;
        let mut sample = p;
        let mut amplitude = 1.0;

        for _ in 0..depth {
            sum += amplitude * self.noise(sample);
            amplitude *= 0.5;
            sample *= 2.0;
        }

        sum.abs()
    }

    /// A shuffled permutation of 0..POINT_COUNT.
    fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..POINT_COUNT).collect();

        // Fisher-Yates
        for i in (1..POINT_COUNT).rev() {
            let target = gen_index(rng, i + 1);
            perm.swap(i, target);
        }

        perm
    }

    /// Trilinear interpolation of corner gradients with Hermite smoothing.
    fn interpolate(corners: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
        let uu = u * u * (3.0 - 2.0 * u);
        let vv = v * v * (3.0 - 2.0 * v);
        let ww = w * w * (3.0 - 2.0 * w);

        let mut sum = 0.0;
        for (i, plane) in corners.iter().enumerate() {
            for (j, row) in plane.iter().enumerate() {
                for (k, gradient) in row.iter().enumerate() {
                    let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                    let dist = Vec3::new(u - fi, v - fj, w - fk);

                    sum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                        * (fj * vv + (1.0 - fj) * (1.0 - vv))
                        * (fk * ww + (1.0 - fk) * (1.0 - ww))
                        * gradient.dot(dist);
                }
            }
        }

        sum
    }
}
