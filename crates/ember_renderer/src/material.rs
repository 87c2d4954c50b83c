//! Material trait for surface scattering.

use crate::hittable::HitRecord;
use crate::pdf::{CosinePdf, Pdf, SpherePdf};
use crate::rng::{gen_f32, random_in_unit_sphere};
use crate::texture::{SolidColor, Texture};
use crate::Ray;
use ember_math::Vec3;
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// Color type alias (linear RGB, unbounded above for emitters)
pub type Color = Vec3;

/// Result of scattering a ray off a material.
///
/// A specular interaction fixes the outgoing ray; a diffuse one hands the
/// integrator a distribution to sample from. The two cases carry disjoint
/// data, so they are variants rather than optional fields.
pub enum ScatterRecord {
    Specular {
        /// The single reflected or refracted ray
        ray: Ray,
        /// Color attenuation applied to whatever the ray returns
        attenuation: Color,
    },
    Diffuse {
        /// Distribution over outgoing directions
        pdf: Box<dyn Pdf>,
        /// Color attenuation applied to the estimator
        attenuation: Color,
    },
}

/// Trait for materials that describe how light interacts with surfaces.
///
/// Uses `&mut dyn RngCore` for object safety (required for `dyn Material`).
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns None when the ray is absorbed; pure emitters never scatter.
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        None
    }

    /// Density the material itself assigns to the outgoing direction, used to
    /// weight samples drawn from the mixture distribution.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        0.0
    }

    /// Light emitted at the hit point. Most materials emit nothing.
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3, _rec: &HitRecord) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a Lambertian material over an albedo texture.
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    /// Create a Lambertian material with a uniform albedo color.
    pub fn from_color(albedo: Color) -> Self {
        Self {
            albedo: Arc::new(SolidColor::from_color(albedo)),
        }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord::Diffuse {
            pdf: Box::new(CosinePdf::new(rec.normal)),
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        // Lambert's cosine law, normalized over the hemisphere
        let cosine = rec.normal.dot(scattered.direction.normalize());
        cosine.max(0.0) / PI
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction.normalize(), rec.normal);
        let direction = reflected + self.fuzz * random_in_unit_sphere(rng);

        // A fuzzed reflection that dips below the surface is absorbed
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterRecord::Specular {
            ray: Ray::new(rec.p, direction, ray_in.time),
            attenuation: self.albedo,
        })
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ratio: f32) -> f32 {
        let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction.normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Beyond the critical angle refraction is impossible; otherwise the
        // ray reflects with probability given by the reflectance.
        let cannot_refract = refraction_ratio * sin_theta > 1.0;
        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, refraction_ratio)
            };

        Some(ScatterRecord::Specular {
            ray: Ray::new(rec.p, direction, ray_in.time),
            attenuation: Color::ONE,
        })
    }
}

/// Diffuse light emitter.
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    /// Create a light from an emission texture.
    pub fn new(emit: Arc<dyn Texture>) -> Self {
        Self { emit }
    }

    /// Create a light with uniform emission.
    pub fn from_color(emit: Color) -> Self {
        Self {
            emit: Arc::new(SolidColor::from_color(emit)),
        }
    }
}

impl Material for DiffuseLight {
    fn emitted(&self, u: f32, v: f32, p: Vec3, rec: &HitRecord) -> Color {
        // One-sided: only the front face emits
        if !rec.front_face {
            return Color::ZERO;
        }
        self.emit.value(u, v, p)
    }
}

/// Isotropic phase function for participating media.
///
/// Scatters uniformly over the whole sphere of directions.
pub struct Isotropic {
    albedo: Arc<dyn Texture>,
}

impl Isotropic {
    /// Create an isotropic material over an albedo texture.
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    /// Create an isotropic material with a uniform albedo color.
    pub fn from_color(albedo: Color) -> Self {
        Self {
            albedo: Arc::new(SolidColor::from_color(albedo)),
        }
    }
}

impl Material for Isotropic {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord::Diffuse {
            pdf: Box::new(SpherePdf),
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        1.0 / (4.0 * PI)
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record_with_normal(normal: Vec3, front_face: bool) -> HitRecord<'static> {
        let mut rec = HitRecord::default();
        rec.normal = normal;
        rec.front_face = front_face;
        rec
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        let n = Vec3::Y;
        assert_eq!(reflect(v, n), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_straight_through() {
        // Normal incidence passes straight through regardless of the ratio
        let refracted = refract(-Vec3::Y, Vec3::Y, 1.5);
        assert!((refracted - -Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_lambertian_scatters_diffuse() {
        let material = Lambertian::from_color(Color::splat(0.5));
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0), 0.0);
        let rec = record_with_normal(Vec3::Y, true);

        match material.scatter(&ray, &rec, &mut rng) {
            Some(ScatterRecord::Diffuse { pdf, attenuation }) => {
                assert_eq!(attenuation, Color::splat(0.5));
                // The cosine distribution samples into the upper hemisphere
                for _ in 0..100 {
                    let dir = pdf.sample(&mut rng);
                    assert!(dir.dot(Vec3::Y) >= 0.0);
                }
            }
            _ => panic!("expected a diffuse scatter"),
        }
    }

    #[test]
    fn test_lambertian_scattering_pdf_matches_cosine() {
        let material = Lambertian::from_color(Color::splat(0.5));
        let rec = record_with_normal(Vec3::Y, true);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0), 0.0);

        let straight_up = Ray::new(Vec3::ZERO, Vec3::Y, 0.0);
        assert!((material.scattering_pdf(&ray, &rec, &straight_up) - 1.0 / PI).abs() < 1e-5);

        let below = Ray::new(Vec3::ZERO, -Vec3::Y, 0.0);
        assert_eq!(material.scattering_pdf(&ray, &rec, &below), 0.0);
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let material = Metal::new(Color::splat(0.8), 0.0);
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, -1.0, 0.0), 0.25);
        let rec = record_with_normal(Vec3::Y, true);

        match material.scatter(&ray, &rec, &mut rng) {
            Some(ScatterRecord::Specular { ray: scattered, attenuation }) => {
                assert_eq!(attenuation, Color::splat(0.8));
                let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
                assert!((scattered.direction.normalize() - expected).length() < 1e-5);
                // Motion-blur time carried through
                assert_eq!(scattered.time, 0.25);
            }
            _ => panic!("expected a specular scatter"),
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        // Ray inside glass (back face, ratio = ior) at an angle beyond the
        // critical angle asin(1/1.5) ~ 41.8 degrees: must reflect, staying on
        // the incident side of the surface.
        let material = Dielectric::new(1.5);
        let mut rng = StdRng::seed_from_u64(1);

        // 60 degrees from the surface normal
        let (sin, cos) = (60.0_f32.to_radians().sin(), 60.0_f32.to_radians().cos());
        let incoming = Vec3::new(sin, -cos, 0.0);
        let ray = Ray::new(Vec3::ZERO, incoming, 0.0);
        let rec = record_with_normal(Vec3::Y, false);

        for _ in 0..50 {
            match material.scatter(&ray, &rec, &mut rng) {
                Some(ScatterRecord::Specular { ray: scattered, .. }) => {
                    let expected = reflect(incoming.normalize(), Vec3::Y);
                    assert!(
                        (scattered.direction.normalize() - expected).length() < 1e-5,
                        "TIR must always reflect"
                    );
                    assert!(scattered.direction.y > 0.0);
                }
                _ => panic!("dielectric always scatters"),
            }
        }
    }

    #[test]
    fn test_dielectric_refracts_at_normal_incidence_sometimes() {
        let material = Dielectric::new(1.5);
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0), 0.0);
        let rec = record_with_normal(Vec3::Y, true);

        // At normal incidence reflectance is ~4%, so refraction dominates
        let mut refracted = 0;
        for _ in 0..200 {
            if let Some(ScatterRecord::Specular { ray: scattered, .. }) =
                material.scatter(&ray, &rec, &mut rng)
            {
                if scattered.direction.y < 0.0 {
                    refracted += 1;
                }
            }
        }
        assert!(refracted > 150, "refracted {} of 200", refracted);
    }

    #[test]
    fn test_diffuse_light_one_sided() {
        let light = DiffuseLight::from_color(Color::splat(15.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(1);

        let front = record_with_normal(Vec3::Y, true);
        assert_eq!(light.emitted(0.5, 0.5, Vec3::ZERO, &front), Color::splat(15.0));

        let back = record_with_normal(Vec3::Y, false);
        assert_eq!(light.emitted(0.5, 0.5, Vec3::ZERO, &back), Color::ZERO);

        // Lights never scatter
        assert!(light.scatter(&ray, &front, &mut rng).is_none());
    }

    #[test]
    fn test_isotropic_uniform_sphere() {
        let material = Isotropic::from_color(Color::splat(0.9));
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);
        let rec = record_with_normal(Vec3::X, true);

        match material.scatter(&ray, &rec, &mut rng) {
            Some(ScatterRecord::Diffuse { pdf, .. }) => {
                // Uniform over the sphere in both value and scattering_pdf
                let dir = pdf.sample(&mut rng);
                assert!((pdf.value(dir, &mut rng) - 1.0 / (4.0 * PI)).abs() < 1e-6);
                let out = Ray::new(Vec3::ZERO, dir, 0.0);
                assert!(
                    (material.scattering_pdf(&ray, &rec, &out) - 1.0 / (4.0 * PI)).abs() < 1e-6
                );
            }
            _ => panic!("expected a diffuse scatter"),
        }
    }
}
