use crate::Vec3;

/// An orthonormal basis built around a single vector.
///
/// `w` is the normalized input vector; `u` and `v` complete a right-handed
/// frame. Used to transform directions sampled in a canonical hemisphere into
/// world space around a surface normal.
#[derive(Debug, Copy, Clone)]
pub struct Onb {
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl Onb {
    /// Build an orthonormal basis whose w axis is aligned with `w`.
    pub fn new(w: Vec3) -> Self {
        let w = w.normalize();
        // Pick whichever cardinal axis is less parallel to w
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { u, v, w }
    }

    /// Transform a vector from basis coordinates to world space.
    pub fn local(&self, a: Vec3) -> Vec3 {
        a.x * self.u + a.y * self.v + a.z * self.w
    }
}
