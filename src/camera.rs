use crate::ray::Ray;
use crate::vec3::Vec3;

/// A pinhole camera. Every ray starts at the eye and passes through a point on
/// a unit-distance image plane.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl Camera {
    /// Aims a camera from `look_from` towards `look_at`, with `up` giving the
    /// rough vertical. `fov` is the vertical field of view in degrees and
    /// `aspect` is width over height.
    pub fn look(look_from: Vec3, look_at: Vec3, up: Vec3, fov: f64, aspect: f64) -> Self {
        let theta = fov * std::f64::consts::PI / 180.;
        let half_height = f64::tan(theta / 2.);
        let half_width = aspect * half_height;
        let origin = look_from;
        let w = (look_from - look_at).into_unit();
        let u = up.cross(w).into_unit();
        let v = w.cross(u);
        let lower_left_corner = origin - half_width * u - half_height * v - w;
        let horizontal = 2. * half_width * u;
        let vertical = 2. * half_height * v;
        Camera {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
        }
    }

    /// Gets the ray through image-plane coordinates `(s, t)`, each running
    /// from 0 (left/bottom) to 1 (right/top). The ray reaches the image plane
    /// at parameter 1.
    pub fn get_ray(&self, s: f64, t: f64) -> Ray {
        Ray::through(
            self.origin,
            self.lower_left_corner + s * self.horizontal + t * self.vertical,
        )
    }
}
