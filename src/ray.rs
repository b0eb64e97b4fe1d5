use serde::{Deserialize, Serialize};

use crate::error::{GeomError, Result};
use crate::vec3::Vec3;

/// A ray, beginning at `origin` and extending along `direction`.
///
/// `direction` is a travel vector: it need not be unit length, and its length
/// sets the scale of `t`. A point `t` along the ray is `origin + t * direction`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Makes a ray from an origin and a travel vector.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Ray { origin, direction }
    }

    /// Makes a ray starting at `origin` and passing through `target` at `t = 1`.
    ///
    /// ```
    /// use rtgeom::ray::Ray;
    /// use rtgeom::vec3::Vec3;
    ///
    /// let r = Ray::through(Vec3(0., 0., -1.), Vec3(0., 0., 1.));
    /// assert_eq!(r.direction, Vec3(0., 0., 2.));
    /// assert_eq!(r.point_at_parameter(1.), Vec3(0., 0., 1.));
    /// ```
    pub fn through(origin: Vec3, target: Vec3) -> Self {
        Ray {
            origin,
            direction: target - origin,
        }
    }

    /// Finds the point along the ray at parameter `t`. Positive values of `t`
    /// represent positions forward from the origin, and negative values,
    /// behind the origin.
    pub fn point_at_parameter(&self, t: f64) -> Vec3 {
        self.origin + t * self.direction
    }

    /// Checks that the ray is finite and actually goes somewhere.
    pub fn validate(&self) -> Result<()> {
        if !self.origin.is_finite() || !self.direction.is_finite() {
            return Err(GeomError::NonFinite("ray"));
        }
        if self.direction.dot(self.direction) == 0. {
            return Err(GeomError::ZeroDirection);
        }
        Ok(())
    }
}
