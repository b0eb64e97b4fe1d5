//! Knobs for the intersection contract.
//!
//! Loadable from JSON; any field left out takes its default.

use serde::{Deserialize, Serialize};

use crate::object::EPSILON;

/// Options accepted by [`Intersect::intersect_with`](crate::object::Intersect::intersect_with).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Upper bound on the ray parameter `t`. `None` leaves the ray unbounded,
    /// so any `t >= 0` counts. `Some(1.0)` turns a ray built with
    /// [`Ray::through`](crate::ray::Ray::through) into the segment between its
    /// two points.
    pub t_max: Option<f64>,
    /// Tolerance below which the ray is treated as parallel to a triangle's
    /// plane.
    pub epsilon: f64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            t_max: None,
            epsilon: EPSILON,
        }
    }
}

impl Options {
    /// Options bounding `t` to `[0, 1]`.
    pub fn segment() -> Self {
        Options {
            t_max: Some(1.),
            ..Options::default()
        }
    }

    /// Parses options from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Whether `t` lies within `[0, t_max]`. NaN never does.
    #[inline]
    pub(crate) fn accepts(&self, t: f64) -> bool {
        match self.t_max {
            Some(t_max) => (0. ..=t_max).contains(&t),
            None => t >= 0.,
        }
    }
}
