//! Errors reported by the opt-in geometry validators.
//!
//! Intersection tests never fail; they answer "no hit" for degenerate input.
//! These errors exist for callers who want to reject bad geometry up front.

use thiserror::Error;

#[derive(Error, Copy, Clone, Debug, PartialEq)]
pub enum GeomError {
    /// A coordinate or radius was NaN or infinite. Names the offending part.
    #[error("{0} has a non-finite component")]
    NonFinite(&'static str),

    /// The triangle's vertices are (nearly) collinear, so it has no plane.
    #[error("triangle is degenerate (|normal|^2 = {0})")]
    DegenerateTriangle(f64),

    /// The fourth quad vertex is off the plane of the first three.
    #[error("quad is not planar (D is {0} off the ABC plane)")]
    NonPlanarQuad(f64),

    #[error("sphere radius {0} is negative")]
    NegativeRadius(f64),

    /// The ray's travel vector is zero.
    #[error("ray has a zero direction")]
    ZeroDirection,
}

pub type Result<T> = std::result::Result<T, GeomError>;
