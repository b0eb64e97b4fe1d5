use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// A three-vector of doubles, used as both a point and a direction.
///
/// Components are accessed tuple-style: `v.0`, `v.1`, `v.2`.
///
/// Arithmetic is plain IEEE-754 double arithmetic, one operation at a time.
/// Nothing here fuses multiplies into adds, so results are reproducible across
/// targets, which matters for the epsilon comparisons in `object`.
#[derive(Copy, Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec3(pub f64, pub f64, pub f64);

impl Vec3 {
    /// Generates a random `Vec3` inside a sphere with unit radius. The length
    /// of the result is between 0 and 1.
    pub fn in_unit_sphere(rng: &mut impl Rng) -> Self {
        loop {
            let v = 2. * rng.gen::<Vec3>() - Vec3::from(1.);
            if v.dot(v) < 1. {
                return v;
            }
        }
    }

    /// Computes the dot product of two vectors.
    #[inline]
    pub fn dot(&self, other: Self) -> f64 {
        self.zip_with(other, core::ops::Mul::mul)
            .reduce(core::ops::Add::add)
    }

    /// Computes the cross product of two vectors, following the right-hand
    /// rule.
    ///
    /// ```
    /// use rtgeom::vec3::Vec3;
    ///
    /// let x = Vec3(1., 0., 0.);
    /// let y = Vec3(0., 1., 0.);
    /// assert_eq!(x.cross(y), Vec3(0., 0., 1.));
    /// assert_eq!(y.cross(x), Vec3(0., 0., -1.));
    /// ```
    #[inline]
    pub fn cross(&self, other: Self) -> Self {
        Vec3(
            self.1 * other.2 - self.2 * other.1,
            self.2 * other.0 - self.0 * other.2,
            self.0 * other.1 - self.1 * other.0,
        )
    }

    /// Squared Euclidean distance between two points.
    #[inline]
    pub fn squared_distance(&self, other: Self) -> f64 {
        let d = *self - other;
        d.dot(d)
    }

    /// Gets the length/magnitude of a vector.
    #[inline]
    pub fn length(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    /// Produces a vector collinear with `self` but with unit length. That is,
    /// the result points the same direction as `self` relative to the origin.
    pub fn into_unit(self) -> Self {
        self / self.length()
    }

    /// Checks that no component is NaN or infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite() && self.2.is_finite()
    }

    /// Applies `f` to each element of the vector in turn, giving a new vector.
    #[inline]
    pub fn map(self, mut f: impl FnMut(f64) -> f64) -> Self {
        Vec3(f(self.0), f(self.1), f(self.2))
    }

    /// Combines each corresponding element of `self` and `other` by giving them
    /// as arguments to function `f`. The results are collected into a new
    /// vector.
    #[inline]
    pub fn zip_with(self, other: Vec3, mut f: impl FnMut(f64, f64) -> f64) -> Self {
        Vec3(f(self.0, other.0), f(self.1, other.1), f(self.2, other.2))
    }

    /// Combines the elements of `self` using `f` until only one result remains.
    #[inline]
    pub fn reduce(self, f: impl Fn(f64, f64) -> f64) -> f64 {
        f(f(self.0, self.1), self.2)
    }
}

/// Broadcasts a single value to all vector lanes.
impl From<f64> for Vec3 {
    #[inline]
    fn from(v: f64) -> Self {
        Vec3(v, v, v)
    }
}

/// `scalar * vector`
impl std::ops::Mul<Vec3> for f64 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Self::Output {
        rhs.map(|x| self * x)
    }
}

/// `vector / scalar`
impl std::ops::Div<f64> for Vec3 {
    type Output = Vec3;

    #[inline]
    fn div(self, rhs: f64) -> Self::Output {
        self.map(|x| x / rhs)
    }
}

/// `vector + vector`
impl std::ops::Add for Vec3 {
    type Output = Vec3;

    #[inline]
    fn add(self, rhs: Vec3) -> Self::Output {
        self.zip_with(rhs, std::ops::Add::add)
    }
}

/// `vector - vector`
impl std::ops::Sub for Vec3 {
    type Output = Vec3;

    #[inline]
    fn sub(self, rhs: Vec3) -> Self::Output {
        self.zip_with(rhs, std::ops::Sub::sub)
    }
}

/// `-vector`
impl std::ops::Neg for Vec3 {
    type Output = Vec3;

    #[inline]
    fn neg(self) -> Self::Output {
        self.map(std::ops::Neg::neg)
    }
}

/// Allow `Vec3` to be produced by `Rng::gen`.
///
/// The resulting vector has each component in the half-open range `[0,1)`. Note
/// that this is *not* a unit vector.
impl rand::distributions::Distribution<Vec3> for rand::distributions::Standard {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        Vec3(rng.gen(), rng.gen(), rng.gen())
    }
}
