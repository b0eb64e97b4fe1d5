use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::Options;
use crate::error::{GeomError, Result};
use crate::ray::Ray;
use crate::vec3::Vec3;

/// Tolerance used to treat near-zero quantities as zero before dividing by
/// them.
pub const EPSILON: f64 = 1e-8;

/// Something a ray can hit.
///
/// Implementations answer one question: does `ray` meet the object at some
/// parameter `t` with `0 <= t`, and `t <= t_max` if the options give a bound?
/// They carry no state between calls, so every answer depends only on the
/// object and the arguments.
pub trait Intersect: std::fmt::Debug + Sync + Send {
    /// Tests `ray` against the object under `opts`.
    ///
    /// Degenerate geometry (zero-area triangles, rays parallel to a plane, a
    /// zero travel vector) is reported as a miss, never as an error.
    fn intersect_with(&self, ray: &Ray, opts: &Options) -> bool;

    /// Tests `ray` against the object, treating it as unbounded.
    #[inline]
    fn intersect(&self, ray: &Ray) -> bool {
        self.intersect_with(ray, &Options::default())
    }
}

impl<'r, T: Intersect + ?Sized> Intersect for &'r T {
    #[inline]
    fn intersect_with(&self, ray: &Ray, opts: &Options) -> bool {
        (*self).intersect_with(ray, opts)
    }
}

/// A closed triangle with vertices `a`, `b`, `c`. Points on the edges count as
/// inside.
///
/// The winding only decides which way [`normal`](Triangle::normal) points;
/// both faces are hit alike.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Triangle { a, b, c }
    }

    /// The plane normal `(b - a) x (c - a)`, not normalized. Its length is
    /// twice the triangle's area.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.a.is_finite() && self.b.is_finite() && self.c.is_finite()) {
            return Err(GeomError::NonFinite("triangle"));
        }
        let n = self.normal();
        let n2 = n.dot(n);
        if n2 < EPSILON {
            return Err(GeomError::DegenerateTriangle(n2));
        }
        Ok(())
    }
}

impl Intersect for Triangle {
    fn intersect_with(&self, ray: &Ray, opts: &Options) -> bool {
        let u = self.b - self.a;
        let v = self.c - self.a;
        let n = u.cross(v);

        // Ray parallel to the plane, or no plane at all.
        let d = n.dot(ray.direction);
        if d.abs() < opts.epsilon {
            trace!(?n, ?ray.direction, "ray parallel to triangle plane");
            return false;
        }

        let t = -n.dot(ray.origin - self.a) / d;
        if !opts.accepts(t) {
            return false;
        }

        // Express the hit point relative to `a` in the (u, v) basis.
        let w = ray.point_at_parameter(t) - self.a;
        let uu = u.dot(u);
        let uv = u.dot(v);
        let vv = v.dot(v);
        let wu = w.dot(u);
        let wv = w.dot(v);
        let denom = uv * uv - uu * vv;
        if denom == 0. || !denom.is_finite() {
            trace!(denom, "degenerate triangle basis");
            return false;
        }

        let s = (uv * wv - vv * wu) / denom;
        if !(0. ..=1.).contains(&s) {
            return false;
        }

        let p = (uv * wu - uu * wv) / denom;
        p >= 0. && s + p <= 1.
    }
}

/// A quadrilateral `a`, `b`, `c`, `d`, tested as the two triangles either
/// side of the diagonal `a`-`c`.
///
/// For a planar, convex quad wound in order this covers exactly the quad, and
/// which diagonal is used makes no difference. Otherwise the result is
/// whatever the two triangles cover. A concave quad whose reflex vertex is
/// `b` or `d` gains the notch; a vertex order that crosses itself (a
/// bow-tie) loses part of the intended area. Nothing checks for either case;
/// see [`Quad::validate`] for planarity.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    pub d: Vec3,
}

impl Quad {
    pub fn new(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Self {
        Quad { a, b, c, d }
    }

    /// The halves `(a, b, c)` and `(a, d, c)`.
    #[inline]
    pub fn triangles(&self) -> [Triangle; 2] {
        [
            Triangle::new(self.a, self.b, self.c),
            Triangle::new(self.a, self.d, self.c),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        if !self.d.is_finite() {
            return Err(GeomError::NonFinite("quad"));
        }
        let abc = Triangle::new(self.a, self.b, self.c);
        abc.validate().map_err(|e| match e {
            GeomError::NonFinite(_) => GeomError::NonFinite("quad"),
            e => e,
        })?;

        let n = abc.normal();
        let off_plane = n.dot(self.d - self.a).abs() / n.length();
        if off_plane > EPSILON {
            return Err(GeomError::NonPlanarQuad(off_plane));
        }
        Ok(())
    }
}

impl Intersect for Quad {
    #[inline]
    fn intersect_with(&self, ray: &Ray, opts: &Options) -> bool {
        let [abc, adc] = self.triangles();
        abc.intersect_with(ray, opts) || adc.intersect_with(ray, opts)
    }
}

/// A solid ball. A ray starting inside it counts as a hit.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    /// Radius of the sphere. Expected to be non-negative, but not enforced.
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64) -> Self {
        Sphere { center, radius }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.center.is_finite() || !self.radius.is_finite() {
            return Err(GeomError::NonFinite("sphere"));
        }
        if self.radius < 0. {
            return Err(GeomError::NegativeRadius(self.radius));
        }
        Ok(())
    }
}

impl Intersect for Sphere {
    fn intersect_with(&self, ray: &Ray, opts: &Options) -> bool {
        // Solve |origin + t*direction - center|^2 = radius^2 for t.
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        if a == 0. {
            trace!("zero-length ray direction");
            return false;
        }
        let b = 2. * oc.dot(ray.direction);
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4. * a * c;
        if discriminant < 0. {
            return false;
        }

        let sqrt_d = discriminant.sqrt();
        let t_near = (-b - sqrt_d) / (2. * a);
        let t_far = (-b + sqrt_d) / (2. * a);

        // The ray is inside the ball for t in [t_near, t_far]; that span has to
        // overlap [0, t_max]. Both roots negative means the ball is behind us.
        t_far >= 0. && opts.t_max.map_or(true, |t_max| t_near <= t_max)
    }
}

/// Any one of the supported primitives.
///
/// Deserializes from JSON tagged with `"kind"`:
///
/// ```
/// use rtgeom::object::{Intersect, Primitive};
/// use rtgeom::ray::Ray;
/// use rtgeom::vec3::Vec3;
///
/// let p: Primitive = serde_json::from_str(
///     r#"{ "kind": "sphere", "center": [0, 0, 0], "radius": 1 }"#,
/// ).unwrap();
/// assert!(p.intersect(&Ray::new(Vec3(0., 4., 0.), Vec3(0., -1., 0.))));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Triangle(Triangle),
    Quad(Quad),
    Sphere(Sphere),
}

impl Primitive {
    pub fn validate(&self) -> Result<()> {
        let result = match self {
            Primitive::Triangle(t) => t.validate(),
            Primitive::Quad(q) => q.validate(),
            Primitive::Sphere(s) => s.validate(),
        };
        if let Err(e) = &result {
            debug!(primitive = ?self, error = %e, "invalid primitive");
        }
        result
    }
}

impl Intersect for Primitive {
    #[inline]
    fn intersect_with(&self, ray: &Ray, opts: &Options) -> bool {
        match self {
            Primitive::Triangle(t) => t.intersect_with(ray, opts),
            Primitive::Quad(q) => q.intersect_with(ray, opts),
            Primitive::Sphere(s) => s.intersect_with(ray, opts),
        }
    }
}

impl From<Triangle> for Primitive {
    fn from(t: Triangle) -> Self {
        Primitive::Triangle(t)
    }
}

impl From<Quad> for Primitive {
    fn from(q: Quad) -> Self {
        Primitive::Quad(q)
    }
}

impl From<Sphere> for Primitive {
    fn from(s: Sphere) -> Self {
        Primitive::Sphere(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_tri() -> Triangle {
        Triangle::new(Vec3(-1., -1., 0.), Vec3(1., -1., 0.), Vec3(0., 1., 0.))
    }

    #[test]
    fn test_triangle_head_on() {
        let ray = Ray::new(Vec3(0., 0., -1.), Vec3(0., 0., 1.));
        assert!(unit_tri().intersect(&ray));
        // Coming from the other side works too.
        let ray = Ray::new(Vec3(0., 0., 1.), Vec3(0., 0., -1.));
        assert!(unit_tri().intersect(&ray));
    }

    #[test]
    fn test_triangle_behind_origin() {
        let ray = Ray::new(Vec3(0., 0., -1.), Vec3(0., 0., -1.));
        assert!(!unit_tri().intersect(&ray));
    }

    #[test]
    fn test_triangle_plane_hit_outside() {
        // Hits z = 0 at (3, 3, 0), well outside the triangle.
        let ray = Ray::through(Vec3(3., 3., -1.), Vec3(3., 3., 1.));
        assert!(!unit_tri().intersect(&ray));
        // Just past each edge.
        for target in &[Vec3(0., -1.01, 0.), Vec3(0.6, 0.3, 0.), Vec3(-0.6, 0.3, 0.)] {
            let ray = Ray::through(Vec3(0., 0., -1.), *target);
            assert!(!unit_tri().intersect(&ray), "{:?}", target);
        }
    }

    #[test]
    fn test_triangle_vertices_count() {
        let tri = unit_tri();
        for v in &[tri.a, tri.b, tri.c] {
            let ray = Ray::through(*v + Vec3(0., 0., 1.), *v);
            assert!(tri.intersect(&ray), "{:?}", v);
        }
    }

    #[test]
    fn test_triangle_degenerate() {
        let tri = Triangle::new(Vec3(0., 0., 0.), Vec3(1., 1., 0.), Vec3(2., 2., 0.));
        assert_eq!(tri.normal(), Vec3::default());
        let ray = Ray::through(Vec3(1., 1., 1.), Vec3(1., 1., 0.));
        assert!(!tri.intersect(&ray));
        assert!(matches!(tri.validate(), Err(GeomError::DegenerateTriangle(_))));
    }

    #[test]
    fn test_triangle_degenerate_basis() {
        // The normal is tiny but a huge travel vector clears the parallel
        // check, while |u|^2 |v|^2 underflows to zero.
        let tri = Triangle::new(Vec3(0., 0., 0.), Vec3(1e-100, 0., 0.), Vec3(0., 1e-100, 0.));
        let ray = Ray::new(Vec3(1e-101, 1e-101, 1.), Vec3(0., 0., -1e200));
        assert!(tri.normal().dot(ray.direction).abs() >= EPSILON);
        assert!(!tri.intersect(&ray));
    }

    #[test]
    fn test_triangle_zero_direction() {
        let ray = Ray::new(Vec3(0., 0., 0.), Vec3::default());
        assert!(!unit_tri().intersect(&ray));
    }

    #[test]
    fn test_triangle_t_max() {
        let ray = Ray::through(Vec3(0., 0., -1.), Vec3(0., 0., -0.5));
        assert!(unit_tri().intersect(&ray));
        assert!(!unit_tri().intersect_with(&ray, &Options::segment()));

        // Landing exactly on the plane at t = 1 is still inside the segment.
        let ray = Ray::through(Vec3(0., 0., -1.), Vec3(0., 0., 0.));
        assert!(unit_tri().intersect_with(&ray, &Options::segment()));
    }

    #[test]
    fn test_triangle_nan_never_hits() {
        let ray = Ray::new(Vec3(std::f64::NAN, 0., -1.), Vec3(0., 0., 1.));
        assert!(!unit_tri().intersect(&ray));
    }

    #[test]
    fn test_triangle_epsilon_is_configurable() {
        // Nearly parallel: n = (0, 0, 4), so n.d = 4e-9.
        let ray = Ray::new(Vec3(-1., 0., -1e-9), Vec3(1., 0., 1e-9));
        assert!(!unit_tri().intersect(&ray));
        let loose = Options {
            epsilon: 0.,
            ..Options::default()
        };
        assert!(unit_tri().intersect_with(&ray, &loose));
    }

    #[test]
    fn test_quad_triangles() {
        let q = Quad::new(
            Vec3(0., 0., 0.),
            Vec3(1., 0., 0.),
            Vec3(1., 1., 0.),
            Vec3(0., 1., 0.),
        );
        let [abc, adc] = q.triangles();
        assert_eq!(abc, Triangle::new(q.a, q.b, q.c));
        assert_eq!(adc, Triangle::new(q.a, q.d, q.c));
    }

    #[test]
    fn test_quad_either_half() {
        let q = Quad::new(
            Vec3(0., 0., 0.),
            Vec3(1., 0., 0.),
            Vec3(1., 1., 0.),
            Vec3(0., 1., 0.),
        );
        // Below the diagonal, in (a, b, c).
        assert!(q.intersect(&Ray::through(Vec3(0.75, 0.25, 1.), Vec3(0.75, 0.25, 0.))));
        // Above it, in (a, d, c).
        assert!(q.intersect(&Ray::through(Vec3(0.25, 0.75, 1.), Vec3(0.25, 0.75, 0.))));
        // Outside.
        assert!(!q.intersect(&Ray::through(Vec3(1.25, 0.75, 1.), Vec3(1.25, 0.75, 0.))));
    }

    #[test]
    fn test_quad_validate() {
        let flat = Quad::new(
            Vec3(0., 0., 0.),
            Vec3(1., 0., 0.),
            Vec3(1., 1., 0.),
            Vec3(0., 1., 0.),
        );
        assert_eq!(flat.validate(), Ok(()));

        let bent = Quad { d: Vec3(0., 1., 0.5), ..flat };
        match bent.validate() {
            Err(GeomError::NonPlanarQuad(off)) => assert!((off - 0.5).abs() < 1e-12),
            other => panic!("unexpected {:?}", other),
        }

        let nan = Quad { d: Vec3(0., std::f64::NAN, 0.), ..flat };
        assert_eq!(nan.validate(), Err(GeomError::NonFinite("quad")));
        let nan = Quad { a: Vec3(0., std::f64::NAN, 0.), ..flat };
        assert_eq!(nan.validate(), Err(GeomError::NonFinite("quad")));
    }

    #[test]
    fn test_sphere_through_center() {
        let s = Sphere::new(Vec3::default(), 1.);
        assert!(s.intersect(&Ray::new(Vec3(0., 4., 0.), Vec3(0., -1., 0.))));
        assert!(!s.intersect(&Ray::new(Vec3(0., 4., 0.), Vec3(0., 1., 0.))));
    }

    #[test]
    fn test_sphere_tangent() {
        // Grazes the surface at (1, 0, 0); the discriminant is exactly zero.
        let s = Sphere::new(Vec3::default(), 1.);
        assert!(s.intersect(&Ray::new(Vec3(1., -3., 0.), Vec3(0., 1., 0.))));
        assert!(!s.intersect(&Ray::new(Vec3(1.001, -3., 0.), Vec3(0., 1., 0.))));
    }

    #[test]
    fn test_sphere_direction_length_is_irrelevant() {
        let s = Sphere::new(Vec3(0., 0., 5.), 1.);
        for &scale in &[1e-3, 0.5, 1., 7., 1e4] {
            let hit = Ray::new(Vec3::default(), scale * Vec3(0., 0.1, 1.));
            let miss = Ray::new(Vec3::default(), scale * Vec3(0., 0.3, 1.));
            assert!(s.intersect(&hit), "scale {}", scale);
            assert!(!s.intersect(&miss), "scale {}", scale);
        }
    }

    #[test]
    fn test_sphere_inside() {
        let s = Sphere::new(Vec3(1., 1., 1.), 2.);
        let ray = Ray::new(Vec3(1.5, 1., 1.), Vec3(0., 0., 1.));
        assert!(s.intersect(&ray));
        // A short segment wholly inside the ball is still a hit.
        assert!(s.intersect_with(&ray, &Options { t_max: Some(0.1), ..Options::default() }));
    }

    #[test]
    fn test_sphere_zero_radius() {
        let s = Sphere::new(Vec3(0., 0., 3.), 0.);
        assert!(s.intersect(&Ray::new(Vec3::default(), Vec3(0., 0., 1.))));
        assert!(!s.intersect(&Ray::new(Vec3::default(), Vec3(0., 0.1, 1.))));
    }

    #[test]
    fn test_sphere_zero_direction() {
        let s = Sphere::new(Vec3::default(), 1.);
        assert!(!s.intersect(&Ray::new(Vec3::default(), Vec3::default())));
    }

    #[test]
    fn test_sphere_validate() {
        assert_eq!(Sphere::new(Vec3::default(), 0.).validate(), Ok(()));
        assert_eq!(
            Sphere::new(Vec3::default(), -1.).validate(),
            Err(GeomError::NegativeRadius(-1.))
        );
        assert_eq!(
            Sphere::new(Vec3::default(), std::f64::INFINITY).validate(),
            Err(GeomError::NonFinite("sphere"))
        );
    }

    #[test]
    fn test_primitive_dispatch() {
        let ray = Ray::new(Vec3(0., 0., -1.), Vec3(0., 0., 1.));
        let prims: Vec<Primitive> = vec![
            unit_tri().into(),
            Quad::new(
                Vec3(-1., -1., 0.),
                Vec3(1., -1., 0.),
                Vec3(1., 1., 0.),
                Vec3(-1., 1., 0.),
            )
            .into(),
            Sphere::new(Vec3::default(), 0.5).into(),
        ];
        for p in &prims {
            assert!(p.intersect(&ray), "{:?}", p);
            assert_eq!(p.validate(), Ok(()));
        }
    }

    #[test]
    fn test_primitive_as_trait_object() {
        let boxed: Vec<Box<dyn Intersect>> = vec![
            Box::new(unit_tri()),
            Box::new(Sphere::new(Vec3(0., 0., 10.), 1.)),
        ];
        let ray = Ray::new(Vec3(0., 0., -1.), Vec3(0., 0., 1.));
        assert!(boxed.iter().all(|o| o.intersect(&ray)));
    }

    #[test]
    fn test_primitive_json() {
        let p: Primitive = serde_json::from_str(
            r#"{ "kind": "triangle", "a": [-1, -1, 0], "b": [1, -1, 0], "c": [0, 1, 0] }"#,
        )
        .unwrap();
        assert_eq!(p, Primitive::Triangle(unit_tri()));

        let json = serde_json::to_string(&Primitive::from(Sphere::new(Vec3(1., 2., 3.), 4.))).unwrap();
        assert_eq!(json, r#"{"kind":"sphere","center":[1.0,2.0,3.0],"radius":4.0}"#);

        assert!(serde_json::from_str::<Primitive>(r#"{ "kind": "torus" }"#).is_err());
    }
}
