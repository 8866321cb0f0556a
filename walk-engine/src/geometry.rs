//! Ray and triangle primitives shared by movement blocking and picking.

use nalgebra::{Point3, Vector3};

/// Relative tolerance under which a ray is considered parallel to a plane.
const PARALLEL_EPSILON: f32 = 1e-6;
/// Relative tolerance that lets points on an edge or vertex count as inside.
const INSIDE_EPSILON: f32 = 1e-5;

#[derive(Copy, Clone, Debug, PartialEq)]
/// An origin and a direction.
///
/// The direction is kept as given: its magnitude is meaningful to the
/// movement checks (a displacement is tested as a ray) and is never
/// normalized away.
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    #[must_use]
    pub const fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    #[must_use]
    #[inline]
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// An immutable world-space triangle.
///
/// Edge vectors and the (unnormalized) plane normal are computed once at
/// construction.
pub struct Triangle {
    a: Point3<f32>,
    b: Point3<f32>,
    c: Point3<f32>,
    ab: Vector3<f32>,
    ac: Vector3<f32>,
    normal: Vector3<f32>,
}

impl Triangle {
    #[must_use]
    pub fn new(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let ab = b - a;
        let ac = c - a;
        Self {
            a,
            b,
            c,
            ab,
            ac,
            normal: ab.cross(&ac),
        }
    }

    #[must_use]
    pub const fn vertices(&self) -> [Point3<f32>; 3] {
        [self.a, self.b, self.c]
    }

    #[must_use]
    pub const fn ab(&self) -> Vector3<f32> {
        self.ab
    }

    #[must_use]
    pub const fn ac(&self) -> Vector3<f32> {
        self.ac
    }

    /// Returns `AB × AC`. Its length is twice the triangle area.
    #[must_use]
    pub const fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Returns the normal scaled to unit length, or `None` for a degenerate triangle.
    #[must_use]
    pub fn unit_normal(&self) -> Option<Vector3<f32>> {
        self.normal.try_normalize(f32::EPSILON)
    }

    /// A triangle whose vertices are (nearly) collinear has no usable plane.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.normal.norm_squared()
            <= f32::EPSILON * self.ab.norm_squared() * self.ac.norm_squared()
    }

    #[must_use]
    pub fn centroid(&self) -> Point3<f32> {
        Point3::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }

    /// Intersects the line carrying `ray` with the triangle.
    ///
    /// The parameter along the ray is not restricted to be positive: whether
    /// a hit behind the origin matters is left to the caller. Returns `None`
    /// when the ray is parallel to the plane (this includes a zero direction)
    /// or when the plane point falls outside the triangle.
    #[must_use]
    pub fn ray_intersection(&self, ray: &Ray) -> Option<Point3<f32>> {
        let plane = self.normal.dot(&self.a.coords);
        let perp = self.normal.dot(&ray.direction);
        if perp.abs() <= PARALLEL_EPSILON * self.normal.norm() * ray.direction.norm() {
            return None;
        }

        let t = (plane - self.normal.dot(&ray.origin.coords)) / perp;
        let point = ray.at(t);

        self.contains(&point).then_some(point)
    }

    /// Same-side test for a point already lying on the triangle's plane.
    ///
    /// Each edge and the point span a sub-triangle; the point is inside when
    /// all three sub-normals agree in sign with the triangle normal.
    #[must_use]
    pub fn contains(&self, point: &Point3<f32>) -> bool {
        let tolerance = -INSIDE_EPSILON * self.normal.norm_squared();

        [(self.a, self.b), (self.b, self.c), (self.c, self.a)]
            .iter()
            .all(|(from, to)| (to - from).cross(&(point - from)).dot(&self.normal) >= tolerance)
    }
}
