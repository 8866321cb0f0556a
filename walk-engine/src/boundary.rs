use nalgebra::Point3;

use crate::geometry::{Ray, Triangle};

/// The module turning loaded meshes into world-space triangles.
pub mod load;

#[derive(Copy, Clone, Debug, PartialEq)]
/// A ray/triangle intersection found while scanning a boundary set.
pub struct Hit {
    /// Index of the triangle in its boundary set.
    pub triangle: usize,
    pub point: Point3<f32>,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
}

#[derive(Clone, Debug, Default)]
/// Triangles a moving entity is tested against, or an exhibit's clickable
/// footprint.
///
/// Filled once at load time and read-only afterwards. Every query scans the
/// whole set linearly.
pub struct BoundarySet {
    triangles: Vec<Triangle>,
}

impl BoundarySet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    #[must_use]
    pub const fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Triangle> {
        self.triangles.get(index)
    }

    /// Tests `ray` against every triangle and returns the closest hit that
    /// `accept` lets through.
    ///
    /// The whole set is always scanned, so the result does not depend on
    /// insertion order.
    pub fn nearest_hit(&self, ray: &Ray, accept: impl Fn(&Hit) -> bool) -> Option<Hit> {
        self.triangles
            .iter()
            .enumerate()
            .filter_map(|(triangle, t)| {
                t.ray_intersection(ray).map(|point| Hit {
                    triangle,
                    point,
                    distance: (point - ray.origin).norm(),
                })
            })
            .filter(|hit| accept(hit))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl Extend<Triangle> for BoundarySet {
    fn extend<I: IntoIterator<Item = Triangle>>(&mut self, iter: I) {
        self.triangles.extend(iter);
    }
}

impl FromIterator<Triangle> for BoundarySet {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Self {
            triangles: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for BoundarySet {
    type Item = Triangle;
    type IntoIter = std::vec::IntoIter<Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.into_iter()
    }
}

impl<'a> IntoIterator for &'a BoundarySet {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}
