//! Click-to-inspect hit testing for exhibits.

use crate::boundary::BoundarySet;
use crate::error::LoadError;
use crate::geometry::Ray;

/// A picture, statue or sign that can be inspected.
#[derive(Clone, Debug)]
pub struct Exhibit {
    name: String,
    description: String,
    body: BoundarySet,
    description_visible: bool,
}

impl Exhibit {
    /// Creates an exhibit whose clickable footprint is `body`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        body: BoundarySet,
    ) -> Result<Self, LoadError> {
        let name = name.into();
        if body.is_empty() {
            return Err(LoadError::EmptyBody { name });
        }

        Ok(Self {
            name,
            description: description.into(),
            body,
            description_visible: false,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn body(&self) -> &BoundarySet {
        &self.body
    }

    #[must_use]
    pub const fn is_description_visible(&self) -> bool {
        self.description_visible
    }

    pub fn toggle_description(&mut self) {
        self.description_visible = !self.description_visible;
    }

    /// Distance along `ray` to the closest part of the exhibit in front of it.
    ///
    /// With `max_distance`, hits at or beyond that distance are ignored.
    #[must_use]
    pub fn hit_distance(&self, ray: &Ray, max_distance: Option<f32>) -> Option<f32> {
        self.body
            .nearest_hit(ray, |hit| {
                (hit.point - ray.origin).dot(&ray.direction) > 0.0
                    && max_distance.map_or(true, |max| hit.distance < max)
            })
            .map(|hit| hit.distance)
    }

    #[must_use]
    pub fn is_clicked(&self, ray: &Ray) -> bool {
        self.hit_distance(ray, None).is_some()
    }
}

/// The exhibit under the crosshair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pick {
    /// Index into the slice that was searched.
    pub index: usize,
    pub distance: f32,
}

/// Finds the closest exhibit hit by `ray`, so the front one of several
/// overlapping exhibits wins.
#[must_use]
pub fn pick_nearest(exhibits: &[Exhibit], ray: &Ray, max_distance: Option<f32>) -> Option<Pick> {
    exhibits
        .iter()
        .enumerate()
        .filter_map(|(index, exhibit)| {
            exhibit
                .hit_distance(ray, max_distance)
                .map(|distance| Pick { index, distance })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}
