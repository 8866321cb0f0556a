use nalgebra::{Matrix4, Point3, Vector3};

use crate::geometry::Ray;

pub mod first_person;

/// What the rendering side reads from a camera once per frame.
///
/// `view_direction` is expected to be normalized.
pub trait Camera {
    /// Returns the position of the camera.
    fn position(&self) -> Point3<f32>;
    /// Returns the direction the camera is facing.
    fn view_direction(&self) -> Vector3<f32>;
    /// Returns the world-to-view matrix.
    fn view_matrix(&self) -> Matrix4<f32>;
    /// Returns the projection matrix.
    fn projection_matrix(&self) -> Matrix4<f32>;

    /// Returns the aim ray, from the eye along the view direction.
    fn ray(&self) -> Ray {
        Ray::new(self.position(), self.view_direction())
    }
}
