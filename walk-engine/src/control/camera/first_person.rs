use std::f32::consts::FRAC_PI_2;

use nalgebra::{Matrix4, Perspective3, Point3, Rotation3, Vector3};

/// Pitch stays strictly inside `(-π/2, π/2)` so the view never flips.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

#[derive(Copy, Clone, Debug)]
/// Represents a first person camera.
///
/// Only the orientation angles and the position are stored; the rotation is
/// derived from them whenever a matrix or direction is requested. Angles are
/// `x` = pitch, `y` = yaw and `z` = roll, in radians.
pub struct FirstPerson {
    angles: Vector3<f32>,
    position: Point3<f32>,
    near: f32,
    far: f32,
    fov: f32,
    aspect_ratio: f32,
    projection: Matrix4<f32>,
}

impl FirstPerson {
    /// Creates a camera. `fov` is the vertical field of view in degrees.
    ///
    /// ## Panics
    ///
    /// Panics unless `0 < near < far`, `0 < fov < 180` and `aspect_ratio > 0`.
    #[must_use]
    pub fn new(
        angles: Vector3<f32>,
        position: Point3<f32>,
        near: f32,
        far: f32,
        fov: f32,
        aspect_ratio: f32,
    ) -> Self {
        assert!(
            near > 0.0 && far > near,
            "clip distances must satisfy 0 < near < far"
        );
        assert!(
            fov > 0.0 && fov < 180.0,
            "field of view must be between 0 and 180 degrees"
        );
        assert!(aspect_ratio > 0.0, "aspect ratio must be positive");

        let mut camera = Self {
            angles: Vector3::zeros(),
            position,
            near,
            far,
            fov,
            aspect_ratio,
            projection: Self::perspective(aspect_ratio, fov, near, far),
        };
        camera.rotate(angles);
        camera
    }

    /// Perspective projection with the Y axis flipped for a Y-down clip space.
    fn perspective(aspect_ratio: f32, fov: f32, near: f32, far: f32) -> Matrix4<f32> {
        let mut projection =
            Perspective3::new(aspect_ratio, fov.to_radians(), near, far).to_homogeneous();
        projection[(1, 1)] *= -1.0;
        projection
    }

    /// Rebuilds the projection for a resized viewport.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        assert!(aspect_ratio > 0.0, "aspect ratio must be positive");
        self.aspect_ratio = aspect_ratio;
        self.projection = Self::perspective(aspect_ratio, self.fov, self.near, self.far);
    }

    /// Adds `delta` to the orientation angles, clamping pitch.
    pub fn rotate(&mut self, delta: Vector3<f32>) {
        self.angles += delta;
        self.angles.x = self.angles.x.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Moves the camera. No collision is involved at this level.
    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.position += delta;
    }

    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    #[must_use]
    pub const fn angles(&self) -> Vector3<f32> {
        self.angles
    }

    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.angles.x
    }

    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.angles.y
    }

    #[must_use]
    pub const fn near(&self) -> f32 {
        self.near
    }

    #[must_use]
    pub const fn far(&self) -> f32 {
        self.far
    }

    #[must_use]
    pub const fn fov(&self) -> f32 {
        self.fov
    }

    #[must_use]
    pub const fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Yaw around world up, then pitch around the right axis, then roll.
    #[must_use]
    pub fn orientation(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::y_axis(), self.angles.y)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), self.angles.x)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.angles.z)
    }

    #[must_use]
    pub fn up(&self) -> Vector3<f32> {
        self.orientation() * Vector3::y()
    }

    #[must_use]
    pub fn right(&self) -> Vector3<f32> {
        self.orientation() * Vector3::x()
    }
}

impl Default for FirstPerson {
    fn default() -> Self {
        Self::new(Vector3::zeros(), Point3::origin(), 0.1, 100.0, 70.0, 16.0 / 9.0)
    }
}

impl super::Camera for FirstPerson {
    fn position(&self) -> Point3<f32> {
        self.position
    }

    fn view_direction(&self) -> Vector3<f32> {
        self.orientation() * -Vector3::z()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.orientation().transpose().to_homogeneous()
            * Matrix4::new_translation(&-self.position.coords)
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }
}
