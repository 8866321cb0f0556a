pub mod camera;
pub mod controller;

/// A per-frame intent produced by a controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Forward,
    Backward,
    Left,
    Right,
    /// Pointer motion in pixels since the last frame, `(dx, dy)`.
    Look(f32, f32),
    /// Held turn keys as unit rates, `(yaw, pitch)`; scaled by elapsed time.
    Turn(f32, f32),
    /// Inspect whatever exhibit is under the crosshair.
    Interact,
}
