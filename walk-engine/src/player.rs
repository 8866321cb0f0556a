use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::boundary::{BoundarySet, Hit};
use crate::control::camera::{first_person::FirstPerson, Camera};
use crate::error::LoadError;
use crate::geometry::{Ray, Triangle};

/// What happens to a displacement that runs into the boundary.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionResponse {
    /// The whole displacement is dropped for this step.
    #[default]
    Block,
    /// The part of the displacement along the wall is kept.
    Slide,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Walking speed in world units per second.
    pub movement_speed: f32,
    /// Extra reach beyond the displacement length within which a wall blocks.
    pub collision_epsilon: f32,
    /// Only walls ahead of the displacement block it.
    pub require_same_direction: bool,
    pub response: CollisionResponse,
    /// Upper bound on retries when sliding into corners.
    pub max_slide_iterations: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            movement_speed: 3.0,
            collision_epsilon: 0.1,
            require_same_direction: true,
            response: CollisionResponse::Block,
            max_slide_iterations: 3,
        }
    }
}

impl PlayerConfig {
    /// Rejects tunables that would silently change the veto policy.
    pub fn validate(&self) -> Result<(), LoadError> {
        let reason = if !(self.movement_speed.is_finite() && self.movement_speed >= 0.0) {
            "movement_speed must be a finite, non-negative number"
        } else if !(self.collision_epsilon.is_finite() && self.collision_epsilon >= 0.0) {
            "collision_epsilon must be a finite, non-negative number"
        } else {
            return Ok(());
        };
        Err(LoadError::InvalidPlayer { reason })
    }
}

/// Outcome of one movement attempt.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Step {
    /// The full displacement was committed.
    Moved(Vector3<f32>),
    /// Only the given wall-tangential displacement was committed.
    Slid(Vector3<f32>),
    /// Nothing moved.
    Blocked,
}

impl Step {
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked)
    }

    /// The displacement that was actually applied.
    #[must_use]
    pub fn displacement(&self) -> Vector3<f32> {
        match *self {
            Self::Moved(ds) | Self::Slid(ds) => ds,
            Self::Blocked => Vector3::zeros(),
        }
    }
}

/// `proj_onto(u) = (u·v / v·v) v`
fn project(u: &Vector3<f32>, onto: &Vector3<f32>) -> Vector3<f32> {
    onto * (u.dot(onto) / onto.dot(onto))
}

/// Keeps the X and Z components so walking stays level whatever the pitch.
fn horizontal(v: &Vector3<f32>) -> Vector3<f32> {
    project(v, &Vector3::x()) + project(v, &Vector3::z())
}

/// A walking viewer: a camera plus the walls it cannot pass through.
///
/// The player position and the camera position always move together.
#[derive(Clone, Debug)]
pub struct Player {
    camera: FirstPerson,
    boundaries: BoundarySet,
    position: Point3<f32>,
    config: PlayerConfig,
}

impl Player {
    /// Creates a player standing where `camera` is.
    #[must_use]
    pub fn new(camera: FirstPerson, boundaries: BoundarySet, config: PlayerConfig) -> Self {
        Self {
            position: camera.position(),
            camera,
            boundaries,
            config,
        }
    }

    #[must_use]
    pub const fn position(&self) -> Point3<f32> {
        self.position
    }

    #[must_use]
    pub const fn camera(&self) -> &FirstPerson {
        &self.camera
    }

    #[must_use]
    pub const fn boundaries(&self) -> &BoundarySet {
        &self.boundaries
    }

    #[must_use]
    pub const fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.camera.set_aspect_ratio(aspect_ratio);
    }

    /// Level walking direction, not normalized: looking steeply up or down
    /// slows the walk.
    fn heading(&self) -> Vector3<f32> {
        horizontal(&self.camera.view_direction())
    }

    fn strafe(&self) -> Vector3<f32> {
        self.heading().cross(&Vector3::y())
    }

    fn stride(&self, dt: f32) -> f32 {
        self.config.movement_speed * dt
    }

    pub fn forward(&mut self, dt: f32) -> Step {
        self.try_move(self.heading() * self.stride(dt))
    }

    pub fn backward(&mut self, dt: f32) -> Step {
        self.try_move(-self.heading() * self.stride(dt))
    }

    pub fn left(&mut self, dt: f32) -> Step {
        self.try_move(-self.strafe() * self.stride(dt))
    }

    pub fn right(&mut self, dt: f32) -> Step {
        self.try_move(self.strafe() * self.stride(dt))
    }

    /// Turns the head. Rotation is never checked against the boundary.
    pub fn move_head(&mut self, delta: Vector3<f32>) {
        self.camera.rotate(delta);
    }

    /// Places the player without any collision check.
    pub fn teleport(&mut self, position: Point3<f32>) {
        self.position = position;
        self.camera.set_position(position);
    }

    /// Returns the closest boundary hit that forbids moving by `ds`.
    ///
    /// A wall blocks when the displacement line meets it no farther than
    /// `|ds| + collision_epsilon` from the player and, unless disabled, on the
    /// side the player is moving towards.
    #[must_use]
    pub fn blocking_hit(&self, ds: Vector3<f32>) -> Option<Hit> {
        let ray = Ray::new(self.position, ds);
        let reach = ds.norm() + self.config.collision_epsilon;
        let same_direction = self.config.require_same_direction;

        self.boundaries.nearest_hit(&ray, |hit| {
            hit.distance <= reach
                && (!same_direction || (hit.point - ray.origin).dot(&ds) > 0.0)
        })
    }

    /// Attempts to move by `ds`, committing to both position and camera only
    /// if the boundary allows it.
    pub fn try_move(&mut self, ds: Vector3<f32>) -> Step {
        let Some(hit) = self.blocking_hit(ds) else {
            self.commit(ds);
            return Step::Moved(ds);
        };

        match self.config.response {
            CollisionResponse::Block => {
                tracing::trace!(
                    "Movement vetoed by triangle {} at distance {}",
                    hit.triangle,
                    hit.distance
                );
                Step::Blocked
            }
            CollisionResponse::Slide => self.slide(ds, hit),
        }
    }

    fn slide(&mut self, ds: Vector3<f32>, mut hit: Hit) -> Step {
        let mut remaining = ds;

        for _ in 0..self.config.max_slide_iterations {
            let Some(normal) = self
                .boundaries
                .get(hit.triangle)
                .and_then(Triangle::unit_normal)
            else {
                break;
            };

            remaining -= normal * remaining.dot(&normal);
            if remaining.norm_squared() <= f32::EPSILON {
                break;
            }

            match self.blocking_hit(remaining) {
                None => {
                    tracing::trace!("Sliding along triangle {}", hit.triangle);
                    self.commit(remaining);
                    return Step::Slid(remaining);
                }
                Some(next) => hit = next,
            }
        }

        tracing::trace!("Slide exhausted against triangle {}", hit.triangle);
        Step::Blocked
    }

    fn commit(&mut self, ds: Vector3<f32>) {
        self.position += ds;
        self.camera.translate(ds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    /// Two triangles covering `corner + s·u + t·v` for `s, t` in `[0, 1]`.
    fn quad(corner: Point3<f32>, u: Vector3<f32>, v: Vector3<f32>) -> [Triangle; 2] {
        [
            Triangle::new(corner, corner + u, corner + u + v),
            Triangle::new(corner, corner + u + v, corner + v),
        ]
    }

    fn wall_at_x(x: f32) -> [Triangle; 2] {
        quad(
            Point3::new(x, -5.0, -5.0),
            Vector3::new(0.0, 10.0, 0.0),
            Vector3::new(0.0, 0.0, 10.0),
        )
    }

    fn wall_at_z(z: f32) -> [Triangle; 2] {
        quad(
            Point3::new(-5.0, -5.0, z),
            Vector3::new(10.0, 0.0, 0.0),
            Vector3::new(0.0, 10.0, 0.0),
        )
    }

    fn player(walls: impl IntoIterator<Item = Triangle>, config: PlayerConfig) -> Player {
        Player::new(FirstPerson::default(), walls.into_iter().collect(), config)
    }

    #[test]
    fn empty_boundary_commits_full_displacement() {
        let mut player = player(Vec::<Triangle>::new(), PlayerConfig::default());
        player.teleport(Point3::new(1.0, 0.5, -2.0));
        let before = player.position();
        let ds = Vector3::new(0.25, 0.0, -0.75);

        assert_eq!(player.try_move(ds), Step::Moved(ds));
        assert_eq!(player.position(), before + ds);
        assert_eq!(player.camera().position(), player.position());
    }

    #[test]
    fn forward_follows_view_direction_on_the_ground() {
        let mut player = player(Vec::<Triangle>::new(), PlayerConfig::default());
        let step = player.forward(0.5);
        assert_abs_diff_eq!(step.displacement(), Vector3::new(0.0, 0.0, -1.5), epsilon = 1e-6);

        player.move_head(Vector3::new(0.6, 0.0, 0.0));
        let step = player.forward(0.5);
        assert_eq!(step.displacement().y, 0.0);
        assert!(step.displacement().z < 0.0);
        assert_eq!(player.camera().position(), player.position());
    }

    #[test]
    fn strafing_is_perpendicular_to_heading() {
        let mut player = player(Vec::<Triangle>::new(), PlayerConfig::default());
        player.move_head(Vector3::new(0.0, 0.8, 0.0));

        let right = player.right(1.0).displacement();
        let left = player.left(1.0).displacement();
        let forward = player.forward(1.0).displacement();
        let backward = player.backward(1.0).displacement();

        assert_abs_diff_eq!(right.dot(&forward), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(left, -right, epsilon = 1e-6);
        assert_abs_diff_eq!(backward, -forward, epsilon = 1e-6);
        // Facing -z with no yaw, right is +x.
        player.move_head(Vector3::new(0.0, -0.8, 0.0));
        assert!(player.right(1.0).displacement().x > 0.0);
    }

    #[test]
    fn wall_just_ahead_vetoes_the_whole_step() {
        let mut player = player(wall_at_z(-1.05), PlayerConfig::default());
        let before = player.position();

        assert_eq!(player.forward(1.0 / 3.0), Step::Blocked);
        assert_eq!(player.position(), before);
        assert_eq!(player.camera().position(), before);
    }

    #[test]
    fn wall_beyond_reach_does_not_block() {
        let mut player = player(wall_at_z(-1.2), PlayerConfig::default());
        assert!(!player.forward(1.0 / 3.0).is_blocked());
        assert_relative_eq!(player.position().z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn wall_behind_only_blocks_without_direction_check() {
        let mut lenient = player(wall_at_z(0.5), PlayerConfig::default());
        assert!(!lenient.forward(1.0 / 3.0).is_blocked());

        let config = PlayerConfig {
            require_same_direction: false,
            ..PlayerConfig::default()
        };
        let mut strict = player(wall_at_z(0.5), config);
        assert!(strict.forward(1.0 / 3.0).is_blocked());
        assert_eq!(strict.position(), Point3::origin());
    }

    #[test]
    fn backing_away_from_a_wall_is_allowed() {
        let mut player = player(wall_at_z(-0.05), PlayerConfig::default());
        assert!(player.forward(0.1).is_blocked());
        assert!(!player.backward(0.1).is_blocked());
    }

    #[test]
    fn turning_is_never_blocked() {
        let mut player = player(wall_at_z(-0.01), PlayerConfig::default());
        player.move_head(Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(player.camera().yaw(), 1.0);
    }

    #[test]
    fn sliding_keeps_the_tangential_part() {
        let config = PlayerConfig {
            response: CollisionResponse::Slide,
            ..PlayerConfig::default()
        };
        let mut player = player(wall_at_x(1.0), config);
        player.teleport(Point3::new(0.5, 0.0, 0.0));

        let step = player.try_move(Vector3::new(0.6, 0.0, 0.6));
        assert_eq!(step, Step::Slid(Vector3::new(0.0, 0.0, 0.6)));
        assert_relative_eq!(player.position(), Point3::new(0.5, 0.0, 0.6));
        assert_eq!(player.camera().position(), player.position());
    }

    #[test]
    fn blocking_response_ignores_the_tangential_part() {
        let mut player = player(wall_at_x(1.0), PlayerConfig::default());
        player.teleport(Point3::new(0.5, 0.0, 0.0));

        assert_eq!(player.try_move(Vector3::new(0.6, 0.0, 0.6)), Step::Blocked);
        assert_eq!(player.position(), Point3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn sliding_into_a_corner_stays_put() {
        let config = PlayerConfig {
            response: CollisionResponse::Slide,
            ..PlayerConfig::default()
        };
        let mut player = player(wall_at_x(1.0).into_iter().chain(wall_at_z(1.0)), config);
        player.teleport(Point3::new(0.5, 0.0, 0.35));

        assert_eq!(player.try_move(Vector3::new(0.6, 0.0, 0.6)), Step::Blocked);
        assert_eq!(player.position(), Point3::new(0.5, 0.0, 0.35));
    }

    #[test]
    fn config_reads_partial_toml() {
        let config: PlayerConfig = toml::from_str(
            r#"
            movement_speed = 5.0
            response = "slide"
            "#,
        )
        .unwrap();
        assert_relative_eq!(config.movement_speed, 5.0);
        assert_eq!(config.response, CollisionResponse::Slide);
        assert_relative_eq!(config.collision_epsilon, 0.1);
        assert!(config.require_same_direction);
    }

    #[test]
    fn negative_or_nan_tunables_are_rejected() {
        assert!(PlayerConfig::default().validate().is_ok());

        let backwards = PlayerConfig {
            collision_epsilon: -0.1,
            ..PlayerConfig::default()
        };
        assert!(matches!(
            backwards.validate(),
            Err(LoadError::InvalidPlayer { reason }) if reason.contains("collision_epsilon")
        ));

        let nan_speed = PlayerConfig {
            movement_speed: f32::NAN,
            ..PlayerConfig::default()
        };
        assert!(matches!(
            nan_speed.validate(),
            Err(LoadError::InvalidPlayer { reason }) if reason.contains("movement_speed")
        ));
    }
}
