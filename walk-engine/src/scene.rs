//! The museum as a whole: where the walls are, which exhibits hang where,
//! and how a frame of inputs turns into movement and inspection.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use nalgebra::{Matrix4, Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::boundary::BoundarySet;
use crate::control::camera::{first_person::FirstPerson, Camera};
use crate::control::Input;
use crate::error::LoadError;
use crate::exhibit::{pick_nearest, Exhibit, Pick};
use crate::player::{Player, PlayerConfig};

/// Placement of a model in the world, applied as `T · Ry · Rx · Rz · S`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translation: [f32; 3],
    pub rotation_degrees: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation_degrees: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl Transform {
    #[must_use]
    pub fn matrix(&self) -> Matrix4<f32> {
        let [x, y, z] = self.rotation_degrees.map(f32::to_radians);
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), y)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), x)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), z);

        Matrix4::new_translation(&Vector3::from(self.translation))
            * rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&Vector3::from(self.scale))
    }
}

/// A piece of the building the player collides with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub model: PathBuf,
    #[serde(default)]
    pub transform: Transform,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExhibitDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub model: PathBuf,
    #[serde(default)]
    pub transform: Transform,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnDescriptor {
    pub position: [f32; 3],
    /// Pitch, yaw and roll in degrees.
    pub angles_degrees: [f32; 3],
}

impl Default for SpawnDescriptor {
    fn default() -> Self {
        Self {
            position: [-0.2, 0.95, 14.94],
            angles_degrees: [0.0; 3],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescriptor {
    pub near: f32,
    pub far: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl Default for CameraDescriptor {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 100.0,
            fov: 70.0,
        }
    }
}

impl CameraDescriptor {
    /// Checks the values the camera would otherwise refuse with a panic.
    pub fn validate(&self) -> Result<(), LoadError> {
        let reason = if !(self.near.is_finite() && self.near > 0.0) {
            "near must be a finite, positive distance"
        } else if !(self.far.is_finite() && self.far > self.near) {
            "far must be finite and greater than near"
        } else if !(self.fov > 0.0 && self.fov < 180.0) {
            "fov must be between 0 and 180 degrees"
        } else {
            return Ok(());
        };
        Err(LoadError::InvalidCamera { reason })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Radians of head rotation per pixel of pointer motion.
    pub look_sensitivity: f32,
    /// Radians per second while a turn key is held.
    pub turn_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            look_sensitivity: 60.0_f32.to_radians() / 500.0,
            turn_speed: 60.0_f32.to_radians(),
        }
    }
}

/// Everything needed to build a [`Museum`], usually read from a TOML file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescriptor {
    pub spawn: SpawnDescriptor,
    pub camera: CameraDescriptor,
    pub player: PlayerConfig,
    pub controls: ControlsConfig,
    /// Exhibits farther than this cannot be inspected.
    pub max_pick_distance: Option<f32>,
    pub environment: Vec<ModelDescriptor>,
    pub exhibits: Vec<ExhibitDescriptor>,
}

impl Default for SceneDescriptor {
    fn default() -> Self {
        Self {
            spawn: SpawnDescriptor::default(),
            camera: CameraDescriptor::default(),
            player: PlayerConfig::default(),
            controls: ControlsConfig::default(),
            max_pick_distance: Some(3.0),
            environment: Vec::new(),
            exhibits: Vec::new(),
        }
    }
}

impl FromStr for SceneDescriptor {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let descriptor: Self = toml::from_str(s)?;
        descriptor.validate()?;
        Ok(descriptor)
    }
}

impl SceneDescriptor {
    /// Reads a descriptor; relative model paths are taken from the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut descriptor: Self = contents.parse()?;
        if let Some(base) = path.parent() {
            descriptor.resolve_paths(base);
        }
        Ok(descriptor)
    }

    /// Rejects camera and player settings no museum can be built with.
    pub fn validate(&self) -> Result<(), LoadError> {
        self.camera.validate()?;
        self.player.validate()
    }

    /// Prefixes every relative model path with `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let models = self
            .environment
            .iter_mut()
            .map(|environment| &mut environment.model)
            .chain(self.exhibits.iter_mut().map(|exhibit| &mut exhibit.model));

        for model in models {
            if model.is_relative() {
                *model = base.join(&*model);
            }
        }
    }

    fn camera(&self, aspect_ratio: f32) -> FirstPerson {
        let [pitch, yaw, roll] = self.spawn.angles_degrees.map(f32::to_radians);
        FirstPerson::new(
            Vector3::new(pitch, yaw, roll),
            Point3::from(self.spawn.position),
            self.camera.near,
            self.camera.far,
            self.camera.fov,
            aspect_ratio,
        )
    }
}

/// The walkable museum: the player, the exhibits and the current selection.
#[derive(Clone, Debug)]
pub struct Museum {
    player: Player,
    exhibits: Vec<Exhibit>,
    controls: ControlsConfig,
    max_pick_distance: Option<f32>,
    selected: Option<usize>,
}

impl Museum {
    #[must_use]
    pub const fn new(
        player: Player,
        exhibits: Vec<Exhibit>,
        controls: ControlsConfig,
        max_pick_distance: Option<f32>,
    ) -> Self {
        Self {
            player,
            exhibits,
            controls,
            max_pick_distance,
            selected: None,
        }
    }

    /// Loads every model named by `descriptor` and places the player at the spawn point.
    pub fn load(descriptor: &SceneDescriptor, aspect_ratio: f32) -> Result<Self, LoadError> {
        descriptor.validate()?;
        let start = std::time::Instant::now();

        let mut boundaries = BoundarySet::new();
        for environment in &descriptor.environment {
            boundaries.extend(BoundarySet::load_obj(
                &environment.model,
                &environment.transform.matrix(),
            )?);
        }
        if boundaries.is_empty() {
            tracing::warn!("The museum has no walls, movement will never be blocked");
        }

        let exhibits = descriptor
            .exhibits
            .iter()
            .map(|exhibit| {
                let body = BoundarySet::load_obj(&exhibit.model, &exhibit.transform.matrix())?;
                Exhibit::new(exhibit.name.as_str(), exhibit.description.as_str(), body)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let player = Player::new(descriptor.camera(aspect_ratio), boundaries, descriptor.player);

        tracing::debug!(
            "Museum loaded in {:?} with {} boundary triangles and {} exhibits",
            start.elapsed(),
            player.boundaries().len(),
            exhibits.len()
        );

        Ok(Self::new(
            player,
            exhibits,
            descriptor.controls,
            descriptor.max_pick_distance,
        ))
    }

    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    #[must_use]
    pub const fn camera(&self) -> &FirstPerson {
        self.player.camera()
    }

    #[must_use]
    pub fn exhibits(&self) -> &[Exhibit] {
        &self.exhibits
    }

    /// The exhibit picked by the last successful interaction.
    #[must_use]
    pub fn selected(&self) -> Option<&Exhibit> {
        self.selected.and_then(|index| self.exhibits.get(index))
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.player.set_aspect_ratio(aspect_ratio);
    }

    /// Runs one frame: head rotation first, then each movement intent, then
    /// inspection. Returns the exhibit picked this frame, if any.
    pub fn process_inputs(&mut self, inputs: &[Input], delta_seconds: f32) -> Option<Pick> {
        let mut rotation = Vector3::zeros();
        for input in inputs {
            match *input {
                Input::Look(delta_x, delta_y) => {
                    rotation +=
                        Vector3::new(-delta_y, -delta_x, 0.0) * self.controls.look_sensitivity;
                }
                Input::Turn(yaw, pitch) => {
                    rotation += Vector3::new(pitch, yaw, 0.0)
                        * (self.controls.turn_speed * delta_seconds);
                }
                _ => {}
            }
        }
        if rotation != Vector3::zeros() {
            self.player.move_head(rotation);
        }

        let mut interact = false;
        for input in inputs {
            match input {
                Input::Forward => {
                    self.player.forward(delta_seconds);
                }
                Input::Backward => {
                    self.player.backward(delta_seconds);
                }
                Input::Left => {
                    self.player.left(delta_seconds);
                }
                Input::Right => {
                    self.player.right(delta_seconds);
                }
                Input::Interact => interact = true,
                Input::Look(..) | Input::Turn(..) => {}
            }
        }

        if interact {
            self.interact()
        } else {
            None
        }
    }

    /// Inspects the nearest exhibit along the camera ray.
    ///
    /// Picking an exhibit toggles its description and hides the description
    /// of a previously selected one.
    pub fn interact(&mut self) -> Option<Pick> {
        let ray = self.player.camera().ray();
        let Some(pick) = pick_nearest(&self.exhibits, &ray, self.max_pick_distance) else {
            tracing::trace!("Nothing to inspect under the crosshair");
            return None;
        };

        if let Some(previous) = self.selected.filter(|&previous| previous != pick.index) {
            let previous = &mut self.exhibits[previous];
            if previous.is_description_visible() {
                previous.toggle_description();
            }
        }

        let exhibit = &mut self.exhibits[pick.index];
        exhibit.toggle_description();
        tracing::info!(
            "Inspecting `{}` at {:.2} (description {})",
            exhibit.name(),
            pick.distance,
            if exhibit.is_description_visible() {
                "shown"
            } else {
                "hidden"
            }
        );

        self.selected = Some(pick.index);
        Some(pick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Triangle;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn frame_at(z: f32) -> BoundarySet {
        BoundarySet::from_triangles(vec![Triangle::new(
            Point3::new(-1.0, -1.0, z),
            Point3::new(1.0, -1.0, z),
            Point3::new(0.0, 1.0, z),
        )])
    }

    fn museum() -> Museum {
        let player = Player::new(
            FirstPerson::default(),
            BoundarySet::new(),
            PlayerConfig::default(),
        );
        let exhibits = vec![
            Exhibit::new("venus", "Venus de Milo", frame_at(-2.0)).unwrap(),
            Exhibit::new("david", "David", frame_at(-2.5)).unwrap(),
        ];
        Museum::new(player, exhibits, ControlsConfig::default(), Some(3.0))
    }

    #[test]
    fn transform_applies_scale_then_rotation_then_translation() {
        let transform = Transform {
            translation: [1.0, 2.0, 3.0],
            rotation_degrees: [0.0, 90.0, 0.0],
            scale: [2.0, 1.0, 1.0],
        };
        let moved = transform.matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(moved, Point3::new(1.0, 2.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn descriptor_fills_missing_fields_with_defaults() {
        let descriptor: SceneDescriptor = r#"
            max_pick_distance = 4.5

            [spawn]
            position = [1.0, 1.7, 2.0]

            [player]
            collision_epsilon = 0.5

            [[environment]]
            model = "models/museum.obj"

            [[exhibits]]
            name = "Guernica"
            model = "models/picture.obj"
            transform = { translation = [0.0, 2.0, -3.0], rotation_degrees = [0.0, 180.0, 0.0] }
        "#
        .parse()
        .unwrap();

        assert_eq!(descriptor.spawn.position, [1.0, 1.7, 2.0]);
        assert_eq!(descriptor.spawn.angles_degrees, [0.0; 3]);
        assert_relative_eq!(descriptor.player.collision_epsilon, 0.5);
        assert_relative_eq!(descriptor.player.movement_speed, 3.0);
        assert_eq!(descriptor.max_pick_distance, Some(4.5));
        assert_eq!(descriptor.camera, CameraDescriptor::default());
        assert_eq!(descriptor.environment[0].transform, Transform::default());
        assert_eq!(descriptor.exhibits[0].transform.scale, [1.0; 3]);
        assert!(descriptor.exhibits[0].description.is_empty());
    }

    #[test]
    fn malformed_descriptor_is_reported() {
        let result = "[spawn]\nposition = \"here\"".parse::<SceneDescriptor>();
        assert!(matches!(result, Err(LoadError::Descriptor(_))));
    }

    #[test]
    fn unusable_camera_is_reported_instead_of_panicking() {
        let result = "[camera]\nnear = 0.0\n".parse::<SceneDescriptor>();
        assert!(matches!(
            result,
            Err(LoadError::InvalidCamera { reason }) if reason.contains("near")
        ));

        let result = "[camera]\nnear = 5.0\nfar = 1.0\n".parse::<SceneDescriptor>();
        assert!(matches!(
            result,
            Err(LoadError::InvalidCamera { reason }) if reason.contains("far")
        ));

        let result = "[camera]\nfov = 180.0\n".parse::<SceneDescriptor>();
        assert!(matches!(
            result,
            Err(LoadError::InvalidCamera { reason }) if reason.contains("fov")
        ));
    }

    #[test]
    fn load_checks_descriptors_built_in_code() {
        let mut descriptor = SceneDescriptor::default();
        descriptor.camera.near = 0.0;
        assert!(matches!(
            Museum::load(&descriptor, 16.0 / 9.0),
            Err(LoadError::InvalidCamera { .. })
        ));

        let mut descriptor = SceneDescriptor::default();
        descriptor.player.collision_epsilon = -1.0;
        assert!(matches!(
            Museum::load(&descriptor, 16.0 / 9.0),
            Err(LoadError::InvalidPlayer { .. })
        ));
    }

    #[test]
    fn negative_player_tunables_are_reported() {
        let result = "[player]\nmovement_speed = -3.0\n".parse::<SceneDescriptor>();
        assert!(matches!(result, Err(LoadError::InvalidPlayer { .. })));
    }

    #[test]
    fn relative_model_paths_follow_the_descriptor() {
        let mut descriptor = SceneDescriptor {
            environment: vec![ModelDescriptor {
                model: PathBuf::from("museum.obj"),
                transform: Transform::default(),
            }],
            exhibits: vec![ExhibitDescriptor {
                name: "sign".to_string(),
                description: String::new(),
                model: PathBuf::from("/abs/sign.obj"),
                transform: Transform::default(),
            }],
            ..SceneDescriptor::default()
        };
        descriptor.resolve_paths(Path::new("assets"));

        assert_eq!(descriptor.environment[0].model, Path::new("assets/museum.obj"));
        assert_eq!(descriptor.exhibits[0].model, Path::new("/abs/sign.obj"));
    }

    #[test]
    fn missing_descriptor_file_is_an_io_error() {
        let result = SceneDescriptor::from_file(Path::new("no/such/museum.toml"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn interact_toggles_the_nearest_exhibit() {
        let mut museum = museum();

        let pick = museum.process_inputs(&[Input::Interact], 0.016).expect("venus is ahead");
        assert_eq!(museum.exhibits()[pick.index].name(), "venus");
        assert!(museum.selected().unwrap().is_description_visible());

        museum.process_inputs(&[Input::Interact], 0.016);
        assert!(!museum.exhibits()[0].is_description_visible());
    }

    #[test]
    fn interact_out_of_range_selects_nothing() {
        let mut museum = museum();
        museum.player_mut().teleport(Point3::new(0.0, 0.0, 2.0));
        assert_eq!(museum.process_inputs(&[Input::Interact], 0.016), None);
        assert!(museum.selected().is_none());
    }

    #[test]
    fn rotation_is_applied_before_movement() {
        let mut museum = museum();
        let yaw = std::f32::consts::FRAC_PI_2;
        let dt = yaw / museum.controls.turn_speed;

        museum.process_inputs(&[Input::Forward, Input::Turn(1.0, 0.0)], dt);

        // A quarter turn left from -z faces -x before the step is taken.
        let position = museum.player().position();
        assert!(position.x < 0.0);
        assert_abs_diff_eq!(position.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn pointer_motion_turns_the_head() {
        let mut museum = museum();
        museum.process_inputs(&[Input::Look(100.0, -50.0)], 0.016);

        let sensitivity = ControlsConfig::default().look_sensitivity;
        assert_relative_eq!(museum.camera().yaw(), -100.0 * sensitivity);
        assert_relative_eq!(museum.camera().pitch(), 50.0 * sensitivity);
    }
}
