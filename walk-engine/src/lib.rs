#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};

pub mod boundary;
pub mod control;
pub mod error;
pub mod exhibit;
pub mod geometry;
pub mod player;
pub mod scene;
pub mod window;

pub use boundary::{BoundarySet, Hit};
pub use error::LoadError;
pub use exhibit::{Exhibit, Pick};
pub use geometry::{Ray, Triangle};
pub use player::{CollisionResponse, Player, PlayerConfig, Step};
pub use scene::{Museum, SceneDescriptor};
pub use window::WindowDescriptor;

/// Used when the window reports no area at startup.
const FALLBACK_ASPECT_RATIO: f32 = 16.0 / 9.0;

pub struct MuseumApp {
    museum: Museum,
    controllers: Vec<Box<dyn control::controller::Controller>>,
    window: winit::window::Window,
    event_loop: EventLoop<()>,
}

impl MuseumApp {
    pub fn new(config: MuseumAppConfig) -> Result<Self, LoadError> {
        let MuseumAppConfig {
            window: window_descriptor,
            scene,
            controllers,
        } = config;

        let event_loop = EventLoop::new();
        let window = window::create(&event_loop, &window_descriptor)?;

        tracing::debug!("Window created");

        let aspect_ratio =
            window::aspect_ratio(window.inner_size()).unwrap_or(FALLBACK_ASPECT_RATIO);
        let museum = Museum::load(&scene, aspect_ratio)?;

        tracing::debug!("Successfully initialized");

        Ok(Self {
            museum,
            controllers,
            window,
            event_loop,
        })
    }

    #[must_use]
    pub const fn museum(&self) -> &Museum {
        &self.museum
    }

    /// Runs the walkthrough until the window is closed.
    pub fn run(self) -> ! {
        self.run_with(|_| {})
    }

    /// Runs the walkthrough, handing the updated museum to `on_frame` once per
    /// frame so a renderer can read the camera and the visible descriptions.
    pub fn run_with<F>(self, mut on_frame: F) -> !
    where
        F: FnMut(&Museum) + 'static,
    {
        let Self {
            mut museum,
            mut controllers,
            window,
            event_loop,
        } = self;

        let mut start = std::time::Instant::now();

        event_loop.run(move |event, _, control_flow| {
            for controller in &mut controllers {
                controller.handle_event(&event);
            }
            match event {
                Event::WindowEvent { window_id, event } if window_id == window.id() => {
                    match event {
                        WindowEvent::CloseRequested
                        | WindowEvent::KeyboardInput {
                            input:
                                KeyboardInput {
                                    virtual_keycode: Some(VirtualKeyCode::Escape),
                                    state: ElementState::Pressed,
                                    ..
                                },
                            ..
                        } => {
                            tracing::info!("Leaving the museum");
                            *control_flow = ControlFlow::Exit;
                        }
                        WindowEvent::Resized(size) => {
                            if let Some(aspect_ratio) = window::aspect_ratio(size) {
                                museum.set_aspect_ratio(aspect_ratio);
                            }
                        }
                        _ => {}
                    }
                }
                Event::MainEventsCleared => {
                    let elapsed = start.elapsed().as_secs_f32();
                    start = std::time::Instant::now();

                    let inputs = controllers
                        .iter_mut()
                        .flat_map(|controller| controller.fetch_input())
                        .collect::<Vec<_>>();
                    museum.process_inputs(&inputs, elapsed);

                    on_frame(&museum);
                }
                _ => {}
            }
        })
    }
}

pub struct MuseumAppConfig {
    pub window: WindowDescriptor,
    pub scene: SceneDescriptor,
    pub controllers: Vec<Box<dyn control::controller::Controller>>,
}
