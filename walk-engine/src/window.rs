use winit::{dpi::LogicalSize, window::CursorGrabMode};

use crate::error::LoadError;

/// Creates the window the walkthrough runs in.
pub fn create(
    event_loop: &winit::event_loop::EventLoop<()>,
    window_descriptor: &WindowDescriptor,
) -> Result<winit::window::Window, LoadError> {
    let mut winit_window_builder: winit::window::WindowBuilder =
        winit::window::WindowBuilder::new().with_title(&window_descriptor.title);

    winit_window_builder = match window_descriptor.mode {
        Mode::BorderlessFullscreen => winit_window_builder.with_fullscreen(Some(
            winit::window::Fullscreen::Borderless(event_loop.primary_monitor()),
        )),
        Mode::Windowed => {
            let WindowDescriptor {
                width,
                height,
                position,
                ..
            } = window_descriptor;

            if let Some(position) = position {
                winit_window_builder =
                    winit_window_builder.with_position(winit::dpi::LogicalPosition::new(
                        f64::from(position[0]),
                        f64::from(position[1]),
                    ));
            }
            winit_window_builder.with_inner_size(LogicalSize::new(*width, *height))
        }
        .with_resizable(window_descriptor.resizable),
    };

    let winit_window = winit_window_builder.build(event_loop)?;

    if let Some(monitor) = winit_window.current_monitor() {
        if let Some(name) = monitor.name() {
            tracing::info!("Window created on monitor {}", name);
        }
    }

    if window_descriptor.cursor_locked {
        match winit_window.set_cursor_grab(if cfg!(target_os = "macos") {
            CursorGrabMode::Locked
        } else {
            CursorGrabMode::Confined
        }) {
            Ok(()) => (),
            Err(winit::error::ExternalError::NotSupported(_)) => {
                tracing::warn!("Cursor confinement is not supported on this platform");
            }
            Err(err) => tracing::error!("Error confining cursor: {err:?}"),
        }
    }

    winit_window.set_cursor_visible(window_descriptor.cursor_visible);

    Ok(winit_window)
}

/// Width over height, or `None` while the window has no area (minimized).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aspect_ratio(size: winit::dpi::PhysicalSize<u32>) -> Option<f32> {
    (size.width > 0 && size.height > 0).then(|| size.width as f32 / size.height as f32)
}

#[derive(Clone, Debug)]
/// Describes the window to open.
pub struct WindowDescriptor {
    pub width: u32,
    pub height: u32,
    pub position: Option<[f32; 2]>,
    pub title: String,
    pub resizable: bool,
    pub cursor_visible: bool,
    pub cursor_locked: bool,
    pub mode: Mode,
}

impl Default for WindowDescriptor {
    fn default() -> Self {
        Self {
            title: "Museum".to_string(),
            width: 1280,
            height: 720,
            position: None,
            resizable: true,
            cursor_locked: true,
            cursor_visible: false,
            mode: Mode::Windowed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Defines the way a window is displayed.
pub enum Mode {
    /// Creates a window that uses the given size.
    Windowed,
    /// Creates a borderless window that uses the full size of the screen.
    BorderlessFullscreen,
}
