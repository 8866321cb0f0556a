use super::super::Input;

#[derive(Copy, Clone, Debug, Default)]
/// Represents the state of a mouse.
///
/// Motion turns the head, a left click inspects.
pub struct Mouse {
    delta: (f32, f32),
    clicked: bool,
}

impl super::Controller for Mouse {
    fn handle_event(&mut self, event: &winit::event::Event<()>) {
        match event {
            winit::event::Event::DeviceEvent {
                event:
                    winit::event::DeviceEvent::MouseMotion {
                        delta: (delta_x, delta_y),
                    },
                ..
            } => {
                #[allow(clippy::cast_possible_truncation)]
                let delta = (*delta_x as f32, *delta_y as f32);
                self.delta.0 += delta.0;
                self.delta.1 += delta.1;
            }
            winit::event::Event::WindowEvent {
                event:
                    winit::event::WindowEvent::MouseInput {
                        state: winit::event::ElementState::Pressed,
                        button: winit::event::MouseButton::Left,
                        ..
                    },
                ..
            } => self.clicked = true,
            _ => {}
        }
    }

    fn fetch_input(&mut self) -> Vec<Input> {
        let (delta_x, delta_y) = core::mem::take(&mut self.delta);

        let mut inputs = Vec::with_capacity(2);
        if delta_x != 0.0 || delta_y != 0.0 {
            inputs.push(Input::Look(delta_x, delta_y));
        }
        if core::mem::take(&mut self.clicked) {
            inputs.push(Input::Interact);
        }

        inputs
    }
}
