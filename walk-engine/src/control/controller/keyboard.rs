use winit::event::{ElementState, VirtualKeyCode};

use super::super::Input;

#[derive(Copy, Clone, Debug, Default)]
/// Represents the state of a keyboard.
///
/// WASD walks, the arrow keys turn the head and `E` inspects.
pub struct Keyboard {
    held: u8,
    interact: bool,
}

impl Keyboard {
    const FORWARD: u8 = 1 << 0;
    const LEFT: u8 = 1 << 1;
    const RIGHT: u8 = 1 << 2;
    const BACKWARD: u8 = 1 << 3;
    const TURN_LEFT: u8 = 1 << 4;
    const TURN_RIGHT: u8 = 1 << 5;
    const LOOK_UP: u8 = 1 << 6;
    const LOOK_DOWN: u8 = 1 << 7;

    /// Updates the held state for one key transition.
    pub fn handle_key(&mut self, key: VirtualKeyCode, state: ElementState) {
        // TODO: Personalize key bindings.
        let mask = match key {
            VirtualKeyCode::W => Self::FORWARD,
            VirtualKeyCode::A => Self::LEFT,
            VirtualKeyCode::S => Self::BACKWARD,
            VirtualKeyCode::D => Self::RIGHT,
            VirtualKeyCode::Left => Self::TURN_LEFT,
            VirtualKeyCode::Right => Self::TURN_RIGHT,
            VirtualKeyCode::Up => Self::LOOK_UP,
            VirtualKeyCode::Down => Self::LOOK_DOWN,
            VirtualKeyCode::E => {
                self.interact |= state == ElementState::Pressed;
                return;
            }
            _ => return,
        };

        match state {
            ElementState::Pressed => self.held |= mask,
            ElementState::Released => self.held &= !mask,
        }
    }

    #[must_use]
    const fn pressed(&self, mask: u8) -> bool {
        self.held & mask == mask
    }

    fn axis(&self, positive: u8, negative: u8) -> f32 {
        f32::from(u8::from(self.pressed(positive))) - f32::from(u8::from(self.pressed(negative)))
    }
}

impl super::Controller for Keyboard {
    fn handle_event(&mut self, event: &winit::event::Event<()>) {
        if let winit::event::Event::WindowEvent {
            event:
                winit::event::WindowEvent::KeyboardInput {
                    input:
                        winit::event::KeyboardInput {
                            state,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                },
            ..
        } = event
        {
            self.handle_key(*key, *state);
        }
    }

    fn fetch_input(&mut self) -> Vec<Input> {
        let mut inputs = Vec::new();

        for (mask, input) in [
            (Self::FORWARD, Input::Forward),
            (Self::BACKWARD, Input::Backward),
            (Self::LEFT, Input::Left),
            (Self::RIGHT, Input::Right),
        ] {
            if self.pressed(mask) {
                inputs.push(input);
            }
        }

        let yaw = self.axis(Self::TURN_LEFT, Self::TURN_RIGHT);
        let pitch = self.axis(Self::LOOK_UP, Self::LOOK_DOWN);
        if yaw != 0.0 || pitch != 0.0 {
            inputs.push(Input::Turn(yaw, pitch));
        }

        if core::mem::take(&mut self.interact) {
            inputs.push(Input::Interact);
        }

        inputs
    }
}
