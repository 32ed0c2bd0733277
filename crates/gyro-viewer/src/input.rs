//! Keyboard stand-in for a gyroscope.
//!
//! Holding a key produces a constant angular velocity on one axis; the
//! sensor thread samples it like it would a real device.

use glam::Vec3;
use parking_lot::Mutex;
use std::sync::Arc;
use tracer_core::{RotationRateSource, SharedCamera};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Angular velocity produced by a held key, in radians per second.
pub const KEY_RATE: f32 = 1.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct HeldKeys {
    roll_neg: bool,
    roll_pos: bool,
    pitch_neg: bool,
    pitch_pos: bool,
    yaw_neg: bool,
    yaw_pos: bool,
}

impl HeldKeys {
    fn axis(neg: bool, pos: bool) -> f32 {
        (pos as i8 - neg as i8) as f32
    }

    fn direction(&self) -> Vec3 {
        Vec3::new(
            Self::axis(self.roll_neg, self.roll_pos),
            Self::axis(self.pitch_neg, self.pitch_pos),
            Self::axis(self.yaw_neg, self.yaw_pos),
        )
    }
}

/// Translates window key events into held-axis state.
pub struct KeyboardController {
    held: Arc<Mutex<HeldKeys>>,
    camera: SharedCamera,
}

impl KeyboardController {
    pub fn new(camera: SharedCamera) -> Self {
        Self {
            held: Arc::new(Mutex::new(HeldKeys::default())),
            camera,
        }
    }

    /// The sampling side, to be handed to a `GyroBridge`.
    pub fn source(&self) -> KeyboardGyro {
        KeyboardGyro {
            held: self.held.clone(),
            rate: KEY_RATE,
        }
    }

    /// Returns `true` when the event was a key this controller owns.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return false;
                };
                self.handle_key(code, event.state == ElementState::Pressed)
            }
            // Keys released while unfocused never report a release.
            WindowEvent::Focused(false) => {
                *self.held.lock() = HeldKeys::default();
                false
            }
            _ => false,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, pressed: bool) -> bool {
        let mut held = self.held.lock();
        let slot = match code {
            KeyCode::KeyQ => &mut held.roll_neg,
            KeyCode::KeyE => &mut held.roll_pos,
            KeyCode::ArrowDown => &mut held.pitch_neg,
            KeyCode::ArrowUp => &mut held.pitch_pos,
            KeyCode::ArrowLeft => &mut held.yaw_neg,
            KeyCode::ArrowRight => &mut held.yaw_pos,
            KeyCode::KeyR => {
                if pressed {
                    self.camera.reset_rotation();
                    log::info!("camera rotation reset");
                }
                return true;
            }
            _ => return false,
        };
        *slot = pressed;
        true
    }
}

/// Samples the keys currently held.
pub struct KeyboardGyro {
    held: Arc<Mutex<HeldKeys>>,
    rate: f32,
}

impl RotationRateSource for KeyboardGyro {
    fn name(&self) -> &str {
        "keyboard"
    }

    fn sample(&mut self) -> Option<Vec3> {
        let direction = self.held.lock().direction();
        (direction != Vec3::ZERO).then(|| direction * self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_keyboard_reports_nothing() {
        let ctl = KeyboardController::new(SharedCamera::default());
        assert_eq!(ctl.source().sample(), None);
    }

    #[test]
    fn held_keys_map_to_axes() {
        let mut ctl = KeyboardController::new(SharedCamera::default());
        let mut gyro = ctl.source();

        assert!(ctl.handle_key(KeyCode::ArrowRight, true));
        assert!(ctl.handle_key(KeyCode::KeyQ, true));
        assert_eq!(gyro.sample(), Some(Vec3::new(-KEY_RATE, 0.0, KEY_RATE)));

        assert!(ctl.handle_key(KeyCode::ArrowUp, true));
        assert!(ctl.handle_key(KeyCode::ArrowRight, false));
        assert_eq!(gyro.sample(), Some(Vec3::new(-KEY_RATE, KEY_RATE, 0.0)));
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut ctl = KeyboardController::new(SharedCamera::default());
        ctl.handle_key(KeyCode::ArrowLeft, true);
        ctl.handle_key(KeyCode::ArrowRight, true);
        assert_eq!(ctl.source().sample(), None);
    }

    #[test]
    fn reset_key_levels_the_camera() {
        let camera = SharedCamera::default();
        camera.integrate(Vec3::new(1.0, 2.0, 3.0));
        let mut ctl = KeyboardController::new(camera.clone());

        assert!(ctl.handle_key(KeyCode::KeyR, true));
        assert_eq!(camera.rotation(), Vec3::ZERO);
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let mut ctl = KeyboardController::new(SharedCamera::default());
        assert!(!ctl.handle_key(KeyCode::KeyZ, true));
    }
}
