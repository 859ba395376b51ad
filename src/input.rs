use std::collections::HashSet;

use glam::Vec2;
use winit::event::{DeviceEvent, ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::camera::CameraInput;

/// Accumulates keyboard and raw pointer state between frames.
///
/// Window events feed held/just-pressed key sets; raw device events feed the
/// pointer delta, so look-control keeps working while the cursor is locked
/// to the window. The camera polls the accumulated state once per frame via
/// [`Input::camera_input`], then the host calls [`Input::end_frame`] to
/// clear the per-frame fields.
pub struct Input {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    pointer_delta: Vec2,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_pressed: HashSet::new(),
            pointer_delta: Vec2::ZERO,
        }
    }
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears per-frame state (just-pressed keys, pointer delta). Held keys
    /// persist until their release event arrives.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.pointer_delta = Vec2::ZERO;
    }

    /// Folds a window event into the key state.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if let PhysicalKey::Code(key) = event.physical_key {
                match event.state {
                    ElementState::Pressed => {
                        if !self.keys_down.contains(&key) {
                            self.keys_pressed.insert(key);
                        }
                        self.keys_down.insert(key);
                    }
                    ElementState::Released => {
                        self.keys_down.remove(&key);
                    }
                }
            }
        }
    }

    /// Folds a device event into the pointer delta.
    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.pointer_delta += Vec2::new(delta.0 as f32, delta.1 as f32);
        }
    }

    /// True while the key is held down.
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// True if the key went down this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Accumulated pointer motion this frame.
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_delta
    }

    /// Snapshot of this frame's input for the camera. WASD and the arrow
    /// keys both drive movement; `look_active` is owned by the host's
    /// pointer-capture state, not read from here.
    pub fn camera_input(&self, look_active: bool) -> CameraInput {
        CameraInput {
            pointer_delta: self.pointer_delta,
            look_active,
            forward: self.key_down(KeyCode::KeyW) || self.key_down(KeyCode::ArrowUp),
            back: self.key_down(KeyCode::KeyS) || self.key_down(KeyCode::ArrowDown),
            left: self.key_down(KeyCode::KeyA) || self.key_down(KeyCode::ArrowLeft),
            right: self.key_down(KeyCode::KeyD) || self.key_down(KeyCode::ArrowRight),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_delta_accumulates_and_clears() {
        let mut input = Input::new();
        input.handle_device_event(&DeviceEvent::MouseMotion { delta: (3.0, -1.0) });
        input.handle_device_event(&DeviceEvent::MouseMotion { delta: (2.0, 4.0) });
        assert_eq!(input.pointer_delta(), Vec2::new(5.0, 3.0));

        input.end_frame();
        assert_eq!(input.pointer_delta(), Vec2::ZERO);
    }

    #[test]
    fn camera_input_snapshot_carries_capture_flag() {
        let input = Input::new();
        assert!(!input.camera_input(false).look_active);
        assert!(input.camera_input(true).look_active);
        assert!(!input.camera_input(true).forward);
    }
}
