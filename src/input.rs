use winit::keyboard::KeyCode;

/// Movement flags, one per key. Copied into each tick so the simulation
/// always sees a consistent snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputState {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key_press(&mut self, key: KeyCode) {
        self.set(key, true);
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        self.set(key, false);
    }

    fn set(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::KeyW => self.forward = pressed,
            KeyCode::KeyS => self.backward = pressed,
            KeyCode::KeyA => self.left = pressed,
            KeyCode::KeyD => self.right = pressed,
            KeyCode::Space => self.jump = pressed,
            _ => {}
        }
    }

    /// Releases every flag, used when the window loses focus.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_edges_toggle_flags() {
        let mut input = InputState::new();
        input.handle_key_press(KeyCode::KeyW);
        input.handle_key_press(KeyCode::Space);
        assert!(input.forward && input.jump);

        input.handle_key_release(KeyCode::KeyW);
        assert!(!input.forward);
        assert!(input.jump);
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let mut input = InputState::new();
        input.handle_key_press(KeyCode::KeyQ);
        assert_eq!(input, InputState::default());
    }
}
