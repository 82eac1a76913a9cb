use winit::event::{ElementState, VirtualKeyCode};

/// Key that closes the window.
pub const QUIT_KEY: VirtualKeyCode = VirtualKeyCode::Escape;

/// Keys currently held down, as reported by keyboard events.
#[derive(Debug, Default)]
pub struct KeyState {
    quit: bool,
}

impl KeyState {
    pub fn handle_key(&mut self, key: Option<VirtualKeyCode>, state: ElementState) {
        if key == Some(QUIT_KEY) {
            self.quit = state == ElementState::Pressed;
        }
    }

    pub fn quit_pressed(&self) -> bool {
        self.quit
    }
}

/// Set once, never cleared. The loop exits after the frame that observed it.
#[derive(Debug, Default)]
pub struct CloseFlag {
    set: bool,
}

impl CloseFlag {
    pub fn request_close(&mut self) {
        self.set = true;
    }

    /// Per-frame keyboard poll.
    pub fn process_input(&mut self, keys: &KeyState) {
        if keys.quit_pressed() {
            self.request_close();
        }
    }

    pub fn is_set(&self) -> bool {
        self.set
    }
}
