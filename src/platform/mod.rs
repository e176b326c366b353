//! Platform abstraction layer
//!
//! The simulation never touches a window or keyboard directly. It consumes:
//! - `InputSource`: per-tick key queries (held / freshly pressed)
//! - `Frontend`: drawing a frame, presenting it and waiting for the next tick
//!
//! `KeyState` is the small press/debounce value a frontend owns, and
//! `ScriptedFrontend` is a headless frontend driven by a key script.

pub mod scripted;

pub use scripted::{ScriptStep, ScriptedFrontend};

use crate::renderer::Frame;
use crate::sim::Key;

/// Key queries the simulation makes each tick
pub trait InputSource {
    /// Is the key held right now?
    fn key_down(&self, key: Key) -> bool;

    /// True once per contiguous press of the key
    fn key_freshly_down(&mut self, key: Key) -> bool;
}

/// Rendering and pacing collaborator
pub trait Frontend: InputSource {
    fn draw_frame(&mut self, frame: &Frame<'_>);

    fn present(&mut self);

    /// Block for at most `timeout_ms`, pumping input; returns a key pressed meanwhile
    fn wait_or_poll(&mut self, timeout_ms: u32) -> Option<Key>;
}

/// Held keys plus the "press already reported" bit per key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    down: u16,
    seen: u16,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn bit(key: Key) -> u16 {
        1 << key.index()
    }

    pub fn press(&mut self, key: Key) {
        self.down |= Self::bit(key);
    }

    /// Releasing re-arms the debounce for the next press
    pub fn release(&mut self, key: Key) {
        self.down &= !Self::bit(key);
        self.seen &= !Self::bit(key);
    }

    /// Make exactly `keys` held, releasing everything else
    pub fn set_held(&mut self, keys: &[Key]) {
        for key in Key::ALL {
            if keys.contains(&key) {
                self.press(key);
            } else {
                self.release(key);
            }
        }
    }
}

impl InputSource for KeyState {
    fn key_down(&self, key: Key) -> bool {
        self.down & Self::bit(key) != 0
    }

    fn key_freshly_down(&mut self, key: Key) -> bool {
        let bit = Self::bit(key);
        if self.down & bit != 0 && self.seen & bit == 0 {
            self.seen |= bit;
            return true;
        }
        false
    }
}
