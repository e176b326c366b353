//! Headless frontend replaying a fixed key script
//!
//! Each step holds a set of keys for a number of ticks. Once the script runs
//! out the frontend holds Quit, so a run always terminates.

use serde::{Deserialize, Serialize};

use super::{Frontend, InputSource, KeyState};
use crate::renderer::Frame;
use crate::sim::Key;

/// Keys held for `ticks` consecutive ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub keys: Vec<Key>,
    pub ticks: u32,
}

impl ScriptStep {
    pub fn new(keys: &[Key], ticks: u32) -> Self {
        Self {
            keys: keys.to_vec(),
            ticks,
        }
    }

    /// Nothing held
    pub fn idle(ticks: u32) -> Self {
        Self::new(&[], ticks)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedFrontend {
    keys: KeyState,
    script: Vec<ScriptStep>,
    step: usize,
    tick_in_step: u32,
    frames_drawn: u64,
    presented: u64,
}

impl ScriptedFrontend {
    pub fn new(script: Vec<ScriptStep>) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    /// Parse a script from a JSON array of steps
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Direct access to the held keys, outside the script
    pub fn keys_mut(&mut self) -> &mut KeyState {
        &mut self.keys
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.script.len()
    }

    /// Keys for the next tick, moving the cursor past it
    fn next_keys(&mut self) -> Option<Vec<Key>> {
        while let Some(step) = self.script.get(self.step) {
            if self.tick_in_step < step.ticks {
                self.tick_in_step += 1;
                return Some(step.keys.clone());
            }
            self.step += 1;
            self.tick_in_step = 0;
        }
        None
    }
}

impl InputSource for ScriptedFrontend {
    fn key_down(&self, key: Key) -> bool {
        self.keys.key_down(key)
    }

    fn key_freshly_down(&mut self, key: Key) -> bool {
        self.keys.key_freshly_down(key)
    }
}

impl Frontend for ScriptedFrontend {
    fn draw_frame(&mut self, frame: &Frame<'_>) {
        log::trace!(
            "Frame {}: camera {:?}, {} actors",
            self.frames_drawn,
            frame.camera,
            frame.actors.len()
        );
        self.frames_drawn += 1;
    }

    fn present(&mut self) {
        self.presented += 1;
    }

    /// Applies one scripted tick; returns the first key newly pressed by it
    fn wait_or_poll(&mut self, _timeout_ms: u32) -> Option<Key> {
        let before = self.keys;
        let held = self.next_keys().unwrap_or_else(|| vec![Key::Quit]);
        self.keys.set_held(&held);
        held.into_iter().find(|&key| !before.key_down(key))
    }
}
