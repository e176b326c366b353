//! Per-actor input recording and playback
//!
//! A recording is a run-length encoded log of the keys an actor saw as held,
//! one keyframe per run of identical ticks. While live, queries go to the
//! input source and every key found down is added to the current tick's set;
//! `end_of_tick` folds that set into the log. Once sealed, the same queries
//! are answered from the log, so an actor cannot tell live input from replay.

use glam::IVec2;

use super::RecordingError;
use super::keys::{Key, KeySet};
use crate::platform::InputSource;

/// Position and velocity, the state compared across the time-travel seam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActorSnapshot {
    pub pos: IVec2,
    pub vel: IVec2,
}

impl ActorSnapshot {
    pub fn at(pos: IVec2) -> Self {
        Self {
            pos,
            vel: IVec2::ZERO,
        }
    }
}

/// A run of ticks with the same held keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyframe {
    pub held: KeySet,
    pub frames: u32,
}

impl Keyframe {
    pub fn new(held: KeySet, frames: u32) -> Self {
        Self { held, frames }
    }
}

/// Where a recording takes its answers from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    /// Reading the input source; `pending` collects this tick's held keys
    Live { pending: KeySet },
    /// Replaying `keyframes[keyframe]`, `frame` ticks into it
    Playback { keyframe: usize, frame: u32 },
}

/// Result of closing a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    Continue,
    /// The last recorded tick has been replayed
    PlaybackExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    start: ActorSnapshot,
    keyframes: Vec<Keyframe>,
    source: Source,
}

impl Recording {
    /// An empty recording that reads live input
    pub fn live(start: ActorSnapshot) -> Self {
        Self {
            start,
            keyframes: Vec::new(),
            source: Source::Live {
                pending: KeySet::new(),
            },
        }
    }

    /// A sealed recording built from existing keyframes
    pub fn from_keyframes(start: ActorSnapshot, keyframes: Vec<Keyframe>) -> Self {
        Self {
            start,
            keyframes,
            source: Source::Playback {
                keyframe: 0,
                frame: 0,
            },
        }
    }

    /// State the actor had when this recording began
    pub fn start(&self) -> ActorSnapshot {
        self.start
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn is_live(&self) -> bool {
        matches!(self.source, Source::Live { .. })
    }

    /// Total ticks covered by the log
    pub fn ticks(&self) -> u64 {
        self.keyframes.iter().map(|k| u64::from(k.frames)).sum()
    }

    /// Playback has run past the last keyframe
    pub fn is_exhausted(&self) -> bool {
        match self.source {
            Source::Live { .. } => false,
            Source::Playback { keyframe, .. } => keyframe >= self.keyframes.len(),
        }
    }

    /// Stop recording and switch to playback from the first tick
    pub fn seal(&mut self) {
        self.source = Source::Playback {
            keyframe: 0,
            frame: 0,
        };
    }

    /// Rewind playback to the first tick (live recordings are untouched)
    pub fn rewind(&mut self) {
        if let Source::Playback { .. } = self.source {
            self.seal();
        }
    }

    /// Is `key` held this tick?
    pub fn is_down<I: InputSource + ?Sized>(
        &mut self,
        key: Key,
        input: &mut I,
    ) -> Result<bool, RecordingError> {
        match &mut self.source {
            Source::Live { pending } => Ok(input.key_down(key) && pending.insert(key)),
            Source::Playback { keyframe, .. } => {
                let keyframe = *keyframe;
                self.replayed(keyframe, key)
            }
        }
    }

    /// Like `is_down`, but only on the first tick of a press
    pub fn is_down_debounce<I: InputSource + ?Sized>(
        &mut self,
        key: Key,
        input: &mut I,
    ) -> Result<bool, RecordingError> {
        match &mut self.source {
            Source::Live { pending } => Ok(input.key_freshly_down(key) && pending.insert(key)),
            // Only the debounced edge was recorded
            Source::Playback { keyframe, .. } => {
                let keyframe = *keyframe;
                self.replayed(keyframe, key)
            }
        }
    }

    fn replayed(&self, keyframe: usize, key: Key) -> Result<bool, RecordingError> {
        self.keyframes
            .get(keyframe)
            .map(|k| k.held.contains(key))
            .ok_or(RecordingError::Exhausted { keyframe })
    }

    /// Close the current tick: append to the log or advance the cursor
    pub fn end_of_tick(&mut self) -> TickStatus {
        match &mut self.source {
            Source::Live { pending } => {
                let held = std::mem::take(pending);
                match self.keyframes.last_mut() {
                    Some(last) if last.held == held => last.frames += 1,
                    _ => self.keyframes.push(Keyframe::new(held, 1)),
                }
                TickStatus::Continue
            }
            Source::Playback { keyframe, frame } => {
                let Some(current) = self.keyframes.get(*keyframe) else {
                    return TickStatus::PlaybackExhausted;
                };
                *frame += 1;
                if *frame >= current.frames {
                    *frame = 0;
                    *keyframe += 1;
                    if *keyframe >= self.keyframes.len() {
                        return TickStatus::PlaybackExhausted;
                    }
                }
                TickStatus::Continue
            }
        }
    }
}
