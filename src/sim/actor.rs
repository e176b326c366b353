//! One simulated player, live or replaying a recording

use glam::IVec2;

use super::SimError;
use super::grid::{Cell, Grid};
use super::keys::Key;
use super::physics::{self, Body};
use super::recording::{ActorSnapshot, Recording, TickStatus};
use crate::consts::{JUMP_VELOCITY, PLAYER_SIZE, WALK_SPEED};
use crate::platform::InputSource;

/// What happened to an actor during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// Touched spikes
    Dead,
    /// Replayed its last recorded tick
    PlaybackFinished,
    /// Live actor asked to go back in time
    TimeTravelRequested,
    /// Live actor asked to finish the level while standing on the goal
    FinishRequested,
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub body: Body,
    /// Still being simulated this run
    pub extant: bool,
    recording: Recording,
}

impl Actor {
    /// A new live actor starting from `start`
    pub fn spawn(start: ActorSnapshot) -> Self {
        Self::from_recording(Recording::live(start))
    }

    /// An actor positioned at the start of an existing recording
    pub fn from_recording(recording: Recording) -> Self {
        let start = recording.start();
        Self {
            body: Body {
                pos: start.pos,
                vel: start.vel,
                size: PLAYER_SIZE,
                on_ground: false,
            },
            extant: true,
            recording,
        }
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    pub fn is_live(&self) -> bool {
        self.recording.is_live()
    }

    pub fn pos(&self) -> IVec2 {
        self.body.pos
    }

    pub fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            pos: self.body.pos,
            vel: self.body.vel,
        }
    }

    /// Stop recording; the actor replays from now on
    pub fn seal(&mut self) {
        self.recording.seal();
    }

    /// Back to the recorded start, ready for another run
    pub fn reset(&mut self) {
        let start = self.recording.start();
        self.body.pos = start.pos;
        self.body.vel = start.vel;
        self.body.on_ground = false;
        self.extant = true;
        self.recording.rewind();
    }

    /// Advance one tick: input, levers, physics, then close the recorded tick
    pub fn advance<I: InputSource + ?Sized>(
        &mut self,
        grid: &mut Grid,
        input: &mut I,
    ) -> Result<TickOutcome, SimError> {
        self.body.vel.x = 0;
        let here = grid.index_at(self.body.pos);
        if grid.cell_at(here) == Cell::Spike {
            return Ok(TickOutcome::Dead);
        }
        if self.recording.is_exhausted() {
            return Ok(TickOutcome::PlaybackFinished);
        }

        let rec = &mut self.recording;
        if rec.is_down(Key::Right, input)? {
            self.body.vel.x += WALK_SPEED;
        }
        if rec.is_down(Key::Left, input)? {
            self.body.vel.x -= WALK_SPEED;
        }
        if rec.is_down(Key::Jump, input)? && self.body.on_ground {
            self.body.vel.y = JUMP_VELOCITY;
        }
        if rec.is_down_debounce(Key::Interact, input)? {
            grid.activate_lever_at(here);
        }

        physics::step(&mut self.body);
        self.body.on_ground = false;
        physics::resolve(&mut self.body, grid);

        let live = rec.is_live();
        let outcome = match rec.end_of_tick() {
            TickStatus::PlaybackExhausted => TickOutcome::PlaybackFinished,
            TickStatus::Continue if live && input.key_freshly_down(Key::TimeTravel) => {
                TickOutcome::TimeTravelRequested
            }
            TickStatus::Continue
                if live
                    && grid.cell_at(here) == Cell::Goal
                    && input.key_freshly_down(Key::FinishLevel) =>
            {
                TickOutcome::FinishRequested
            }
            TickStatus::Continue => TickOutcome::Continue,
        };
        Ok(outcome)
    }
}
