//! The timeline: every actor of a level stepped together, tick by tick
//!
//! Actors are kept in recording order, oldest first, with the live actor (if
//! any) last. That order is part of the simulation: an earlier actor pulling
//! a lever changes the grid a later actor sees in the same tick.
//!
//! When a replayed actor runs out of recording, the state it ended in must be
//! exactly the state the next actor's recording started from. Anything else
//! means the past was changed: a paradox.

use glam::IVec2;

use super::SimError;
use super::actor::{Actor, TickOutcome};
use super::grid::{GroupId, Grid};
use super::keys::Key;
use super::recording::ActorSnapshot;
use crate::platform::Frontend;
use crate::renderer::{ActorSprite, Frame, Rect, colors};

/// How a run over the timeline ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// An actor touched spikes
    Died { actor: usize },
    /// A finished actor did not end where its successor began
    Paradox { actor: usize },
    /// Restart key pressed
    Restarted,
    /// Live actor went back in time
    TimeTravelled,
    /// Live actor finished the level on the goal
    LevelFinished,
    /// Every actor replayed to the end without contradiction
    Completed,
    Quit,
}

impl RunOutcome {
    /// Outcomes that throw the attempt away
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            RunOutcome::Died { .. } | RunOutcome::Paradox { .. } | RunOutcome::Restarted
        )
    }
}

#[derive(Debug, Clone)]
pub struct Timeline {
    grid: Grid,
    actors: Vec<Actor>,
    camera: IVec2,
    viewport: IVec2,
    frame_wait_ms: u32,
    ticks: u64,
}

impl Timeline {
    pub fn new(grid: Grid, viewport: IVec2, frame_wait_ms: u32) -> Self {
        Self {
            grid,
            actors: Vec::new(),
            camera: IVec2::ZERO,
            viewport,
            frame_wait_ms,
            ticks: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn camera(&self) -> IVec2 {
        self.camera
    }

    /// Ticks stepped in the current run
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn has_live_actor(&self) -> bool {
        self.actors.last().is_some_and(Actor::is_live)
    }

    /// Append an actor; it runs after every actor already present
    pub fn push_actor(&mut self, actor: Actor) {
        debug_assert!(!self.has_live_actor(), "only the last actor may be live");
        self.actors.push(actor);
    }

    /// Add a fresh live actor starting at `start`
    pub fn spawn_live(&mut self, start: ActorSnapshot) {
        self.push_actor(Actor::spawn(start));
    }

    /// Drop the live actor and its partial recording
    pub fn discard_live(&mut self) -> Option<Actor> {
        if self.has_live_actor() {
            self.actors.pop()
        } else {
            None
        }
    }

    /// Seal the live actor's recording; returns the state it ended in
    pub fn seal_live(&mut self) -> Option<ActorSnapshot> {
        let actor = self.actors.last_mut().filter(|a| a.is_live())?;
        actor.seal();
        Some(actor.snapshot())
    }

    /// Restore the grid and rewind every actor to its recorded start
    pub fn reset(&mut self) {
        self.grid.reset();
        for actor in &mut self.actors {
            actor.reset();
        }
        self.ticks = 0;
    }

    /// Center the camera on the newest actor, clamped to the level
    fn update_camera(&mut self) {
        let Some(actor) = self.actors.last() else {
            return;
        };
        let level = self.grid.pixel_size();
        let center = actor.body.pos + IVec2::splat(actor.body.size / 2) - self.viewport / 2;
        let max = level - self.viewport;
        // Levels smaller than the view pin to the far edge
        let clamp_axis = |v: i32, max: i32| {
            if v < 0 {
                0
            } else if v > max {
                max
            } else {
                v
            }
        };
        self.camera = IVec2::new(clamp_axis(center.x, max.x), clamp_axis(center.y, max.y));
    }

    /// Draw list for the current state
    pub fn frame(&self) -> Frame<'_> {
        let actors = self
            .actors
            .iter()
            .filter(|a| a.extant)
            .map(|a| ActorSprite {
                rect: Rect::square(a.body.pos, a.body.size),
                color: if a.is_live() {
                    colors::LIVE_ACTOR
                } else {
                    colors::PLAYBACK_ACTOR
                },
            })
            .collect();
        Frame {
            grid: &self.grid,
            camera: self.camera,
            viewport: self.viewport,
            actors,
        }
    }

    /// Run ticks until the timeline reaches a terminal outcome
    pub fn run<F: Frontend + ?Sized>(&mut self, frontend: &mut F) -> Result<RunOutcome, SimError> {
        loop {
            if let Some(outcome) = self.tick(frontend)? {
                log::debug!("Run ended after {} ticks: {:?}", self.ticks, outcome);
                return Ok(outcome);
            }
        }
    }

    /// Step every extant actor once. `Some` when the run is over.
    pub fn tick<F: Frontend + ?Sized>(
        &mut self,
        frontend: &mut F,
    ) -> Result<Option<RunOutcome>, SimError> {
        if self.has_live_actor() {
            if frontend.key_freshly_down(Key::ToggleGroup1) {
                self.grid.toggle_group(GroupId('1'));
            }
            if frontend.key_freshly_down(Key::ToggleGroup2) {
                self.grid.toggle_group(GroupId('2'));
            }
        }
        if frontend.key_down(Key::Quit) {
            return Ok(Some(RunOutcome::Quit));
        }
        if frontend.key_freshly_down(Key::Restart) {
            return Ok(Some(RunOutcome::Restarted));
        }

        self.update_camera();
        frontend.draw_frame(&self.frame());
        frontend.present();
        frontend.wait_or_poll(self.frame_wait_ms);

        self.ticks += 1;
        let mut extant = 0;
        for i in 0..self.actors.len() {
            if !self.actors[i].extant {
                continue;
            }
            extant += 1;

            let next_start = self.actors.get(i + 1).map(|next| next.recording().start());
            let actor = &mut self.actors[i];
            let outcome = actor.advance(&mut self.grid, frontend)?;
            if outcome != TickOutcome::Continue {
                actor.extant = false;
            }

            match outcome {
                TickOutcome::Continue => {}
                TickOutcome::PlaybackFinished => {
                    if let Some(expected) = next_start {
                        let actual = actor.snapshot();
                        if actual != expected {
                            log::warn!(
                                "Paradox: actor {} ended at {:?} but actor {} began at {:?}",
                                i,
                                actual,
                                i + 1,
                                expected
                            );
                            return Ok(Some(RunOutcome::Paradox { actor: i }));
                        }
                    }
                }
                TickOutcome::Dead => return Ok(Some(RunOutcome::Died { actor: i })),
                TickOutcome::TimeTravelRequested => return Ok(Some(RunOutcome::TimeTravelled)),
                TickOutcome::FinishRequested => return Ok(Some(RunOutcome::LevelFinished)),
            }
        }

        if extant == 0 {
            return Ok(Some(RunOutcome::Completed));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelTemplate;
    use crate::platform::{KeyState, ScriptStep, ScriptedFrontend};
    use crate::sim::grid::Cell;
    use crate::sim::keys::KeySet;
    use crate::sim::recording::{Keyframe, Recording};
    use proptest::prelude::*;

    fn grid(terrain: &[&str], control: &[&str]) -> Grid {
        Grid::from_template(&LevelTemplate::from_rows("test", terrain, control, IVec2::ZERO))
            .unwrap()
    }

    fn timeline(terrain: &[&str], control: &[&str]) -> Timeline {
        Timeline::new(grid(terrain, control), IVec2::new(240, 120), 0)
    }

    fn idle(ticks: u32) -> ScriptedFrontend {
        ScriptedFrontend::new(vec![ScriptStep::idle(ticks)])
    }

    /// Live-record `ticks` idle ticks from `start`, returning the sealed actor
    fn recorded_idle(grid: &Grid, start: ActorSnapshot, ticks: usize) -> Actor {
        let mut grid = grid.clone();
        let mut keys = KeyState::new();
        let mut actor = Actor::spawn(start);
        for _ in 0..ticks {
            actor.advance(&mut grid, &mut keys).unwrap();
        }
        actor.seal();
        actor
    }

    #[test]
    fn test_quit_before_actors_move() {
        let mut tl = timeline(&["aaa", "ggg"], &["000", "000"]);
        tl.spawn_live(ActorSnapshot::at(IVec2::new(10, 10)));
        let mut frontend = ScriptedFrontend::new(Vec::new());
        frontend.keys_mut().press(Key::Quit);
        assert_eq!(tl.run(&mut frontend).unwrap(), RunOutcome::Quit);
        assert_eq!(tl.actors()[0].pos(), IVec2::new(10, 10));
        assert_eq!(frontend.frames_drawn(), 0);
    }

    #[test]
    fn test_matching_seam_completes() {
        let mut tl = timeline(&["aaa", "ggg"], &["000", "000"]);
        let first = recorded_idle(tl.grid(), ActorSnapshot::at(IVec2::new(10, 10)), 8);
        let seam = first.snapshot();
        tl.push_actor(first);
        tl.push_actor(Actor::from_recording(Recording::from_keyframes(
            seam,
            vec![Keyframe::new(KeySet::new(), 5)],
        )));
        tl.reset();

        assert_eq!(tl.run(&mut idle(100)).unwrap(), RunOutcome::Completed);
        assert!(tl.actors().iter().all(|a| !a.extant));
    }

    #[test]
    fn test_off_by_one_seam_is_paradox() {
        let base = timeline(&["aaa", "ggg"], &["000", "000"]);
        let first = recorded_idle(base.grid(), ActorSnapshot::at(IVec2::new(10, 10)), 8);
        let seam = first.snapshot();

        for nudge in [IVec2::new(1, 0), IVec2::new(0, -1)] {
            for nudge_velocity in [false, true] {
                let mut start = seam;
                if nudge_velocity {
                    start.vel += nudge;
                } else {
                    start.pos += nudge;
                }
                let mut tl = base.clone();
                tl.push_actor(first.clone());
                tl.push_actor(Actor::from_recording(Recording::from_keyframes(
                    start,
                    vec![Keyframe::new(KeySet::new(), 5)],
                )));
                tl.reset();
                assert_eq!(
                    tl.run(&mut idle(100)).unwrap(),
                    RunOutcome::Paradox { actor: 0 }
                );
            }
        }
    }

    #[test]
    fn test_spikes_end_run() {
        let mut tl = timeline(&["a", "s"], &["0", "0"]);
        tl.spawn_live(ActorSnapshot::at(IVec2::new(10, 10)));
        let outcome = tl.run(&mut idle(100)).unwrap();
        assert_eq!(outcome, RunOutcome::Died { actor: 0 });
        assert!(outcome.is_failure());
        assert!(!tl.actors()[0].extant);
    }

    #[test]
    fn test_earlier_actor_lever_affects_later_actor_same_tick() {
        // Actor 0 stands on a lever; pulling it removes the floor under actor 1
        let terrain = ["laa", "ggg", "aaa"];
        let control = ["100", "011", "000"];
        let mut tl = Timeline::new(grid(&terrain, &control), IVec2::new(360, 360), 0);

        let mut g = tl.grid().clone();
        let mut keys = KeyState::new();
        let mut puller = Actor::spawn(ActorSnapshot::at(IVec2::new(10, 70)));
        let script: [&[Key]; 4] = [&[], &[Key::Interact], &[], &[]];
        for held in script {
            keys.set_held(held);
            puller.advance(&mut g, &mut keys).unwrap();
        }
        puller.seal();
        tl.push_actor(puller);
        tl.spawn_live(ActorSnapshot::at(IVec2::new(250, 70)));
        tl.reset();

        let mut frontend = idle(10);
        assert_eq!(tl.tick(&mut frontend).unwrap(), None);
        assert_eq!(tl.actors()[1].pos().y, 70);
        assert_eq!(tl.tick(&mut frontend).unwrap(), None);
        assert_eq!(tl.grid().cell_at(5), Cell::Air);
        // The floor vanished before actor 1 moved this tick
        assert_eq!(tl.actors()[1].pos().y, 71);
    }

    #[test]
    fn test_lever_hotkeys_need_live_actor() {
        let mut tl = timeline(&["aa", "aa", "gg"], &["11", "00", "00"]);
        let start = ActorSnapshot::at(IVec2::new(10, 190));
        tl.push_actor(recorded_idle(tl.grid(), start, 5));
        tl.reset();
        let mut frontend = idle(10);
        frontend.keys_mut().press(Key::ToggleGroup1);
        tl.tick(&mut frontend).unwrap();
        assert_eq!(tl.grid().cell_at(0), Cell::Air);

        tl.spawn_live(start);
        frontend.keys_mut().press(Key::ToggleGroup1);
        tl.tick(&mut frontend).unwrap();
        assert_eq!(tl.grid().cell_at(0), Cell::Ground);
    }

    #[test]
    fn test_camera_clamps_to_level() {
        let mut tl = Timeline::new(
            grid(&["aaaaaaaaaa"; 4], &["0000000000"; 4]),
            IVec2::new(600, 240),
            0,
        );
        tl.spawn_live(ActorSnapshot::at(IVec2::new(10, 300)));
        tl.update_camera();
        assert_eq!(tl.camera(), IVec2::new(0, 205));

        tl.actors[0].body.pos = IVec2::new(700, 200);
        tl.update_camera();
        assert_eq!(tl.camera(), IVec2::new(425, 105));

        tl.actors[0].body.pos = IVec2::new(1150, 0);
        tl.update_camera();
        assert_eq!(tl.camera(), IVec2::new(600, 0));
    }

    #[test]
    fn test_frame_colors_live_and_playback() {
        let mut tl = timeline(&["aa"], &["00"]);
        tl.push_actor(recorded_idle(tl.grid(), ActorSnapshot::at(IVec2::ZERO), 2));
        tl.spawn_live(ActorSnapshot::at(IVec2::new(100, 0)));
        let frame = tl.frame();
        assert_eq!(frame.actors.len(), 2);
        assert_eq!(frame.actors[0].color, colors::PLAYBACK_ACTOR);
        assert_eq!(frame.actors[1].color, colors::LIVE_ACTOR);
        assert_eq!(frame.actors[1].rect, Rect::square(IVec2::new(100, 0), 50));
    }

    fn arb_script() -> impl Strategy<Value = Vec<ScriptStep>> {
        proptest::collection::vec(
            (
                proptest::sample::subsequence(Key::MOVEMENT.to_vec(), 0..=3),
                1u32..20,
            )
                .prop_map(|(keys, ticks)| ScriptStep { keys, ticks }),
            1..12,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn replay_matches_live_trajectory(script in arb_script()) {
            let levels = crate::levels::builtin();
            let level = &levels[0];
            let grid = Grid::from_template(level).unwrap();
            let mut tl = Timeline::new(grid, IVec2::new(1300, 720), 0);
            tl.spawn_live(ActorSnapshot::at(level.start));

            let mut live = Vec::new();
            let mut frontend = ScriptedFrontend::new(script);
            let live_outcome = loop {
                match tl.tick(&mut frontend).unwrap() {
                    Some(outcome) => break outcome,
                    None => live.push(tl.actors()[0].snapshot()),
                }
            };
            prop_assert!(
                live_outcome == RunOutcome::Quit || matches!(live_outcome, RunOutcome::Died { .. }),
                "unexpected live outcome {:?}",
                live_outcome
            );
            if live.is_empty() {
                return Ok(());
            }

            tl.seal_live();
            for _ in 0..2 {
                tl.reset();
                let mut replayed = Vec::new();
                let mut frontend = idle(10_000);
                let outcome = loop {
                    match tl.tick(&mut frontend).unwrap() {
                        Some(outcome) => break outcome,
                        None => replayed.push(tl.actors()[0].snapshot()),
                    }
                };
                prop_assert_eq!(outcome, RunOutcome::Completed);
                prop_assert_eq!(&replayed, &live);
            }
        }
    }
}
