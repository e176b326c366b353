//! Level sessions and the campaign
//!
//! A session owns one level's timeline. Every attempt adds a live actor on
//! top of the recorded ones; the actor count only grows when the player
//! travels back in time. Finishing the level triggers one last pass with no
//! live actor, which must replay cleanly for the level to count as solved.

use crate::levels::LevelTemplate;
use crate::platform::Frontend;
use crate::settings::Settings;
use crate::sim::{ActorSnapshot, Grid, LevelError, RunOutcome, SimError, Timeline};

/// How a level session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelResult {
    /// The final pass replayed every actor without contradiction
    Solved,
    /// The final pass hit a death or a paradox
    Failed(RunOutcome),
    Quit,
}

#[derive(Debug, Clone)]
pub struct LevelSession {
    template: LevelTemplate,
    timeline: Timeline,
    /// Where the next live actor starts
    carried: ActorSnapshot,
    attempts: u32,
}

impl LevelSession {
    pub fn new(template: LevelTemplate, settings: &Settings) -> Result<Self, LevelError> {
        let grid = Grid::from_template(&template)?;
        let timeline = Timeline::new(grid, settings.viewport(), settings.frame_wait_ms);
        Ok(Self {
            carried: ActorSnapshot::at(template.start),
            template,
            timeline,
            attempts: 0,
        })
    }

    pub fn template(&self) -> &LevelTemplate {
        &self.template
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Live runs started so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Play attempts until the level is finished and verified, or quit
    pub fn play<F: Frontend + ?Sized>(&mut self, frontend: &mut F) -> Result<LevelResult, SimError> {
        loop {
            self.attempts += 1;
            self.timeline.spawn_live(self.carried);
            log::debug!(
                "Attempt {} with {} recorded actors",
                self.attempts,
                self.timeline.actors().len() - 1
            );

            match self.timeline.run(frontend)? {
                RunOutcome::Quit => return Ok(LevelResult::Quit),
                RunOutcome::TimeTravelled => {
                    if let Some(end) = self.timeline.seal_live() {
                        self.carried = end;
                    }
                    log::debug!("Time travel from {:?}", self.carried);
                    self.timeline.reset();
                }
                outcome @ (RunOutcome::LevelFinished | RunOutcome::Completed) => {
                    if outcome == RunOutcome::Completed {
                        log::warn!("Live run completed without finishing; verifying anyway");
                    }
                    self.timeline.seal_live();
                    self.timeline.reset();
                    return self.verify(frontend);
                }
                outcome => {
                    log::debug!("Attempt failed: {:?}", outcome);
                    self.timeline.discard_live();
                    self.timeline.reset();
                }
            }
        }
    }

    /// Replay every recorded actor with nobody live
    fn verify<F: Frontend + ?Sized>(&mut self, frontend: &mut F) -> Result<LevelResult, SimError> {
        let outcome = self.timeline.run(frontend)?;
        Ok(match outcome {
            RunOutcome::Completed => LevelResult::Solved,
            RunOutcome::Quit => LevelResult::Quit,
            other => {
                log::info!("Final pass failed: {:?}", other);
                LevelResult::Failed(other)
            }
        })
    }
}

/// How the whole campaign ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignResult {
    Completed,
    /// Quit while playing the level at this index
    Quit { level: usize },
}

/// The levels, played in order
#[derive(Debug, Clone)]
pub struct Campaign {
    levels: Vec<LevelTemplate>,
    settings: Settings,
}

impl Campaign {
    pub fn new(levels: Vec<LevelTemplate>, settings: Settings) -> Self {
        Self { levels, settings }
    }

    pub fn levels(&self) -> &[LevelTemplate] {
        &self.levels
    }

    /// Play every level; a level that fails its final pass starts over empty
    pub fn run<F: Frontend + ?Sized>(&self, frontend: &mut F) -> Result<CampaignResult, SimError> {
        for (index, template) in self.levels.iter().enumerate() {
            log::info!("Level {}: {}", index + 1, template.name);
            loop {
                let mut session = LevelSession::new(template.clone(), &self.settings)?;
                match session.play(frontend)? {
                    LevelResult::Solved => {
                        log::info!(
                            "Solved {} with {} actors after {} attempts",
                            template.name,
                            session.timeline().actors().len(),
                            session.attempts()
                        );
                        break;
                    }
                    LevelResult::Failed(_) => {
                        log::info!("Replaying {} from scratch", template.name);
                    }
                    LevelResult::Quit => return Ok(CampaignResult::Quit { level: index }),
                }
            }
        }
        Ok(CampaignResult::Completed)
    }
}
