//! Retrace entry point
//!
//! Loads settings and levels, then plays the campaign on the headless
//! scripted frontend. A windowed frontend plugs in through the same
//! `Frontend` trait.

use std::process::ExitCode;

use retrace::platform::ScriptedFrontend;
use retrace::settings::SettingsError;
use retrace::sim::SimError;
use retrace::{Campaign, CampaignResult, Settings};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("configuration: {0}")]
    Settings(#[from] SettingsError),

    #[error("simulation: {0}")]
    Sim(#[from] SimError),
}

fn run() -> Result<CampaignResult, AppError> {
    let settings = Settings::load();
    let levels = settings.level_pack()?;
    let script = settings.script()?;
    log::info!(
        "Retrace starting: {} levels, {} script steps",
        levels.len(),
        script.len()
    );

    let mut frontend = ScriptedFrontend::new(script);
    let result = Campaign::new(levels, settings).run(&mut frontend)?;
    log::info!("{} frames drawn", frontend.frames_drawn());
    Ok(result)
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(CampaignResult::Completed) => {
            log::info!("All levels solved");
            ExitCode::SUCCESS
        }
        Ok(CampaignResult::Quit { level }) => {
            log::info!("Quit during level {}", level + 1);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
