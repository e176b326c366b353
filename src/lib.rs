//! Retrace - a time-travel puzzle platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, recordings, physics, timeline)
//! - `session`: Attempt loop, final consistency pass and the level campaign
//! - `levels`: Level templates and the built-in level set
//! - `platform`: Input/frontend boundary and the headless scripted frontend
//! - `renderer`: Frame draw lists handed to the frontend
//! - `settings`: Runtime configuration

pub mod levels;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use levels::LevelTemplate;
pub use session::{Campaign, CampaignResult, LevelResult, LevelSession};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Side length of one grid cell in pixels
    pub const BLOCK_WIDTH: i32 = 120;
    /// Maximum magnitude of either velocity component (pixels/tick)
    pub const MAX_VELOCITY: i32 = 18;
    /// Downward acceleration applied every tick
    pub const GRAVITY: i32 = 1;
    /// Horizontal speed while a movement key is held
    pub const WALK_SPEED: i32 = 5;
    /// Vertical velocity set by a jump (negative is up)
    pub const JUMP_VELOCITY: i32 = -19;
    /// Actor hit-box side length in pixels
    pub const PLAYER_SIZE: i32 = 50;
    /// Most keys a single keyframe can record
    pub const MAX_SIMULTANEOUS_KEYS: usize = 10;

    /// Default viewport in pixels
    pub const DEFAULT_VIEW_WIDTH: i32 = 1300;
    pub const DEFAULT_VIEW_HEIGHT: i32 = 720;
    /// Default idle wait per tick in milliseconds
    pub const DEFAULT_FRAME_WAIT_MS: u32 = 1;
}
