//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep, integer pixel math only
//! - Stable iteration order (actors in recording order)
//! - Input only through `InputSource`, output only through `Frame`

pub mod actor;
pub mod error;
pub mod grid;
pub mod keys;
pub mod physics;
pub mod recording;
pub mod timeline;

pub use actor::{Actor, TickOutcome};
pub use error::{LevelError, RecordingError, SimError};
pub use grid::{Cell, Grid, GroupId};
pub use keys::{Key, KeySet};
pub use physics::{Body, Resolution};
pub use recording::{ActorSnapshot, Keyframe, Recording, TickStatus};
pub use timeline::{RunOutcome, Timeline};
