//! Draw lists handed to the frontend
//!
//! Pixel output is the frontend's job. The simulation only describes what is
//! on screen: the grid under the camera and one rectangle per actor.

pub mod frame;

pub use frame::{ActorSprite, Color, Frame, Rect, cell_color, colors};
