//! Integer physics and grid collision resolution
//!
//! Everything here is pure integer arithmetic over a body and the grid, so a
//! replayed actor follows exactly the trajectory it had when it was live.
//!
//! Collision works on the (at most) four cells under the hit-box: the cell of
//! its top-left corner, plus the cell to the right, below and diagonally below
//! when the box straddles that boundary. Which axis gets pushed out is decided
//! by [`classify`], an explicit table over which of those cells are solid.

use glam::IVec2;

use super::grid::Grid;
use crate::consts::{BLOCK_WIDTH, GRAVITY, MAX_VELOCITY};

/// The physical part of an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    pub pos: IVec2,
    pub vel: IVec2,
    /// Hit-box side length
    pub size: i32,
    /// Standing on something (may jump)
    pub on_ground: bool,
}

/// Solid cells under the hit-box and which boundaries it straddles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Contact {
    pub top_left: bool,
    pub top_right: bool,
    pub bottom_left: bool,
    pub bottom_right: bool,
    pub x_straddle: bool,
    pub y_straddle: bool,
}

impl Contact {
    /// Sample the grid under a body that lies within the level bounds
    pub fn sample(body: &Body, grid: &Grid) -> Self {
        let x_straddle = body.pos.x % BLOCK_WIDTH + body.size > BLOCK_WIDTH;
        let y_straddle = body.pos.y % BLOCK_WIDTH + body.size > BLOCK_WIDTH;
        let index = grid.index_at(body.pos);
        let below = index + grid.width();
        let solid = |i: usize| grid.cell_at(i).is_solid();

        Self {
            top_left: solid(index),
            top_right: x_straddle && solid(index + 1),
            bottom_left: y_straddle && solid(below),
            bottom_right: x_straddle && y_straddle && solid(below + 1),
            x_straddle,
            y_straddle,
        }
    }

    fn solid_count(&self) -> usize {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
        .into_iter()
        .filter(|&s| s)
        .count()
    }
}

/// Which axes to push the body out along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    None,
    Both,
    Horizontal,
    Vertical,
    /// Cell layout alone does not decide; use the body's motion
    ByMotion,
}

/// Decide the push axes from the cell layout alone
pub fn classify(contact: &Contact) -> Resolution {
    let Contact {
        top_left: tl,
        top_right: tr,
        bottom_left: bl,
        bottom_right: br,
        x_straddle,
        y_straddle,
    } = *contact;

    match (tl, tr, bl, br) {
        (true, true, true, true) | (false, false, false, false) => Resolution::None,
        _ if contact.solid_count() == 3 => Resolution::Both,
        (true, true, _, _) | (_, _, true, true) => Resolution::Vertical,
        (true, _, true, _) | (_, true, _, true) => Resolution::Horizontal,
        _ => match (x_straddle, y_straddle) {
            (true, false) => Resolution::Horizontal,
            (false, true) => Resolution::Vertical,
            _ => Resolution::ByMotion,
        },
    }
}

/// Offset that snaps an axis onto the nearest cell boundary against its motion
#[inline]
fn projection(pos: i32, vel: i32, size: i32) -> i32 {
    let back = if vel < 0 { size } else { 0 };
    back - (pos + size) % BLOCK_WIDTH
}

/// Settle a `ByMotion` case into a single axis
fn by_motion(contact: &Contact, vel: IVec2, proj: IVec2) -> Resolution {
    let left = contact.top_left || contact.bottom_left;
    let right = contact.top_right || contact.bottom_right;
    let top = contact.top_left || contact.top_right;
    let bottom = contact.bottom_left || contact.bottom_right;

    if (vel.x >= 0 && left) || (vel.x <= 0 && right) {
        Resolution::Vertical
    } else if (vel.y >= 0 && top) || (vel.y <= 0 && bottom) {
        Resolution::Horizontal
    } else if (proj.x * vel.y).abs() > (proj.y * vel.x).abs() {
        Resolution::Vertical
    } else {
        Resolution::Horizontal
    }
}

/// Gravity, velocity clamp and integration for one tick
pub fn step(body: &mut Body) {
    body.vel.y += GRAVITY;
    body.vel = body
        .vel
        .clamp(IVec2::splat(-MAX_VELOCITY), IVec2::splat(MAX_VELOCITY));
    body.pos += body.vel;
}

/// Keep the body inside the level, zeroing velocity into the walls
pub fn clamp_to_bounds(body: &mut Body, level: IVec2) {
    if body.pos.x < 0 {
        body.pos.x = 0;
        body.vel.x = 0;
    } else if body.pos.x + body.size > level.x {
        body.pos.x = level.x - body.size;
        body.vel.x = 0;
    }

    if body.pos.y < 0 {
        body.pos.y = 0;
        body.vel.y = 0;
    } else if body.pos.y + body.size > level.y {
        body.pos.y = level.y - body.size;
        body.vel.y = 0;
        body.on_ground = true;
    }
}

/// Push the body out of solid cells. Returns the resolution applied.
pub fn resolve(body: &mut Body, grid: &Grid) -> Resolution {
    clamp_to_bounds(body, grid.pixel_size());

    let contact = Contact::sample(body, grid);
    let proj = IVec2::new(
        projection(body.pos.x, body.vel.x, body.size),
        projection(body.pos.y, body.vel.y, body.size),
    );

    let resolution = match classify(&contact) {
        Resolution::ByMotion => by_motion(&contact, body.vel, proj),
        other => other,
    };

    if matches!(resolution, Resolution::Horizontal | Resolution::Both) {
        body.pos.x += proj.x;
        body.vel.x = 0;
    }
    if matches!(resolution, Resolution::Vertical | Resolution::Both) {
        body.pos.y += proj.y;
        body.vel.y = 0;
        if proj.y < 0 {
            body.on_ground = true;
        }
    }

    resolution
}
