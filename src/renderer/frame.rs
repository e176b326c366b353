//! Frame description: visible cells and actor rectangles

use glam::IVec2;

use crate::consts::BLOCK_WIDTH;
use crate::sim::grid::{Cell, Grid};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const GROUND: Color = Color(150, 100, 20);
    pub const LEVER_OFF: Color = Color(100, 150, 100);
    pub const LEVER_ON: Color = Color(0, 200, 150);
    pub const SPIKE: Color = Color(255, 0, 0);
    pub const GOAL: Color = Color(255, 200, 0);
    pub const LIVE_ACTOR: Color = Color(0, 100, 0);
    pub const PLAYBACK_ACTOR: Color = Color(0, 0, 0);
}

/// Color a cell is drawn with; air is left as background
pub fn cell_color(cell: Cell) -> Option<Color> {
    match cell {
        Cell::Air => None,
        Cell::Ground => Some(colors::GROUND),
        Cell::LeverOff => Some(colors::LEVER_OFF),
        Cell::LeverOn => Some(colors::LEVER_ON),
        Cell::Spike => Some(colors::SPIKE),
        Cell::Goal => Some(colors::GOAL),
    }
}

/// Axis-aligned rectangle in level pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub pos: IVec2,
    pub size: IVec2,
}

impl Rect {
    pub fn new(pos: IVec2, size: IVec2) -> Self {
        Self { pos, size }
    }

    pub fn square(pos: IVec2, side: i32) -> Self {
        Self::new(pos, IVec2::splat(side))
    }

    /// Same culling rule as the block renderer: touching edges count as visible
    pub fn touches(&self, other: &Rect) -> bool {
        let end = self.pos + self.size;
        let other_end = other.pos + other.size;
        self.pos.x < other_end.x
            && end.x >= other.pos.x
            && self.pos.y < other_end.y
            && end.y >= other.pos.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorSprite {
    pub rect: Rect,
    pub color: Color,
}

/// Everything needed to draw one tick
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub grid: &'a Grid,
    /// Top-left of the view in level pixels
    pub camera: IVec2,
    pub viewport: IVec2,
    /// Extant actors, oldest first
    pub actors: Vec<ActorSprite>,
}

impl Frame<'_> {
    pub fn view(&self) -> Rect {
        Rect::new(self.camera, self.viewport)
    }

    /// Non-air cells overlapping the view, with their colors
    pub fn visible_cells(&self) -> impl Iterator<Item = (Rect, Color)> + '_ {
        let view = self.view();
        let width = self.grid.width();
        self.grid
            .cells()
            .iter()
            .enumerate()
            .filter_map(move |(index, &cell)| {
                let color = cell_color(cell)?;
                let pos = IVec2::new((index % width) as i32, (index / width) as i32) * BLOCK_WIDTH;
                let rect = Rect::square(pos, BLOCK_WIDTH);
                rect.touches(&view).then_some((rect, color))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelTemplate;

    #[test]
    fn test_visible_cells_culls_outside_view() {
        let template = LevelTemplate::from_rows(
            "wide",
            &["gaaaag*", "ssssssl"],
            &["0000000", "0000001"],
            IVec2::ZERO,
        );
        let grid = Grid::from_template(&template).unwrap();
        let frame = Frame {
            grid: &grid,
            camera: IVec2::new(130, 0),
            viewport: IVec2::new(300, 100),
            actors: Vec::new(),
        };
        let cells: Vec<(Rect, Color)> = frame.visible_cells().collect();
        // View spans x 130..430, y 0..100: nothing but air
        assert!(cells.is_empty());

        let frame = Frame {
            camera: IVec2::new(500, 100),
            ..frame
        };
        let drawn: Vec<Color> = frame.visible_cells().map(|(_, c)| c).collect();
        assert_eq!(
            drawn,
            vec![
                colors::GROUND,
                colors::GOAL,
                colors::SPIKE,
                colors::SPIKE,
                colors::LEVER_OFF
            ]
        );
    }
}
