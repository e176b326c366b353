//! Level grid: terrain cells, control-group overlay and levers
//!
//! The grid's shape and control overlay are fixed when it is built from a
//! template. Only terrain changes at runtime, and only through lever groups.

use glam::IVec2;

use super::LevelError;
use crate::consts::BLOCK_WIDTH;
use crate::levels::LevelTemplate;

/// Terrain symbol of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Air,
    Ground,
    LeverOff,
    LeverOn,
    Spike,
    Goal,
}

impl Cell {
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'a' => Some(Cell::Air),
            'g' => Some(Cell::Ground),
            'l' => Some(Cell::LeverOff),
            'L' => Some(Cell::LeverOn),
            's' => Some(Cell::Spike),
            '*' => Some(Cell::Goal),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Air => 'a',
            Cell::Ground => 'g',
            Cell::LeverOff => 'l',
            Cell::LeverOn => 'L',
            Cell::Spike => 's',
            Cell::Goal => '*',
        }
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        self == Cell::Ground
    }

    #[inline]
    pub fn is_lever(self) -> bool {
        matches!(self, Cell::LeverOff | Cell::LeverOn)
    }

    /// State after the cell's lever group is toggled
    fn toggled(self) -> Self {
        match self {
            Cell::Air => Cell::Ground,
            Cell::Ground => Cell::Air,
            Cell::LeverOff => Cell::LeverOn,
            Cell::LeverOn => Cell::LeverOff,
            other => other,
        }
    }
}

/// Lever group identifier (the control character of a cell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub char);

impl GroupId {
    /// `'0'` marks an uncontrolled cell
    pub fn from_control(c: char) -> Option<Self> {
        (c != '0').then_some(GroupId(c))
    }
}

/// The mutable level grid
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    template: Vec<Cell>,
    cells: Vec<Cell>,
    control: Vec<Option<GroupId>>,
}

impl Grid {
    /// Build a grid in its template state
    pub fn from_template(template: &LevelTemplate) -> Result<Self, LevelError> {
        template.validate()?;

        let cells: Vec<Cell> = template
            .terrain
            .chars()
            .enumerate()
            .map(|(index, symbol)| {
                Cell::from_symbol(symbol).ok_or(LevelError::UnknownSymbol { symbol, index })
            })
            .collect::<Result<_, _>>()?;
        let control = template.control.chars().map(GroupId::from_control).collect();

        Ok(Self {
            width: template.width,
            height: template.height(),
            template: cells.clone(),
            cells,
            control,
        })
    }

    /// Width in cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Level extent in pixels
    pub fn pixel_size(&self) -> IVec2 {
        IVec2::new(
            self.width as i32 * BLOCK_WIDTH,
            self.height as i32 * BLOCK_WIDTH,
        )
    }

    /// Index of the cell containing an in-bounds pixel position
    #[inline]
    pub fn index_at(&self, pos: IVec2) -> usize {
        (pos.x / BLOCK_WIDTH) as usize + self.width * (pos.y / BLOCK_WIDTH) as usize
    }

    #[inline]
    pub fn cell_at(&self, index: usize) -> Cell {
        self.cells[index]
    }

    pub fn control_at(&self, index: usize) -> Option<GroupId> {
        self.control[index]
    }

    /// Current terrain, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Flip every cell of a lever group (air/ground, lever off/on)
    pub fn toggle_group(&mut self, group: GroupId) {
        for (cell, control) in self.cells.iter_mut().zip(&self.control) {
            if *control == Some(group) {
                *cell = cell.toggled();
            }
        }
    }

    /// Pull the lever at `index`, if there is one
    pub fn activate_lever_at(&mut self, index: usize) {
        if !self.cells[index].is_lever() {
            return;
        }
        if let Some(group) = self.control[index] {
            log::trace!("Lever {} pulled at cell {}", group.0, index);
            self.toggle_group(group);
        }
    }

    /// Restore the template terrain
    pub fn reset(&mut self) {
        self.cells.copy_from_slice(&self.template);
    }
}
