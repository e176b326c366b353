//! Level templates
//!
//! A template is the immutable description of a level: one terrain symbol
//! per cell, a parallel control-group character per cell, the row width and
//! the pixel position the first live actor spawns at.
//!
//! Terrain symbols: `a` air, `g` ground, `l` lever (off), `L` lever (on),
//! `s` spikes, `*` goal. Control characters: `0` for none, anything else
//! names a lever group.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BLOCK_WIDTH, PLAYER_SIZE};
use crate::sim::LevelError;
use crate::sim::grid::Cell;

/// Immutable description of a level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTemplate {
    /// Display name (logging only)
    #[serde(default)]
    pub name: String,
    /// Terrain symbols, row-major
    pub terrain: String,
    /// Control-group ids, parallel to `terrain`
    pub control: String,
    /// Cells per row
    pub width: usize,
    /// Spawn position of the first live actor (pixels)
    pub start: IVec2,
}

impl LevelTemplate {
    /// Build a template from rows of equal width
    pub fn from_rows(name: &str, terrain: &[&str], control: &[&str], start: IVec2) -> Self {
        let width = terrain.first().map(|row| row.chars().count()).unwrap_or(0);
        Self {
            name: name.to_string(),
            terrain: terrain.concat(),
            control: control.concat(),
            width,
            start,
        }
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.terrain.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.terrain.is_empty()
    }

    /// Number of rows (valid only after `validate`)
    pub fn height(&self) -> usize {
        self.len().checked_div(self.width).unwrap_or(0)
    }

    /// Check the template can be loaded into a grid
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.width == 0 {
            return Err(LevelError::ZeroWidth);
        }

        let cells = self.len();
        let control = self.control.chars().count();
        if cells != control {
            return Err(LevelError::LengthMismatch {
                terrain: cells,
                control,
            });
        }
        if cells == 0 || cells % self.width != 0 {
            return Err(LevelError::NotRectangular {
                cells,
                width: self.width,
            });
        }

        if let Some((index, symbol)) = self
            .terrain
            .chars()
            .enumerate()
            .find(|(_, c)| Cell::from_symbol(*c).is_none())
        {
            return Err(LevelError::UnknownSymbol { symbol, index });
        }

        let max_x = self.width as i32 * BLOCK_WIDTH - PLAYER_SIZE;
        let max_y = self.height() as i32 * BLOCK_WIDTH - PLAYER_SIZE;
        if !(0..=max_x).contains(&self.start.x) || !(0..=max_y).contains(&self.start.y) {
            return Err(LevelError::StartOutOfBounds {
                x: self.start.x,
                y: self.start.y,
            });
        }

        Ok(())
    }

    /// Parse a JSON array of templates
    pub fn pack_from_json(json: &str) -> Result<Vec<LevelTemplate>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The built-in level set, in play order
pub fn builtin() -> Vec<LevelTemplate> {
    vec![
        LevelTemplate::from_rows(
            "Two Levers",
            &[
                "aaaaaaaaaaa",
                "aaaaaaaaaaa",
                "aaaalaaaal*",
                "ggaagggaagg",
                "ggssgggssgg",
                "ggggggggggg",
            ],
            &[
                "00000000000",
                "00000000000",
                "00001000020",
                "00110002200",
                "00000000000",
                "00000000000",
            ],
            IVec2::new(100, 100),
        ),
        LevelTemplate::from_rows(
            "Stairway",
            &[
                "aaaaaaaaaaaaa",
                "aaaaaaaaaaaaa",
                "aaaaagaaaaaaa",
                "aaaalgaaaaal*",
                "gaaaggaagaagg",
                "ggaaaaaggssgg",
                "ggggggggggggg",
            ],
            &[
                "0000000000000",
                "0000000000000",
                "0000000000000",
                "0000100000020",
                "0002000001100",
                "0000000000000",
                "0000000000000",
            ],
            IVec2::new(50, 220),
        ),
        LevelTemplate::from_rows(
            "Shared Bridge",
            &[
                "aaaaaaaaaaa",
                "aaaaaaaaaaa",
                "aaaalaaaaa*",
                "ggaaggggggg",
                "ggssgggssgg",
                "ggggggggggg",
            ],
            &[
                "00000000000",
                "00000000000",
                "00001000000",
                "00110001100",
                "00000000000",
                "00000000000",
            ],
            IVec2::new(100, 100),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_validate() {
        let levels = builtin();
        assert_eq!(levels.len(), 3);
        for level in &levels {
            assert_eq!(level.validate(), Ok(()), "{}", level.name);
        }
        assert_eq!(levels[0].width, 11);
        assert_eq!(levels[0].height(), 6);
        assert_eq!(levels[1].width, 13);
        assert_eq!(levels[1].height(), 7);
    }

    #[test]
    fn test_length_mismatch() {
        let level = LevelTemplate::from_rows("bad", &["aaa", "ggg"], &["000"], IVec2::ZERO);
        assert_eq!(
            level.validate(),
            Err(LevelError::LengthMismatch {
                terrain: 6,
                control: 3
            })
        );
    }

    #[test]
    fn test_not_rectangular() {
        let level = LevelTemplate {
            name: String::new(),
            terrain: "aaaag".to_string(),
            control: "00000".to_string(),
            width: 2,
            start: IVec2::ZERO,
        };
        assert_eq!(
            level.validate(),
            Err(LevelError::NotRectangular { cells: 5, width: 2 })
        );
    }

    #[test]
    fn test_unknown_symbol_and_bad_start() {
        let level = LevelTemplate::from_rows("bad", &["aax"], &["000"], IVec2::ZERO);
        assert_eq!(
            level.validate(),
            Err(LevelError::UnknownSymbol {
                symbol: 'x',
                index: 2
            })
        );

        let level = LevelTemplate::from_rows("bad", &["aaa"], &["000"], IVec2::new(0, 71));
        assert_eq!(
            level.validate(),
            Err(LevelError::StartOutOfBounds { x: 0, y: 71 })
        );
    }

    #[test]
    fn test_pack_from_json() {
        let json = r#"[{"terrain": "aag*", "control": "0000", "width": 2, "start": [10, 20]}]"#;
        let pack = LevelTemplate::pack_from_json(json).unwrap();
        assert_eq!(pack.len(), 1);
        assert_eq!(pack[0].start, IVec2::new(10, 20));
        assert_eq!(pack[0].height(), 2);
        assert!(pack[0].validate().is_ok());
    }
}
