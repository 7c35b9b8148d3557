use serde::{Deserialize, Serialize};

use crate::{
    data::Cell,
    error::{EngineError, Result},
    logic::Phase,
};

pub mod client;
pub mod server;

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameParams {
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            mines: 10,
        }
    }
}

impl GameParams {
    pub const fn new(rows: usize, cols: usize, mines: usize) -> Self {
        Self { rows, cols, mines }
    }

    /// Checks `rows, cols > 0` and `0 < mines < rows * cols`.
    pub fn validate(self) -> Result<Self> {
        let total = self.rows.checked_mul(self.cols).unwrap_or(0);
        if self.rows == 0 || self.cols == 0 || self.mines == 0 || self.mines >= total {
            return Err(EngineError::InvalidConfiguration {
                rows: self.rows,
                cols: self.cols,
                mines: self.mines,
            });
        }
        Ok(self)
    }

    pub const fn total_cells(&self) -> usize {
        self.rows * self.cols
    }
}

/// Owned copy of everything a presentation layer needs to draw the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: usize,
    pub cols: usize,
    pub phase: Phase,
    pub elapsed: u32,
    pub remaining_flags: isize,
    pub cells: Vec<Vec<Cell>>,
}

impl Snapshot {
    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.cells.get(pos.row)?.get(pos.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert_eq!(GameParams::default().validate(), Ok(GameParams::new(10, 10, 10)));
    }

    #[test]
    fn validate_rejects_degenerate_params() {
        for params in [
            GameParams::new(0, 10, 1),
            GameParams::new(10, 0, 1),
            GameParams::new(3, 3, 0),
            GameParams::new(3, 3, 9),
            GameParams::new(3, 3, 12),
        ] {
            assert_eq!(
                params.validate(),
                Err(EngineError::InvalidConfiguration {
                    rows: params.rows,
                    cols: params.cols,
                    mines: params.mines,
                })
            );
        }
    }

    #[test]
    fn params_fill_missing_fields_from_defaults() {
        let params: GameParams = serde_json::from_str(r#"{"mines": 20}"#).unwrap();
        assert_eq!(params, GameParams::new(10, 10, 20));
    }
}
