use crate::{
    data::{CellState, CellValue, Grid},
    error::Result,
    model::Pos,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reveal {
    /// Target was already visible or flagged.
    Unchanged,
    /// Target is a mine; it is marked `clicked` but left unrevealed.
    Detonated,
    /// Number of cells that went from open to visible.
    Opened(usize),
}

/// Opens `pos` on `grid`, flooding outward from cells without adjacent
/// mines. Each cell flips `Open -> Visible` at most once, which also bounds
/// the work stack.
pub fn open_cell(grid: &mut Grid, pos: Pos) -> Result<Reveal> {
    let pos = grid.check_bounds(pos)?;
    let target = grid[pos];

    if target.state != CellState::Open {
        return Ok(Reveal::Unchanged);
    }

    if target.is_bomb() {
        grid[pos].clicked = true;
        return Ok(Reveal::Detonated);
    }

    grid[pos].state = CellState::Visible;
    let mut opened = 1;

    if target.value != CellValue::Empty {
        return Ok(Reveal::Opened(opened));
    }

    let mut stack = vec![pos];
    while let Some(current) = stack.pop() {
        for neighbor in grid.neighbors(current) {
            let cell = &mut grid[neighbor];
            if cell.state != CellState::Open || cell.is_bomb() {
                continue;
            }

            cell.state = CellState::Visible;
            opened += 1;
            if cell.value == CellValue::Empty {
                stack.push(neighbor);
            }
        }
    }

    Ok(Reveal::Opened(opened))
}
