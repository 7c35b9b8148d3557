use rand::Rng;
use tracing::{debug, warn};

use crate::{
    data::{CellValue, Grid},
    error::{EngineError, Result},
    model::{GameParams, Pos},
};

/// Upper bound on whole-grid regenerations when making the first click safe.
pub const MAX_GENERATION_ATTEMPTS: usize = 10_000;

fn invalid(params: &GameParams) -> EngineError {
    EngineError::InvalidConfiguration {
        rows: params.rows,
        cols: params.cols,
        mines: params.mines,
    }
}

/// Selection sampling: every cell takes a mine with probability
/// `mines_left / cells_left`, which yields exactly `mines` distinct
/// positions, each layout equally likely.
fn place_bombs<R: Rng>(grid: &mut Grid, mines: u32, rng: &mut R) {
    let mut mines_left = mines;
    let mut cells_left = (grid.rows() * grid.cols()) as u32;

    for cell in grid.cells_mut() {
        if mines_left > 0 && rng.random_ratio(mines_left, cells_left) {
            cell.value = CellValue::Bomb;
            mines_left -= 1;
        }
        cells_left -= 1;
    }
}

pub fn generate<R: Rng>(params: &GameParams, rng: &mut R) -> Result<Grid> {
    let params = params.validate()?;
    let mines = u32::try_from(params.mines).map_err(|_| invalid(&params))?;
    u32::try_from(params.total_cells()).map_err(|_| invalid(&params))?;

    let mut grid = Grid::blank(params.rows, params.cols);
    place_bombs(&mut grid, mines, rng);
    grid.fill_counts();

    debug!(
        "Generated {}x{} grid with {} mines",
        params.rows,
        params.cols,
        grid.mine_count()
    );
    Ok(grid)
}

/// Regenerates until `pos` holds no mine.
pub fn generate_safe_at<R: Rng>(
    params: &GameParams,
    pos: Pos,
    rng: &mut R,
) -> Result<Grid> {
    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let grid = generate(params, rng)?;
        grid.check_bounds(pos)?;
        if !grid[pos].is_bomb() {
            debug!(
                "Found safe grid for ({}, {}) after {} attempts",
                pos.row, pos.col, attempt
            );
            return Ok(grid);
        }
    }

    warn!(
        "Gave up making ({}, {}) safe after {} attempts",
        pos.row, pos.col, MAX_GENERATION_ATTEMPTS
    );
    Err(EngineError::GenerationExhausted {
        attempts: MAX_GENERATION_ATTEMPTS,
    })
}
