use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    data::{Cell, CellState, Grid},
    error::Result,
    model::{GameParams, Pos, Snapshot},
};

pub use generate::{MAX_GENERATION_ATTEMPTS, generate, generate_safe_at};
pub use reveal::{Reveal, open_cell};

mod generate;
mod reveal;

/// Highest value the elapsed-seconds counter reaches.
pub const MAX_ELAPSED: u32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the first open.
    #[default]
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "live")]
    Live,
    #[serde(rename = "won")]
    Won,
    #[serde(rename = "lost")]
    Lost,
}

impl Phase {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    NoChange,
    Revealed,
    Lost,
    Won,
}

impl OpenOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Debug)]
pub struct Game<R = StdRng> {
    params: GameParams,
    grid: Grid,
    phase: Phase,
    elapsed: u32,
    remaining_flags: isize,
    rng: R,
}

impl Game<StdRng> {
    pub fn new(params: GameParams) -> Result<Self> {
        Self::with_rng(params, StdRng::from_os_rng())
    }
}

impl<R: Rng> Game<R> {
    pub fn with_rng(params: GameParams, mut rng: R) -> Result<Self> {
        let grid = generate(&params, &mut rng)?;
        info!(
            "Created game: {}x{} with {} mines",
            params.rows, params.cols, params.mines
        );
        Ok(Self::assemble(params, grid, rng))
    }

    /// Starts a game on a fixed layout. `rng` is used for first-click
    /// relocation and for later resets.
    pub fn from_grid(mut grid: Grid, rng: R) -> Result<Self> {
        let params = GameParams::new(grid.rows(), grid.cols(), grid.mine_count()).validate()?;
        for cell in grid.cells_mut() {
            *cell = Cell {
                value: cell.value,
                ..Cell::default()
            };
        }
        Ok(Self::assemble(params, grid, rng))
    }

    fn assemble(params: GameParams, grid: Grid, rng: R) -> Self {
        Self {
            params,
            grid,
            phase: Phase::Idle,
            elapsed: 0,
            remaining_flags: params.mines as isize,
            rng,
        }
    }

    pub fn params(&self) -> GameParams {
        self.params
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn remaining_flags(&self) -> isize {
        self.remaining_flags
    }

    pub fn cell(&self, pos: Pos) -> Result<Cell> {
        self.grid.cell(pos)
    }

    /// Owned copy of the current grid.
    pub fn grid(&self) -> Grid {
        self.grid.clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            phase: self.phase,
            elapsed: self.elapsed,
            remaining_flags: self.remaining_flags,
            cells: self.grid.to_rows(),
        }
    }

    pub fn open(&mut self, pos: Pos) -> Result<OpenOutcome> {
        let pos = self.grid.check_bounds(pos)?;

        match self.phase {
            Phase::Won | Phase::Lost => return Ok(OpenOutcome::NoChange),
            Phase::Idle => {
                if self.grid[pos].is_bomb() {
                    debug!("First open at ({}, {}) hit a mine, regenerating", pos.row, pos.col);
                    self.grid = generate_safe_at(&self.params, pos, &mut self.rng)?;
                }
                self.phase = Phase::Live;
                info!("Game started at ({}, {})", pos.row, pos.col);
            }
            Phase::Live => {}
        }

        let outcome = match open_cell(&mut self.grid, pos)? {
            Reveal::Unchanged => OpenOutcome::NoChange,
            Reveal::Detonated => {
                self.lose();
                OpenOutcome::Lost
            }
            Reveal::Opened(count) => {
                debug!("Opened {} cells from ({}, {})", count, pos.row, pos.col);
                if self.grid.all_safe_visible() {
                    self.win();
                    OpenOutcome::Won
                } else {
                    OpenOutcome::Revealed
                }
            }
        };

        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, pos: Pos) -> Result<FlagOutcome> {
        let pos = self.grid.check_bounds(pos)?;
        if self.phase != Phase::Live {
            return Ok(FlagOutcome::NoChange);
        }

        let cell = &mut self.grid[pos];
        Ok(match cell.state {
            CellState::Open => {
                cell.state = CellState::Flagged;
                self.remaining_flags -= 1;
                FlagOutcome::Flagged
            }
            CellState::Flagged => {
                cell.state = CellState::Open;
                self.remaining_flags += 1;
                FlagOutcome::Unflagged
            }
            CellState::Visible => FlagOutcome::NoChange,
        })
    }

    pub fn reset(&mut self) -> Result<()> {
        let grid = generate(&self.params, &mut self.rng)?;
        self.grid = grid;
        self.phase = Phase::Idle;
        self.elapsed = 0;
        self.remaining_flags = self.params.mines as isize;
        info!("Game reset");
        Ok(())
    }

    /// Advances the clock by one second while live. Returns whether it moved.
    pub fn tick(&mut self) -> bool {
        if self.phase != Phase::Live || self.elapsed >= MAX_ELAPSED {
            return false;
        }
        self.elapsed += 1;
        true
    }

    fn lose(&mut self) {
        self.phase = Phase::Lost;
        for cell in self.grid.cells_mut().filter(|cell| cell.is_bomb()) {
            cell.state = CellState::Visible;
        }
        info!("Game lost after {}s", self.elapsed);
    }

    fn win(&mut self) {
        self.phase = Phase::Won;
        for cell in self.grid.cells_mut().filter(|cell| cell.is_bomb()) {
            cell.state = CellState::Flagged;
        }
        info!("Game won after {}s", self.elapsed);
    }
}
