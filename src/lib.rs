//! Minesweeper grid engine.
//!
//! [`logic::Game`] owns a [`data::Grid`] and runs the idle, live, won and
//! lost phases; [`session::Session`] drives one game from line-delimited
//! JSON actions and emits snapshots and cell updates.
//!
//! ```rust
//! use minesweeper_engine::{
//!     data::Grid,
//!     logic::{Game, OpenOutcome, Phase},
//!     model::Pos,
//! };
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let grid = Grid::from_mines(3, 3, &[Pos::new(2, 2)]).unwrap();
//! let mut game = Game::from_grid(grid, StdRng::seed_from_u64(0)).unwrap();
//!
//! assert_eq!(game.open(Pos::new(0, 0)).unwrap(), OpenOutcome::Won);
//! assert_eq!(game.phase(), Phase::Won);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod logic;
pub mod model;
pub mod session;

pub use error::{EngineError, Result};
