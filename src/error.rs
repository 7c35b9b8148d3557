use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid configuration: {rows}x{cols} grid with {mines} mines")]
    InvalidConfiguration {
        rows: usize,
        cols: usize,
        mines: usize,
    },
    #[error("Position ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },
    #[error("Could not generate a safe grid after {attempts} attempts")]
    GenerationExhausted { attempts: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;
