use std::env;

use tracing::{info, warn};

use crate::model::GameParams;

/// Reads grid parameters from `MINESWEEPER_ROWS`, `MINESWEEPER_COLS` and
/// `MINESWEEPER_MINES`, falling back to defaults for missing or unparsable
/// values.
pub fn load_params() -> GameParams {
    params_from(|key| env::var(key).ok())
}

pub fn params_from(lookup: impl Fn(&str) -> Option<String>) -> GameParams {
    let defaults = GameParams::default();
    let read = |key: &str, default: usize| -> usize {
        match lookup(key) {
            None => default,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Ignoring {}={:?}, using {}", key, raw, default);
                default
            }),
        }
    };

    let params = GameParams {
        rows: read("MINESWEEPER_ROWS", defaults.rows),
        cols: read("MINESWEEPER_COLS", defaults.cols),
        mines: read("MINESWEEPER_MINES", defaults.mines),
    };

    info!(
        "Loaded game parameters: {}x{} with {} mines",
        params.rows, params.cols, params.mines
    );
    params
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn params(vars: &[(&str, &str)]) -> GameParams {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|&(key, value)| (key.to_string(), value.to_string()))
            .collect();
        params_from(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(params(&[]), GameParams::default());
    }

    #[test]
    fn variables_override_defaults() {
        let loaded = params(&[
            ("MINESWEEPER_ROWS", "16"),
            ("MINESWEEPER_COLS", " 30 "),
            ("MINESWEEPER_MINES", "99"),
        ]);
        assert_eq!(loaded, GameParams::new(16, 30, 99));
    }

    #[test]
    fn unparsable_values_fall_back() {
        let loaded = params(&[("MINESWEEPER_ROWS", "lots"), ("MINESWEEPER_MINES", "-3")]);
        assert_eq!(loaded, GameParams::new(10, 10, 10));
    }

    #[test]
    fn loaded_values_are_not_validated_here() {
        let loaded = params(&[("MINESWEEPER_MINES", "100")]);
        assert!(loaded.validate().is_err());
    }
}
