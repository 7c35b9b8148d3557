use serde::{Deserialize, Serialize};

use super::{Pos, Snapshot};
use crate::{
    data::{Cell, Grid},
    logic::Phase,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CellUpdate {
    pub pos: Pos,
    pub cell: Cell,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "init")]
    Init { snapshot: Snapshot },
    #[serde(rename = "update")]
    Update {
        updates: Vec<CellUpdate>,
        phase: Phase,
        remaining_flags: isize,
    },
    #[serde(rename = "tick")]
    Tick { elapsed: u32 },
    #[serde(rename = "error")]
    Error { message: String },
}

/// Cells whose value or state differs between two grids of the same shape.
pub fn changed_cells(before: &Grid, after: &Grid) -> Vec<CellUpdate> {
    after
        .iter()
        .filter(|&(pos, cell)| before.get(pos) != Some(cell))
        .map(|(pos, cell)| CellUpdate { pos, cell: *cell })
        .collect()
}
