use serde::{Deserialize, Serialize};

use super::Pos;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "action")]
pub enum ClientMessage {
    #[serde(rename = "open")]
    Open { pos: Pos },
    #[serde(rename = "flag")]
    Flag { pos: Pos },
    #[serde(rename = "reset")]
    Reset,
}
