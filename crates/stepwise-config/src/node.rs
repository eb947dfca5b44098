use serde::{Deserialize, Serialize};

use crate::block::BlockDef;

/// Canvas position of a stage node.
///
/// Only `y` takes part in ordering: nodes sharing a level are ranked top to
/// bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

impl Position {
  pub fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
  pub id: String,
  pub position: Position,
  /// Tool name shown in the node header, e.g. "Midjourney".
  pub label: String,
  pub blocks: Vec<BlockDef>,
}
