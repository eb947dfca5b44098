use serde::{Deserialize, Serialize};
use stepwise_config::{BlockDef, BlockType};

pub type BlockId = String;

/// One typed unit of stage content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
  pub id: BlockId,
  #[serde(rename = "type")]
  pub block_type: BlockType,
  pub content: String,
}

impl Block {
  pub fn new(id: impl Into<BlockId>, block_type: BlockType, content: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      block_type,
      content: content.into(),
    }
  }

  /// An empty body block, the content of a freshly created stage.
  pub fn body(id: impl Into<BlockId>) -> Self {
    Self::new(id, BlockType::Body, "")
  }

  pub fn is_empty_body(&self) -> bool {
    self.block_type == BlockType::Body && self.content.is_empty()
  }
}

impl From<BlockDef> for Block {
  fn from(def: BlockDef) -> Self {
    Self {
      id: def.id,
      block_type: def.block_type,
      content: def.content,
    }
  }
}

impl From<Block> for BlockDef {
  fn from(block: Block) -> Self {
    Self {
      id: block.id,
      block_type: block.block_type,
      content: block.content,
    }
  }
}
