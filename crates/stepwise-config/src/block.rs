use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of a content block.
///
/// `h1`/`h2` are accepted on input for records written by older editors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
  #[serde(alias = "h1")]
  Heading1,
  #[serde(alias = "h2")]
  Heading2,
  #[default]
  Body,
  Bullet,
  /// Content is a JSON object `{"input": .., "output": ..}`.
  Prompt,
  /// Content is a reference (URL) or empty.
  Image,
}

impl BlockType {
  pub const ALL: [BlockType; 6] = [
    BlockType::Heading1,
    BlockType::Heading2,
    BlockType::Body,
    BlockType::Bullet,
    BlockType::Prompt,
    BlockType::Image,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      BlockType::Heading1 => "heading1",
      BlockType::Heading2 => "heading2",
      BlockType::Body => "body",
      BlockType::Bullet => "bullet",
      BlockType::Prompt => "prompt",
      BlockType::Image => "image",
    }
  }

  /// Whether the block is edited as free text (and therefore takes part in
  /// Enter/Backspace shortcuts).
  pub fn is_text(&self) -> bool {
    !matches!(self, BlockType::Prompt | BlockType::Image)
  }
}

impl fmt::Display for BlockType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for BlockType {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "heading1" | "h1" => Ok(BlockType::Heading1),
      "heading2" | "h2" => Ok(BlockType::Heading2),
      "body" => Ok(BlockType::Body),
      "bullet" => Ok(BlockType::Bullet),
      "prompt" => Ok(BlockType::Prompt),
      "image" => Ok(BlockType::Image),
      other => Err(format!("unknown block type: {other}")),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDef {
  pub id: String,
  #[serde(rename = "type")]
  pub block_type: BlockType,
  #[serde(default)]
  pub content: String,
}
