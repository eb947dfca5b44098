use std::collections::HashSet;

use serde::Serialize;
use stepwise_config::BlockType;
use tracing::debug;

use crate::block::{Block, BlockId};
use crate::error::DocumentError;
use crate::prompt::{PromptField, PromptPair};

/// Where a split inserts its new block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitTarget {
  /// Split the block at this index; the new block goes right after it.
  At(usize),
  /// Add a block at the end of the document.
  Append,
}

/// What [`BlockDocument::remove_at`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
  /// The index did not name a block.
  OutOfRange,
  /// The block was the only one and was emptied instead of removed.
  Cleared,
  /// The block was removed.
  Removed { index: usize },
}

impl RemoveOutcome {
  /// Block index that should take focus next, if focus should move.
  pub fn focus(&self) -> Option<usize> {
    match self {
      RemoveOutcome::Removed { index } if *index > 0 => Some(index - 1),
      _ => None,
    }
  }
}

/// Ordered blocks of one stage. Always holds at least one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockDocument {
  blocks: Vec<Block>,
}

impl BlockDocument {
  /// A document holding a single block.
  pub fn new(first: Block) -> Self {
    Self {
      blocks: vec![first],
    }
  }

  /// Build a document from stored blocks.
  pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, DocumentError> {
    if blocks.is_empty() {
      return Err(DocumentError::Empty);
    }
    let mut seen = HashSet::new();
    for block in &blocks {
      if !seen.insert(block.id.as_str()) {
        return Err(DocumentError::DuplicateBlockId(block.id.clone()));
      }
    }
    Ok(Self { blocks })
  }

  pub fn blocks(&self) -> &[Block] {
    &self.blocks
  }

  pub fn into_blocks(self) -> Vec<Block> {
    self.blocks
  }

  pub fn get(&self, index: usize) -> Option<&Block> {
    self.blocks.get(index)
  }

  pub fn len(&self) -> usize {
    self.blocks.len()
  }

  /// Always false; kept for the `len`/`is_empty` pair.
  pub fn is_empty(&self) -> bool {
    self.blocks.is_empty()
  }

  pub fn last_index(&self) -> usize {
    self.blocks.len().saturating_sub(1)
  }

  pub fn contains_id(&self, block_id: &str) -> bool {
    self.blocks.iter().any(|b| b.id == block_id)
  }

  /// Replace a block's content. Returns false (and does nothing) when the
  /// index is out of range.
  pub fn set_content(&mut self, index: usize, content: impl Into<String>) -> bool {
    match self.blocks.get_mut(index) {
      Some(block) => {
        block.content = content.into();
        true
      }
      None => false,
    }
  }

  /// Split a block in two, or append a block.
  ///
  /// `At(index)` keeps `before` in the block at `index` and inserts a body
  /// block holding `after` right behind it. `Append` adds a body block
  /// holding `after` at the end, unless the last block is already an empty
  /// body block, which is reused instead.
  ///
  /// Returns the index that should take focus, or `None` when `index` is out
  /// of range.
  pub fn split_at(
    &mut self,
    target: SplitTarget,
    before: impl Into<String>,
    after: impl Into<String>,
    new_id: impl Into<BlockId>,
  ) -> Option<usize> {
    match target {
      SplitTarget::At(index) => {
        let block = self.blocks.get_mut(index)?;
        block.content = before.into();
        let new_block = Block::new(new_id, BlockType::Body, after);
        debug!(index, block_id = %new_block.id, "block split");
        self.blocks.insert(index + 1, new_block);
        Some(index + 1)
      }
      SplitTarget::Append => {
        let last = self.last_index();
        if self.blocks[last].is_empty_body() {
          self.blocks[last].content = after.into();
          debug!(index = last, "empty tail block reused");
          return Some(last);
        }
        let new_block = Block::new(new_id, BlockType::Body, after);
        debug!(index = last + 1, block_id = %new_block.id, "block appended");
        self.blocks.push(new_block);
        Some(self.blocks.len() - 1)
      }
    }
  }

  /// Remove a block. The last remaining block is cleared instead.
  ///
  /// The removed block's text is not carried into its neighbour.
  pub fn remove_at(&mut self, index: usize) -> RemoveOutcome {
    if index >= self.blocks.len() {
      return RemoveOutcome::OutOfRange;
    }
    if self.blocks.len() == 1 {
      self.blocks[0].content.clear();
      debug!("sole block cleared");
      return RemoveOutcome::Cleared;
    }
    let removed = self.blocks.remove(index);
    debug!(index, block_id = %removed.id, "block removed");
    RemoveOutcome::Removed { index }
  }

  /// Apply a toolbar block type.
  ///
  /// Text types change the block in place and keep its content. `Image`
  /// leaves the block alone and inserts an empty image block after it.
  /// Returns the index of the block that was changed or inserted.
  pub fn convert_type(
    &mut self,
    index: usize,
    new_type: BlockType,
    new_id: impl Into<BlockId>,
  ) -> Option<usize> {
    let block = self.blocks.get_mut(index)?;
    if new_type == BlockType::Image {
      let image = Block::new(new_id, BlockType::Image, "");
      debug!(index = index + 1, block_id = %image.id, "image block inserted");
      self.blocks.insert(index + 1, image);
      return Some(index + 1);
    }
    debug!(index, from = %block.block_type, to = %new_type, "block type changed");
    block.block_type = new_type;
    Some(index)
  }

  /// Set one field of a prompt block and re-encode it.
  ///
  /// Content that does not decode as a prompt is kept as its input.
  pub fn update_prompt_field(
    &mut self,
    index: usize,
    field: PromptField,
    value: impl Into<String>,
  ) -> bool {
    let Some(block) = self.blocks.get_mut(index) else {
      return false;
    };
    let mut pair = PromptPair::decode(&block.content);
    pair.set(field, value);
    block.content = pair.encode();
    true
  }
}
