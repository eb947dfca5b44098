//! Which block has the caret.

use serde::{Deserialize, Serialize};
use stepwise_document::Block;
use stepwise_graph::NodeId;
use tracing::debug;

use crate::input::{BlockInput, InputAction, InputEvent};
use crate::workflow::Workflow;

/// A block addressed by its node and position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FocusTarget {
  pub node_id: NodeId,
  pub block_index: usize,
}

impl FocusTarget {
  pub fn new(node_id: impl Into<NodeId>, block_index: usize) -> Self {
    Self {
      node_id: node_id.into(),
      block_index,
    }
  }
}

/// A draft that must be written back before focus moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommit {
  pub target: FocusTarget,
  pub content: String,
}

/// Tracks the focused block and its input state.
///
/// The controller never touches the workflow itself. Drafts that need saving
/// are handed back to the caller as [`PendingCommit`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FocusController {
  target: Option<FocusTarget>,
  input: BlockInput,
}

impl FocusController {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn target(&self) -> Option<&FocusTarget> {
    self.target.as_ref()
  }

  pub fn input(&self) -> &BlockInput {
    &self.input
  }

  /// The uncommitted text of the focused block, if it is being edited.
  pub fn draft(&self) -> Option<&str> {
    self.input.draft()
  }

  pub fn is_focused(&self, node_id: &str, index: usize) -> bool {
    self
      .target
      .as_ref()
      .is_some_and(|t| t.node_id == node_id && t.block_index == index)
  }

  /// Move focus to `target`, whose current state is `block`.
  ///
  /// Text blocks start editing with their content as the draft; prompt and
  /// image blocks take focus without a draft. Re-focusing the block that is
  /// already being edited keeps its draft. Moving away from an edited block
  /// returns its draft for the caller to commit.
  pub fn focus_block(&mut self, target: FocusTarget, block: &Block) -> Option<PendingCommit> {
    if self.target.as_ref() == Some(&target) && !self.input.is_viewing() {
      return None;
    }

    let pending = self.take_pending();
    debug!(node_id = %target.node_id, index = target.block_index, "block focused");
    self.input = BlockInput::Viewing;
    if block.block_type.is_text() {
      self.input.apply(InputEvent::Focus {
        content: block.content.clone(),
      });
    }
    self.target = Some(target);
    pending
  }

  /// Feed an input event to the focused block.
  pub fn handle(&mut self, event: InputEvent) -> Option<InputAction> {
    if self.target.is_none() {
      return None;
    }
    self.input.apply(event)
  }

  /// Stop editing but keep the target, returning the draft to commit.
  pub fn blur(&mut self) -> Option<PendingCommit> {
    let pending = self.take_pending();
    self.input = BlockInput::Viewing;
    pending
  }

  /// Drop focus entirely, returning the draft to commit.
  pub fn clear(&mut self) -> Option<PendingCommit> {
    let pending = self.blur();
    self.target = None;
    pending
  }

  /// Bring focus back in line with `workflow`.
  ///
  /// Focus on a node that no longer exists is dropped. An index past the end
  /// of its document is clamped to the last block. Either way the draft is
  /// discarded. Returns whether the target changed.
  pub fn reconcile(&mut self, workflow: &Workflow) -> bool {
    let Some(target) = &self.target else {
      return false;
    };
    let Some(doc) = workflow.document(&target.node_id) else {
      debug!(node_id = %target.node_id, "focus dropped, node removed");
      self.target = None;
      self.input = BlockInput::Viewing;
      return true;
    };

    if target.block_index < doc.len() {
      return false;
    }
    let clamped = FocusTarget::new(target.node_id.clone(), doc.last_index());
    debug!(node_id = %clamped.node_id, index = clamped.block_index, "focus clamped");
    self.target = Some(clamped);
    self.input = BlockInput::Viewing;
    true
  }

  fn take_pending(&mut self) -> Option<PendingCommit> {
    let target = self.target.clone()?;
    let content = self.input.draft()?.to_string();
    Some(PendingCommit { target, content })
  }
}
