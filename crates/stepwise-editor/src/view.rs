//! Render-ready projection of the editor state.

use serde::Serialize;
use stepwise_config::{BlockType, Position};
use stepwise_document::{Block, BlockId, PromptPair};
use stepwise_graph::{Edge, Lineage, NodeId, StepOrder};

use crate::focus::FocusTarget;
use crate::workflow::Workflow;

/// Everything a canvas needs to draw the workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorView {
  pub title: Option<String>,
  /// Visible steps in render order.
  pub steps: Vec<StepView>,
  /// Edges between visible steps.
  pub edges: Vec<Edge>,
  pub focus: Option<FocusTarget>,
  pub selected: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
  pub node_id: NodeId,
  /// Tool label.
  pub label: String,
  /// e.g. "Step 2-1".
  pub step_label: String,
  /// e.g. "Step.2-1".
  pub display_label: String,
  pub level: usize,
  pub position: Position,
  pub blocks: Vec<BlockView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockView {
  pub id: BlockId,
  #[serde(rename = "type")]
  pub block_type: BlockType,
  pub content: BlockContent,
}

/// Block content decoded for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockContent {
  Text { text: String },
  Prompt(PromptPair),
  /// An image slot; `src` is `None` until something is placed in it.
  Image { src: Option<String> },
}

impl From<&Block> for BlockView {
  fn from(block: &Block) -> Self {
    let content = match block.block_type {
      BlockType::Prompt => BlockContent::Prompt(PromptPair::decode(&block.content)),
      BlockType::Image => BlockContent::Image {
        src: Some(block.content.clone()).filter(|s| !s.is_empty()),
      },
      _ => BlockContent::Text {
        text: block.content.clone(),
      },
    };
    Self {
      id: block.id.clone(),
      block_type: block.block_type,
      content,
    }
  }
}

impl EditorView {
  pub(crate) fn build(
    workflow: &Workflow,
    steps: &StepOrder,
    lineage: &Lineage,
    focus: Option<&FocusTarget>,
    selected: Option<&str>,
  ) -> Self {
    let graph = workflow.graph();

    let steps: Vec<StepView> = lineage
      .filter(steps.iter(), |step| step.node_id.as_str())
      .into_iter()
      .filter_map(|step| {
        let node = graph.node(&step.node_id)?;
        let blocks = workflow
          .document(&step.node_id)
          .map(|doc| doc.blocks().iter().map(BlockView::from).collect())
          .unwrap_or_default();
        Some(StepView {
          node_id: node.id.clone(),
          label: node.label.clone(),
          step_label: step.label.clone(),
          display_label: step.display_label(),
          level: step.level,
          position: node.position,
          blocks,
        })
      })
      .collect();

    let edges = graph
      .edges()
      .iter()
      .filter(|e| lineage.contains(&e.source) && lineage.contains(&e.target))
      .cloned()
      .collect();

    Self {
      title: workflow.title().map(str::to_string),
      steps,
      edges,
      focus: focus.cloned(),
      selected: selected.map(str::to_string),
    }
  }

  pub fn step(&self, node_id: &str) -> Option<&StepView> {
    self.steps.iter().find(|s| s.node_id == node_id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_prompt_block_is_decoded() {
    let block = Block::new("p", BlockType::Prompt, r#"{"input":"a","output":"b"}"#);
    let view = BlockView::from(&block);
    assert_eq!(view.content, BlockContent::Prompt(PromptPair::new("a", "b")));
  }

  #[test]
  fn test_legacy_prompt_content_becomes_input() {
    let block = Block::new("p", BlockType::Prompt, "plain text");
    let view = BlockView::from(&block);
    assert_eq!(
      view.content,
      BlockContent::Prompt(PromptPair::new("plain text", ""))
    );
  }

  #[test]
  fn test_empty_image_has_no_src() {
    let block = Block::new("i", BlockType::Image, "");
    assert_eq!(
      BlockView::from(&block).content,
      BlockContent::Image { src: None }
    );
  }
}
