//! Commands accepted by [`crate::Editor::dispatch`].

use serde::{Deserialize, Serialize};
use stepwise_config::{BlockType, Position};
use stepwise_document::PromptField;
use stepwise_graph::{EdgeId, NodeId};

use crate::input::InputEvent;

/// One user intent. Commands are serde-tagged so a session can be replayed
/// from a JSON script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
  /// Drop a tool onto the canvas. `label` wins over the catalog name of
  /// `tool` when both are given.
  AddNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default)]
    position: Position,
  },
  RemoveNode {
    node_id: NodeId,
  },
  MoveNode {
    node_id: NodeId,
    position: Position,
  },
  AddEdge {
    source: NodeId,
    target: NodeId,
  },
  RemoveEdge {
    edge_id: EdgeId,
  },
  RewireEdge {
    edge_id: EdgeId,
    new_source: NodeId,
    new_target: NodeId,
  },
  /// Apply a block type to the focused block.
  Toolbar {
    action: BlockType,
  },
  /// Node click: narrow the view to the node's lineage and focus its first
  /// block.
  SelectNode {
    node_id: NodeId,
  },
  ClearSelection,
  FocusBlock {
    node_id: NodeId,
    index: usize,
  },
  /// A raw input event on a block. Focuses the block first if needed.
  Block {
    node_id: NodeId,
    index: usize,
    event: InputEvent,
  },
  SetContent {
    node_id: NodeId,
    index: usize,
    content: String,
  },
  SetPromptField {
    node_id: NodeId,
    index: usize,
    field: PromptField,
    value: String,
  },
  /// Click below the last block of a node.
  ClickTail {
    node_id: NodeId,
  },
  SetTitle {
    #[serde(default)]
    title: Option<String>,
  },
}

/// Result of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// The command was valid but changed nothing.
  Unchanged,
  Updated,
  NodeCreated(NodeId),
  EdgeCreated(EdgeId),
}
