//! Editor errors.

use stepwise_document::DocumentError;
use stepwise_graph::ValidationError;

/// Errors that can occur while loading a stored record.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
  /// The nodes or edges do not form a valid graph.
  #[error("invalid graph: {0}")]
  Graph(#[from] ValidationError),

  /// A node's block list is unusable.
  #[error("invalid document for node '{node_id}'")]
  Document {
    node_id: String,
    #[source]
    source: DocumentError,
  },
}

/// Errors returned by [`crate::Editor::dispatch`].
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
  /// An edge request was rejected; the workflow is unchanged.
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("node '{0}' not found")]
  NodeNotFound(String),

  #[error("block {index} not found in node '{node_id}'")]
  BlockNotFound { node_id: String, index: usize },

  /// A toolbar action arrived while no block had focus.
  #[error("no block is focused; select a block before using the toolbar")]
  NoActiveBlock,

  #[error("unknown tool: {0}")]
  UnknownTool(String),

  #[error("a node needs a tool or a label")]
  MissingLabel,
}
