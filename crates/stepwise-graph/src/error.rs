use thiserror::Error;

/// Reasons a graph mutation is rejected. The graph is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("node not found: {0}")]
  NodeNotFound(String),

  #[error("edge not found: {0}")]
  EdgeNotFound(String),

  #[error("duplicate node id: {0}")]
  DuplicateNode(String),

  #[error("duplicate edge id: {0}")]
  DuplicateEdgeId(String),

  #[error("edge cannot connect a node to itself: {node_id}")]
  SelfLoop { node_id: String },

  #[error("edge already exists: from={from}, to={to}")]
  DuplicateEdge { from: String, to: String },

  #[error("edge would create a cycle: from={from}, to={to}")]
  CycleDetected { from: String, to: String },
}
