use serde::{Deserialize, Serialize};
use stepwise_config::{IdStrategy, Position};
use tracing::{debug, warn};

use crate::adjacency::Adjacency;
use crate::error::ValidationError;
use crate::ids::IdGenerator;

pub type NodeId = String;
pub type EdgeId = String;

/// A workflow stage on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageNode {
  pub id: NodeId,
  pub position: Position,
  /// Tool name, e.g. "Figma".
  pub label: String,
}

/// A directed sequencing edge: `source` happens before `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
  pub id: EdgeId,
  pub source: NodeId,
  pub target: NodeId,
}

/// Immutable snapshot of the stage graph.
///
/// Mutations take `&self` and return the next snapshot, so a caller may keep
/// older snapshots around (e.g. for undo). Edge mutations are validated and
/// the graph is always acyclic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StageGraph {
  nodes: Vec<StageNode>,
  edges: Vec<Edge>,
  ids: IdGenerator,
}

impl StageGraph {
  /// Create an empty graph minting ids with `strategy`.
  pub fn new(strategy: IdStrategy) -> Self {
    Self {
      nodes: Vec::new(),
      edges: Vec::new(),
      ids: IdGenerator::new(strategy),
    }
  }

  /// Build a graph from existing nodes and edges, validating every edge as
  /// [`StageGraph::add_edge`] would.
  pub fn from_parts(
    strategy: IdStrategy,
    nodes: Vec<StageNode>,
    edges: Vec<Edge>,
  ) -> Result<Self, ValidationError> {
    let mut graph = Self::new(strategy);

    for node in nodes {
      if graph.contains_node(&node.id) || graph.contains_edge(&node.id) {
        return Err(ValidationError::DuplicateNode(node.id));
      }
      graph.ids.reserve(&node.id);
      graph.nodes.push(node);
    }

    for edge in edges {
      if graph.contains_edge(&edge.id) || graph.contains_node(&edge.id) {
        return Err(ValidationError::DuplicateEdgeId(edge.id));
      }
      graph.validate_edge(&edge.source, &edge.target, None)?;
      graph.ids.reserve(&edge.id);
      graph.edges.push(edge);
    }

    Ok(graph)
  }

  /// Nodes in insertion order.
  pub fn nodes(&self) -> &[StageNode] {
    &self.nodes
  }

  /// Edges in insertion order.
  pub fn edges(&self) -> &[Edge] {
    &self.edges
  }

  pub fn node(&self, node_id: &str) -> Option<&StageNode> {
    self.nodes.iter().find(|n| n.id == node_id)
  }

  pub fn edge(&self, edge_id: &str) -> Option<&Edge> {
    self.edges.iter().find(|e| e.id == edge_id)
  }

  pub fn contains_node(&self, node_id: &str) -> bool {
    self.nodes.iter().any(|n| n.id == node_id)
  }

  pub fn contains_edge(&self, edge_id: &str) -> bool {
    self.edges.iter().any(|e| e.id == edge_id)
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Mint an id that no node or edge uses.
  ///
  /// Meant for building the next snapshot from a clone; snapshots already
  /// handed out are never touched.
  pub fn mint_id(&mut self) -> String {
    let Self { nodes, edges, ids } = self;
    ids.next_free_id(|id| nodes.iter().any(|n| n.id == id) || edges.iter().any(|e| e.id == id))
  }

  /// Make sure `id` is never minted.
  pub fn reserve_id(&mut self, id: &str) {
    self.ids.reserve(id);
  }

  /// Whether two snapshots have the same nodes and edges, ignoring the id
  /// generator state.
  pub fn same_topology(&self, other: &StageGraph) -> bool {
    self.nodes == other.nodes && self.edges == other.edges
  }

  /// Build the adjacency index.
  pub fn adjacency(&self) -> Adjacency<'_> {
    Adjacency::new(self)
  }

  /// Append a node. Always succeeds.
  pub fn add_node(&self, position: Position, label: impl Into<String>) -> (Self, NodeId) {
    let mut next = self.clone();
    let id = next.mint_id();
    next.nodes.push(StageNode {
      id: id.clone(),
      position,
      label: label.into(),
    });
    debug!(node_id = %id, "node added");
    (next, id)
  }

  /// Remove a node and every edge touching it. No-op if the node is absent.
  pub fn remove_node(&self, node_id: &str) -> Self {
    if !self.contains_node(node_id) {
      return self.clone();
    }

    let mut next = self.clone();
    next.nodes.retain(|n| n.id != node_id);
    let before = next.edges.len();
    next
      .edges
      .retain(|e| e.source != node_id && e.target != node_id);
    debug!(
      node_id = %node_id,
      removed_edges = before - next.edges.len(),
      "node removed"
    );
    next
  }

  /// Move a node on the canvas. No-op if the node is absent.
  pub fn move_node(&self, node_id: &str, position: Position) -> Self {
    let mut next = self.clone();
    if let Some(node) = next.nodes.iter_mut().find(|n| n.id == node_id) {
      node.position = position;
    }
    next
  }

  /// Add an edge `source -> target`.
  ///
  /// Rejected when it would be a self loop, an endpoint is missing, the pair
  /// is already connected or `target` already reaches `source`.
  pub fn add_edge(&self, source: &str, target: &str) -> Result<(Self, EdgeId), ValidationError> {
    if let Err(e) = self.validate_edge(source, target, None) {
      warn!(source = %source, target = %target, error = %e, "edge rejected");
      return Err(e);
    }

    let mut next = self.clone();
    let id = next.mint_id();
    next.edges.push(Edge {
      id: id.clone(),
      source: source.to_string(),
      target: target.to_string(),
    });
    debug!(edge_id = %id, source = %source, target = %target, "edge added");
    Ok((next, id))
  }

  /// Remove an edge. No-op if absent.
  pub fn remove_edge(&self, edge_id: &str) -> Self {
    let mut next = self.clone();
    next.edges.retain(|e| e.id != edge_id);
    next
  }

  /// Point an existing edge at new endpoints.
  ///
  /// Validated like [`StageGraph::add_edge`] with the edge itself left out.
  /// The edge keeps its id and its place in the edge list.
  pub fn rewire_edge(
    &self,
    edge_id: &str,
    new_source: &str,
    new_target: &str,
  ) -> Result<Self, ValidationError> {
    let Some(index) = self.edges.iter().position(|e| e.id == edge_id) else {
      return Err(ValidationError::EdgeNotFound(edge_id.to_string()));
    };

    if let Err(e) = self.validate_edge(new_source, new_target, Some(edge_id)) {
      warn!(
        edge_id = %edge_id,
        source = %new_source,
        target = %new_target,
        error = %e,
        "edge rewire rejected"
      );
      return Err(e);
    }

    let mut next = self.clone();
    next.edges[index].source = new_source.to_string();
    next.edges[index].target = new_target.to_string();
    debug!(edge_id = %edge_id, source = %new_source, target = %new_target, "edge rewired");
    Ok(next)
  }

  /// Check an edge candidate against the current graph, optionally ignoring
  /// one existing edge (the one being rewired).
  fn validate_edge(
    &self,
    source: &str,
    target: &str,
    ignore: Option<&str>,
  ) -> Result<(), ValidationError> {
    if source == target {
      return Err(ValidationError::SelfLoop {
        node_id: source.to_string(),
      });
    }
    for endpoint in [source, target] {
      if !self.contains_node(endpoint) {
        return Err(ValidationError::NodeNotFound(endpoint.to_string()));
      }
    }

    let duplicate = self
      .edges
      .iter()
      .filter(|e| Some(e.id.as_str()) != ignore)
      .any(|e| e.source == source && e.target == target);
    if duplicate {
      return Err(ValidationError::DuplicateEdge {
        from: source.to_string(),
        to: target.to_string(),
      });
    }

    let adjacency = match ignore {
      Some(edge_id) => Adjacency::without_edge(self, edge_id),
      None => Adjacency::new(self),
    };
    if adjacency.reaches(target, source) {
      return Err(ValidationError::CycleDetected {
        from: source.to_string(),
        to: target.to_string(),
      });
    }

    Ok(())
  }
}
