use std::collections::{HashMap, HashSet};

use crate::graph::StageGraph;

/// Borrowed adjacency index over a [`StageGraph`] for traversal.
///
/// Neighbour lists follow edge insertion order. Edges whose endpoints are
/// not nodes of the graph are left out.
#[derive(Debug, Clone)]
pub struct Adjacency<'a> {
  /// node_id -> downstream node_ids.
  downstream: HashMap<&'a str, Vec<&'a str>>,
  /// node_id -> upstream node_ids.
  upstream: HashMap<&'a str, Vec<&'a str>>,
  /// Nodes with no incoming edges, in node order.
  roots: Vec<&'a str>,
}

impl<'a> Adjacency<'a> {
  pub fn new(graph: &'a StageGraph) -> Self {
    Self::build(graph, None)
  }

  /// Build the index as if the edge `skip_edge` were absent.
  pub(crate) fn without_edge(graph: &'a StageGraph, skip_edge: &str) -> Self {
    Self::build(graph, Some(skip_edge))
  }

  fn build(graph: &'a StageGraph, skip_edge: Option<&str>) -> Self {
    let mut downstream: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut upstream: HashMap<&str, Vec<&str>> = HashMap::new();

    for node in graph.nodes() {
      downstream.entry(node.id.as_str()).or_default();
      upstream.entry(node.id.as_str()).or_default();
    }

    for edge in graph.edges() {
      if skip_edge == Some(edge.id.as_str()) {
        continue;
      }
      let (from, to) = (edge.source.as_str(), edge.target.as_str());
      if !downstream.contains_key(from) || !upstream.contains_key(to) {
        continue;
      }
      if let Some(children) = downstream.get_mut(from) {
        children.push(to);
      }
      if let Some(parents) = upstream.get_mut(to) {
        parents.push(from);
      }
    }

    let roots = graph
      .nodes()
      .iter()
      .map(|node| node.id.as_str())
      .filter(|id| upstream.get(id).is_none_or(|v| v.is_empty()))
      .collect();

    Self {
      downstream,
      upstream,
      roots,
    }
  }

  /// Nodes with no incoming edges.
  pub fn roots(&self) -> &[&'a str] {
    &self.roots
  }

  /// Get downstream nodes for a given node.
  pub fn downstream(&self, node_id: &str) -> &[&'a str] {
    self
      .downstream
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Get upstream nodes for a given node.
  pub fn upstream(&self, node_id: &str) -> &[&'a str] {
    self
      .upstream
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Number of incoming edges.
  pub fn in_degree(&self, node_id: &str) -> usize {
    self.upstream(node_id).len()
  }

  /// Every node reachable from `start` along downstream edges, excluding
  /// `start` unless a path leads back to it.
  pub fn descendants(&self, start: &str) -> HashSet<&'a str> {
    walk(start, |id| self.downstream(id))
  }

  /// Every node that reaches `start`, excluding `start` unless a path leads
  /// back to it.
  pub fn ancestors(&self, start: &str) -> HashSet<&'a str> {
    walk(start, |id| self.upstream(id))
  }

  /// Whether a directed path leads from `from` to `to`.
  pub fn reaches(&self, from: &str, to: &str) -> bool {
    from == to || self.descendants(from).contains(to)
  }
}

/// Guarded depth-first walk. The visited set bounds the work even on cyclic
/// input.
fn walk<'a, 'b, F>(start: &str, next: F) -> HashSet<&'a str>
where
  F: Fn(&str) -> &'b [&'a str],
  'a: 'b,
{
  let mut visited: HashSet<&'a str> = HashSet::new();
  let mut stack: Vec<&'a str> = next(start).to_vec();

  while let Some(id) = stack.pop() {
    if visited.insert(id) {
      stack.extend(next(id).iter().copied());
    }
  }

  visited
}
