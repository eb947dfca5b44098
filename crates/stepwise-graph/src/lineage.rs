use std::collections::HashSet;

use crate::graph::{NodeId, StageGraph};

/// The set of nodes visible for a focal node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lineage {
  /// No focal node (or an unknown one): everything is visible.
  All,
  /// The focal node with every ancestor and descendant.
  Focused {
    focal: NodeId,
    ancestors: HashSet<NodeId>,
    descendants: HashSet<NodeId>,
  },
}

impl Lineage {
  pub fn focal(&self) -> Option<&str> {
    match self {
      Lineage::All => None,
      Lineage::Focused { focal, .. } => Some(focal),
    }
  }

  pub fn is_all(&self) -> bool {
    matches!(self, Lineage::All)
  }

  /// Whether `node_id` is visible.
  pub fn contains(&self, node_id: &str) -> bool {
    match self {
      Lineage::All => true,
      Lineage::Focused {
        focal,
        ancestors,
        descendants,
      } => focal == node_id || ancestors.contains(node_id) || descendants.contains(node_id),
    }
  }

  /// Keep the visible items of an ordered sequence, preserving its order.
  pub fn filter<T, F>(&self, items: impl IntoIterator<Item = T>, node_id: F) -> Vec<T>
  where
    F: Fn(&T) -> &str,
  {
    items
      .into_iter()
      .filter(|item| self.contains(node_id(item)))
      .collect()
  }
}

/// Collect the lineage of `focal`.
///
/// Ancestors and descendants are walked independently, each with its own
/// visited set, so the walk terminates even if handed a cyclic graph.
pub fn lineage(graph: &StageGraph, focal: Option<&str>) -> Lineage {
  let Some(focal) = focal.filter(|id| graph.contains_node(id)) else {
    return Lineage::All;
  };

  let adjacency = graph.adjacency();
  let owned = |set: HashSet<&str>| -> HashSet<NodeId> {
    set
      .into_iter()
      .filter(|id| *id != focal)
      .map(str::to_string)
      .collect()
  };

  Lineage::Focused {
    focal: focal.to_string(),
    ancestors: owned(adjacency.ancestors(focal)),
    descendants: owned(adjacency.descendants(focal)),
  }
}

#[cfg(test)]
mod tests {
  use stepwise_config::{IdStrategy, Position};

  use super::*;
  use crate::graph::{Edge, StageNode};

  fn build(ids: &[&str], edges: &[(&str, &str)]) -> StageGraph {
    let nodes = ids
      .iter()
      .map(|id| StageNode {
        id: id.to_string(),
        position: Position::default(),
        label: id.to_string(),
      })
      .collect();
    let edges = edges
      .iter()
      .map(|(s, t)| Edge {
        id: format!("{s}{t}"),
        source: s.to_string(),
        target: t.to_string(),
      })
      .collect();
    StageGraph::from_parts(IdStrategy::Uuid, nodes, edges).unwrap()
  }

  #[test]
  fn test_no_focal_is_identity() {
    let graph = build(&["a", "b"], &[]);
    assert!(lineage(&graph, None).is_all());
    assert!(lineage(&graph, Some("ghost")).is_all());
  }

  #[test]
  fn test_lineage_excludes_siblings() {
    // a -> b -> d, a -> c, e isolated
    let graph = build(
      &["a", "b", "c", "d", "e"],
      &[("a", "b"), ("b", "d"), ("a", "c")],
    );
    let visible = lineage(&graph, Some("b"));

    assert_eq!(visible.focal(), Some("b"));
    for id in ["a", "b", "d"] {
      assert!(visible.contains(id), "{id} should be visible");
    }
    for id in ["c", "e"] {
      assert!(!visible.contains(id), "{id} should be hidden");
    }
  }

  #[test]
  fn test_members_are_connected_to_focal() {
    let graph = build(
      &["a", "b", "c", "d", "e", "f"],
      &[("a", "c"), ("b", "c"), ("c", "d"), ("d", "e"), ("b", "f")],
    );
    let adjacency = graph.adjacency();
    let visible = lineage(&graph, Some("c"));

    for node in graph.nodes() {
      if visible.contains(&node.id) && node.id != "c" {
        assert!(adjacency.reaches(&node.id, "c") || adjacency.reaches("c", &node.id));
      }
    }
    assert!(!visible.contains("f"));
  }

  #[test]
  fn test_filter_preserves_order() {
    let graph = build(&["a", "b", "c"], &[("a", "c")]);
    let visible = lineage(&graph, Some("c"));
    let kept = visible.filter(vec!["c", "b", "a"], |id| *id);
    assert_eq!(kept, vec!["c", "a"]);
  }
}
