//! Step leveling.
//!
//! Every node gets a level: roots are level 1 and a node sits one level below
//! its deepest parent. Nodes sharing a level are ranked top to bottom by their
//! canvas position and labelled `Step {level}-{rank}`; a node alone on its
//! level is just `Step {level}`.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;
use tracing::warn;

use crate::graph::{NodeId, StageGraph};

/// A node's place in the step order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
  pub node_id: NodeId,
  /// 1-based topological depth.
  pub level: usize,
  /// 1-based position among the nodes sharing `level`.
  pub rank: usize,
  /// Number of nodes sharing `level`.
  pub group_size: usize,
  /// `Step 2` or `Step 2-1`.
  pub label: String,
}

impl Step {
  /// Label as shown in the document pane: `Step 2-1` becomes `Step.2-1`.
  pub fn display_label(&self) -> String {
    self.label.replacen(' ', ".", 1)
  }
}

/// Steps in render order: level ascending, then vertical position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepOrder {
  steps: Vec<Step>,
  #[serde(skip)]
  index: HashMap<NodeId, usize>,
}

impl StepOrder {
  pub fn steps(&self) -> &[Step] {
    &self.steps
  }

  pub fn iter(&self) -> impl Iterator<Item = &Step> {
    self.steps.iter()
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  pub fn get(&self, node_id: &str) -> Option<&Step> {
    self.index.get(node_id).map(|&i| &self.steps[i])
  }

  pub fn level(&self, node_id: &str) -> Option<usize> {
    self.get(node_id).map(|step| step.level)
  }

  pub fn label(&self, node_id: &str) -> Option<&str> {
    self.get(node_id).map(|step| step.label.as_str())
  }
}

/// Compute levels, labels and render order for every node of `graph`.
///
/// Levels follow Kahn's algorithm: a node is finalized once all of its
/// parents are, so every node is dequeued at most once and
/// `level(target) > level(source)` holds for every edge. On cyclic input the
/// nodes on or behind a cycle are never finalized; they keep the deepest level
/// seen from finalized parents (or 1) and a warning is logged.
pub fn level_graph(graph: &StageGraph) -> StepOrder {
  let adjacency = graph.adjacency();

  let mut remaining: HashMap<&str, usize> = graph
    .nodes()
    .iter()
    .map(|node| (node.id.as_str(), adjacency.in_degree(&node.id)))
    .collect();
  let mut levels: HashMap<&str, usize> = HashMap::new();
  let mut queue: VecDeque<&str> = VecDeque::new();

  for &root in adjacency.roots() {
    levels.insert(root, 1);
    queue.push_back(root);
  }

  let mut finalized = 0usize;
  while let Some(id) = queue.pop_front() {
    finalized += 1;
    let level = levels.get(id).copied().unwrap_or(1);

    for &child in adjacency.downstream(id) {
      let child_level = levels.entry(child).or_insert(0);
      *child_level = (*child_level).max(level + 1);

      if let Some(count) = remaining.get_mut(child) {
        *count = count.saturating_sub(1);
        if *count == 0 {
          queue.push_back(child);
        }
      }
    }
  }

  if finalized < graph.nodes().len() {
    warn!(
      unresolved = graph.nodes().len() - finalized,
      "stage graph contains a cycle, levels are partial"
    );
  }

  // (graph index, level, y) sorted by level then y; the stable sort keeps
  // graph order for ties.
  let mut placed: Vec<(usize, usize, f64)> = graph
    .nodes()
    .iter()
    .enumerate()
    .map(|(i, node)| {
      let level = levels
        .get(node.id.as_str())
        .copied()
        .filter(|&l| l > 0)
        .unwrap_or(1);
      (i, level, node.position.y)
    })
    .collect();
  placed.sort_by(|a, b| a.1.cmp(&b.1).then(a.2.total_cmp(&b.2)));

  let mut steps = Vec::with_capacity(placed.len());
  for group in placed.chunk_by(|a, b| a.1 == b.1) {
    let group_size = group.len();
    for (rank, &(i, level, _)) in group.iter().enumerate() {
      let rank = rank + 1;
      let label = if group_size > 1 {
        format!("Step {}-{}", level, rank)
      } else {
        format!("Step {}", level)
      };
      steps.push(Step {
        node_id: graph.nodes()[i].id.clone(),
        level,
        rank,
        group_size,
        label,
      });
    }
  }

  let index = steps
    .iter()
    .enumerate()
    .map(|(i, step)| (step.node_id.clone(), i))
    .collect();

  StepOrder { steps, index }
}
