//! The editable workflow snapshot.
//!
//! A [`Workflow`] pairs the stage graph with the block documents of its
//! nodes. The two live in separate structures keyed by the same node id, so
//! graph algorithms never see block content. Every operation returns a new
//! snapshot and leaves `self` untouched.

use std::collections::HashMap;

use stepwise_config::{BlockType, EdgeDef, EditorConfig, NodeDef, Position, WorkflowDef};
use stepwise_document::{Block, BlockDocument, BlockId, PromptField, SplitTarget};
use stepwise_graph::{Edge, EdgeId, NodeId, StageGraph, StageNode, ValidationError};
use tracing::debug;

use crate::error::RecordError;
use crate::focus::FocusTarget;

#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
  title: Option<String>,
  graph: StageGraph,
  documents: HashMap<NodeId, BlockDocument>,
}

impl Workflow {
  /// An empty workflow.
  pub fn new(config: &EditorConfig) -> Self {
    Self {
      title: None,
      graph: StageGraph::new(config.ids.clone()),
      documents: HashMap::new(),
    }
  }

  /// Load a stored record.
  ///
  /// Every edge is validated as if it were added by hand, so a record with a
  /// cycle, a dangling endpoint or a duplicate is refused. Every node must
  /// carry at least one block.
  pub fn from_record(def: WorkflowDef, config: &EditorConfig) -> Result<Self, RecordError> {
    let mut nodes = Vec::with_capacity(def.nodes.len());
    let mut documents = HashMap::with_capacity(def.nodes.len());
    let mut block_ids: Vec<BlockId> = Vec::new();

    for node in def.nodes {
      let blocks: Vec<Block> = node.blocks.into_iter().map(Block::from).collect();
      block_ids.extend(blocks.iter().map(|b| b.id.clone()));
      let document =
        BlockDocument::from_blocks(blocks).map_err(|source| RecordError::Document {
          node_id: node.id.clone(),
          source,
        })?;
      documents.insert(node.id.clone(), document);
      nodes.push(StageNode {
        id: node.id,
        position: node.position,
        label: node.label,
      });
    }

    let edges = def
      .edges
      .into_iter()
      .map(|e| Edge {
        id: e.id,
        source: e.source,
        target: e.target,
      })
      .collect();

    let mut graph = StageGraph::from_parts(config.ids.clone(), nodes, edges)?;
    for id in &block_ids {
      graph.reserve_id(id);
    }

    debug!(
      nodes = graph.nodes().len(),
      edges = graph.edges().len(),
      blocks = block_ids.len(),
      "workflow record loaded"
    );

    Ok(Self {
      title: def.title,
      graph,
      documents,
    })
  }

  /// The plain record, in graph order.
  pub fn to_record(&self) -> WorkflowDef {
    let nodes = self
      .graph
      .nodes()
      .iter()
      .map(|node| NodeDef {
        id: node.id.clone(),
        position: node.position,
        label: node.label.clone(),
        blocks: self
          .documents
          .get(&node.id)
          .map(|doc| doc.blocks().iter().cloned().map(Into::into).collect())
          .unwrap_or_default(),
      })
      .collect();

    let edges = self
      .graph
      .edges()
      .iter()
      .map(|e| EdgeDef {
        id: e.id.clone(),
        source: e.source.clone(),
        target: e.target.clone(),
      })
      .collect();

    WorkflowDef {
      title: self.title.clone(),
      nodes,
      edges,
    }
  }

  pub fn title(&self) -> Option<&str> {
    self.title.as_deref()
  }

  pub fn graph(&self) -> &StageGraph {
    &self.graph
  }

  pub fn document(&self, node_id: &str) -> Option<&BlockDocument> {
    self.documents.get(node_id)
  }

  pub fn block(&self, node_id: &str, index: usize) -> Option<&Block> {
    self.document(node_id).and_then(|doc| doc.get(index))
  }

  pub fn contains_node(&self, node_id: &str) -> bool {
    self.graph.contains_node(node_id)
  }

  pub fn with_title(&self, title: Option<String>) -> Self {
    Self {
      title,
      ..self.clone()
    }
  }

  // Graph edits.

  /// Add a stage holding one empty body block.
  pub fn add_node(&self, position: Position, label: impl Into<String>) -> (Self, NodeId) {
    let (graph, node_id) = self.graph.add_node(position, label);
    let mut next = Self {
      graph,
      ..self.clone()
    };
    let block_id = next.mint_block_id();
    next
      .documents
      .insert(node_id.clone(), BlockDocument::new(Block::body(block_id)));
    (next, node_id)
  }

  /// Remove a stage, its edges and its document. No-op if absent.
  pub fn remove_node(&self, node_id: &str) -> Self {
    let mut next = Self {
      graph: self.graph.remove_node(node_id),
      ..self.clone()
    };
    next.documents.remove(node_id);
    next
  }

  pub fn move_node(&self, node_id: &str, position: Position) -> Self {
    Self {
      graph: self.graph.move_node(node_id, position),
      ..self.clone()
    }
  }

  pub fn add_edge(&self, source: &str, target: &str) -> Result<(Self, EdgeId), ValidationError> {
    let (graph, edge_id) = self.graph.add_edge(source, target)?;
    Ok((
      Self {
        graph,
        ..self.clone()
      },
      edge_id,
    ))
  }

  pub fn remove_edge(&self, edge_id: &str) -> Self {
    Self {
      graph: self.graph.remove_edge(edge_id),
      ..self.clone()
    }
  }

  pub fn rewire_edge(
    &self,
    edge_id: &str,
    new_source: &str,
    new_target: &str,
  ) -> Result<Self, ValidationError> {
    let graph = self.graph.rewire_edge(edge_id, new_source, new_target)?;
    Ok(Self {
      graph,
      ..self.clone()
    })
  }

  // Document edits. An unknown node or block index leaves the snapshot as is.

  pub fn set_content(&self, node_id: &str, index: usize, content: impl Into<String>) -> Self {
    self.edit_document(node_id, |doc, _| {
      doc.set_content(index, content);
    })
  }

  /// Split a block (or append one) and report where focus goes next.
  pub fn split_block(
    &self,
    node_id: &str,
    target: SplitTarget,
    before: impl Into<String>,
    after: impl Into<String>,
  ) -> (Self, Option<FocusTarget>) {
    let mut focus = None;
    let next = self.edit_document(node_id, |doc, new_id| {
      focus = doc.split_at(target, before, after, new_id);
    });
    (next, focus.map(|index| FocusTarget::new(node_id, index)))
  }

  /// Remove a block (clearing it when it is the last one) and report where
  /// focus goes next. `None` means focus stays where it is.
  pub fn remove_block(&self, node_id: &str, index: usize) -> (Self, Option<FocusTarget>) {
    let mut focus = None;
    let next = self.edit_document(node_id, |doc, _| {
      focus = doc.remove_at(index).focus();
    });
    (next, focus.map(|index| FocusTarget::new(node_id, index)))
  }

  /// Apply a toolbar block type to a block.
  pub fn convert_block(&self, node_id: &str, index: usize, block_type: BlockType) -> Self {
    self.edit_document(node_id, |doc, new_id| {
      doc.convert_type(index, block_type, new_id);
    })
  }

  pub fn update_prompt_field(
    &self,
    node_id: &str,
    index: usize,
    field: PromptField,
    value: impl Into<String>,
  ) -> Self {
    self.edit_document(node_id, |doc, _| {
      doc.update_prompt_field(index, field, value);
    })
  }

  /// Run `edit` against a copy of one node's document. `edit` receives a
  /// fresh block id in case it inserts a block.
  fn edit_document<F>(&self, node_id: &str, edit: F) -> Self
  where
    F: FnOnce(&mut BlockDocument, BlockId),
  {
    if !self.documents.contains_key(node_id) {
      return self.clone();
    }

    let mut next = self.clone();
    let new_id = next.mint_block_id();
    if let Some(doc) = next.documents.get_mut(node_id) {
      edit(doc, new_id);
    }

    // Nothing changed: hand back the prior state, id counter included.
    if next.documents.get(node_id) == self.documents.get(node_id) {
      return self.clone();
    }
    next
  }

  fn mint_block_id(&mut self) -> BlockId {
    loop {
      let id = self.graph.mint_id();
      if !self.documents.values().any(|doc| doc.contains_id(&id)) {
        return id;
      }
    }
  }
}
