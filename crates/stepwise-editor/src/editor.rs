//! The editing session.

use stepwise_config::{BlockType, EditorConfig, find_tool};
use stepwise_document::{Block, SplitTarget};
use stepwise_graph::{Lineage, NodeId, StageGraph, StepOrder, level_graph, lineage};
use tracing::{debug, instrument};

use crate::command::{EditorCommand, Outcome};
use crate::error::EditorError;
use crate::events::{EditorEvent, EditorNotifier, NoopNotifier};
use crate::focus::{FocusController, FocusTarget, PendingCommit};
use crate::input::{InputAction, InputEvent};
use crate::view::EditorView;
use crate::workflow::Workflow;

/// Owns the current workflow snapshot and everything derived from it.
///
/// All changes go through [`Editor::dispatch`]. Each command builds a new
/// snapshot, installs it, and then refreshes focus, the step order and the
/// lineage filter before returning, so the derived state is never stale.
pub struct Editor<N: EditorNotifier = NoopNotifier> {
  config: EditorConfig,
  workflow: Workflow,
  focus: FocusController,
  selected: Option<NodeId>,
  steps: StepOrder,
  /// Graph the step order was computed from.
  steps_graph: StageGraph,
  lineage: Lineage,
  notifier: N,
}

impl Editor<NoopNotifier> {
  /// Start with an empty workflow.
  pub fn new(config: EditorConfig) -> Self {
    let workflow = Workflow::new(&config);
    Self::with_notifier(config, workflow, NoopNotifier)
  }

  pub fn from_workflow(config: EditorConfig, workflow: Workflow) -> Self {
    Self::with_notifier(config, workflow, NoopNotifier)
  }
}

impl<N: EditorNotifier> Editor<N> {
  pub fn with_notifier(config: EditorConfig, workflow: Workflow, notifier: N) -> Self {
    let steps = level_graph(workflow.graph());
    let steps_graph = workflow.graph().clone();
    Self {
      config,
      workflow,
      focus: FocusController::new(),
      selected: None,
      steps,
      steps_graph,
      lineage: Lineage::All,
      notifier,
    }
  }

  pub fn workflow(&self) -> &Workflow {
    &self.workflow
  }

  /// A copy of the current snapshot, e.g. for an undo stack.
  pub fn snapshot(&self) -> Workflow {
    self.workflow.clone()
  }

  /// Install an earlier snapshot. Focus and selection are reconciled
  /// against it.
  pub fn restore(&mut self, workflow: Workflow) {
    self.focus.blur();
    self.workflow = workflow;
    self.refresh();
  }

  pub fn focus(&self) -> &FocusController {
    &self.focus
  }

  pub fn selected(&self) -> Option<&str> {
    self.selected.as_deref()
  }

  pub fn steps(&self) -> &StepOrder {
    &self.steps
  }

  pub fn lineage(&self) -> &Lineage {
    &self.lineage
  }

  pub fn view(&self) -> EditorView {
    EditorView::build(
      &self.workflow,
      &self.steps,
      &self.lineage,
      self.focus.target(),
      self.selected.as_deref(),
    )
  }

  /// Apply one command.
  ///
  /// A failed command leaves the workflow as it was.
  #[instrument(name = "editor_dispatch", skip(self), level = "debug")]
  pub fn dispatch(&mut self, command: EditorCommand) -> Result<Outcome, EditorError> {
    let focus_before = self.focus.target().cloned();
    let result = self.apply(command);
    self.refresh();

    if self.focus.target() != focus_before.as_ref() {
      self.notifier.notify(EditorEvent::FocusChanged {
        focus: self.focus.target().cloned(),
      });
    }
    result
  }

  fn apply(&mut self, command: EditorCommand) -> Result<Outcome, EditorError> {
    match command {
      EditorCommand::AddNode {
        tool,
        label,
        position,
      } => {
        let label = match (label.filter(|l| !l.trim().is_empty()), tool) {
          (Some(label), _) => label,
          (None, Some(tool)) => find_tool(&tool)
            .map(|item| item.name.to_string())
            .ok_or(EditorError::UnknownTool(tool))?,
          (None, None) => return Err(EditorError::MissingLabel),
        };
        let (workflow, node_id) = self.workflow.add_node(position, label.clone());
        self.install(workflow);
        self.notifier.notify(EditorEvent::NodeAdded {
          node_id: node_id.clone(),
          label,
        });
        Ok(Outcome::NodeCreated(node_id))
      }

      EditorCommand::RemoveNode { node_id } => {
        self.require_node(&node_id)?;
        let workflow = self.workflow.remove_node(&node_id);
        self.install(workflow);
        self.notifier.notify(EditorEvent::NodeRemoved { node_id });
        Ok(Outcome::Updated)
      }

      EditorCommand::MoveNode { node_id, position } => {
        self.require_node(&node_id)?;
        let workflow = self.workflow.move_node(&node_id, position);
        Ok(self.install_if_changed(workflow))
      }

      EditorCommand::AddEdge { source, target } => {
        match self.workflow.add_edge(&source, &target) {
          Ok((workflow, edge_id)) => {
            self.install(workflow);
            self.notifier.notify(EditorEvent::EdgeAdded {
              edge_id: edge_id.clone(),
              source,
              target,
            });
            Ok(Outcome::EdgeCreated(edge_id))
          }
          Err(err) => {
            self
              .notifier
              .notify(EditorEvent::rejected(&source, &target, &err));
            Err(err.into())
          }
        }
      }

      EditorCommand::RemoveEdge { edge_id } => {
        if !self.workflow.graph().contains_edge(&edge_id) {
          return Ok(Outcome::Unchanged);
        }
        let workflow = self.workflow.remove_edge(&edge_id);
        self.install(workflow);
        self.notifier.notify(EditorEvent::EdgeRemoved { edge_id });
        Ok(Outcome::Updated)
      }

      EditorCommand::RewireEdge {
        edge_id,
        new_source,
        new_target,
      } => match self
        .workflow
        .rewire_edge(&edge_id, &new_source, &new_target)
      {
        Ok(workflow) => {
          self.install(workflow);
          self.notifier.notify(EditorEvent::EdgeRewired {
            edge_id,
            source: new_source,
            target: new_target,
          });
          Ok(Outcome::Updated)
        }
        Err(err) => {
          self
            .notifier
            .notify(EditorEvent::rejected(&new_source, &new_target, &err));
          Err(err.into())
        }
      },

      EditorCommand::Toolbar { action } => self.apply_toolbar(action),

      EditorCommand::SelectNode { node_id } => {
        self.require_node(&node_id)?;
        self.set_selection(Some(node_id.clone()));
        self.focus_to(FocusTarget::new(node_id, 0))?;
        Ok(Outcome::Updated)
      }

      EditorCommand::ClearSelection => {
        if self.selected.is_none() {
          return Ok(Outcome::Unchanged);
        }
        self.set_selection(None);
        Ok(Outcome::Updated)
      }

      EditorCommand::FocusBlock { node_id, index } => {
        self.focus_to(FocusTarget::new(node_id, index))?;
        Ok(Outcome::Updated)
      }

      EditorCommand::Block {
        node_id,
        index,
        event,
      } => self.apply_input(FocusTarget::new(node_id, index), event),

      EditorCommand::SetContent {
        node_id,
        index,
        content,
      } => {
        self.require_node(&node_id)?;
        if self.focus.is_focused(&node_id, index) && !self.focus.input().is_viewing() {
          self.focus.handle(InputEvent::Input {
            text: content.clone(),
          });
        }
        let workflow = self.workflow.set_content(&node_id, index, content);
        Ok(self.install_blocks(&node_id, workflow))
      }

      EditorCommand::SetPromptField {
        node_id,
        index,
        field,
        value,
      } => {
        self.require_node(&node_id)?;
        let is_prompt = self
          .workflow
          .block(&node_id, index)
          .is_some_and(|b| b.block_type == BlockType::Prompt);
        if !is_prompt {
          debug!(node_id = %node_id, index, "prompt field update on a non-prompt block ignored");
          return Ok(Outcome::Unchanged);
        }
        let workflow = self
          .workflow
          .update_prompt_field(&node_id, index, field, value);
        Ok(self.install_blocks(&node_id, workflow))
      }

      EditorCommand::ClickTail { node_id } => {
        self.require_node(&node_id)?;
        let pending = self.focus.blur();
        self.commit(pending);

        let (workflow, next) = self
          .workflow
          .split_block(&node_id, SplitTarget::Append, "", "");
        let outcome = self.install_blocks(&node_id, workflow);
        if let Some(target) = next {
          self.focus_to(target)?;
        }
        Ok(outcome)
      }

      EditorCommand::SetTitle { title } => {
        let workflow = self.workflow.with_title(title);
        Ok(self.install_if_changed(workflow))
      }
    }
  }

  /// Toolbar actions target the focused block. The draft is committed first
  /// so the conversion sees the latest text.
  fn apply_toolbar(&mut self, action: BlockType) -> Result<Outcome, EditorError> {
    let target = self
      .focus
      .target()
      .cloned()
      .ok_or(EditorError::NoActiveBlock)?;

    let pending = self.focus.blur();
    self.commit(pending);

    let workflow =
      self
        .workflow
        .convert_block(&target.node_id, target.block_index, action);
    let outcome = self.install_blocks(&target.node_id, workflow);
    debug!(node_id = %target.node_id, index = target.block_index, action = %action, "toolbar applied");

    self.focus_to(target)?;
    Ok(outcome)
  }

  fn apply_input(&mut self, target: FocusTarget, event: InputEvent) -> Result<Outcome, EditorError> {
    if matches!(event, InputEvent::Focus { .. }) {
      self.focus_to(target)?;
      return Ok(Outcome::Updated);
    }

    let focused = self.focus.is_focused(&target.node_id, target.block_index);
    if !focused || self.focus.input().is_viewing() {
      self.focus_to(target.clone())?;
    }

    let Some(action) = self.focus.handle(event) else {
      return Ok(Outcome::Unchanged);
    };

    let FocusTarget {
      node_id,
      block_index: index,
    } = target;
    match action {
      InputAction::Commit { content } => {
        let workflow = self.workflow.set_content(&node_id, index, content);
        Ok(self.install_blocks(&node_id, workflow))
      }
      InputAction::Split { before, after } => {
        let (workflow, next) =
          self
            .workflow
            .split_block(&node_id, SplitTarget::At(index), before, after);
        let outcome = self.install_blocks(&node_id, workflow);
        if let Some(next) = next {
          self.focus_to(next)?;
        }
        Ok(outcome)
      }
      InputAction::Remove => {
        let (workflow, next) = self.workflow.remove_block(&node_id, index);
        let outcome = self.install_blocks(&node_id, workflow);
        // Removing the first block (or clearing the only one) keeps the
        // caret at the same index.
        let next = next.unwrap_or(FocusTarget::new(node_id, index));
        if self.block(&next).is_some() {
          self.focus_to(next)?;
        }
        Ok(outcome)
      }
    }
  }

  fn focus_to(&mut self, target: FocusTarget) -> Result<(), EditorError> {
    let block = self.require_block(&target)?.clone();
    let pending = self.focus.focus_block(target, &block);
    self.commit(pending);
    Ok(())
  }

  fn commit(&mut self, pending: Option<PendingCommit>) {
    let Some(PendingCommit { target, content }) = pending else {
      return;
    };
    let workflow = self
      .workflow
      .set_content(&target.node_id, target.block_index, content);
    self.install_blocks(&target.node_id, workflow);
  }

  fn set_selection(&mut self, node_id: Option<NodeId>) {
    if self.selected == node_id {
      return;
    }
    debug!(selected = ?node_id, "selection changed");
    self.selected = node_id.clone();
    self
      .notifier
      .notify(EditorEvent::SelectionChanged { node_id });
  }

  fn install(&mut self, workflow: Workflow) {
    self.workflow = workflow;
  }

  fn install_if_changed(&mut self, workflow: Workflow) -> Outcome {
    if workflow == self.workflow {
      return Outcome::Unchanged;
    }
    self.install(workflow);
    Outcome::Updated
  }

  fn install_blocks(&mut self, node_id: &str, workflow: Workflow) -> Outcome {
    let outcome = self.install_if_changed(workflow);
    if outcome == Outcome::Updated {
      self.notifier.notify(EditorEvent::BlocksChanged {
        node_id: node_id.to_string(),
      });
    }
    outcome
  }

  /// Recompute everything derived from the snapshot.
  fn refresh(&mut self) {
    self.focus.reconcile(&self.workflow);

    if self
      .selected
      .as_deref()
      .is_some_and(|id| !self.workflow.contains_node(id))
    {
      self.set_selection(None);
    }

    if !self.steps_graph.same_topology(self.workflow.graph()) {
      self.steps = level_graph(self.workflow.graph());
      self.steps_graph = self.workflow.graph().clone();
    }

    let focal = self
      .selected
      .as_deref()
      .filter(|_| self.config.narrow_on_select);
    self.lineage = lineage(self.workflow.graph(), focal);
  }

  fn block(&self, target: &FocusTarget) -> Option<&Block> {
    self.workflow.block(&target.node_id, target.block_index)
  }

  fn require_node(&self, node_id: &str) -> Result<(), EditorError> {
    if self.workflow.contains_node(node_id) {
      Ok(())
    } else {
      Err(EditorError::NodeNotFound(node_id.to_string()))
    }
  }

  fn require_block(&self, target: &FocusTarget) -> Result<&Block, EditorError> {
    self.require_node(&target.node_id)?;
    self.block(target).ok_or_else(|| EditorError::BlockNotFound {
      node_id: target.node_id.clone(),
      index: target.block_index,
    })
  }
}
