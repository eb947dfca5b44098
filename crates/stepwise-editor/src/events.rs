//! Editor events and notifiers.
//!
//! Every applied change is reported as an [`EditorEvent`] so a host can
//! persist the record, re-render or sync a collaborator without diffing
//! snapshots.

use serde::{Deserialize, Serialize};
use stepwise_graph::ValidationError;
use tokio::sync::mpsc;

use crate::focus::FocusTarget;

/// Events emitted while editing a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditorEvent {
  NodeAdded {
    node_id: String,
    label: String,
  },

  /// A node and all its edges were removed.
  NodeRemoved {
    node_id: String,
  },

  EdgeAdded {
    edge_id: String,
    source: String,
    target: String,
  },

  EdgeRemoved {
    edge_id: String,
  },

  EdgeRewired {
    edge_id: String,
    source: String,
    target: String,
  },

  /// An edge request failed validation and was not applied.
  EdgeRejected {
    source: String,
    target: String,
    reason: String,
  },

  /// The block list of a node changed.
  BlocksChanged {
    node_id: String,
  },

  FocusChanged {
    focus: Option<FocusTarget>,
  },

  SelectionChanged {
    node_id: Option<String>,
  },
}

impl EditorEvent {
  pub(crate) fn rejected(source: &str, target: &str, err: &ValidationError) -> Self {
    EditorEvent::EdgeRejected {
      source: source.to_string(),
      target: target.to_string(),
      reason: err.to_string(),
    }
  }
}

/// Receives editor events.
///
/// The editor calls `notify` once per event, after the new snapshot is
/// installed.
pub trait EditorNotifier: Send + Sync {
  fn notify(&self, event: EditorEvent);
}

/// Discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl EditorNotifier for NoopNotifier {
  fn notify(&self, _event: EditorEvent) {}
}

/// Forwards events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<EditorEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<EditorEvent>) -> Self {
    Self { sender }
  }
}

impl EditorNotifier for ChannelNotifier {
  fn notify(&self, event: EditorEvent) {
    // Receiver may have been dropped.
    let _ = self.sender.send(event);
  }
}
