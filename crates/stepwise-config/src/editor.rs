use serde::{Deserialize, Serialize};

/// How the graph store mints node, edge and block ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdStrategy {
  /// Random v4 UUIDs. Safe across independently created editors.
  #[default]
  Uuid,
  /// `prefix` followed by a counter that travels with the snapshot.
  Sequence { prefix: String },
}

/// Editor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
  pub ids: IdStrategy,
  /// Narrow the document pane to the selected node's lineage.
  pub narrow_on_select: bool,
}

impl Default for EditorConfig {
  fn default() -> Self {
    Self {
      ids: IdStrategy::default(),
      narrow_on_select: true,
    }
  }
}
