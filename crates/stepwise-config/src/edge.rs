use serde::{Deserialize, Serialize};

/// A directed sequencing edge between two stage nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDef {
  pub id: String,
  pub source: String,
  pub target: String,
}
