use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
  #[error("document has no blocks")]
  Empty,

  #[error("duplicate block id: {0}")]
  DuplicateBlockId(String),
}
