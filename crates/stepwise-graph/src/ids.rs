use stepwise_config::IdStrategy;
use tracing::debug;

/// Mints ids for nodes, edges and blocks.
///
/// The generator travels inside the graph snapshot, so two editors never
/// share a counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
  strategy: IdStrategy,
  next: u64,
}

impl IdGenerator {
  pub fn new(strategy: IdStrategy) -> Self {
    Self { strategy, next: 0 }
  }

  /// Produce the next id.
  ///
  /// A sequence whose counter has run out falls back to uuids.
  pub fn next_id(&mut self) -> String {
    match &self.strategy {
      IdStrategy::Sequence { prefix } => match self.next.checked_add(1) {
        Some(after) => {
          let id = format!("{}{}", prefix, self.next);
          self.next = after;
          id
        }
        None => {
          debug!(prefix = %prefix, "id sequence exhausted, minting a uuid");
          uuid::Uuid::new_v4().to_string()
        }
      },
      IdStrategy::Uuid => uuid::Uuid::new_v4().to_string(),
    }
  }

  /// Produce the next id that `taken` does not already claim.
  pub fn next_free_id(&mut self, taken: impl Fn(&str) -> bool) -> String {
    loop {
      let id = self.next_id();
      if !taken(&id) {
        return id;
      }
    }
  }

  /// Move the sequence past an id that already exists, so it is never
  /// minted again.
  pub fn reserve(&mut self, id: &str) {
    if let IdStrategy::Sequence { prefix } = &self.strategy {
      if let Some(n) = id
        .strip_prefix(prefix.as_str())
        .and_then(|rest| rest.parse::<u64>().ok())
      {
        self.next = self.next.max(n.saturating_add(1));
      }
    }
  }
}

impl Default for IdGenerator {
  fn default() -> Self {
    Self::new(IdStrategy::default())
  }
}
