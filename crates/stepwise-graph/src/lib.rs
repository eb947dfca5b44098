//! Stepwise Graph
//!
//! This crate owns the connectivity side of a Stepwise workflow: the stage
//! nodes, the sequencing edges between them and everything derived from that
//! topology.
//!
//! - [`StageGraph`] is an immutable snapshot; every mutation returns a new one.
//!   Edge mutations are validated (no self loops, dangling endpoints,
//!   duplicates or cycles), so the graph is always a DAG.
//! - [`level_graph`] assigns every node a level and a `Step N[-k]` label and
//!   returns the render order.
//! - [`lineage`] narrows the node set to a focal node's ancestors and
//!   descendants.
//!
//! Nothing here knows about block content; documents live in a separate map
//! keyed by the same node ids.

mod adjacency;
mod error;
mod graph;
mod ids;
mod level;
mod lineage;

pub use adjacency::Adjacency;
pub use error::ValidationError;
pub use graph::{Edge, EdgeId, NodeId, StageGraph, StageNode};
pub use ids::IdGenerator;
pub use level::{Step, StepOrder, level_graph};
pub use lineage::{Lineage, lineage};
