//! Stepwise Config
//!
//! This crate contains the plain, serializable records for Stepwise workflows.
//! These types are what a persistence collaborator stores and retrieves
//! verbatim; they carry no validation of their own.
//!
//! A record can be loaded from:
//! - JSON files (via CLI with `stepwise outline workflow.json`)
//! - Any external store (as JSON blobs)
//!
//! The editor takes these records, validates the graph (no self loops,
//! duplicates or cycles) and turns them into an editable snapshot.
//!
//! The crate also owns the stage tool catalog and the editor settings.

mod block;
mod edge;
mod editor;
mod node;
mod tool;
mod workflow;

pub use block::{BlockDef, BlockType};
pub use edge::EdgeDef;
pub use editor::{EditorConfig, IdStrategy};
pub use node::{NodeDef, Position};
pub use tool::{TOOL_ITEMS, ToolCategory, ToolItem, find_tool};
pub use workflow::WorkflowDef;
