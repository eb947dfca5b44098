//! Stepwise Editor
//!
//! Ties the stage graph and the block documents together into an editing
//! session.
//!
//! - [`Workflow`] is the immutable snapshot: graph plus one
//!   [`stepwise_document::BlockDocument`] per node. It loads from and saves
//!   to a [`stepwise_config::WorkflowDef`] record.
//! - [`Editor`] holds the current snapshot, applies [`EditorCommand`]s,
//!   tracks the focused block and selection, and keeps the step order and
//!   lineage filter current. [`Editor::view`] projects all of it into an
//!   [`EditorView`].
//! - [`BlockInput`] is the per-block keyboard state machine.
//! - Applied changes are reported through an [`EditorNotifier`].

mod command;
mod editor;
mod error;
mod events;
mod focus;
mod input;
mod view;
mod workflow;

pub use command::{EditorCommand, Outcome};
pub use editor::Editor;
pub use error::{EditorError, RecordError};
pub use events::{ChannelNotifier, EditorEvent, EditorNotifier, NoopNotifier};
pub use focus::{FocusController, FocusTarget, PendingCommit};
pub use input::{BlockInput, InputAction, InputEvent, Key};
pub use view::{BlockContent, BlockView, EditorView, StepView};
pub use workflow::Workflow;
