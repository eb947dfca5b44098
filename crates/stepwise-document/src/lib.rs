//! Stepwise Document
//!
//! Each stage node carries a [`BlockDocument`]: an ordered list of typed
//! blocks (headings, body text, bullets, prompts, images). The document is
//! edited by the gestures of a block editor:
//!
//! - `Enter` splits a block ([`BlockDocument::split_at`])
//! - `Backspace` on an empty block removes it ([`BlockDocument::remove_at`])
//! - toolbar actions change a block's type or insert an image
//!   ([`BlockDocument::convert_type`])
//! - prompt blocks hold an input/output pair ([`PromptPair`])
//!
//! A document never becomes empty: removing the last block clears it instead.
//! Out-of-range indices are ignored rather than reported.

mod block;
mod document;
mod error;
mod prompt;

pub use block::{Block, BlockId};
pub use document::{BlockDocument, RemoveOutcome, SplitTarget};
pub use error::DocumentError;
pub use prompt::{PromptField, PromptPair};
