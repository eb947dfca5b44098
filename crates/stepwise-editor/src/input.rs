//! Per-block input state machine.
//!
//! The focused text block moves between three states:
//!
//! ```text
//! Viewing   --Focus-------------> Editing
//! Editing   --CompositionStart--> Composing
//! Composing --CompositionEnd----> Editing
//! Editing   --Enter-------------> Viewing    (Split)
//! Editing   --Backspace, blank--> Viewing    (Remove)
//! Editing   --Blur--------------> Viewing    (Commit)
//! Composing --Blur--------------> Viewing    (Commit)
//! ```
//!
//! `Enter` (without Shift) asks for a split and `Backspace` on a blank draft
//! asks for removal, but only in `Editing`: while an input method is composing
//! (either state `Composing` or a key event flagged `is_composing`) those keys
//! belong to the IME and are passed through.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Keys the machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
  Enter,
  Backspace,
  Other,
}

/// Raw events from a block's text surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
  /// The block gained focus and shows `content`.
  Focus { content: String },
  /// The block's text changed to `text`.
  Input { text: String },
  CompositionStart,
  CompositionEnd,
  KeyDown {
    key: Key,
    #[serde(default)]
    shift: bool,
    /// The platform's own composing flag for this key event.
    #[serde(default)]
    is_composing: bool,
    /// Caret offset in chars; the end of the draft when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    caret: Option<usize>,
  },
  Blur,
}

/// What the editor should do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
  /// Store the draft as the block's content.
  Commit { content: String },
  /// Split the block: keep `before`, move `after` into a new block.
  Split { before: String, after: String },
  /// Remove the (blank) block.
  Remove,
}

/// State of the focused block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BlockInput {
  #[default]
  Viewing,
  Editing { draft: String },
  Composing { draft: String },
}

impl BlockInput {
  pub fn is_viewing(&self) -> bool {
    matches!(self, BlockInput::Viewing)
  }

  pub fn draft(&self) -> Option<&str> {
    match self {
      BlockInput::Viewing => None,
      BlockInput::Editing { draft } | BlockInput::Composing { draft } => Some(draft),
    }
  }

  /// Feed one event, returning the action it triggers (if any).
  ///
  /// Events that make no sense in the current state are ignored.
  pub fn apply(&mut self, event: InputEvent) -> Option<InputAction> {
    let state = std::mem::take(self);
    let (next, action) = match (state, event) {
      (_, InputEvent::Focus { content }) => (BlockInput::Editing { draft: content }, None),

      (BlockInput::Editing { .. }, InputEvent::Input { text }) => {
        (BlockInput::Editing { draft: text }, None)
      }
      (BlockInput::Composing { .. }, InputEvent::Input { text }) => {
        (BlockInput::Composing { draft: text }, None)
      }

      (BlockInput::Editing { draft }, InputEvent::CompositionStart) => {
        (BlockInput::Composing { draft }, None)
      }
      (BlockInput::Composing { draft }, InputEvent::CompositionEnd) => {
        (BlockInput::Editing { draft }, None)
      }

      (
        BlockInput::Editing { draft },
        InputEvent::KeyDown {
          key,
          shift,
          is_composing: false,
          caret,
        },
      ) => shortcut(draft, key, shift, caret),

      (BlockInput::Editing { draft } | BlockInput::Composing { draft }, InputEvent::Blur) => {
        (BlockInput::Viewing, Some(InputAction::Commit { content: draft }))
      }

      (state, event) => {
        trace!(?event, "input event ignored");
        (state, None)
      }
    };
    *self = next;
    action
  }
}

fn shortcut(
  draft: String,
  key: Key,
  shift: bool,
  caret: Option<usize>,
) -> (BlockInput, Option<InputAction>) {
  match key {
    Key::Enter if !shift => {
      let (before, after) = split_at_char(&draft, caret);
      (BlockInput::Viewing, Some(InputAction::Split { before, after }))
    }
    Key::Backspace if draft.trim().is_empty() => (BlockInput::Viewing, Some(InputAction::Remove)),
    _ => (BlockInput::Editing { draft }, None),
  }
}

/// Split `text` at a char offset, clamped to the text length.
fn split_at_char(text: &str, caret: Option<usize>) -> (String, String) {
  let byte = caret
    .and_then(|chars| text.char_indices().nth(chars).map(|(i, _)| i))
    .unwrap_or(text.len());
  let (before, after) = text.split_at(byte);
  (before.to_string(), after.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn editing(draft: &str) -> BlockInput {
    BlockInput::Editing {
      draft: draft.to_string(),
    }
  }

  fn key(key: Key) -> InputEvent {
    InputEvent::KeyDown {
      key,
      shift: false,
      is_composing: false,
      caret: None,
    }
  }

  #[test]
  fn test_focus_enters_editing() {
    let mut input = BlockInput::Viewing;
    let action = input.apply(InputEvent::Focus {
      content: "hello".to_string(),
    });
    assert_eq!(action, None);
    assert_eq!(input, editing("hello"));
  }

  #[test]
  fn test_blur_commits_draft() {
    let mut input = editing("a");
    input.apply(InputEvent::Input {
      text: "abc".to_string(),
    });
    let action = input.apply(InputEvent::Blur);
    assert_eq!(
      action,
      Some(InputAction::Commit {
        content: "abc".to_string()
      })
    );
    assert!(input.is_viewing());
  }

  #[test]
  fn test_enter_splits_at_end_by_default() {
    let mut input = editing("ab");
    let action = input.apply(key(Key::Enter));
    assert_eq!(
      action,
      Some(InputAction::Split {
        before: "ab".to_string(),
        after: String::new()
      })
    );
    assert!(input.is_viewing());
  }

  #[test]
  fn test_enter_splits_at_caret() {
    let mut input = editing("héllo");
    let action = input.apply(InputEvent::KeyDown {
      key: Key::Enter,
      shift: false,
      is_composing: false,
      caret: Some(2),
    });
    assert_eq!(
      action,
      Some(InputAction::Split {
        before: "hé".to_string(),
        after: "llo".to_string()
      })
    );
  }

  #[test]
  fn test_shift_enter_is_soft_break() {
    let mut input = editing("ab");
    let action = input.apply(InputEvent::KeyDown {
      key: Key::Enter,
      shift: true,
      is_composing: false,
      caret: None,
    });
    assert_eq!(action, None);
    assert_eq!(input, editing("ab"));
  }

  #[test]
  fn test_backspace_on_blank_removes() {
    let mut input = editing("  ");
    assert_eq!(input.apply(key(Key::Backspace)), Some(InputAction::Remove));
  }

  #[test]
  fn test_backspace_with_text_is_plain_edit() {
    let mut input = editing("a");
    assert_eq!(input.apply(key(Key::Backspace)), None);
    assert_eq!(input, editing("a"));
  }

  #[test]
  fn test_composition_suppresses_shortcuts() {
    let mut input = editing("");
    input.apply(InputEvent::CompositionStart);
    assert_eq!(input.apply(key(Key::Enter)), None);
    assert_eq!(input.apply(key(Key::Backspace)), None);

    input.apply(InputEvent::Input {
      text: "한".to_string(),
    });
    input.apply(InputEvent::CompositionEnd);
    assert_eq!(input, editing("한"));

    let action = input.apply(key(Key::Enter));
    assert!(matches!(action, Some(InputAction::Split { .. })));
  }

  #[test]
  fn test_composing_flag_on_key_event_suppresses_shortcuts() {
    let mut input = editing("");
    let action = input.apply(InputEvent::KeyDown {
      key: Key::Backspace,
      shift: false,
      is_composing: true,
      caret: None,
    });
    assert_eq!(action, None);
    assert_eq!(input, editing(""));
  }

  #[test]
  fn test_blur_while_composing_commits() {
    let mut input = BlockInput::Composing {
      draft: "가".to_string(),
    };
    assert_eq!(
      input.apply(InputEvent::Blur),
      Some(InputAction::Commit {
        content: "가".to_string()
      })
    );
  }

  #[test]
  fn test_viewing_ignores_keys() {
    let mut input = BlockInput::Viewing;
    assert_eq!(input.apply(key(Key::Enter)), None);
    assert_eq!(input.apply(InputEvent::Blur), None);
    assert!(input.is_viewing());
  }
}
