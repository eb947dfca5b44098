use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which half of a prompt block to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptField {
  Input,
  Output,
}

impl FromStr for PromptField {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "input" => Ok(PromptField::Input),
      "output" => Ok(PromptField::Output),
      other => Err(format!("unknown prompt field: {other}")),
    }
  }
}

/// The decoded content of a prompt block.
///
/// Stored in the block as a JSON object `{"input": .., "output": ..}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPair {
  pub input: String,
  pub output: String,
}

impl PromptPair {
  pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
    Self {
      input: input.into(),
      output: output.into(),
    }
  }

  /// Strict decode. `None` unless `content` is a JSON object; missing or
  /// non-string fields read as empty.
  pub fn try_decode(content: &str) -> Option<Self> {
    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    let object = value.as_object()?;
    let field = |name: &str| {
      object
        .get(name)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
    };
    Some(Self {
      input: field("input"),
      output: field("output"),
    })
  }

  /// Lenient decode: content that is not a prompt object becomes the input,
  /// so no text is ever dropped.
  pub fn decode(content: &str) -> Self {
    Self::try_decode(content).unwrap_or_else(|| Self::new(content, ""))
  }

  pub fn encode(&self) -> String {
    serde_json::json!({
      "input": self.input,
      "output": self.output,
    })
    .to_string()
  }

  pub fn get(&self, field: PromptField) -> &str {
    match field {
      PromptField::Input => &self.input,
      PromptField::Output => &self.output,
    }
  }

  pub fn set(&mut self, field: PromptField, value: impl Into<String>) {
    match field {
      PromptField::Input => self.input = value.into(),
      PromptField::Output => self.output = value.into(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_decode_prompt_object() {
    let pair = PromptPair::decode(r#"{"input": "draw a fox", "output": "a fox"}"#);
    assert_eq!(pair, PromptPair::new("draw a fox", "a fox"));
  }

  #[test]
  fn test_decode_partial_object() {
    let pair = PromptPair::decode(r#"{"output": 3}"#);
    assert_eq!(pair, PromptPair::default());
  }

  #[test]
  fn test_decode_plain_text_becomes_input() {
    let pair = PromptPair::decode("write a haiku");
    assert_eq!(pair, PromptPair::new("write a haiku", ""));
  }

  #[test]
  fn test_decode_non_object_json_becomes_input() {
    assert_eq!(PromptPair::decode("42"), PromptPair::new("42", ""));
    assert_eq!(
      PromptPair::decode(r#""quoted""#),
      PromptPair::new(r#""quoted""#, "")
    );
  }

  #[test]
  fn test_encode_decodes_back() {
    let pair = PromptPair::new("line one\nline \"two\"", "ok");
    assert_eq!(PromptPair::try_decode(&pair.encode()), Some(pair));
  }

  #[test]
  fn test_get_and_set_fields() {
    let mut pair = PromptPair::new("ask", "");
    pair.set(PromptField::Output, "answer");
    assert_eq!(pair.get(PromptField::Input), "ask");
    assert_eq!(pair.get(PromptField::Output), "answer");
  }

  #[test]
  fn test_prompt_field_from_str() {
    assert_eq!("output".parse::<PromptField>(), Ok(PromptField::Output));
    assert!("both".parse::<PromptField>().is_err());
  }
}
