use serde::{Deserialize, Serialize};

use crate::edge::EdgeDef;
use crate::node::NodeDef;

/// The plain persisted form of a workflow.
///
/// Node and edge order is meaningful: it is the insertion order of the editor
/// and breaks ties when ordering steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDef {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(default)]
  pub nodes: Vec<NodeDef>,
  #[serde(default)]
  pub edges: Vec<EdgeDef>,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::{BlockDef, BlockType, Position};

  #[test]
  fn test_workflow_def_round_trip() {
    let def = WorkflowDef {
      title: Some("Poster campaign".to_string()),
      nodes: vec![NodeDef {
        id: "n1".to_string(),
        position: Position::new(10.0, 20.5),
        label: "Midjourney".to_string(),
        blocks: vec![
          BlockDef {
            id: "b1".to_string(),
            block_type: BlockType::Prompt,
            content: r#"{"input":"a cat","output":""}"#.to_string(),
          },
          BlockDef {
            id: "b2".to_string(),
            block_type: BlockType::Image,
            content: String::new(),
          },
        ],
      }],
      edges: vec![],
    };

    let text = serde_json::to_string(&def).unwrap();
    let back: WorkflowDef = serde_json::from_str(&text).unwrap();
    assert_eq!(back, def);
  }

  #[test]
  fn test_workflow_def_plain_shape() {
    let value = json!({
      "nodes": [
        {
          "id": "a",
          "position": { "x": 0.0, "y": 0.0 },
          "label": "Chat GPT",
          "blocks": [{ "id": "b", "type": "body", "content": "hi" }]
        }
      ],
      "edges": [{ "id": "e", "source": "a", "target": "a" }]
    });

    let def: WorkflowDef = serde_json::from_value(value).unwrap();
    assert_eq!(def.title, None);
    assert_eq!(def.nodes[0].blocks[0].content, "hi");
    assert_eq!(def.edges[0].source, "a");
  }
}
