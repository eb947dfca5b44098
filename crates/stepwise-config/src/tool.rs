//! Stage tool catalog.
//!
//! These are the tools a user can drop onto the canvas. A node created from a
//! tool takes the tool's name as its label unless the caller overrides it.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolCategory {
  #[serde(rename = "AI Tools")]
  Ai,
  #[serde(rename = "Visual Tools")]
  Visual,
  #[serde(rename = "Video Tools")]
  Video,
}

impl fmt::Display for ToolCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ToolCategory::Ai => "AI Tools",
      ToolCategory::Visual => "Visual Tools",
      ToolCategory::Video => "Video Tools",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolItem {
  pub id: &'static str,
  pub name: &'static str,
  pub category: ToolCategory,
}

pub const TOOL_ITEMS: &[ToolItem] = &[
  ToolItem {
    id: "gpt",
    name: "Chat GPT",
    category: ToolCategory::Ai,
  },
  ToolItem {
    id: "claude",
    name: "Claude",
    category: ToolCategory::Ai,
  },
  ToolItem {
    id: "perplexity",
    name: "Perplexity",
    category: ToolCategory::Ai,
  },
  ToolItem {
    id: "midjourney",
    name: "Midjourney",
    category: ToolCategory::Ai,
  },
  ToolItem {
    id: "figma",
    name: "Figma",
    category: ToolCategory::Visual,
  },
  ToolItem {
    id: "illustrator",
    name: "Illustrator",
    category: ToolCategory::Visual,
  },
  ToolItem {
    id: "photoshop",
    name: "Photoshop",
    category: ToolCategory::Visual,
  },
  ToolItem {
    id: "premiere",
    name: "Premiere Pro",
    category: ToolCategory::Video,
  },
  ToolItem {
    id: "capcut",
    name: "CapCut",
    category: ToolCategory::Video,
  },
];

/// Look up a tool by its catalog id.
pub fn find_tool(id: &str) -> Option<&'static ToolItem> {
  TOOL_ITEMS.iter().find(|tool| tool.id == id)
}
