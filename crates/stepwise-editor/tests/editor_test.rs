//! End-to-end tests driving an Editor through command scripts.

use serde_json::json;
use stepwise_config::{BlockType, EditorConfig, IdStrategy, WorkflowDef};
use stepwise_editor::{
  BlockContent, ChannelNotifier, Editor, EditorCommand, EditorError, EditorEvent, FocusTarget,
  Outcome, RecordError, Workflow,
};
use stepwise_graph::ValidationError;
use tokio::sync::mpsc;

fn config() -> EditorConfig {
  EditorConfig {
    ids: IdStrategy::Sequence {
      prefix: "id_".to_string(),
    },
    ..EditorConfig::default()
  }
}

/// A -> B, A -> C with B above C.
fn fan_out_record() -> WorkflowDef {
  serde_json::from_value(json!({
    "title": "Launch campaign",
    "nodes": [
      {
        "id": "a",
        "position": { "x": 0.0, "y": 100.0 },
        "label": "Chat GPT",
        "blocks": [
          { "id": "a1", "type": "h1", "content": "Brief" },
          { "id": "a2", "type": "body", "content": "Write the copy" }
        ]
      },
      {
        "id": "b",
        "position": { "x": 300.0, "y": 50.0 },
        "label": "Midjourney",
        "blocks": [
          { "id": "b1", "type": "prompt", "content": "{\"input\":\"poster\",\"output\":\"\"}" }
        ]
      },
      {
        "id": "c",
        "position": { "x": 300.0, "y": 250.0 },
        "label": "Figma",
        "blocks": [{ "id": "c1", "type": "body", "content": "" }]
      }
    ],
    "edges": [
      { "id": "e1", "source": "a", "target": "b" },
      { "id": "e2", "source": "a", "target": "c" }
    ]
  }))
  .unwrap()
}

fn load() -> Editor {
  let workflow = Workflow::from_record(fan_out_record(), &config()).unwrap();
  Editor::from_workflow(config(), workflow)
}

fn script(value: serde_json::Value) -> Vec<EditorCommand> {
  serde_json::from_value(value).unwrap()
}

fn run(editor: &mut Editor, commands: Vec<EditorCommand>) {
  for command in commands {
    editor.dispatch(command).unwrap();
  }
}

fn contents(editor: &Editor, node_id: &str) -> Vec<String> {
  editor
    .workflow()
    .document(node_id)
    .unwrap()
    .blocks()
    .iter()
    .map(|b| b.content.clone())
    .collect()
}

#[test]
fn test_fan_out_step_labels() {
  let editor = load();
  let view = editor.view();

  let labels: Vec<(&str, &str, &str)> = view
    .steps
    .iter()
    .map(|s| {
      (
        s.node_id.as_str(),
        s.step_label.as_str(),
        s.display_label.as_str(),
      )
    })
    .collect();
  assert_eq!(
    labels,
    vec![
      ("a", "Step 1", "Step.1"),
      ("b", "Step 2-1", "Step.2-1"),
      ("c", "Step 2-2", "Step.2-2"),
    ]
  );
  assert_eq!(view.title.as_deref(), Some("Launch campaign"));
  assert_eq!(view.edges.len(), 2);
}

#[test]
fn test_moving_a_node_reorders_its_level() {
  let mut editor = load();
  run(
    &mut editor,
    script(json!([
      { "command": "move_node", "node_id": "c", "position": { "x": 300.0, "y": 0.0 } }
    ])),
  );

  assert_eq!(editor.steps().label("c"), Some("Step 2-1"));
  assert_eq!(editor.steps().label("b"), Some("Step 2-2"));
}

#[test]
fn test_prompt_blocks_are_decoded_in_view() {
  let editor = load();
  let view = editor.view();
  let b = view.step("b").unwrap();
  match &b.blocks[0].content {
    BlockContent::Prompt(pair) => assert_eq!(pair.input, "poster"),
    other => panic!("expected a prompt, got {other:?}"),
  }
}

#[test]
fn test_cycle_closing_edge_is_rejected() {
  let mut editor = load();
  let before = editor.snapshot();

  let err = editor
    .dispatch(EditorCommand::AddEdge {
      source: "c".to_string(),
      target: "a".to_string(),
    })
    .unwrap_err();

  assert!(matches!(
    err,
    EditorError::Validation(ValidationError::CycleDetected { .. })
  ));
  assert_eq!(editor.workflow(), &before);
}

#[test]
fn test_rewire_keeps_edge_id() {
  let mut editor = load();
  run(
    &mut editor,
    script(json!([
      { "command": "rewire_edge", "edge_id": "e2", "new_source": "b", "new_target": "c" }
    ])),
  );

  let edge = editor.workflow().graph().edge("e2").unwrap();
  assert_eq!((edge.source.as_str(), edge.target.as_str()), ("b", "c"));
  assert_eq!(editor.steps().level("c"), Some(3));
}

#[test]
fn test_select_node_shows_lineage_only() {
  let mut editor = load();
  run(
    &mut editor,
    script(json!([{ "command": "select_node", "node_id": "b" }])),
  );

  let view = editor.view();
  let visible: Vec<&str> = view.steps.iter().map(|s| s.node_id.as_str()).collect();
  assert_eq!(visible, vec!["a", "b"]);
  assert_eq!(view.edges.len(), 1);
  assert_eq!(view.selected.as_deref(), Some("b"));
  assert_eq!(view.focus, Some(FocusTarget::new("b", 0)));

  run(
    &mut editor,
    script(json!([{ "command": "clear_selection" }])),
  );
  assert_eq!(editor.view().steps.len(), 3);
}

#[test]
fn test_typing_session() {
  let mut editor = load();
  run(
    &mut editor,
    script(json!([
      { "command": "block", "node_id": "c", "index": 0,
        "event": { "type": "focus", "content": "" } },
      { "command": "block", "node_id": "c", "index": 0,
        "event": { "type": "input", "text": "Frames and layout" } },
      { "command": "block", "node_id": "c", "index": 0,
        "event": { "type": "key_down", "key": "enter", "caret": 6 } },
      { "command": "block", "node_id": "c", "index": 1,
        "event": { "type": "input", "text": "Export" } },
      { "command": "toolbar", "action": "bullet" },
      { "command": "block", "node_id": "c", "index": 1,
        "event": { "type": "blur" } }
    ])),
  );

  assert_eq!(contents(&editor, "c"), vec!["Frames", "Export"]);
  let doc = editor.workflow().document("c").unwrap();
  assert_eq!(doc.blocks()[1].block_type, BlockType::Bullet);
  assert!(editor.focus().input().is_viewing());
}

#[test]
fn test_shift_enter_and_composition_do_not_split() {
  let mut editor = load();
  run(
    &mut editor,
    script(json!([
      { "command": "block", "node_id": "a", "index": 1,
        "event": { "type": "key_down", "key": "enter", "shift": true } },
      { "command": "block", "node_id": "a", "index": 1,
        "event": { "type": "key_down", "key": "enter", "is_composing": true } },
      { "command": "block", "node_id": "a", "index": 1,
        "event": { "type": "composition_start" } },
      { "command": "block", "node_id": "a", "index": 1,
        "event": { "type": "key_down", "key": "enter" } },
      { "command": "block", "node_id": "a", "index": 1,
        "event": { "type": "composition_end" } }
    ])),
  );

  assert_eq!(contents(&editor, "a").len(), 2);
  assert_eq!(editor.focus().draft(), Some("Write the copy"));
}

#[test]
fn test_backspace_on_sole_block_clears_it() {
  let mut editor = load();
  run(
    &mut editor,
    script(json!([
      { "command": "block", "node_id": "c", "index": 0,
        "event": { "type": "input", "text": "   " } },
      { "command": "block", "node_id": "c", "index": 0,
        "event": { "type": "key_down", "key": "backspace" } }
    ])),
  );

  assert_eq!(contents(&editor, "c"), vec![""]);
  assert_eq!(editor.focus().target(), Some(&FocusTarget::new("c", 0)));
}

#[test]
fn test_image_toolbar_inserts_slot() {
  let mut editor = load();
  run(
    &mut editor,
    script(json!([
      { "command": "focus_block", "node_id": "a", "index": 0 },
      { "command": "toolbar", "action": "image" }
    ])),
  );

  let doc = editor.workflow().document("a").unwrap();
  let types: Vec<BlockType> = doc.blocks().iter().map(|b| b.block_type).collect();
  assert_eq!(
    types,
    vec![BlockType::Heading1, BlockType::Image, BlockType::Body]
  );
}

#[test]
fn test_prompt_field_update() {
  let mut editor = load();
  let outcome = editor
    .dispatch(EditorCommand::SetPromptField {
      node_id: "b".to_string(),
      index: 0,
      field: "output".parse().unwrap(),
      value: "poster.png".to_string(),
    })
    .unwrap();

  assert_eq!(outcome, Outcome::Updated);
  let content = &editor.workflow().block("b", 0).unwrap().content;
  let value: serde_json::Value = serde_json::from_str(content).unwrap();
  assert_eq!(value, json!({ "input": "poster", "output": "poster.png" }));
}

#[test]
fn test_edited_record_round_trips() {
  let mut editor = load();
  run(
    &mut editor,
    script(json!([
      { "command": "add_node", "tool": "premiere", "position": { "x": 600.0, "y": 100.0 } },
      { "command": "add_edge", "source": "b", "target": "id_0" },
      { "command": "click_tail", "node_id": "a" },
      { "command": "block", "node_id": "a", "index": 2,
        "event": { "type": "input", "text": "Deliver" } },
      { "command": "set_title", "title": "Launch v2" }
    ])),
  );
  // Leave the block so its draft is stored.
  editor
    .dispatch(EditorCommand::FocusBlock {
      node_id: "id_0".to_string(),
      index: 0,
    })
    .unwrap();

  let record = editor.workflow().to_record();
  assert_eq!(record.nodes[3].label, "Premiere Pro");
  assert_eq!(record.nodes[0].blocks[2].content, "Deliver");

  let text = serde_json::to_string_pretty(&record).unwrap();
  let reloaded = Workflow::from_record(serde_json::from_str(&text).unwrap(), &config()).unwrap();
  assert_eq!(reloaded.to_record(), record);
  assert_eq!(reloaded.title(), Some("Launch v2"));
}

#[test]
fn test_invalid_records_are_refused() {
  let mut duplicate_node = fan_out_record();
  duplicate_node.nodes[1].id = "a".to_string();
  assert!(matches!(
    Workflow::from_record(duplicate_node, &config()),
    Err(RecordError::Graph(ValidationError::DuplicateNode(_)))
  ));

  let mut dangling = fan_out_record();
  dangling.edges[0].target = "zzz".to_string();
  assert!(matches!(
    Workflow::from_record(dangling, &config()),
    Err(RecordError::Graph(ValidationError::NodeNotFound(_)))
  ));

  let mut duplicate_block = fan_out_record();
  duplicate_block.nodes[0].blocks[1].id = "a1".to_string();
  assert!(matches!(
    Workflow::from_record(duplicate_block, &config()),
    Err(RecordError::Document { .. })
  ));
}

#[tokio::test]
async fn test_channel_notifier_reports_changes() {
  let (tx, mut rx) = mpsc::unbounded_channel();
  let workflow = Workflow::from_record(fan_out_record(), &config()).unwrap();
  let mut editor = Editor::with_notifier(config(), workflow, ChannelNotifier::new(tx));

  editor
    .dispatch(EditorCommand::AddEdge {
      source: "b".to_string(),
      target: "c".to_string(),
    })
    .unwrap();
  let _ = editor.dispatch(EditorCommand::AddEdge {
    source: "c".to_string(),
    target: "b".to_string(),
  });
  editor
    .dispatch(EditorCommand::SelectNode {
      node_id: "c".to_string(),
    })
    .unwrap();
  editor
    .dispatch(EditorCommand::RemoveNode {
      node_id: "c".to_string(),
    })
    .unwrap();
  drop(editor);

  let mut events = Vec::new();
  while let Some(event) = rx.recv().await {
    events.push(event);
  }

  assert!(matches!(&events[0], EditorEvent::EdgeAdded { source, target, .. }
    if source == "b" && target == "c"));
  assert!(matches!(&events[1], EditorEvent::EdgeRejected { .. }));
  assert_eq!(
    events[2],
    EditorEvent::SelectionChanged {
      node_id: Some("c".to_string())
    }
  );
  assert_eq!(
    events[3],
    EditorEvent::FocusChanged {
      focus: Some(FocusTarget::new("c", 0))
    }
  );
  assert_eq!(
    events[4..],
    [
      EditorEvent::NodeRemoved {
        node_id: "c".to_string()
      },
      EditorEvent::SelectionChanged { node_id: None },
      EditorEvent::FocusChanged { focus: None },
    ]
  );
}
