use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use stepwise_config::{EditorConfig, TOOL_ITEMS, WorkflowDef};
use stepwise_document::PromptField;
use stepwise_editor::{BlockContent, Editor, EditorCommand, EditorView, InputEvent, Workflow};

/// Stepwise - plan creative workflows as ordered stages of tools
#[derive(Parser)]
#[command(name = "stepwise")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the editor config (default: ~/.stepwise/config.json)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the steps of a workflow in render order
  Outline {
    /// Path to the workflow record (JSON)
    workflow_file: PathBuf,

    /// Only show the lineage of this node
    #[arg(long)]
    focus: Option<String>,
  },

  /// Check that a workflow record loads
  Validate {
    /// Path to the workflow record (JSON)
    workflow_file: PathBuf,
  },

  /// Replay editor commands against a workflow
  Apply {
    /// Path to the workflow record (JSON)
    workflow_file: PathBuf,

    /// JSON array of commands (default: read from stdin)
    #[arg(long)]
    commands: Option<PathBuf>,

    /// Where to write the edited record (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,
  },

  /// List the tools a stage can use
  Tools,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .init();

  let cli = Cli::parse();

  match cli.command {
    Some(Commands::Outline {
      workflow_file,
      focus,
    }) => {
      let config = load_config(cli.config.as_deref())?;
      outline(&workflow_file, focus, config)?;
    }
    Some(Commands::Validate { workflow_file }) => {
      let config = load_config(cli.config.as_deref())?;
      validate(&workflow_file, &config)?;
    }
    Some(Commands::Apply {
      workflow_file,
      commands,
      output,
    }) => {
      let config = load_config(cli.config.as_deref())?;
      apply(&workflow_file, commands.as_deref(), output.as_deref(), config)?;
    }
    Some(Commands::Tools) => list_tools(),
    None => {
      println!("stepwise - use --help to see available commands");
    }
  }

  Ok(())
}

/// Read the config from `path`, or from the default location when it exists.
fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
  let path = match path {
    Some(path) => path.to_path_buf(),
    None => match dirs::home_dir().map(|home| home.join(".stepwise").join("config.json")) {
      Some(path) if path.exists() => path,
      _ => {
        debug!("no config file, using defaults");
        return Ok(EditorConfig::default());
      }
    },
  };

  let content = std::fs::read_to_string(&path)
    .with_context(|| format!("failed to read config file: {}", path.display()))?;
  let config = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse config file: {}", path.display()))?;
  debug!(path = %path.display(), "config loaded");
  Ok(config)
}

fn load_workflow(workflow_file: &Path, config: &EditorConfig) -> Result<Workflow> {
  let content = std::fs::read_to_string(workflow_file)
    .with_context(|| format!("failed to read workflow file: {}", workflow_file.display()))?;

  let def: WorkflowDef = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse workflow file: {}", workflow_file.display()))?;

  let workflow = Workflow::from_record(def, config)
    .with_context(|| format!("invalid workflow: {}", workflow_file.display()))?;

  info!(
    file = %workflow_file.display(),
    nodes = workflow.graph().nodes().len(),
    edges = workflow.graph().edges().len(),
    "workflow loaded"
  );
  Ok(workflow)
}

fn outline(workflow_file: &Path, focus: Option<String>, config: EditorConfig) -> Result<()> {
  let workflow = load_workflow(workflow_file, &config)?;
  let mut editor = Editor::from_workflow(config, workflow);

  if let Some(node_id) = focus {
    editor
      .dispatch(EditorCommand::SelectNode {
        node_id: node_id.clone(),
      })
      .with_context(|| format!("cannot focus node '{}'", node_id))?;
  }

  print_outline(&editor.view());
  Ok(())
}

fn print_outline(view: &EditorView) {
  if let Some(title) = &view.title {
    println!("{}", title);
    println!();
  }

  for step in &view.steps {
    println!("{}  {} ({})", step.display_label, step.label, step.node_id);
    for block in &step.blocks {
      let summary = match &block.content {
        BlockContent::Text { text } => text.clone(),
        BlockContent::Prompt(pair) => format!(
          "{} -> {}",
          pair.get(PromptField::Input),
          pair.get(PromptField::Output)
        ),
        BlockContent::Image { src } => src.clone().unwrap_or_else(|| "(empty)".to_string()),
      };
      println!("    [{}] {}", block.block_type, summary);
    }
  }
}

fn validate(workflow_file: &Path, config: &EditorConfig) -> Result<()> {
  let workflow = load_workflow(workflow_file, config)?;
  let blocks: usize = workflow
    .graph()
    .nodes()
    .iter()
    .filter_map(|node| workflow.document(&node.id))
    .map(|doc| doc.len())
    .sum();

  println!(
    "ok: {} nodes, {} edges, {} blocks",
    workflow.graph().nodes().len(),
    workflow.graph().edges().len(),
    blocks
  );
  Ok(())
}

fn apply(
  workflow_file: &Path,
  commands_file: Option<&Path>,
  output: Option<&Path>,
  config: EditorConfig,
) -> Result<()> {
  let workflow = load_workflow(workflow_file, &config)?;
  let commands = read_commands(commands_file)?;
  let mut editor = Editor::from_workflow(config, workflow);

  for (i, command) in commands.into_iter().enumerate() {
    let outcome = editor
      .dispatch(command)
      .with_context(|| format!("command {} failed", i))?;
    debug!(index = i, ?outcome, "command applied");
  }
  // Commit whatever block is still being edited.
  let open = editor
    .focus()
    .target()
    .cloned()
    .filter(|_| editor.focus().draft().is_some());
  if let Some(target) = open {
    editor
      .dispatch(EditorCommand::Block {
        node_id: target.node_id,
        index: target.block_index,
        event: InputEvent::Blur,
      })
      .context("failed to commit the open block")?;
  }

  let record = serde_json::to_string_pretty(&editor.workflow().to_record())?;
  match output {
    Some(path) => {
      std::fs::write(path, record)
        .with_context(|| format!("failed to write workflow file: {}", path.display()))?;
      info!(file = %path.display(), "workflow written");
    }
    None => println!("{}", record),
  }
  Ok(())
}

fn read_commands(commands_file: Option<&Path>) -> Result<Vec<EditorCommand>> {
  let content = match commands_file {
    Some(path) => std::fs::read_to_string(path)
      .with_context(|| format!("failed to read commands file: {}", path.display()))?,
    None => {
      let mut input = String::new();
      io::stdin()
        .read_to_string(&mut input)
        .context("failed to read commands from stdin")?;
      input
    }
  };

  if content.trim().is_empty() {
    return Ok(Vec::new());
  }
  let commands: Vec<EditorCommand> =
    serde_json::from_str(&content).context("failed to parse commands JSON")?;
  info!(count = commands.len(), "commands loaded");
  Ok(commands)
}

fn list_tools() {
  for tool in TOOL_ITEMS {
    println!("{:<12} {:<14} {}", tool.id, tool.name, tool.category);
  }
}
