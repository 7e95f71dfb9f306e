use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use strata_merge::{merge_all, MergeConfig, MergeOptions};
use strata_value::{deep_equals, is_spreadable, TreeValue, ValueKind};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Merge(args) => {
            let merged = cmd_merge(&args)?;
            println!("{}", render(&merged, args.compact)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Equals(args) => {
            let equal = cmd_equals(&args)?;
            print_equals(equal, &cli.format)?;
            Ok(if equal { ExitCode::SUCCESS } else { ExitCode::from(1) })
        }
        Command::Classify(args) => {
            let report = cmd_classify(&args)?;
            print_classification(&report, &cli.format)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_document(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn load_config(path: &Path) -> anyhow::Result<MergeConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = if path.extension().is_some_and(|ext| ext == "json") {
        MergeConfig::from_json_str(&text)
    } else {
        MergeConfig::from_toml_str(&text)
    };
    config.with_context(|| format!("invalid config {}", path.display()))
}

/// Effective options: config file first, then command-line flags.
///
/// Without a config file the merge clones, the same way a settings layer
/// folds overrides into shared defaults.
fn merge_options(args: &MergeArgs) -> anyhow::Result<MergeOptions> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => MergeConfig {
            clone: true,
            ..Default::default()
        },
    };
    if let Some(mode) = args.array_merge {
        config.array_merge = mode;
    }
    if args.no_clone {
        config.clone = false;
    }
    tracing::debug!(?config, "effective merge config");
    Ok(config.to_options())
}

fn cmd_merge(args: &MergeArgs) -> anyhow::Result<TreeValue> {
    let options = merge_options(args)?;
    let documents = args
        .files
        .iter()
        .map(|path| load_document(path).map(TreeValue::from))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(merge_all(&documents, &options)?)
}

fn render(value: &TreeValue, compact: bool) -> anyhow::Result<String> {
    let json = value.to_json();
    Ok(if compact {
        serde_json::to_string(&json)?
    } else {
        serde_json::to_string_pretty(&json)?
    })
}

fn cmd_equals(args: &EqualsArgs) -> anyhow::Result<bool> {
    let left = TreeValue::from(load_document(&args.left)?);
    let right = TreeValue::from(load_document(&args.right)?);
    Ok(deep_equals(&left, &right))
}

fn print_equals(equal: bool, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "equal": equal })),
        OutputFormat::Text if equal => println!("{} Documents are structurally equal", "✓".green().bold()),
        OutputFormat::Text => println!("{} Documents differ", "✗".red().bold()),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct Classification {
    kind: ValueKind,
    spreadable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    len: Option<usize>,
}

fn cmd_classify(args: &ClassifyArgs) -> anyhow::Result<Classification> {
    let document = load_document(&args.file)?;
    let selected = match &args.pointer {
        Some(pointer) => document
            .pointer(pointer)
            .cloned()
            .with_context(|| format!("no value at {pointer} in {}", args.file.display()))?,
        None => document,
    };
    let value = TreeValue::from(selected);
    let len = match &value {
        TreeValue::Sequence(items) => Some(items.len()),
        TreeValue::Mapping(map) => Some(map.len()),
        _ => None,
    };
    Ok(Classification {
        kind: value.kind(),
        spreadable: is_spreadable(&value),
        len,
    })
}

fn print_classification(report: &Classification, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(report)?),
        OutputFormat::Text => {
            let spreadable = if report.spreadable { "spreadable".green() } else { "leaf".yellow() };
            match report.len {
                Some(len) => println!("{} ({}, {} entries)", report.kind.to_string().bold(), spreadable, len),
                None => println!("{} ({})", report.kind.to_string().bold(), spreadable),
            }
        }
    }
    Ok(())
}
