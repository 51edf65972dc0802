use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use serde_json::json;
use vl_diff::{diff_documents_with_context, StructuralDiff};
use vl_path::{resolve, PathResolver, Resolution};
use vl_sdk::{search_lines, LensConfig};
use vl_types::Document;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let output = match cli.command {
        Command::Diff(args) => cmd_diff(&args, &config, cli.format)?,
        Command::Path(args) => cmd_path(&args, cli.format)?,
        Command::Search(args) => cmd_search(&args, cli.format)?,
        Command::Keys(args) => cmd_keys(&args, cli.format)?,
    };
    print!("{output}");
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<LensConfig> {
    let Some(path) = path else {
        return Ok(LensConfig::default());
    };
    let text = read_text(path)?;
    let config = LensConfig::from_toml_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(?config, "loaded config");
    Ok(config)
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

fn cmd_diff(args: &DiffArgs, config: &LensConfig, format: OutputFormat) -> anyhow::Result<String> {
    let old = read_text(&args.old)?;
    let new = read_text(&args.new)?;
    let context = args.context.unwrap_or(config.context_lines);
    let diff = diff_documents_with_context(&old, &new, context);

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&diff)? + "\n"),
        OutputFormat::Text => Ok(render_diff(
            &diff,
            &args.old.display().to_string(),
            &args.new.display().to_string(),
        )),
    }
}

fn render_diff(diff: &StructuralDiff, old_label: &str, new_label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Comparing {old_label} (old) → {new_label} (new)");
    if !diff.has_changes() {
        let _ = writeln!(out, "No changes.");
        return out;
    }
    let _ = writeln!(
        out,
        "Showing only changes ({} lines, +{} -{})\n",
        diff.len(),
        diff.additions(),
        diff.deletions()
    );
    for record in diff {
        let _ = writeln!(out, "{record}");
    }
    out
}

fn cmd_path(args: &PathArgs, format: OutputFormat) -> anyhow::Result<String> {
    let document = Document::parse(&read_text(&args.file)?);
    let index = document.index_of_line_number(args.line)?;
    let resolution = resolve(document.lines(), index);

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
            "line": args.line,
            "resolution": resolution,
        }))? + "\n"),
        OutputFormat::Text => Ok(match resolution {
            Resolution::Resolved(path) => format!("{path}\n"),
            Resolution::Unresolved => "(no path)\n".to_string(),
        }),
    }
}

fn cmd_search(args: &SearchArgs, format: OutputFormat) -> anyhow::Result<String> {
    let document = Document::parse(&read_text(&args.file)?);
    let matches = search_lines(document.lines(), &args.query);

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&matches)? + "\n"),
        OutputFormat::Text => {
            if matches.is_empty() {
                return Ok(format!("No matches for {:?}.\n", args.query));
            }
            let mut out = String::new();
            for (i, m) in matches.iter().enumerate() {
                let _ = writeln!(out, "Match {}/{}  {}", i + 1, matches.len(), m.location);
            }
            Ok(out)
        }
    }
}

fn cmd_keys(args: &KeysArgs, format: OutputFormat) -> anyhow::Result<String> {
    let document = Document::parse(&read_text(&args.file)?);
    let paths: Vec<(usize, String)> = PathResolver::new(&document).keyed_paths().collect();

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = paths
                .iter()
                .map(|(index, path)| json!({ "line": index + 1, "path": path }))
                .collect();
            Ok(serde_json::to_string_pretty(&entries)? + "\n")
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for (index, path) in &paths {
                let _ = writeln!(out, "{:>5}  {path}", index + 1);
            }
            Ok(out)
        }
    }
}
