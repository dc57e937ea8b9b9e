//! Result emission: GitHub Actions outputs and the console report

use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::BTreeSet;
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::graph::BuildOrder;

/// Append the three output keys to the GITHUB_OUTPUT file if the
/// environment provides one (i.e. when running inside a workflow step)
pub fn emit_github_outputs(affected: &BTreeSet<String>, order: &BuildOrder) -> Result<()> {
    if let Ok(path) = env::var("GITHUB_OUTPUT") {
        write_github_outputs(Path::new(&path), affected, order)?;
    }

    Ok(())
}

/// Write `modified_packages`, `ordered_changes`, and `has_nuspec` as
/// key=value lines in the workflow output format
pub fn write_github_outputs(
    path: &Path,
    affected: &BTreeSet<String>,
    order: &BuildOrder,
) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open output file {}", path.display()))?;

    let modified: Vec<&String> = affected.iter().collect();
    writeln!(file, "modified_packages={}", serde_json::to_string(&modified)?)?;
    writeln!(file, "ordered_changes={}", serde_json::to_string(&order.ordered)?)?;
    writeln!(file, "has_nuspec={}", order.has_nuspec)?;

    Ok(())
}

/// Print the human-facing summary of a resolution run
pub fn print_report(affected: &BTreeSet<String>, order: &BuildOrder) {
    if affected.is_empty() {
        println!("\n  {}", "No projects affected".dimmed());
        return;
    }

    println!("\n{}", "Affected projects:".bold());
    for id in affected {
        println!("  {} {}", "•".green(), id.cyan());
    }

    println!("\n{}", "Build order:".bold());
    for (i, id) in order.ordered.iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).dimmed(), id.cyan());
    }

    if order.has_nuspec {
        println!("\n  {} {}", "nuspec packaging:".dimmed(), "yes".yellow());
    }

    println!();
}
