use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use changeplan::config::Config;
use changeplan::git::GitDiff;
use changeplan::graph::{detect_affected, resolve_order};
use changeplan::{github, output};

const CONFIG_FILE: &str = "changeplan.toml";

#[derive(Parser)]
#[command(name = "changeplan")]
#[command(about = "Detects changed projects and orders dependent builds for CI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project map: inline JSON, a JSON file, or a TOML file (default: changeplan.toml)
    #[arg(short, long, global = true)]
    projects: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect changed projects in the current pull request and emit workflow outputs
    Detect {
        /// GitHub API token (defaults to GITHUB_TOKEN)
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Detect changed projects from the local repository history
    Diff {
        /// Base revision to compare against
        #[arg(short, long)]
        base: String,

        /// Head revision
        #[arg(long, default_value = "HEAD")]
        head: String,

        /// Also include uncommitted working-tree changes
        #[arg(short, long)]
        uncommitted: bool,
    },

    /// Resolve an explicitly given change set
    Resolve {
        /// Changed file path (repeatable)
        #[arg(short, long = "file", required = true)]
        files: Vec<String>,
    },

    /// List the configured projects
    List,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_arg(cli.projects.as_deref().unwrap_or(CONFIG_FILE))?;

    match cli.command {
        Commands::Detect { token } => cmd_detect(&config, token),
        Commands::Diff {
            base,
            head,
            uncommitted,
        } => cmd_diff(&config, &base, &head, uncommitted),
        Commands::Resolve { files } => plan_and_emit(&config, &files),
        Commands::List => cmd_list(&config),
    }
}

#[tokio::main]
async fn cmd_detect(config: &Config, token: Option<String>) -> Result<()> {
    let token = github::resolve_token(token)?;
    let event = github::current_event()?;
    let changed_files = github::fetch_changed_files(&token, &event).await?;

    plan_and_emit(config, &changed_files)
}

fn cmd_diff(config: &Config, base: &str, head: &str, uncommitted: bool) -> Result<()> {
    let repo_dir = std::env::current_dir()?;
    let diff = GitDiff::new(&repo_dir)?;

    let mut changed_files = diff.changed_between(base, head)?;
    if uncommitted {
        changed_files.extend(diff.uncommitted()?);
        changed_files.sort();
        changed_files.dedup();
    }

    plan_and_emit(config, &changed_files)
}

fn plan_and_emit(config: &Config, changed_files: &[String]) -> Result<()> {
    let affected = detect_affected(config, changed_files);
    let order = resolve_order(config, &affected)?;

    output::emit_github_outputs(&affected, &order)?;
    output::print_report(&affected, &order);

    Ok(())
}

fn cmd_list(config: &Config) -> Result<()> {
    if config.projects.is_empty() {
        println!("\n  {}", "No projects configured".dimmed());
        return Ok(());
    }

    println!("\n{}", "Projects:".bold());

    for id in config.project_ids() {
        let project = &config.projects[id];
        println!("  {} {}", "•".green(), id.cyan());
        println!("    {} {}", "path:".dimmed(), project.path);

        if !project.patterns.is_empty() {
            println!(
                "    {} {}",
                "patterns:".dimmed(),
                project.patterns.join(", ")
            );
        }

        if !project.dependencies.is_empty() {
            println!(
                "    {} {}",
                "dependencies:".dimmed(),
                project.dependencies.join(", ")
            );
        }

        println!();
    }

    Ok(())
}
