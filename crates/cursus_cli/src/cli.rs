//! Command-line surface.
//!
//! # Responsibility
//! - Declare global flags and subcommands with clap derive.
//! - Convert flag strings into core types at parse time.

use clap::{ArgGroup, Args, Parser, Subcommand};
use cursus_core::{NodeStatus, StatusFilter};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "cursus",
    version,
    about = "Reconcile campus records with the curriculum and lay out project roadmaps."
)]
pub struct Cli {
    /// Log level (`error`, `warn`, `info`, `debug`, `trace`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Write rolling log files into this directory instead of stderr.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconcile a campus `projects_users` export against the curriculum.
    Reconcile(ReconcileArgs),
    /// Parse a roadmap diagram and print its layered layout.
    Layout(LayoutArgs),
    /// Summarize submodule progress of one multi-part project.
    Progress(ProgressArgs),
    /// List roadmaps bundled with this build.
    Roadmaps,
    /// Read or update per-session roadmap node statuses.
    NodeStatus(NodeStatusArgs),
}

#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// JSON array of campus project records.
    #[arg(long)]
    pub records: PathBuf,

    /// Curriculum JSON replacing the bundled table.
    #[arg(long)]
    pub curriculum: Option<PathBuf>,

    /// Only show projects with this status.
    #[arg(long, default_value = "all", value_parser = parse_status_filter)]
    pub status: StatusFilter,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["project", "diagram"])))]
pub struct LayoutArgs {
    /// Bundled roadmap id.
    #[arg(long)]
    pub project: Option<String>,

    /// File containing flowchart source.
    #[arg(long)]
    pub diagram: Option<PathBuf>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProgressArgs {
    /// JSON array of campus project records.
    #[arg(long)]
    pub records: PathBuf,

    /// Submodule base slug, e.g. `python-module`.
    #[arg(long)]
    pub slug: String,

    /// Number of submodules.
    #[arg(long)]
    pub modules: u32,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct NodeStatusArgs {
    /// SQLite database file; created when missing.
    #[arg(long)]
    pub db: PathBuf,

    #[arg(long)]
    pub session: Uuid,

    #[arg(long)]
    pub project: String,

    /// Node to read or update; omit to list the whole project.
    #[arg(long)]
    pub node: Option<String>,

    /// New status for `--node`.
    #[arg(long, requires = "node", conflicts_with = "delete", value_parser = parse_node_status)]
    pub set: Option<NodeStatus>,

    /// Remove the stored status of `--node`.
    #[arg(long, requires = "node")]
    pub delete: bool,
}

fn parse_status_filter(value: &str) -> Result<StatusFilter, String> {
    StatusFilter::parse(value).ok_or_else(|| {
        format!("unknown status `{value}`; expected all, completed, in-progress, failed or upcoming")
    })
}

fn parse_node_status(value: &str) -> Result<NodeStatus, String> {
    NodeStatus::parse(value).ok_or_else(|| {
        format!("unknown status `{value}`; expected not_started, in_progress, completed or skipped")
    })
}
