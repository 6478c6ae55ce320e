//! Subcommand handlers.
//!
//! Handlers read inputs, call into `cursus_core` and print results; they hold
//! no domain logic of their own.

use crate::cli::{Command, LayoutArgs, NodeStatusArgs, ProgressArgs, ReconcileArgs};
use crate::error::{CliError, CliResult};
use cursus_core::catalog::{default_roadmaps, load_curriculum_file};
use cursus_core::db::open_db;
use cursus_core::diagram::{layout_diagram, parse_diagram, Layout, LayoutConfig};
use cursus_core::progress::module_states_from_records;
use cursus_core::{
    compute_progress, decode_campus_records, default_curriculum, filter_cursus_records,
    Curriculum, Dashboard, DashboardService, DisplayProject, DisplayStatus, NodeStatusService,
    SqliteNodeStatusRepository, StatusFilter,
};
use log::info;
use serde::Serialize;
use std::borrow::Cow;
use std::fs;
use std::path::Path;

pub fn run(command: Command) -> CliResult<()> {
    match command {
        Command::Reconcile(args) => run_reconcile(args),
        Command::Layout(args) => run_layout(args),
        Command::Progress(args) => run_progress(args),
        Command::Roadmaps => run_roadmaps(),
        Command::NodeStatus(args) => run_node_status(args),
    }
}

fn read_input(path: &Path) -> CliResult<String> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct ReconcileOutput<'a> {
    #[serde(flatten)]
    dashboard: &'a Dashboard,
    visible: Vec<DisplayProject>,
}

fn run_reconcile(args: ReconcileArgs) -> CliResult<()> {
    let custom: Option<Curriculum> = match &args.curriculum {
        Some(path) => Some(load_curriculum_file(path)?),
        None => None,
    };
    let curriculum = custom.as_ref().unwrap_or_else(|| default_curriculum());

    let payload = read_input(&args.records)?;
    let dashboard = DashboardService::new(curriculum).build_from_payload(&payload)?;
    let visible = dashboard.visible(args.status);
    info!(
        "event=cli_reconcile module=cli status=ok projects={} visible={}",
        dashboard.projects.len(),
        visible.len()
    );

    if args.json {
        return print_json(&ReconcileOutput {
            dashboard: &dashboard,
            visible,
        });
    }

    let mut current_circle = None;
    for project in &visible {
        if current_circle != Some(project.circle) {
            let title = curriculum
                .circle(project.circle)
                .map_or(Cow::Owned(format!("Circle {}", project.circle)), |circle| {
                    Cow::Borrowed(circle.name.as_str())
                });
            println!("\n{title}");
            current_circle = Some(project.circle);
        }
        println!("  {}", format_project(project));
    }

    let counts = dashboard.counts;
    println!(
        "\nprojects: {} completed, {} in progress, {} failed, {} upcoming",
        counts.completed, counts.in_progress, counts.failed, counts.upcoming
    );
    let stats = dashboard.stats;
    println!(
        "records:  {} total, {} passed, {} failed, {} active",
        stats.total, stats.completed, stats.failed, stats.in_progress
    );
    if args.status != StatusFilter::All {
        println!("showing {} of {}", visible.len(), counts.all);
    }
    Ok(())
}

fn format_project(project: &DisplayProject) -> String {
    let mut line = format!("[{:<11}] {}", project.status.as_str(), project.name);
    if project.is_exam {
        line.push_str(" (exam)");
    }
    if let Some(progress) = project.progress {
        line.push_str(&format!(" {progress}%"));
    }
    if let (DisplayStatus::Completed | DisplayStatus::Failed, Some(mark)) =
        (project.status, project.final_mark)
    {
        line.push_str(&format!(" mark={mark}"));
    }
    line
}

fn run_layout(args: LayoutArgs) -> CliResult<()> {
    let source = match (&args.project, &args.diagram) {
        (Some(project), _) => {
            let roadmap = default_roadmaps()
                .roadmap(project)
                .ok_or_else(|| CliError::UnknownRoadmap(project.clone()))?;
            roadmap.diagram.clone()
        }
        (None, Some(path)) => read_input(path)?,
        (None, None) => String::new(),
    };

    let diagram = parse_diagram(&source);
    let layout = layout_diagram(&diagram, &LayoutConfig::default());
    if args.json {
        return print_json(&layout);
    }

    print_layout(&layout);
    println!(
        "edges: {}  bounds: ({}, {}) .. ({}, {})",
        diagram.edges.len(),
        layout.bounds.min_x,
        layout.bounds.min_y,
        layout.bounds.max_x,
        layout.bounds.max_y
    );
    Ok(())
}

fn print_layout(layout: &Layout) {
    let mut current_layer = None;
    for placed in &layout.nodes {
        if current_layer != Some(placed.layer) {
            println!("layer {}:", placed.layer);
            current_layer = Some(placed.layer);
        }
        println!(
            "  {:<16} {:<40} x={:>8.1} y={:>8.1}",
            placed.node.id, placed.node.label, placed.x, placed.y
        );
    }
}

fn run_progress(args: ProgressArgs) -> CliResult<()> {
    let records = filter_cursus_records(decode_campus_records(&read_input(&args.records)?)?);
    let states = module_states_from_records(&args.slug, args.modules, &records);
    let summary = compute_progress(&args.slug, args.modules, &states);

    if args.json {
        return print_json(&summary);
    }
    println!(
        "{}: {}/{} completed, {} in progress ({}%)",
        args.slug, summary.completed, summary.total, summary.in_progress, summary.percentage
    );
    Ok(())
}

fn run_roadmaps() -> CliResult<()> {
    let catalog = default_roadmaps();
    for id in catalog.ids() {
        if let Some(roadmap) = catalog.roadmap(id) {
            println!("{id:<24} {}", roadmap.project_title);
        }
    }
    Ok(())
}

fn run_node_status(args: NodeStatusArgs) -> CliResult<()> {
    let conn = open_db(&args.db)?;
    let service = NodeStatusService::new(SqliteNodeStatusRepository::try_new(&conn)?);

    let Some(node) = args.node.as_deref() else {
        for entry in service.project_statuses(args.session, &args.project)? {
            println!("{:<24} {}", entry.node_id, entry.status);
        }
        if let Some(roadmap) = default_roadmaps().roadmap(&args.project) {
            let summary = service.project_progress(args.session, &roadmap)?;
            println!(
                "progress: {}/{} ({}%)",
                summary.completed, summary.total, summary.percentage
            );
        }
        return Ok(());
    };

    if args.delete {
        let removed = service.reset_status(args.session, &args.project, node)?;
        println!("{node}: {}", if removed { "reset" } else { "unchanged" });
        return Ok(());
    }

    let status = match args.set {
        Some(status) => service.set_status(args.session, &args.project, node, status)?.status,
        None => service.status(args.session, &args.project, node)?,
    };
    println!("{node}: {status}");
    Ok(())
}
