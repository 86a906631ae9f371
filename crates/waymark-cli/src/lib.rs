//! CLI logic for the Waymark flowchart tool.
//!
//! Entity snapshots are read from `<data_dir>/<campaign_id>.json` and
//! flowcharts are stored as `<flowchart_dir>/<name>.json`, both directories
//! taken from the configuration.

pub mod error_adapter;

mod args;
mod config;
mod error;

pub use args::{Args, Command};
pub use config::ConfigError;
pub use error::CliError;

use std::io::Write;

use log::info;

use waymark::{
    Flowchart, FlowchartBuilder, WaymarkError, Workspace,
    entity::CampaignId,
    flowchart::{Handle, Node},
    identifier::Id,
    play::PlaySession,
    source::JsonDirSource,
    store::JsonFileStore,
};

type FileWorkspace = Workspace<JsonDirSource, JsonFileStore>;

/// Run the Waymark CLI application
///
/// Human-readable results are written to `out`; diagnostics go through the
/// logger.
///
/// # Errors
///
/// Returns `CliError` for:
/// - Configuration loading errors
/// - Missing or unreadable campaign snapshots
/// - Flowchart storage errors
/// - Refused connections
/// - Play sessions that reach a dead end
pub fn run(args: &Args, out: &mut impl Write) -> Result<(), CliError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let storage = app_config.storage();
    info!(
        data_dir = storage.data_dir().display().to_string(),
        flowchart_dir = storage.flowchart_dir().display().to_string();
        "Opening workspace"
    );

    let mut workspace = Workspace::new(
        FlowchartBuilder::new(app_config.clone()),
        JsonDirSource::new(storage.data_dir()),
        JsonFileStore::new(storage.flowchart_dir()),
    );

    match &args.command {
        Command::Sync {
            campaign,
            flowchart,
        } => sync(&mut workspace, CampaignId(*campaign), flowchart, out),
        Command::Play { flowchart, route } => play(&workspace, flowchart, route, out),
        Command::Connect {
            flowchart,
            source,
            source_handle,
            target,
            target_handle,
        } => connect(
            &mut workspace,
            flowchart,
            (source.as_str(), *source_handle),
            (target.as_str(), *target_handle),
            out,
        ),
    }
}

fn sync(
    workspace: &mut FileWorkspace,
    campaign: CampaignId,
    name: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut flowchart = workspace
        .load(name)?
        .unwrap_or_else(|| Flowchart::empty(name));
    let report = workspace.sync(&mut flowchart, campaign)?;
    workspace.save(&flowchart)?;

    writeln!(
        out,
        "Synced `{name}` from campaign {campaign}: {} nodes, {} edges, {} unlinked, {} skipped note links",
        report.nodes, report.edges, report.unlinked, report.skipped_links
    )?;
    Ok(())
}

fn play(
    workspace: &FileWorkspace,
    name: &str,
    route: &[String],
    out: &mut impl Write,
) -> Result<(), CliError> {
    let flowchart = load_existing(workspace, name)?;

    let mut session = PlaySession::start(flowchart.data()).map_err(WaymarkError::from)?;
    describe_stop(&session, out)?;
    for stop in route {
        session = session
            .move_to(Id::new(stop))
            .map_err(WaymarkError::from)?;
        describe_stop(&session, out)?;
    }

    if session.is_finished() {
        writeln!(out, "The adventure ends here.")?;
    }
    Ok(())
}

fn connect(
    workspace: &mut FileWorkspace,
    name: &str,
    (source, source_handle): (&str, Handle),
    (target, target_handle): (&str, Handle),
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut flowchart = load_existing(workspace, name)?;

    let edge_id = flowchart
        .connect(Id::new(source), source_handle, Id::new(target), target_handle)
        .map_err(WaymarkError::from)?
        .id();
    workspace.save(&flowchart)?;

    writeln!(out, "Added edge {edge_id}")?;
    Ok(())
}

fn load_existing(workspace: &FileWorkspace, name: &str) -> Result<Flowchart, CliError> {
    workspace
        .load(name)?
        .ok_or_else(|| CliError::MissingFlowchart(name.to_string()))
}

fn describe_stop(session: &PlaySession<'_>, out: &mut impl Write) -> Result<(), CliError> {
    let current = session.current();
    writeln!(out, "== {} ({})", current.label(), current.id())?;

    write_nodes(out, "next", &session.next_stops())?;
    let associated = session.associated();
    write_nodes(out, "npcs", &associated.npcs)?;
    write_nodes(out, "notes", &associated.notes)?;
    write_nodes(out, "encounters", &associated.encounters)?;
    Ok(())
}

fn write_nodes(out: &mut impl Write, heading: &str, nodes: &[&Node]) -> Result<(), CliError> {
    if nodes.is_empty() {
        return Ok(());
    }
    let entries: Vec<String> = nodes
        .iter()
        .map(|node| format!("{} ({})", node.label(), node.id()))
        .collect();
    writeln!(out, "   {heading}: {}", entries.join(", "))?;
    Ok(())
}
