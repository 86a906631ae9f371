//! Error adapter for converting [`CliError`] to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Waymark errors
//! carry no source spans, so a diagnostic is a code plus, where the fix is
//! predictable, a help line.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, GraphicalReportHandler};

use waymark::{WaymarkError, connection::ConnectionError, play::PlayError, source};

use crate::error::CliError;

/// Adapter rendering a [`CliError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            CliError::Waymark(err) => match err {
                WaymarkError::Source(_) => "waymark::fetch",
                WaymarkError::Store(_) => "waymark::store",
                WaymarkError::Connection(_) => "waymark::connection",
                WaymarkError::Play(_) => "waymark::play",
            },
            CliError::Config(_) => "waymark::config",
            CliError::MissingFlowchart(_) => "waymark::missing_flowchart",
            CliError::Io(_) => "waymark::io",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            CliError::Waymark(WaymarkError::Source(source::Error::UnknownCampaign(_))) => {
                "export the campaign snapshot into the data directory as `<campaign_id>.json`"
            }
            CliError::Waymark(WaymarkError::Connection(ConnectionError::Disallowed { .. })) => {
                "bottom -> top connects any two nodes; side connections go from a right handle to a left handle"
            }
            CliError::Waymark(WaymarkError::Play(PlayError::MissingStart)) => {
                "run `waymark sync` to rebuild the flowchart"
            }
            CliError::Waymark(WaymarkError::Play(PlayError::DeadEnd(_))) => {
                "route entries must be node ids of the flowchart, such as `location-1`"
            }
            CliError::MissingFlowchart(_) => "run `waymark sync --campaign <id>` first",
            CliError::Config(_) => "check the file against the `[layout]` and `[storage]` sections",
            _ => return None,
        };
        Some(Box::new(help))
    }
}

/// Renders `err` as a report, falling back to its plain message if the
/// handler fails.
pub fn render(handler: &GraphicalReportHandler, err: &CliError) -> String {
    let mut rendered = String::new();
    match handler.render_report(&mut rendered, &ErrorAdapter(err)) {
        Ok(()) => rendered,
        Err(_) => format!("Error: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark::{
        entity::CampaignId,
        flowchart::{Handle, NodeKind},
    };

    fn code(err: &CliError) -> String {
        ErrorAdapter(err).code().unwrap().to_string()
    }

    #[test]
    fn test_codes() {
        let err = CliError::MissingFlowchart("main".to_string());
        assert_eq!(code(&err), "waymark::missing_flowchart");

        let err = CliError::from(WaymarkError::from(PlayError::MissingStart));
        assert_eq!(code(&err), "waymark::play");
    }

    #[test]
    fn test_fetch_error_help() {
        let err = CliError::from(WaymarkError::from(source::Error::UnknownCampaign(
            CampaignId(3),
        )));
        let adapter = ErrorAdapter(&err);
        assert_eq!(adapter.to_string(), "Fetch error: campaign 3 not found");
        assert_eq!(code(&err), "waymark::fetch");
        assert!(adapter.help().is_some());
    }

    #[test]
    fn test_disallowed_connection_help() {
        let err = CliError::from(WaymarkError::from(ConnectionError::Disallowed {
            source_kind: NodeKind::Npc,
            source_handle: Handle::Top,
            target_kind: NodeKind::Location,
            target_handle: Handle::Bottom,
        }));
        let adapter = ErrorAdapter(&err);
        assert_eq!(
            adapter.to_string(),
            "Connection error: cannot connect npc (top) to location (bottom)"
        );
        assert!(adapter.help().is_some());
    }

    #[test]
    fn test_render_includes_code_and_help() {
        let handler = GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor());
        let err = CliError::MissingFlowchart("main".to_string());

        let report = render(&handler, &err);
        assert!(report.contains("waymark::missing_flowchart"), "{report}");
        assert!(report.contains("flowchart `main` has not been synced yet"), "{report}");
        assert!(report.contains("waymark sync --campaign <id>"), "{report}");
    }

    #[test]
    fn test_io_error_has_no_help() {
        let err = CliError::from(std::io::Error::other("disk full"));
        assert!(ErrorAdapter(&err).help().is_none());
    }
}
