//! `hyde routes` command implementation.

use clap::Args;
use hyde_site::{ErrorMode, PageKind, RouteEntry};

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the routes command.
#[derive(Args)]
pub(crate) struct RoutesArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Only list routes of this page kind.
    #[arg(short, long)]
    kind: Option<String>,

    /// Print routes as JSON.
    #[arg(long)]
    json: bool,
}

impl RoutesArgs {
    /// Execute the routes command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or any page fails to build.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let kind = self.kind.as_deref().map(parse_kind).transpose()?;

        let build = self.site.load()?.build(ErrorMode::FailFast)?;
        let entries: Vec<&RouteEntry> = build
            .routes
            .entries()
            .iter()
            .filter(|entry| kind.is_none_or(|kind| entry.kind == kind))
            .collect();

        if self.json {
            output.print(&serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        let width = entries
            .iter()
            .map(|entry| entry.route_key.len())
            .max()
            .unwrap_or(0);
        for entry in &entries {
            output.print(&format_route(entry, width));
        }
        output.summary(&format!("{} routes", entries.len()));
        Ok(())
    }
}

/// Page kind from its lowercase name.
fn parse_kind(name: &str) -> Result<PageKind, CliError> {
    PageKind::ALL
        .into_iter()
        .find(|kind| kind.name() == name)
        .ok_or_else(|| {
            let known: Vec<&str> = PageKind::ALL.iter().map(|kind| kind.name()).collect();
            CliError::Validation(format!(
                "unknown page kind '{name}' (expected one of: {})",
                known.join(", ")
            ))
        })
}

/// One table row: route key, kind and public URI.
fn format_route(entry: &RouteEntry, width: usize) -> String {
    format!(
        "{:<width$}  {:<13}  /{}",
        entry.route_key,
        entry.kind.name(),
        entry.uri_path
    )
}
