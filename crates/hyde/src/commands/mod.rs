//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod nav;
pub(crate) mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use hyde_config::{CliSettings, Config};
use hyde_site::Site;
use hyde_storage::FsStorage;

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use nav::NavArgs;
pub(crate) use routes::RoutesArgs;

/// Arguments shared by every command that loads a site.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover hyde.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project root directory (overrides config).
    #[arg(short = 'C', long)]
    project_dir: Option<PathBuf>,

    /// Drop `.html` from public URIs (overrides config).
    #[arg(long)]
    pretty_urls: Option<bool>,

    /// Keep `.html` in public URIs.
    #[arg(long, conflicts_with = "pretty_urls")]
    no_pretty_urls: bool,

    /// Enable verbose output (discovery and timing logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl SiteArgs {
    /// Load configuration and create the page pipeline.
    pub(crate) fn load(&self) -> Result<Site, CliError> {
        let cli_settings = CliSettings {
            project_dir: self.project_dir.clone(),
            pretty_urls: self.resolve_pretty_urls(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::info!(project_dir = %config.project_dir.display(), "Loaded configuration");

        let storage = Arc::new(FsStorage::new(config.project_dir.clone()));
        Ok(Site::new(&config, storage))
    }

    /// Resolve `pretty_urls` from --pretty-urls/--no-pretty-urls flags.
    fn resolve_pretty_urls(&self) -> Option<bool> {
        self.no_pretty_urls.then_some(false).or(self.pretty_urls)
    }
}
