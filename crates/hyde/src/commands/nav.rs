//! `hyde nav` command implementation.

use clap::Args;
use hyde_site::{ErrorMode, MenuTree, Sidebar, SiteBuild};
use serde::Serialize;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Route key of the current page; marks its sidebar group active.
    #[arg(short, long)]
    page: Option<String>,
}

/// Navigation trees as printed by the nav command.
#[derive(Serialize)]
struct Navigation {
    main_menu: MenuTree,
    sidebar: Sidebar,
}

impl NavArgs {
    /// Execute the nav command.
    ///
    /// # Errors
    ///
    /// Returns an error if the site fails to build or `--page` names an
    /// unknown route.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let build = self.site.load()?.build(ErrorMode::FailFast)?;

        let navigation = navigation(&build, self.page.as_deref())?;
        output.print(&serde_json::to_string_pretty(&navigation)?);
        Ok(())
    }
}

fn navigation(build: &SiteBuild, page: Option<&str>) -> Result<Navigation, CliError> {
    if let Some(route_key) = page
        && build.pages.get(route_key).is_none()
    {
        return Err(CliError::Validation(format!(
            "unknown page '{route_key}'"
        )));
    }
    Ok(Navigation {
        main_menu: build.main_menu(),
        sidebar: build.sidebar(page),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use hyde_config::Config;
    use hyde_site::Site;
    use hyde_storage::FsStorage;
    use pretty_assertions::assert_eq;

    use super::*;

    fn build() -> (tempfile::TempDir, SiteBuild) {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("_pages")).unwrap();
        fs::create_dir_all(root.join("_docs/guide")).unwrap();
        fs::write(root.join("_pages/index.md"), "# Home").unwrap();
        fs::write(root.join("_docs/guide/install.md"), "# Install").unwrap();

        let config = Config::default_with_base(root);
        let storage = Arc::new(FsStorage::new(root.to_path_buf()));
        let build = Site::new(&config, storage)
            .build(ErrorMode::FailFast)
            .unwrap();
        (temp_dir, build)
    }

    #[test]
    fn test_navigation_marks_current_group() {
        let (_temp_dir, build) = build();

        let navigation = navigation(&build, Some("docs/guide/install")).unwrap();

        assert_eq!(navigation.main_menu.items.len(), 1);
        assert_eq!(navigation.main_menu.items[0].label, "Home");
        assert_eq!(navigation.sidebar.groups.len(), 1);
        assert!(navigation.sidebar.groups[0].active);
    }

    #[test]
    fn test_navigation_unknown_page() {
        let (_temp_dir, build) = build();

        let err = navigation(&build, Some("docs/missing")).err().unwrap();

        assert_eq!(err.to_string(), "unknown page 'docs/missing'");
    }
}
