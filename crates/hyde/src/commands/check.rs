//! `hyde check` command implementation.

use clap::Args;
use hyde_site::{ErrorMode, SiteBuild};

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub site: SiteArgs,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Builds every page, collecting per-file errors instead of stopping at
    /// the first one, then checks cross references in every page body.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or discovery fails, or if any page
    /// has problems.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let build = self.site.load()?.build(ErrorMode::Collect)?;
        output.info(&format!(
            "Built {} pages from {} sources",
            build.pages.len(),
            build.snapshot().len()
        ));

        let problems = collect_problems(&build);
        for problem in &problems {
            output.error(problem);
        }

        if problems.is_empty() {
            output.success(&format!(
                "Checked {} pages, {} routes: no problems found",
                build.pages.len(),
                build.routes.len()
            ));
            Ok(())
        } else {
            output.warning(&format!("{} sources skipped", build.errors.len()));
            Err(CliError::Validation(format!(
                "{} problem(s) found",
                problems.len()
            )))
        }
    }
}

/// Build errors followed by unresolved cross references, one line each.
fn collect_problems(build: &SiteBuild) -> Vec<String> {
    let mut problems: Vec<String> = build.errors.iter().map(ToString::to_string).collect();
    for page in &build.pages {
        if let Err(e) = build.rewrite(&page.body, page) {
            problems.push(e.to_string());
        }
    }
    problems
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use hyde_config::Config;
    use hyde_site::Site;
    use hyde_storage::FsStorage;
    use pretty_assertions::assert_eq;

    use super::*;

    fn build(root: &Path) -> SiteBuild {
        let config = Config::default_with_base(root);
        let storage = Arc::new(FsStorage::new(root.to_path_buf()));
        Site::new(&config, storage).build(ErrorMode::Collect).unwrap()
    }

    fn write(root: &Path, path: &str, content: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_clean_site_has_no_problems() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "_pages/index.md", "# Home\n\nSee hyde::route('about').");
        write(temp_dir.path(), "_pages/about.md", "# About");

        assert!(collect_problems(&build(temp_dir.path())).is_empty());
    }

    #[test]
    fn test_reports_build_errors_and_unknown_routes() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "_pages/index.md", "# Home\n\nSee hyde::route('missing').");
        write(temp_dir.path(), "_posts/broken.md", "---\ndate: someday\n---\n");

        let problems = collect_problems(&build(temp_dir.path()));

        assert_eq!(problems.len(), 2);
        assert!(problems[0].starts_with("_posts/broken.md"));
        assert_eq!(problems[1], "_pages/index.md:3: unknown route 'missing'");
    }
}
