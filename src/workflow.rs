use crate::cli::RefreshAssetsArgs;
use crate::composer::ComposerProject;
use crate::mapping::MappingResolver;
use crate::output::ConsoleSink;
use crate::staging::StagingOrchestrator;
use crate::util::display_path;
use anyhow::Result;
use std::path::Path;

pub fn run_refresh_assets(working_dir: &Path, _args: RefreshAssetsArgs) -> Result<()> {
    let project = ComposerProject::load(working_dir)?;
    let mappings = MappingResolver::builtin();
    let mut sink = ConsoleSink;
    let report = StagingOrchestrator::new(&project, &mappings, &mut sink).run()?;
    for dir in &report.directories_removed {
        tracing::debug!(
            dir = %display_path(dir, Some(project.root())),
            "no assets staged"
        );
    }
    Ok(())
}
