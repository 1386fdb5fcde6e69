//! Overlap checks between the output directory and per-package targets.
//!
//! Runs before anything on disk is touched: every destination directory is
//! wiped at the start of a run, so nested or shared targets would destroy
//! each other's content.
use crate::error::StageError;
use crate::paths::dir_key;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const OUTPUT_DIR_LABEL: &str = "the assets directory";

/// Reject equal or nested directories among `output_dir` and `targets`.
pub fn validate_targets(
    output_dir: &Path,
    targets: &BTreeMap<String, PathBuf>,
) -> Result<(), StageError> {
    let mut participants = vec![(OUTPUT_DIR_LABEL.to_string(), dir_key(output_dir))];
    participants.extend(
        targets
            .iter()
            .map(|(package, target)| (format!("package '{package}'"), dir_key(target))),
    );

    for (index, (first, first_key)) in participants.iter().enumerate() {
        for (second, second_key) in &participants[index + 1..] {
            if first_key.starts_with(second_key.as_str())
                || second_key.starts_with(first_key.as_str())
            {
                return Err(StageError::ConfigurationConflict {
                    first: first.clone(),
                    first_path: first_key.clone(),
                    second: second.clone(),
                    second_path: second_key.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "conflict_tests.rs"]
mod tests;
