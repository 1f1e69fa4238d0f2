//! Temporary file management utilities.
//!
//! This module provides helper functions for the engine workspace and for the
//! transient files used during delivery. It leverages the tempfile crate to
//! handle automatic cleanup via the Drop trait, ensuring proper cleanup even
//! in error cases.

use crate::config::{CoreConfig, ENGINE_WORKSPACE_PREFIX};
use crate::error::CoreResult;
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use std::path::Path;
use tempfile::{Builder as TempFileBuilder, NamedTempFile, TempDir};

/// Length of the random suffix appended to generated names.
const RANDOM_SUFFIX_LEN: usize = 10;

/// Creates the engine workspace directory. Auto-cleaned when dropped.
pub fn create_workspace_dir(config: &CoreConfig) -> CoreResult<TempDir> {
    let base = config.workspace_base();
    std::fs::create_dir_all(&base)?;

    Ok(TempFileBuilder::new()
        .prefix(ENGINE_WORKSPACE_PREFIX)
        .tempdir_in(base)?)
}

/// Creates a temporary file with prefix and extension. Auto-deleted when dropped.
pub fn create_temp_file(dir: &Path, prefix: &str, extension: &str) -> CoreResult<NamedTempFile> {
    std::fs::create_dir_all(dir)?;
    let temp_file = TempFileBuilder::new()
        .prefix(&format!("{prefix}_"))
        .suffix(&format!(".{extension}"))
        .tempfile_in(dir)?;

    Ok(temp_file)
}

/// Returns a file name with a random suffix, e.g. `input_3fQz9aLk0B.mp4`.
pub fn unique_file_name(prefix: &str, extension: &str) -> String {
    let random_suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(char::from)
        .collect();

    format!("{prefix}_{random_suffix}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_file_name_shape() {
        let name = unique_file_name("input", "mp4");
        assert!(name.starts_with("input_"));
        assert!(name.ends_with(".mp4"));
        assert_eq!(name.len(), "input_".len() + RANDOM_SUFFIX_LEN + ".mp4".len());
    }

    #[test]
    fn test_unique_file_names_differ() {
        assert_ne!(unique_file_name("output", "gif"), unique_file_name("output", "gif"));
    }

    #[test]
    fn test_workspace_dir_is_removed_on_drop() {
        let base = tempfile::tempdir().unwrap();
        let mut config = CoreConfig::default();
        config.temp_dir = Some(base.path().join("nested"));

        let workspace = create_workspace_dir(&config).unwrap();
        let path = workspace.path().to_path_buf();
        assert!(path.is_dir());
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with(ENGINE_WORKSPACE_PREFIX)
        );

        drop(workspace);
        assert!(!path.exists());
    }

    #[test]
    fn test_create_temp_file_in_missing_dir() {
        let base = tempfile::tempdir().unwrap();
        let dir = base.path().join("downloads");
        let file = create_temp_file(&dir, "partial", "gif").unwrap();
        assert!(file.path().starts_with(&dir));
        assert!(file.path().to_string_lossy().ends_with(".gif"));
    }
}
