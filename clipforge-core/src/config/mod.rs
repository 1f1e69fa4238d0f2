//! Configuration structures and constants for the clipforge-core library.
//!
//! This module provides the settings that control where the engine keeps its
//! private workspace and how finished artifacts are handed to the user.

mod builder;

use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;

pub use builder::CoreConfigBuilder;

// Default constants

/// Prefix of the temporary directory used as the engine workspace.
pub const ENGINE_WORKSPACE_PREFIX: &str = "clipforge_engine_";

/// Prefix of transient files created while delivering an artifact.
pub const DOWNLOAD_TEMP_PREFIX: &str = ".clipforge_download";

/// Default directory for delivered artifacts.
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// How a finished artifact is handed to the user.
///
/// The same strategy applies to every operation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryStrategy {
    /// Save the artifact under its fixed file name in the output directory.
    #[default]
    File,
    /// Write the artifact as a `data:` URL to standard output.
    DataUrl,
}

/// Main configuration structure for the clipforge-core library.
///
/// # Examples
///
/// ```rust
/// use clipforge_core::config::{CoreConfigBuilder, DeliveryStrategy};
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .output_dir(PathBuf::from("/path/to/output"))
///     .temp_dir(PathBuf::from("/path/to/scratch"))
///     .delivery(DeliveryStrategy::DataUrl)
///     .build();
/// assert_eq!(config.delivery, DeliveryStrategy::DataUrl);
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory where delivered artifacts are saved
    pub output_dir: PathBuf,

    /// Optional base directory for the engine workspace (defaults to the system temp dir)
    pub temp_dir: Option<PathBuf>,

    /// Delivery strategy for finished artifacts
    pub delivery: DeliveryStrategy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            temp_dir: None,
            delivery: DeliveryStrategy::default(),
        }
    }
}

impl CoreConfig {
    /// Creates a configuration that saves artifacts into `output_dir`.
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            ..Self::default()
        }
    }

    /// Base directory under which the engine workspace is created.
    pub fn workspace_base(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Validates that configured directories are usable.
    ///
    /// Directories that do not exist yet are accepted; they are created on demand.
    pub fn validate(&self) -> CoreResult<()> {
        if self.output_dir.is_file() {
            return Err(CoreError::Config(format!(
                "Output directory '{}' is an existing file",
                self.output_dir.display()
            )));
        }
        if let Some(temp_dir) = &self.temp_dir {
            if temp_dir.is_file() {
                return Err(CoreError::Config(format!(
                    "Temporary directory '{}' is an existing file",
                    temp_dir.display()
                )));
            }
        }
        Ok(())
    }
}
