// ============================================================================
// clipforge-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with the ffmpeg Engine
//
// This module encapsulates everything that talks to the external transcoding
// engine: the adapter contract used by the clip pipeline, the ffmpeg-backed
// implementation, process spawning, command building and dependency checks.
//
// KEY COMPONENTS:
// - EngineAdapter trait and FfmpegEngine implementation
// - FfmpegSpawner / FfmpegProcess traits with the ffmpeg-sidecar implementation
// - FfmpegCommandBuilder and VideoFilterChain
// - Dependency checking functions
//
// DESIGN PHILOSOPHY:
// Consumers can provide their own implementations of the traits for testing
// or specialized behavior. The default implementations use ffmpeg-sidecar.
//
// AI-ASSISTANT-INFO: Engine adapter and ffmpeg process abstractions

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::io;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Engine adapter contract and the ffmpeg-backed implementation
pub mod engine;

/// Builders for ffmpeg commands and filter chains
pub mod ffmpeg_builder;

/// Traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Mock engine, spawner and event recorder for tests
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use engine::{EngineAdapter, FfmpegEngine};
pub use ffmpeg_executor::{
    EngineProgress, FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner,
};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if a required external command is available and executable.
///
/// Runs the command with `-version` and only looks at whether it could be
/// started.
pub(crate) fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}

/// Checks that the ffmpeg binary used by [`FfmpegEngine`] can be run.
pub fn check_ffmpeg() -> CoreResult<()> {
    check_dependency(&ffmpeg_sidecar::paths::ffmpeg_path().to_string_lossy())
}

/// Checks that ffprobe, used for duration probing, can be run.
pub fn check_ffprobe() -> CoreResult<()> {
    check_dependency("ffprobe")
}
