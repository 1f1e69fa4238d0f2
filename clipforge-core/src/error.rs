// ============================================================================
// clipforge-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types and Helper Constructors
//
// This module defines the error type shared by every clipforge-core component.
// Failures of the three pipeline phases (staging, engine invocation, output
// retrieval) each have their own variant so callers can decide how to surface
// them.
//
// AI-ASSISTANT-INFO: Error types and constructor helpers for clipforge-core

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors produced by clipforge-core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The media source could not be read or written into the engine workspace.
    #[error("Failed to stage source: {0}")]
    Staging(String),

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed to wait for {0}: {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("{0} exited with {1}: {2}")]
    CommandFailed(String, ExitStatus, String),

    /// The engine finished but the declared output does not exist.
    #[error("Engine output '{0}' not found")]
    OutputMissing(String),

    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required dependency '{0}' not found")]
    DependencyNotFound(String),

    #[error("ffprobe error: {0}")]
    FfprobeParse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to deliver artifact: {0}")]
    Delivery(String),

    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for clipforge-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a [`CoreError::CommandStart`] for a command that could not be spawned.
pub fn command_start_error(cmd_name: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd_name.into(), err)
}

/// Builds a [`CoreError::CommandWait`] for a command whose exit could not be collected.
pub fn command_wait_error(cmd_name: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd_name.into(), err)
}

/// Builds a [`CoreError::CommandFailed`] for a command that exited unsuccessfully.
pub fn command_failed_error(
    cmd_name: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(cmd_name.into(), status, stderr.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let err: CoreError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, CoreError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: gone");
    }

    #[test]
    fn test_command_failed_message_includes_stderr() {
        let err = command_failed_error("ffmpeg", ExitStatus::default(), "Invalid argument");
        let message = err.to_string();
        assert!(message.starts_with("ffmpeg exited with"));
        assert!(message.ends_with("Invalid argument"));
    }
}
