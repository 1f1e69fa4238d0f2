// ============================================================================
// clipforge-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides abstractions for spawning and interacting with FFmpeg
// processes. It defines traits and implementations for executing FFmpeg commands
// and handling their events and lifecycle.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
// - EngineProgress / drive_to_completion: event pump shared by all callers
//
// AI-ASSISTANT-INFO: FFmpeg process management and execution abstraction

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error, command_wait_error};
use crate::utils::parse_ffmpeg_time;
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::process::ExitStatus;

/// Progress reported by the engine while a command runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineProgress {
    /// Output timestamp reached so far, in seconds.
    pub time_secs: f64,
    /// Frames written so far.
    pub frame: u32,
    /// Processing speed relative to real time.
    pub speed: f32,
}

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = match self.0.iter() {
            Ok(iterator) => iterator,
            Err(e) => {
                log::error!("Failed to get ffmpeg event iterator: {}", e);
                // Reap the child so it does not outlive the failed command.
                if let Err(kill_err) = self.0.kill() {
                    log::debug!("Could not stop ffmpeg: {}", kill_err);
                }
                if let Err(wait_err) = self.0.wait() {
                    log::debug!("Could not reap ffmpeg: {}", wait_err);
                }
                return Err(event_stream_error(e));
            }
        };
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }
}

/// Error for a process whose event stream could not be read. No exit status
/// exists at that point, so this is not a `CommandFailed`.
fn event_stream_error(error: impl std::fmt::Display) -> CoreError {
    CoreError::OperationFailed(format!("could not read ffmpeg events: {error}"))
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg (sidecar)", e))
    }
}

// --- Event Pump ---

/// Drains the events of a running process, forwarding progress, then waits
/// for it and turns a non-zero exit into `CommandFailed`.
///
/// The failure message is the last error line ffmpeg printed.
pub fn drive_to_completion<P: FfmpegProcess>(
    process: &mut P,
    cmd_name: &str,
    on_progress: &mut dyn FnMut(EngineProgress),
) -> CoreResult<()> {
    let mut last_error: Option<String> = None;

    process.handle_events(|event| {
        match event {
            FfmpegEvent::Progress(progress) => {
                if let Some(time_secs) = parse_ffmpeg_time(&progress.time) {
                    on_progress(EngineProgress {
                        time_secs,
                        frame: progress.frame,
                        speed: progress.speed,
                    });
                }
            }
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) | FfmpegEvent::Error(line) => {
                log::debug!("{} error output: {}", cmd_name, line);
                last_error = Some(line);
            }
            FfmpegEvent::Log(LogLevel::Warning, line) => {
                log::debug!("{} warning: {}", cmd_name, line);
            }
            _ => {}
        }
        Ok(())
    })?;

    let status = process.wait()?;
    if !status.success() {
        log::error!("{} failed: {}", cmd_name, status);
        return Err(command_failed_error(
            cmd_name,
            status,
            last_error.unwrap_or_else(|| "no error output captured".to_string()),
        ));
    }
    Ok(())
}
