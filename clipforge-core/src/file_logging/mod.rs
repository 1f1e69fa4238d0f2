//! Logging of pipeline events to the `log` facade, plus log4rs file setup.

pub mod setup;

use crate::events::{Event, EventHandler, ExportStatus};
use crate::utils::format_bytes;
use log::{debug, error, info};
use std::sync::Mutex;

/// Progress is logged every time it crosses one of these steps.
const PROGRESS_LOG_STEP: u32 = 25;

/// Event handler writing a readable trail of each export to the log.
pub struct FileLoggingHandler {
    last_logged_step: Mutex<u32>,
}

impl Default for FileLoggingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl FileLoggingHandler {
    pub fn new() -> Self {
        Self {
            last_logged_step: Mutex::new(0),
        }
    }

    /// Records `step` if it is past the last logged one.
    fn advance_to(&self, step: u32) -> bool {
        match self.last_logged_step.lock() {
            Ok(mut last) if step > *last => {
                *last = step;
                true
            }
            _ => false,
        }
    }

    pub fn reset_progress_state(&self) {
        if let Ok(mut last) = self.last_logged_step.lock() {
            *last = 0;
        }
    }
}

impl EventHandler for FileLoggingHandler {
    fn handle(&self, event: &Event) {
        match event {
            Event::ExportStarted { mode, source } => {
                self.reset_progress_state();
                info!("Starting {} of {}", mode, source);
            }
            Event::ExportProgress {
                mode,
                percent,
                speed,
            } => {
                let step = (*percent as u32 / PROGRESS_LOG_STEP) * PROGRESS_LOG_STEP;
                if self.advance_to(step) {
                    info!("{} progress: {}% (speed {:.1}x)", mode, step, speed);
                } else {
                    debug!("{} progress: {:.1}%", mode, percent);
                }
            }
            Event::ExportFinished { mode, status } => match status {
                ExportStatus::Succeeded { size } => {
                    info!("{} complete ({})", mode, format_bytes(*size));
                }
                ExportStatus::Failed { reason } => {
                    error!("{} failed: {}", mode, reason);
                }
            },
            Event::ArtifactDelivered {
                file_name,
                destination,
                size,
                ..
            } => {
                info!("Delivered {} ({}) to {}", file_name, format_bytes(*size), destination);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::OperationMode;

    #[test]
    fn test_progress_steps_only_move_forward() {
        let handler = FileLoggingHandler::new();
        assert!(!handler.advance_to(0));
        assert!(handler.advance_to(25));
        assert!(handler.advance_to(50));
        assert!(!handler.advance_to(25));

        handler.handle(&Event::ExportStarted {
            mode: OperationMode::ExportAsGif,
            source: "clip.mp4".to_string(),
        });
        assert_eq!(*handler.last_logged_step.lock().unwrap(), 0);
    }
}
