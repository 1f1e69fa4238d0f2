// ============================================================================
// clipforge-cli/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: Terminal progress for exports
//
// TerminalProgressHandler turns pipeline events into an indicatif progress
// bar on stderr, leaving stdout free for data URLs and JSON events.
//
// AI-ASSISTANT-INFO: indicatif-backed event handler for the terminal

// ---- External crate imports ----
use clipforge_core::events::{Event, EventHandler, ExportStatus};
use clipforge_core::format_bytes;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

// ---- Standard library imports ----
use std::sync::Mutex;
use std::time::Duration;

const BAR_TEMPLATE: &str = "  {spinner} {msg}: {percent:>3}% [{bar:30}] ({elapsed_precise})";

/// Event handler drawing one progress bar per export.
pub struct TerminalProgressHandler {
    target: fn() -> ProgressDrawTarget,
    bar: Mutex<Option<ProgressBar>>,
}

impl Default for TerminalProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalProgressHandler {
    /// Draws on stderr.
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr)
    }

    pub fn with_draw_target(target: fn() -> ProgressDrawTarget) -> Self {
        Self {
            target,
            bar: Mutex::new(None),
        }
    }

    fn new_bar(&self, message: String) -> ProgressBar {
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##.");
        let bar = ProgressBar::with_draw_target(Some(100), (self.target)());
        bar.set_style(style);
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    }

    /// Whether a bar is currently shown.
    pub fn is_active(&self) -> bool {
        self.bar.lock().map(|bar| bar.is_some()).unwrap_or(false)
    }
}

impl EventHandler for TerminalProgressHandler {
    fn handle(&self, event: &Event) {
        let Ok(mut current) = self.bar.lock() else {
            return;
        };
        match event {
            Event::ExportStarted { mode, .. } => {
                if let Some(old) = current.take() {
                    old.finish_and_clear();
                }
                *current = Some(self.new_bar(mode.to_string()));
            }
            Event::ExportProgress { percent, .. } => {
                if let Some(bar) = current.as_ref() {
                    bar.set_position(percent.round().clamp(0.0, 100.0) as u64);
                }
            }
            Event::ExportFinished { mode, status } => {
                if let Some(bar) = current.take() {
                    bar.finish_and_clear();
                }
                match status {
                    ExportStatus::Succeeded { size } => {
                        eprintln!("  \u{2713} {} complete ({})", mode, format_bytes(*size));
                    }
                    ExportStatus::Failed { reason } => {
                        eprintln!("  \u{2717} {} failed: {}", mode, reason);
                    }
                }
            }
            Event::ArtifactDelivered {
                file_name,
                destination,
                ..
            } => {
                eprintln!("    {} -> {}", file_name, destination);
            }
        }
    }
}
