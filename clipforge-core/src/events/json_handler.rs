//! JSON progress handler for structured progress output
//!
//! This module provides a JSON-based event handler that writes one JSON
//! object per lifecycle event, for consumption by scripts and front ends.

use super::{Event, EventHandler};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Event handler that outputs lifecycle events as JSON lines
pub struct JsonProgressHandler {
    output: Mutex<Box<dyn Write + Send>>,
    last_progress_step: Mutex<Option<u32>>,
}

/// Progress is written once per this many percent.
const PROGRESS_STEP_PERCENT: f64 = 5.0;

impl JsonProgressHandler {
    /// Create a new JSON progress handler that writes to stdout
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    /// Create a new JSON progress handler with a custom writer
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            output: Mutex::new(writer),
            last_progress_step: Mutex::new(None),
        }
    }

    /// Get current timestamp as seconds since Unix epoch
    fn get_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    /// Returns true when `percent` enters a step not written yet.
    fn is_new_progress_step(&self, percent: f64) -> bool {
        let step = (percent / PROGRESS_STEP_PERCENT).floor() as u32;
        let Ok(mut last) = self.last_progress_step.lock() else {
            return true;
        };
        if *last == Some(step) {
            return false;
        }
        *last = Some(step);
        true
    }

    /// Write a JSON progress event to the output
    fn write_json(&self, value: serde_json::Value) {
        if let Ok(mut output) = self.output.lock() {
            if let Ok(json_str) = serde_json::to_string(&value) {
                let _ = writeln!(output, "{}", json_str);
                let _ = output.flush();
            }
        }
    }
}

impl Default for JsonProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for JsonProgressHandler {
    fn handle(&self, event: &Event) {
        match event {
            Event::ExportStarted { .. } => {
                if let Ok(mut last) = self.last_progress_step.lock() {
                    *last = None;
                }
            }
            Event::ExportProgress { percent, .. } if !self.is_new_progress_step(*percent) => {
                return;
            }
            _ => {}
        }

        let mut value = match serde_json::to_value(event) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to serialize event {:?}: {}", event, e);
                return;
            }
        };
        if let Some(object) = value.as_object_mut() {
            object.insert("timestamp".to_string(), Self::get_timestamp().into());
        }
        self.write_json(value);
    }
}
