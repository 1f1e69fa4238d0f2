//! Lifecycle events emitted by the clip pipeline.
//!
//! Every export emits `ExportStarted` before it touches the engine and
//! `ExportFinished` exactly once when it ends, successful or not. Handlers
//! registered on an [`EventDispatcher`] receive them in order.

use crate::clip::OperationMode;
use serde::Serialize;
use std::sync::Arc;

pub mod json_handler;

pub use json_handler::JsonProgressHandler;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    ExportStarted {
        mode: OperationMode,
        source: String,
    },

    ExportProgress {
        mode: OperationMode,
        percent: f64,
        speed: f64,
    },

    ExportFinished {
        mode: OperationMode,
        status: ExportStatus,
    },

    ArtifactDelivered {
        mode: OperationMode,
        file_name: String,
        destination: String,
        size: u64,
    },
}

/// Final status of one export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportStatus {
    Succeeded { size: u64 },
    Failed { reason: String },
}

pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event);
}

pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn emit(&self, event: Event) {
        for handler in &self.handlers {
            handler.handle(&event);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::RecordingEventHandler;

    #[test]
    fn test_dispatcher_fans_out_in_order() {
        let first = Arc::new(RecordingEventHandler::new());
        let second = Arc::new(RecordingEventHandler::new());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_handler(first.clone());
        dispatcher.add_handler(second.clone());

        dispatcher.emit(Event::ExportStarted {
            mode: OperationMode::ExportAsGif,
            source: "clip.mp4".to_string(),
        });
        dispatcher.emit(Event::ExportFinished {
            mode: OperationMode::ExportAsGif,
            status: ExportStatus::Succeeded { size: 10 },
        });

        assert_eq!(first.events(), second.events());
        assert_eq!(first.events().len(), 2);
        assert!(matches!(first.events()[0], Event::ExportStarted { .. }));
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = Event::ExportFinished {
            mode: OperationMode::TrimAndReencode,
            status: ExportStatus::Failed {
                reason: "boom".to_string(),
            },
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "export_finished");
        assert_eq!(value["mode"], "trim_and_reencode");
        assert_eq!(value["status"]["status"], "failed");
        assert_eq!(value["status"]["reason"], "boom");
    }
}
