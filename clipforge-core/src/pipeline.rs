// ============================================================================
// clipforge-core/src/pipeline.rs
// ============================================================================
//
// CLIP PIPELINE: Stage, Invoke, Retrieve and Deliver
//
// This module runs one export end to end against an EngineAdapter. Every
// export gets fresh engine names, emits ExportStarted before it touches the
// engine, and emits ExportFinished exactly once on the way out. The staged
// input and the produced output are removed from the engine when the export
// ends, whatever the outcome.
//
// KEY COMPONENTS:
// - ClipPipeline: export() and deliver()
// - WorkspaceGuard: drop guard discarding per-export engine files
//
// AI-ASSISTANT-INFO: Export orchestration, lifecycle events and cleanup

// ---- Internal crate imports ----
use crate::clip::{ClipRequest, EngineInvocation, MediaSource, OutputArtifact};
use crate::download::{Delivery, DownloadTrigger};
use crate::error::CoreResult;
use crate::events::{Event, EventDispatcher, EventHandler, ExportStatus};
use crate::external::engine::EngineAdapter;
use crate::external::ffmpeg_executor::EngineProgress;
use crate::utils::format_bytes;

// ---- Standard library imports ----
use std::sync::Arc;

/// Runs exports against an engine and reports their lifecycle.
pub struct ClipPipeline<E: EngineAdapter> {
    engine: E,
    events: EventDispatcher,
}

impl<E: EngineAdapter> ClipPipeline<E> {
    pub fn new(engine: E) -> Self {
        Self::with_dispatcher(engine, EventDispatcher::new())
    }

    pub fn with_dispatcher(engine: E, events: EventDispatcher) -> Self {
        Self { engine, events }
    }

    /// Registers a handler for lifecycle and progress events.
    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.events.add_handler(handler);
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Produces the artifact described by `request`.
    ///
    /// `ExportStarted` is emitted before the source is read, and
    /// `ExportFinished` exactly once after the export ends. Any failure is
    /// returned to the caller as well as reported in the finished event.
    pub fn export(&self, request: &ClipRequest) -> CoreResult<OutputArtifact> {
        let mode = request.mode();
        self.events.emit(Event::ExportStarted {
            mode,
            source: request.source.describe(),
        });

        let result = self.run_export(request);

        let status = match &result {
            Ok(artifact) => {
                log::info!("{} finished: {}", mode, format_bytes(artifact.len() as u64));
                ExportStatus::Succeeded {
                    size: artifact.len() as u64,
                }
            }
            Err(e) => {
                log::error!("{} failed: {}", mode, e);
                ExportStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };
        self.events.emit(Event::ExportFinished { mode, status });

        result
    }

    fn run_export(&self, request: &ClipRequest) -> CoreResult<OutputArtifact> {
        let mode = request.mode();
        request.source.check_readable()?;

        let invocation = EngineInvocation::new(&request.operation, &request.source.extension());
        log::debug!(
            "{}: staging {} as {}, output {}",
            mode,
            request.source.describe(),
            invocation.input_name,
            invocation.output_name
        );

        let _guard = WorkspaceGuard {
            engine: &self.engine,
            names: [invocation.input_name.as_str(), invocation.output_name.as_str()],
        };

        match &request.source {
            MediaSource::File(path) => self.engine.stage_file(&invocation.input_name, path)?,
            MediaSource::Bytes { data, .. } => self.engine.stage(&invocation.input_name, data)?,
        }

        let expected = request.operation.expected_duration();
        self.engine.invoke(&invocation.args, &mut |progress: EngineProgress| {
            if let Some(percent) = progress_percent(progress.time_secs, expected) {
                self.events.emit(Event::ExportProgress {
                    mode,
                    percent,
                    speed: round_speed(progress.speed),
                });
            }
        })?;

        let bytes = self.engine.retrieve(&invocation.output_name)?;
        Ok(OutputArtifact::new(bytes, mode))
    }

    /// Hands a finished artifact to `trigger` and reports where it went.
    pub fn deliver(
        &self,
        artifact: OutputArtifact,
        trigger: &dyn DownloadTrigger,
    ) -> CoreResult<Delivery> {
        let mode = artifact.mode();
        let file_name = artifact.file_name().to_string();
        let size = artifact.len() as u64;

        let delivery = trigger.trigger(artifact)?;
        self.events.emit(Event::ArtifactDelivered {
            mode,
            file_name,
            destination: delivery.to_string(),
            size,
        });
        Ok(delivery)
    }

    /// Runs `export` and delivers its artifact.
    pub fn export_and_deliver(
        &self,
        request: &ClipRequest,
        trigger: &dyn DownloadTrigger,
    ) -> CoreResult<Delivery> {
        let artifact = self.export(request)?;
        self.deliver(artifact, trigger)
    }
}

/// Share of `expected` seconds covered at `time_secs`, capped at 100.
fn progress_percent(time_secs: f64, expected: Option<f64>) -> Option<f64> {
    let expected = expected.filter(|d| *d > 0.0)?;
    Some(((time_secs / expected) * 100.0).clamp(0.0, 100.0))
}

/// Widens the engine's speed ratio to two decimals.
fn round_speed(speed: f32) -> f64 {
    (f64::from(speed) * 100.0).round() / 100.0
}

/// Discards per-export engine files on drop.
struct WorkspaceGuard<'a, E: EngineAdapter> {
    engine: &'a E,
    names: [&'a str; 2],
}

impl<E: EngineAdapter> Drop for WorkspaceGuard<'_, E> {
    fn drop(&mut self) {
        for name in self.names {
            if let Err(e) = self.engine.discard(name) {
                log::warn!("Failed to discard engine file {}: {}", name, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{OperationMode, TimeRange};
    use crate::error::CoreError;
    use crate::external::mocks::{EngineCall, MockEngine, RecordingEventHandler};
    use crate::photo::PhotoAdjustment;
    use std::sync::Mutex;

    fn source() -> MediaSource {
        MediaSource::from_bytes("clip.mp4", b"video bytes".to_vec())
    }

    fn range(start: f64, end: f64) -> TimeRange {
        TimeRange::new(start, end).unwrap()
    }

    fn build_pipeline(engine: MockEngine) -> (ClipPipeline<MockEngine>, Arc<RecordingEventHandler>) {
        let recorder = Arc::new(RecordingEventHandler::new());
        let mut pipeline = ClipPipeline::new(engine);
        pipeline.add_handler(recorder.clone());
        (pipeline, recorder)
    }

    fn finished_count(events: &[Event]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, Event::ExportFinished { .. }))
            .count()
    }

    #[test]
    fn test_gif_export_scenario() {
        let (pipeline, recorder) = build_pipeline(MockEngine::new().with_output(b"GIF89a"));
        let artifact = pipeline
            .export(&ClipRequest::gif(source(), range(2.0, 5.0)))
            .unwrap();

        assert_eq!(artifact.bytes(), b"GIF89a");
        assert_eq!(artifact.mime_type(), "image/gif");
        assert_eq!(artifact.file_name(), "output.gif");

        let invocations = pipeline.engine().invocations();
        assert_eq!(invocations.len(), 1);
        let args = &invocations[0];
        assert_eq!(args[0], "-i");
        assert!(args[1].starts_with("input_") && args[1].ends_with(".mp4"));
        assert_eq!(&args[2..8], &["-ss", "2", "-to", "5", "-f", "gif"]);
        assert!(args[8].starts_with("output_") && args[8].ends_with(".gif"));

        let events = recorder.events();
        assert!(matches!(
            events.first(),
            Some(Event::ExportStarted { mode: OperationMode::ExportAsGif, .. })
        ));
        assert!(matches!(
            events.last(),
            Some(Event::ExportFinished { status: ExportStatus::Succeeded { size: 6 }, .. })
        ));
    }

    #[test]
    fn test_trim_export_scenario() {
        let (pipeline, _recorder) = build_pipeline(MockEngine::new().with_output(b"mp4 bytes"));
        let artifact = pipeline
            .export(&ClipRequest::trim(source(), range(2.0, 5.0)))
            .unwrap();

        assert_eq!(artifact.mime_type(), "video/mp4");
        assert_eq!(artifact.file_name(), "output.mp4");

        let args = &pipeline.engine().invocations()[0];
        assert_eq!(&args[0..3], &["-ss", "2", "-i"]);
        assert_eq!(&args[4..8], &["-t", "3", "-c", "copy"]);
        assert!(args[8].ends_with(".mp4"));
    }

    #[test]
    fn test_photo_export_has_no_progress() {
        let engine = MockEngine::new()
            .with_output(b"png")
            .with_progress(&[0.04]);
        let (pipeline, recorder) = build_pipeline(engine);
        let artifact = pipeline
            .export(&ClipRequest::photo(
                MediaSource::from_bytes("photo.JPG", b"jpeg".to_vec()),
                PhotoAdjustment::new(120, 200).unwrap(),
            ))
            .unwrap();

        assert_eq!(artifact.file_name(), "edited_image.png");
        let args = &pipeline.engine().invocations()[0];
        assert!(args[1].ends_with(".jpg"));
        assert!(!recorder
            .events()
            .iter()
            .any(|e| matches!(e, Event::ExportProgress { .. })));
    }

    #[test]
    fn test_progress_is_relative_to_range() {
        let engine = MockEngine::new()
            .with_output(b"x")
            .with_progress(&[1.0, 2.0, 4.0]);
        let (pipeline, recorder) = build_pipeline(engine);
        pipeline
            .export(&ClipRequest::gif(source(), range(10.0, 14.0)))
            .unwrap();

        let percents: Vec<f64> = recorder
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::ExportProgress { percent, .. } => Some(*percent),
                _ => None,
            })
            .collect();
        assert_eq!(percents, vec![25.0, 50.0, 100.0]);
    }

    /// Records whether the engine had been called when `ExportStarted` arrived.
    struct StartProbe {
        engine: Arc<MockEngine>,
        calls_at_start: Mutex<Option<usize>>,
    }

    impl EventHandler for StartProbe {
        fn handle(&self, event: &Event) {
            if matches!(event, Event::ExportStarted { .. }) {
                *self.calls_at_start.lock().unwrap() = Some(self.engine.calls().len());
            }
        }
    }

    #[test]
    fn test_started_precedes_engine_io() {
        let engine = Arc::new(MockEngine::new().with_output(b"x"));
        let probe = Arc::new(StartProbe {
            engine: engine.clone(),
            calls_at_start: Mutex::new(None),
        });
        let mut pipeline = ClipPipeline::new(engine.clone());
        pipeline.add_handler(probe.clone());

        pipeline
            .export(&ClipRequest::gif(source(), range(0.0, 1.0)))
            .unwrap();

        assert_eq!(*probe.calls_at_start.lock().unwrap(), Some(0));
        assert!(!engine.calls().is_empty());
    }

    #[test]
    fn test_finished_emitted_once_for_each_failure() {
        let cases = [
            MockEngine::new().failing_stage("disk full"),
            MockEngine::new().failing_invoke("Invalid data found"),
            MockEngine::new().without_output(),
        ];
        for engine in cases {
            let (pipeline, recorder) = build_pipeline(engine);
            let result = pipeline.export(&ClipRequest::gif(source(), range(2.0, 5.0)));
            assert!(result.is_err());

            let events = recorder.events();
            assert_eq!(finished_count(&events), 1);
            assert!(matches!(
                events.last(),
                Some(Event::ExportFinished { status: ExportStatus::Failed { .. }, .. })
            ));
        }
    }

    #[test]
    fn test_failures_keep_their_kind() {
        let (pipeline, _) = build_pipeline(MockEngine::new().failing_stage("disk full"));
        let err = pipeline
            .export(&ClipRequest::gif(source(), range(2.0, 5.0)))
            .unwrap_err();
        assert!(matches!(err, CoreError::Staging(_)));
        assert!(pipeline.engine().invocations().is_empty());

        let (pipeline, _) = build_pipeline(MockEngine::new().failing_invoke("Invalid data found"));
        let err = pipeline
            .export(&ClipRequest::trim(source(), range(2.0, 5.0)))
            .unwrap_err();
        assert!(matches!(err, CoreError::CommandFailed(_, _, ref m) if m == "Invalid data found"));

        let (pipeline, _) = build_pipeline(MockEngine::new().without_output());
        let err = pipeline
            .export(&ClipRequest::gif(source(), range(2.0, 5.0)))
            .unwrap_err();
        assert!(matches!(err, CoreError::OutputMissing(_)));
    }

    #[test]
    fn test_unreadable_source_never_reaches_engine() {
        let (pipeline, recorder) = build_pipeline(MockEngine::new());
        let missing = MediaSource::from_path("/nonexistent/clipforge/input.mp4");
        let err = pipeline
            .export(&ClipRequest::gif(missing, range(0.0, 1.0)))
            .unwrap_err();

        assert!(matches!(err, CoreError::Staging(_)));
        assert!(pipeline.engine().calls().is_empty());
        assert_eq!(finished_count(&recorder.events()), 1);
    }

    #[test]
    fn test_file_source_is_staged_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"disk bytes").unwrap();

        let (pipeline, _) = build_pipeline(MockEngine::new().with_output(b"GIF89a"));
        pipeline
            .export(&ClipRequest::gif(MediaSource::from_path(&path), range(0.0, 1.0)))
            .unwrap();

        assert!(matches!(
            &pipeline.engine().calls()[0],
            EngineCall::Stage { len: 10, .. }
        ));
    }

    #[test]
    fn test_zero_length_range_is_passed_to_engine() {
        let (pipeline, _) = build_pipeline(MockEngine::new().with_output(b""));
        let artifact = pipeline
            .export(&ClipRequest::trim(source(), range(3.0, 3.0)))
            .unwrap();
        assert!(artifact.is_empty());
        assert_eq!(&pipeline.engine().invocations()[0][4..6], &["-t", "0"]);
    }

    #[test]
    fn test_engine_files_removed_after_export() {
        let (pipeline, _) = build_pipeline(MockEngine::new().with_output(b"x"));
        pipeline
            .export(&ClipRequest::gif(source(), range(0.0, 1.0)))
            .unwrap();
        assert!(pipeline.engine().file_names().is_empty());

        let (pipeline, _) = build_pipeline(MockEngine::new().failing_invoke("boom"));
        let _ = pipeline.export(&ClipRequest::gif(source(), range(0.0, 1.0)));
        assert!(pipeline.engine().file_names().is_empty());
        let discards = pipeline
            .engine()
            .calls()
            .into_iter()
            .filter(|c| matches!(c, EngineCall::Discard { .. }))
            .count();
        assert_eq!(discards, 2);
    }

    #[test]
    fn test_each_export_uses_fresh_names() {
        let (pipeline, _) = build_pipeline(MockEngine::new().with_output(b"x"));
        let request = ClipRequest::gif(source(), range(0.0, 1.0));
        pipeline.export(&request).unwrap();
        pipeline.export(&request).unwrap();

        let invocations = pipeline.engine().invocations();
        assert_ne!(invocations[0][1], invocations[1][1]);
        assert_ne!(invocations[0].last(), invocations[1].last());
    }

    #[test]
    fn test_concurrent_exports_do_not_interfere() {
        let (pipeline, recorder) = build_pipeline(MockEngine::new().with_output(b"shared"));
        std::thread::scope(|scope| {
            for i in 0..4 {
                let pipeline = &pipeline;
                scope.spawn(move || {
                    let request = if i % 2 == 0 {
                        ClipRequest::gif(source(), range(0.0, 1.0))
                    } else {
                        ClipRequest::trim(source(), range(1.0, 2.0))
                    };
                    assert_eq!(pipeline.export(&request).unwrap().bytes(), b"shared");
                });
            }
        });

        assert_eq!(finished_count(&recorder.events()), 4);
        assert!(pipeline.engine().file_names().is_empty());
    }

    #[test]
    fn test_progress_percent_edges() {
        assert_eq!(progress_percent(1.0, None), None);
        assert_eq!(progress_percent(1.0, Some(0.0)), None);
        assert_eq!(progress_percent(9.0, Some(3.0)), Some(100.0));
        assert_eq!(progress_percent(1.5, Some(3.0)), Some(50.0));
    }

    #[test]
    fn test_speed_is_rounded_when_widened() {
        assert_eq!(round_speed(2.1), 2.1);
        assert_eq!(round_speed(0.987), 0.99);
    }
}
