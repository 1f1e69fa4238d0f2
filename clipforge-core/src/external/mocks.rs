// clipforge-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for this crate's tests and for dependents enabling "test-mocks".
#![cfg(any(test, feature = "test-mocks"))]

use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::events::{Event, EventHandler};
use crate::external::engine::EngineAdapter;
use crate::external::ffmpeg_executor::EngineProgress;
use std::collections::HashMap;
use std::process::ExitStatus;
use std::sync::{Arc, Mutex};

// ============================================================================
// MOCK ENGINE
// ============================================================================

/// One call received by [`MockEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Stage { name: String, len: usize },
    Invoke { args: Vec<String> },
    Retrieve { name: String },
    Discard { name: String },
}

#[derive(Default)]
struct MockEngineState {
    files: HashMap<String, Vec<u8>>,
    calls: Vec<EngineCall>,
    output: Vec<u8>,
    progress_times: Vec<f64>,
    stage_error: Option<String>,
    invoke_error: Option<String>,
    skip_output: bool,
}

/// In-memory engine. `invoke` writes the configured output bytes under the
/// last argument, the way ffmpeg writes its output file.
#[derive(Default)]
pub struct MockEngine {
    state: Mutex<MockEngineState>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes `invoke` produces.
    pub fn with_output(self, bytes: &[u8]) -> Self {
        self.state.lock().unwrap().output = bytes.to_vec();
        self
    }

    /// Progress timestamps (seconds) reported during `invoke`.
    pub fn with_progress(self, times: &[f64]) -> Self {
        self.state.lock().unwrap().progress_times = times.to_vec();
        self
    }

    /// Makes `stage` fail with a staging error.
    pub fn failing_stage(self, message: &str) -> Self {
        self.state.lock().unwrap().stage_error = Some(message.to_string());
        self
    }

    /// Makes `invoke` fail as if ffmpeg exited with an error.
    pub fn failing_invoke(self, message: &str) -> Self {
        self.state.lock().unwrap().invoke_error = Some(message.to_string());
        self
    }

    /// Makes `invoke` succeed without producing an output file.
    pub fn without_output(self) -> Self {
        self.state.lock().unwrap().skip_output = true;
        self
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Argument lists of every `invoke` call.
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::Invoke { args } => Some(args),
                _ => None,
            })
            .collect()
    }

    /// Names currently held by the engine.
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.lock().unwrap().files.keys().cloned().collect();
        names.sort();
        names
    }
}

impl EngineAdapter for MockEngine {
    fn stage(&self, name: &str, bytes: &[u8]) -> CoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(EngineCall::Stage {
            name: name.to_string(),
            len: bytes.len(),
        });
        if let Some(message) = &state.stage_error {
            return Err(CoreError::Staging(message.clone()));
        }
        state.files.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn invoke(
        &self,
        args: &[String],
        on_progress: &mut dyn FnMut(EngineProgress),
    ) -> CoreResult<()> {
        let progress_times = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(EngineCall::Invoke {
                args: args.to_vec(),
            });
            state.progress_times.clone()
        };

        // Reported without holding the lock; handlers may query the mock.
        for (frame, time_secs) in progress_times.into_iter().enumerate() {
            on_progress(EngineProgress {
                time_secs,
                frame: frame as u32,
                speed: 1.0,
            });
        }

        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.invoke_error {
            return Err(command_failed_error(
                "ffmpeg (mock)",
                ExitStatus::default(),
                message.clone(),
            ));
        }
        if !state.skip_output {
            if let Some(output_name) = args.last() {
                let output = state.output.clone();
                state.files.insert(output_name.clone(), output);
            }
        }
        Ok(())
    }

    fn retrieve(&self, name: &str) -> CoreResult<Vec<u8>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(EngineCall::Retrieve {
            name: name.to_string(),
        });
        state
            .files
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::OutputMissing(name.to_string()))
    }

    fn discard(&self, name: &str) -> CoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(EngineCall::Discard {
            name: name.to_string(),
        });
        state.files.remove(name);
        Ok(())
    }
}

// ============================================================================
// RECORDING EVENT HANDLER
// ============================================================================

/// Event handler that keeps every event it receives.
#[derive(Default)]
pub struct RecordingEventHandler {
    events: Mutex<Vec<Event>>,
}

impl RecordingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl EventHandler for RecordingEventHandler {
    fn handle(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ============================================================================
// MOCK FFMPEG PROCESS AND SPAWNER
// ============================================================================

#[cfg(unix)]
pub use self::spawner::{MockFfmpegProcess, MockFfmpegSpawner, ReceivedCall};

#[cfg(unix)]
mod spawner {
    use super::*;
    use crate::external::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};
    use ffmpeg_sidecar::command::FfmpegCommand;
    use ffmpeg_sidecar::event::FfmpegEvent;
    use std::collections::VecDeque;
    use std::os::unix::process::ExitStatusExt;
    use std::path::PathBuf;

    /// Mock implementation of FfmpegProcess.
    #[derive(Clone)]
    pub struct MockFfmpegProcess {
        events_to_emit: Vec<FfmpegEvent>,
        exit_status: ExitStatus,
    }

    impl MockFfmpegProcess {
        /// Process that emits `events` and then exits with `exit_code`.
        pub fn new(events: Vec<FfmpegEvent>, exit_code: i32) -> Self {
            Self {
                events_to_emit: events,
                exit_status: ExitStatus::from_raw(exit_code << 8),
            }
        }
    }

    impl FfmpegProcess for MockFfmpegProcess {
        fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
        where
            F: FnMut(FfmpegEvent) -> CoreResult<()>,
        {
            for event in self.events_to_emit.drain(..) {
                handler(event)?;
            }
            Ok(())
        }

        fn wait(&mut self) -> CoreResult<ExitStatus> {
            Ok(self.exit_status)
        }
    }

    /// Arguments and working directory of one spawned command.
    #[derive(Debug, Clone)]
    pub struct ReceivedCall {
        pub args: Vec<String>,
        pub current_dir: Option<PathBuf>,
    }

    struct Expectation {
        process: MockFfmpegProcess,
        output: Option<Vec<u8>>,
    }

    /// Mock implementation of FfmpegSpawner answering calls in FIFO order.
    #[derive(Clone, Default)]
    pub struct MockFfmpegSpawner {
        expectations: Arc<Mutex<VecDeque<Expectation>>>,
        received_calls: Arc<Mutex<Vec<ReceivedCall>>>,
    }

    impl MockFfmpegSpawner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Next spawn succeeds and writes `output` to the command's output file.
        pub fn expect_success(&self, output: Vec<u8>) {
            self.expectations.lock().unwrap().push_back(Expectation {
                process: MockFfmpegProcess::new(Vec::new(), 0),
                output: Some(output),
            });
        }

        /// Next spawn emits `events` and exits with `exit_code`.
        pub fn expect_exit_error(&self, events: Vec<FfmpegEvent>, exit_code: i32) {
            self.expectations.lock().unwrap().push_back(Expectation {
                process: MockFfmpegProcess::new(events, exit_code),
                output: None,
            });
        }

        pub fn received_calls(&self) -> Vec<ReceivedCall> {
            self.received_calls.lock().unwrap().clone()
        }
    }

    impl FfmpegSpawner for MockFfmpegSpawner {
        type Process = MockFfmpegProcess;

        fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
            let inner = cmd.as_inner_mut();
            let call = ReceivedCall {
                args: inner
                    .get_args()
                    .map(|s| s.to_string_lossy().into_owned())
                    .collect(),
                current_dir: inner.get_current_dir().map(PathBuf::from),
            };
            self.received_calls.lock().unwrap().push(call.clone());

            let expectation = self
                .expectations
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("MockFfmpegSpawner: unexpected call {:?}", call.args));

            if let (Some(output), Some(output_name)) = (&expectation.output, call.args.last()) {
                let dir = call.current_dir.clone().unwrap_or_default();
                std::fs::write(dir.join(output_name), output)?;
            }
            Ok(expectation.process)
        }
    }
}
