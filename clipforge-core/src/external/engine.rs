// ============================================================================
// clipforge-core/src/external/engine.rs
// ============================================================================
//
// ENGINE ADAPTER: Staging, Invocation and Retrieval Around FFmpeg
//
// The clip pipeline talks to the transcoding engine through three calls:
// stage a named input, invoke a command, retrieve a named output. The
// EngineAdapter trait captures that contract; FfmpegEngine implements it on
// top of a private workspace directory that plays the role of the engine's
// addressable file system.
//
// KEY COMPONENTS:
// - EngineAdapter: the stage/invoke/retrieve/discard contract
// - FfmpegEngine: ffmpeg-backed implementation over a TempDir workspace
//
// AI-ASSISTANT-INFO: Engine adapter trait and ffmpeg-backed implementation

// ---- Internal crate imports ----
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg_builder::FfmpegCommandBuilder;
use crate::external::ffmpeg_executor::{
    EngineProgress, FfmpegSpawner, SidecarSpawner, drive_to_completion,
};
use crate::temp_files::create_workspace_dir;

// ---- External crate imports ----
use tempfile::TempDir;

// ---- Standard library imports ----
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Contract of the external transcoding engine.
///
/// `stage` must complete before `invoke` references the staged name, and
/// `retrieve` is only meaningful for a name produced by a successful `invoke`.
/// Implementations are shared between threads; callers keep names unique per
/// export so concurrent exports never touch each other's files.
pub trait EngineAdapter: Send + Sync {
    /// Writes `bytes` into the engine under `name`.
    fn stage(&self, name: &str, bytes: &[u8]) -> CoreResult<()>;

    /// Stages the contents of the file at `path` under `name`.
    ///
    /// The default reads the whole file into memory and calls [`stage`](Self::stage).
    fn stage_file(&self, name: &str, path: &Path) -> CoreResult<()> {
        let bytes = std::fs::read(path).map_err(|e| {
            CoreError::Staging(format!("could not read '{}': {}", path.display(), e))
        })?;
        self.stage(name, &bytes)
    }

    /// Runs one engine command to completion, reporting progress as it goes.
    fn invoke(&self, args: &[String], on_progress: &mut dyn FnMut(EngineProgress))
    -> CoreResult<()>;

    /// Reads the file `name` back out of the engine.
    fn retrieve(&self, name: &str) -> CoreResult<Vec<u8>>;

    /// Removes `name` from the engine. Missing names are not an error.
    fn discard(&self, name: &str) -> CoreResult<()>;
}

impl<T: EngineAdapter + ?Sized> EngineAdapter for Arc<T> {
    fn stage(&self, name: &str, bytes: &[u8]) -> CoreResult<()> {
        (**self).stage(name, bytes)
    }

    fn stage_file(&self, name: &str, path: &Path) -> CoreResult<()> {
        (**self).stage_file(name, path)
    }

    fn invoke(
        &self,
        args: &[String],
        on_progress: &mut dyn FnMut(EngineProgress),
    ) -> CoreResult<()> {
        (**self).invoke(args, on_progress)
    }

    fn retrieve(&self, name: &str) -> CoreResult<Vec<u8>> {
        (**self).retrieve(name)
    }

    fn discard(&self, name: &str) -> CoreResult<()> {
        (**self).discard(name)
    }
}

/// ffmpeg-backed engine whose file system is a private temporary directory.
///
/// The directory and everything left in it are removed when the engine is dropped.
pub struct FfmpegEngine<S: FfmpegSpawner = SidecarSpawner> {
    spawner: S,
    workspace: TempDir,
}

impl FfmpegEngine<SidecarSpawner> {
    /// Creates an engine that runs the system ffmpeg binary.
    pub fn new(config: &CoreConfig) -> CoreResult<Self> {
        Ok(Self::with_spawner(SidecarSpawner, create_workspace_dir(config)?))
    }
}

impl<S: FfmpegSpawner> FfmpegEngine<S> {
    /// Creates an engine with a custom spawner and workspace.
    pub fn with_spawner(spawner: S, workspace: TempDir) -> Self {
        log::debug!("Engine workspace: {}", workspace.path().display());
        Self { spawner, workspace }
    }

    /// Directory backing the engine's file system.
    pub fn workspace(&self) -> &Path {
        self.workspace.path()
    }

    /// Maps an engine name to its path, accepting plain file names only.
    fn resolve(&self, name: &str) -> CoreResult<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.workspace.path().join(name)),
            _ => Err(CoreError::InvalidInput(format!(
                "engine file name '{name}' must be a plain file name"
            ))),
        }
    }
}

impl<S> EngineAdapter for FfmpegEngine<S>
where
    S: FfmpegSpawner + Send + Sync,
{
    fn stage(&self, name: &str, bytes: &[u8]) -> CoreResult<()> {
        let path = self.resolve(name)?;
        log::debug!("Staging {} bytes as {}", bytes.len(), name);
        std::fs::write(&path, bytes)
            .map_err(|e| CoreError::Staging(format!("could not write '{}': {}", name, e)))
    }

    fn stage_file(&self, name: &str, path: &Path) -> CoreResult<()> {
        let destination = self.resolve(name)?;
        // Copied on disk so large videos never pass through memory.
        let copied = std::fs::copy(path, &destination).map_err(|e| {
            CoreError::Staging(format!(
                "could not copy '{}' to '{}': {}",
                path.display(),
                name,
                e
            ))
        })?;
        log::debug!("Staged {} bytes from {} as {}", copied, path.display(), name);
        Ok(())
    }

    fn invoke(
        &self,
        args: &[String],
        on_progress: &mut dyn FnMut(EngineProgress),
    ) -> CoreResult<()> {
        let mut cmd = FfmpegCommandBuilder::new().build();
        cmd.args(args);
        cmd.as_inner_mut().current_dir(self.workspace.path());

        log::debug!("Running ffmpeg command: ffmpeg {}", args.join(" "));

        let mut process = self.spawner.spawn(cmd)?;
        drive_to_completion(&mut process, "ffmpeg", on_progress)
    }

    fn retrieve(&self, name: &str) -> CoreResult<Vec<u8>> {
        let path = self.resolve(name)?;
        match std::fs::read(&path) {
            Ok(bytes) => {
                log::debug!("Retrieved {} bytes from {}", bytes.len(), name);
                Ok(bytes)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(CoreError::OutputMissing(name.to_string()))
            }
            Err(e) => Err(CoreError::Io(e)),
        }
    }

    fn discard(&self, name: &str) -> CoreResult<()> {
        let path = self.resolve(name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Io(e)),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::external::mocks::MockFfmpegSpawner;
    use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};

    fn engine(spawner: MockFfmpegSpawner) -> FfmpegEngine<MockFfmpegSpawner> {
        FfmpegEngine::with_spawner(spawner, tempfile::tempdir().unwrap())
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_stage_and_retrieve_roundtrip_through_workspace() {
        let engine = engine(MockFfmpegSpawner::new());
        engine.stage("input_a.mp4", b"source").unwrap();
        assert!(engine.workspace().join("input_a.mp4").is_file());
        assert_eq!(engine.retrieve("input_a.mp4").unwrap(), b"source");
    }

    #[test]
    fn test_stage_file_copies_into_workspace() {
        let engine = engine(MockFfmpegSpawner::new());
        let source_dir = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("clip.mp4");
        std::fs::write(&source, b"on disk").unwrap();

        engine.stage_file("input_c.mp4", &source).unwrap();
        assert_eq!(engine.retrieve("input_c.mp4").unwrap(), b"on disk");
        assert!(source.exists());

        let missing = source_dir.path().join("missing.mp4");
        assert!(matches!(
            engine.stage_file("input_d.mp4", &missing),
            Err(CoreError::Staging(_))
        ));
        assert!(matches!(
            engine.stage_file("../input_e.mp4", &source),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_retrieve_missing_output() {
        let engine = engine(MockFfmpegSpawner::new());
        assert!(matches!(
            engine.retrieve("output_x.gif"),
            Err(CoreError::OutputMissing(name)) if name == "output_x.gif"
        ));
    }

    #[test]
    fn test_names_must_stay_inside_workspace() {
        let engine = engine(MockFfmpegSpawner::new());
        for bad in ["../escape.mp4", "/etc/passwd", "nested/input.mp4", "", "."] {
            assert!(
                matches!(engine.stage(bad, b"x"), Err(CoreError::InvalidInput(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_discard_is_idempotent() {
        let engine = engine(MockFfmpegSpawner::new());
        engine.stage("input_b.mp4", b"x").unwrap();
        engine.discard("input_b.mp4").unwrap();
        engine.discard("input_b.mp4").unwrap();
        assert!(!engine.workspace().join("input_b.mp4").exists());
    }

    #[test]
    fn test_invoke_runs_in_workspace_with_global_options() {
        let spawner = MockFfmpegSpawner::new();
        spawner.expect_success(b"GIF89a".to_vec());
        let engine = engine(spawner.clone());

        engine
            .invoke(&args(&["-i", "in.mp4", "-f", "gif", "out.gif"]), &mut |_| {})
            .unwrap();

        let calls = spawner.received_calls();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.current_dir.as_deref(), Some(engine.workspace()));
        assert!(call.args.contains(&"-hide_banner".to_string()));
        assert!(call.args.contains(&"-y".to_string()));
        assert!(call.args.ends_with(&args(&["-i", "in.mp4", "-f", "gif", "out.gif"])));

        assert_eq!(engine.retrieve("out.gif").unwrap(), b"GIF89a");
    }

    #[test]
    fn test_invoke_failure_maps_to_command_failed() {
        let spawner = MockFfmpegSpawner::new();
        spawner.expect_exit_error(
            vec![FfmpegEvent::Log(
                LogLevel::Error,
                "in.mp4: No such file or directory".to_string(),
            )],
            1,
        );
        let engine = engine(spawner);

        let err = engine
            .invoke(&args(&["-i", "in.mp4", "out.gif"]), &mut |_| {})
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::CommandFailed(_, _, ref message) if message.contains("No such file")
        ));
        assert!(matches!(engine.retrieve("out.gif"), Err(CoreError::OutputMissing(_))));
    }
}
