// ============================================================================
// clipforge-core/src/download.rs
// ============================================================================
//
// DOWNLOAD TRIGGER: Handing Finished Artifacts to the User
//
// An OutputArtifact is delivered under the fixed file name of its mode. The
// same DownloadTrigger is used for every mode; the configured delivery
// strategy decides which implementation that is.
//
// KEY COMPONENTS:
// - DownloadTrigger: the delivery contract
// - FileDownload: saves the artifact into an output directory
// - DataUrlDownload: writes the artifact as a base64 `data:` URL
// - TransientHandle: temporary file released on drop unless committed
//
// AI-ASSISTANT-INFO: Artifact delivery strategies and transient handle cleanup

// ---- Internal crate imports ----
use crate::clip::OutputArtifact;
use crate::config::{CoreConfig, DOWNLOAD_TEMP_PREFIX, DeliveryStrategy};
use crate::error::{CoreError, CoreResult};
use crate::temp_files::create_temp_file;

// ---- External crate imports ----
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tempfile::NamedTempFile;

// ---- Standard library imports ----
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Where a delivered artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Saved to this path.
    Saved(PathBuf),
    /// Written as a data URL of `len` characters.
    DataUrl { len: usize },
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved(path) => write!(f, "{}", path.display()),
            Self::DataUrl { len } => write!(f, "data URL ({len} chars)"),
        }
    }
}

/// Hands a finished artifact to the user.
pub trait DownloadTrigger: Send + Sync {
    fn trigger(&self, artifact: OutputArtifact) -> CoreResult<Delivery>;
}

/// Returns the trigger for the configured delivery strategy.
pub fn trigger_for(config: &CoreConfig) -> Box<dyn DownloadTrigger> {
    match config.delivery {
        DeliveryStrategy::File => Box::new(FileDownload::new(config.output_dir.clone())),
        DeliveryStrategy::DataUrl => Box::new(DataUrlDownload::new(io::stdout())),
    }
}

// ============================================================================
// TRANSIENT HANDLE
// ============================================================================

/// A temporary file holding artifact bytes until it is committed.
///
/// Dropping an uncommitted handle removes the file.
pub struct TransientHandle {
    file: NamedTempFile,
}

impl TransientHandle {
    /// Writes `bytes` into a new hidden temporary file in `dir`.
    pub fn create(dir: &Path, bytes: &[u8], extension: &str) -> CoreResult<Self> {
        let mut file = create_temp_file(dir, DOWNLOAD_TEMP_PREFIX, extension)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Moves the file to `destination`, replacing anything already there.
    pub fn commit(self, destination: &Path) -> CoreResult<PathBuf> {
        self.file.persist(destination).map_err(|e| {
            CoreError::Delivery(format!(
                "could not save '{}': {}",
                destination.display(),
                e.error
            ))
        })?;
        Ok(destination.to_path_buf())
    }
}

// ============================================================================
// FILE DOWNLOAD
// ============================================================================

/// Saves artifacts into a directory under their fixed file names.
#[derive(Debug, Clone)]
pub struct FileDownload {
    dir: PathBuf,
}

impl FileDownload {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadTrigger for FileDownload {
    fn trigger(&self, artifact: OutputArtifact) -> CoreResult<Delivery> {
        let destination = self.dir.join(artifact.file_name());
        let handle = TransientHandle::create(&self.dir, artifact.bytes(), artifact.mode().extension())?;
        log::debug!(
            "Staged download at {}, saving as {}",
            handle.path().display(),
            destination.display()
        );
        let saved = handle.commit(&destination)?;
        log::info!("Saved {} to {}", artifact.mode(), saved.display());
        Ok(Delivery::Saved(saved))
    }
}

// ============================================================================
// DATA URL DOWNLOAD
// ============================================================================

/// Builds a base64 `data:` URL for `bytes`.
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, BASE64.encode(bytes))
}

/// Writes artifacts as `data:` URLs, one per line, to a sink.
pub struct DataUrlDownload<W: Write + Send> {
    sink: Mutex<W>,
}

impl<W: Write + Send> DataUrlDownload<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    pub fn into_inner(self) -> W {
        self.sink.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> DownloadTrigger for DataUrlDownload<W> {
    fn trigger(&self, artifact: OutputArtifact) -> CoreResult<Delivery> {
        let url = encode_data_url(artifact.mime_type(), artifact.bytes());
        let Ok(mut sink) = self.sink.lock() else {
            return Err(CoreError::Delivery("data URL sink is poisoned".to_string()));
        };
        writeln!(sink, "{url}")?;
        sink.flush()?;
        log::debug!(
            "Wrote {} as a {} character data URL ({})",
            artifact.file_name(),
            url.len(),
            artifact.mime_type()
        );
        Ok(Delivery::DataUrl { len: url.len() })
    }
}
