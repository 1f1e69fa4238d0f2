// ============================================================================
// clipforge-core/src/clip.rs
// ============================================================================
//
// CLIP MODEL: Sources, Ranges, Modes and Engine Invocations
//
// This module defines the values that flow through the clip pipeline and the
// argument construction for each operation mode.
//
// KEY COMPONENTS:
// - MediaSource: the user-selected input media
// - TimeRange: validated (start, end) selection in seconds
// - OperationMode / Operation: what to produce from the source
// - EngineInvocation: unique staging/output names plus the engine arguments
// - OutputArtifact: produced bytes with their MIME type and download name
//
// AI-ASSISTANT-INFO: Data model and ffmpeg argument construction for clips

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};
use crate::photo::PhotoAdjustment;
use crate::temp_files::unique_file_name;
use crate::utils::format_decimal_arg;

// ---- External crate imports ----
use serde::Serialize;

// ---- Standard library imports ----
use std::fmt;
use std::path::{Path, PathBuf};

/// Extension used for staging when the source does not carry one.
pub const DEFAULT_INPUT_EXTENSION: &str = "mp4";

/// Prefix of staged input names inside the engine workspace.
pub const INPUT_NAME_PREFIX: &str = "input";

/// Prefix of output names inside the engine workspace.
pub const OUTPUT_NAME_PREFIX: &str = "output";

// ============================================================================
// MEDIA SOURCE
// ============================================================================

/// User-provided media to clip.
#[derive(Debug, Clone)]
pub enum MediaSource {
    /// Media stored in a file on disk.
    File(PathBuf),
    /// Media already held in memory, with a display name.
    Bytes { name: String, data: Vec<u8> },
}

impl MediaSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self::Bytes {
            name: name.into(),
            data,
        }
    }

    /// Checks that a file source can be opened. In-memory sources always can.
    pub fn check_readable(&self) -> CoreResult<()> {
        match self {
            Self::File(path) => std::fs::File::open(path).map(drop).map_err(|e| {
                CoreError::Staging(format!("could not read '{}': {}", path.display(), e))
            }),
            Self::Bytes { .. } => Ok(()),
        }
    }

    /// Lowercased extension used for the staged copy.
    pub fn extension(&self) -> String {
        let name: &Path = match self {
            Self::File(path) => path,
            Self::Bytes { name, .. } => Path::new(name),
        };
        name.extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| DEFAULT_INPUT_EXTENSION.to_string())
    }

    /// Human-readable description for logs and events.
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Bytes { name, data } => format!("{} ({} bytes in memory)", name, data.len()),
        }
    }
}

// ============================================================================
// TIME RANGE
// ============================================================================

/// A selected span of the source, in seconds.
///
/// Invariant: `0 <= start <= end`, both finite. Zero-length ranges are
/// allowed; what the engine makes of them is up to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeRange {
    start: f64,
    end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> CoreResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(CoreError::InvalidRange(format!(
                "bounds must be finite (start={start}, end={end})"
            )));
        }
        if start < 0.0 || end < 0.0 {
            return Err(CoreError::InvalidRange(format!(
                "bounds must not be negative (start={start}, end={end})"
            )));
        }
        if start > end {
            return Err(CoreError::InvalidRange(format!(
                "start {start}s is after end {end}s"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Length of the range (`end - start`).
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Checks that the range ends within a source of the given duration.
    pub fn check_within(&self, source_duration: f64) -> CoreResult<()> {
        if self.end > source_duration {
            return Err(CoreError::InvalidRange(format!(
                "end {}s is past the source duration of {}s",
                self.end, source_duration
            )));
        }
        Ok(())
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}s-{}s",
            format_decimal_arg(self.start),
            format_decimal_arg(self.end)
        )
    }
}

// ============================================================================
// OPERATION MODES
// ============================================================================

/// What kind of artifact an export produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    ExportAsGif,
    TrimAndReencode,
    AdjustPhoto,
}

impl OperationMode {
    /// Extension of the engine output.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::ExportAsGif => "gif",
            Self::TrimAndReencode => "mp4",
            Self::AdjustPhoto => "png",
        }
    }

    /// Declared MIME type of the artifact.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::ExportAsGif => "image/gif",
            Self::TrimAndReencode => "video/mp4",
            Self::AdjustPhoto => "image/png",
        }
    }

    /// Fixed file name the artifact is delivered under.
    pub fn download_name(&self) -> &'static str {
        match self {
            Self::ExportAsGif => "output.gif",
            Self::TrimAndReencode => "output.mp4",
            Self::AdjustPhoto => "edited_image.png",
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ExportAsGif => "GIF export",
            Self::TrimAndReencode => "video trim",
            Self::AdjustPhoto => "photo adjustment",
        };
        f.write_str(label)
    }
}

/// An operation together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    ExportAsGif(TimeRange),
    TrimAndReencode(TimeRange),
    AdjustPhoto(PhotoAdjustment),
}

impl Operation {
    pub fn mode(&self) -> OperationMode {
        match self {
            Self::ExportAsGif(_) => OperationMode::ExportAsGif,
            Self::TrimAndReencode(_) => OperationMode::TrimAndReencode,
            Self::AdjustPhoto(_) => OperationMode::AdjustPhoto,
        }
    }

    /// Selected range of time-based operations.
    pub fn range(&self) -> Option<TimeRange> {
        match self {
            Self::ExportAsGif(range) | Self::TrimAndReencode(range) => Some(*range),
            Self::AdjustPhoto(_) => None,
        }
    }

    /// Expected length of the engine output in seconds, if time based.
    pub fn expected_duration(&self) -> Option<f64> {
        self.range().map(|range| range.duration())
    }

    /// Engine arguments reading `input_name` and writing `output_name`.
    pub fn engine_args(&self, input_name: &str, output_name: &str) -> Vec<String> {
        match self {
            // Output-side seeking: decode from the start, keep [start, end].
            Self::ExportAsGif(range) => vec![
                "-i".into(),
                input_name.into(),
                "-ss".into(),
                format_decimal_arg(range.start()),
                "-to".into(),
                format_decimal_arg(range.end()),
                "-f".into(),
                "gif".into(),
                output_name.into(),
            ],
            // Input-side seeking, then stream copy for the range length.
            Self::TrimAndReencode(range) => vec![
                "-ss".into(),
                format_decimal_arg(range.start()),
                "-i".into(),
                input_name.into(),
                "-t".into(),
                format_decimal_arg(range.duration()),
                "-c".into(),
                "copy".into(),
                output_name.into(),
            ],
            Self::AdjustPhoto(adjustment) => vec![
                "-i".into(),
                input_name.into(),
                "-vf".into(),
                adjustment.filter_graph(),
                "-frames:v".into(),
                "1".into(),
                output_name.into(),
            ],
        }
    }
}

/// A complete export request: what to do with which source.
#[derive(Debug, Clone)]
pub struct ClipRequest {
    pub source: MediaSource,
    pub operation: Operation,
}

impl ClipRequest {
    pub fn gif(source: MediaSource, range: TimeRange) -> Self {
        Self {
            source,
            operation: Operation::ExportAsGif(range),
        }
    }

    pub fn trim(source: MediaSource, range: TimeRange) -> Self {
        Self {
            source,
            operation: Operation::TrimAndReencode(range),
        }
    }

    pub fn photo(source: MediaSource, adjustment: PhotoAdjustment) -> Self {
        Self {
            source,
            operation: Operation::AdjustPhoto(adjustment),
        }
    }

    pub fn mode(&self) -> OperationMode {
        self.operation.mode()
    }
}

// ============================================================================
// ENGINE INVOCATION
// ============================================================================

/// One engine call: where the input is staged, where the output lands, and
/// the argument list. Built fresh for every export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInvocation {
    pub input_name: String,
    pub output_name: String,
    pub args: Vec<String>,
}

impl EngineInvocation {
    /// Builds an invocation with unique staging and output names.
    pub fn new(operation: &Operation, input_extension: &str) -> Self {
        let input_name = unique_file_name(INPUT_NAME_PREFIX, input_extension);
        let output_name = unique_file_name(OUTPUT_NAME_PREFIX, operation.mode().extension());
        Self::with_names(operation, input_name, output_name)
    }

    /// Builds an invocation with caller-chosen names.
    pub fn with_names(
        operation: &Operation,
        input_name: impl Into<String>,
        output_name: impl Into<String>,
    ) -> Self {
        let input_name = input_name.into();
        let output_name = output_name.into();
        let args = operation.engine_args(&input_name, &output_name);
        Self {
            input_name,
            output_name,
            args,
        }
    }
}

// ============================================================================
// OUTPUT ARTIFACT
// ============================================================================

/// Bytes produced by one export, ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    bytes: Vec<u8>,
    mode: OperationMode,
}

impl OutputArtifact {
    pub fn new(bytes: Vec<u8>, mode: OperationMode) -> Self {
        Self { bytes, mode }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    pub fn mime_type(&self) -> &'static str {
        self.mode.mime_type()
    }

    pub fn file_name(&self) -> &'static str {
        self.mode.download_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: f64, end: f64) -> TimeRange {
        TimeRange::new(start, end).unwrap()
    }

    #[test]
    fn test_time_range_validation() {
        assert!(TimeRange::new(0.0, 0.0).is_ok());
        assert!(TimeRange::new(3.0, 3.0).is_ok());
        assert!(matches!(TimeRange::new(5.0, 2.0), Err(CoreError::InvalidRange(_))));
        assert!(matches!(TimeRange::new(-1.0, 2.0), Err(CoreError::InvalidRange(_))));
        assert!(matches!(TimeRange::new(0.0, f64::INFINITY), Err(CoreError::InvalidRange(_))));
        assert!(matches!(TimeRange::new(f64::NAN, 1.0), Err(CoreError::InvalidRange(_))));
    }

    #[test]
    fn test_time_range_duration_and_bounds() {
        let r = range(2.0, 5.0);
        assert_eq!(r.duration(), 3.0);
        assert!(r.check_within(10.0).is_ok());
        assert!(r.check_within(5.0).is_ok());
        assert!(matches!(r.check_within(4.9), Err(CoreError::InvalidRange(_))));
        assert_eq!(r.to_string(), "2s-5s");
    }

    #[test]
    fn test_gif_args_select_range() {
        let op = Operation::ExportAsGif(range(2.0, 5.0));
        assert_eq!(
            op.engine_args("in.mp4", "out.gif"),
            vec!["-i", "in.mp4", "-ss", "2", "-to", "5", "-f", "gif", "out.gif"]
        );
    }

    #[test]
    fn test_trim_args_seek_then_copy_duration() {
        let op = Operation::TrimAndReencode(range(2.0, 5.0));
        assert_eq!(
            op.engine_args("in.mp4", "out.mp4"),
            vec!["-ss", "2", "-i", "in.mp4", "-t", "3", "-c", "copy", "out.mp4"]
        );
    }

    #[test]
    fn test_trim_args_fractional_duration() {
        let op = Operation::TrimAndReencode(range(2.1, 5.3));
        let args = op.engine_args("a.mp4", "b.mp4");
        assert_eq!(args[1], "2.1");
        assert_eq!(args[5], "3.2");
    }

    #[test]
    fn test_photo_args_render_single_frame() {
        let op = Operation::AdjustPhoto(PhotoAdjustment::new(50, 200).unwrap());
        assert_eq!(
            op.engine_args("in.jpg", "out.png"),
            vec![
                "-i",
                "in.jpg",
                "-vf",
                "scale=200:-1,colorchannelmixer=rr=0.5:gg=0.5:bb=0.5",
                "-frames:v",
                "1",
                "out.png"
            ]
        );
        assert_eq!(op.expected_duration(), None);
    }

    #[test]
    fn test_mode_metadata() {
        assert_eq!(OperationMode::ExportAsGif.mime_type(), "image/gif");
        assert_eq!(OperationMode::ExportAsGif.download_name(), "output.gif");
        assert_eq!(OperationMode::TrimAndReencode.mime_type(), "video/mp4");
        assert_eq!(OperationMode::TrimAndReencode.download_name(), "output.mp4");
        assert_eq!(OperationMode::AdjustPhoto.mime_type(), "image/png");
        assert_eq!(OperationMode::AdjustPhoto.download_name(), "edited_image.png");
    }

    #[test]
    fn test_invocation_names_are_unique_and_used_in_args() {
        let op = Operation::ExportAsGif(range(0.0, 1.0));
        let first = EngineInvocation::new(&op, "mov");
        let second = EngineInvocation::new(&op, "mov");

        assert_ne!(first.input_name, second.input_name);
        assert_ne!(first.output_name, second.output_name);
        assert!(first.input_name.starts_with("input_") && first.input_name.ends_with(".mov"));
        assert!(first.output_name.starts_with("output_") && first.output_name.ends_with(".gif"));
        assert_eq!(first.args[1], first.input_name);
        assert_eq!(first.args.last(), Some(&first.output_name));
    }

    #[test]
    fn test_source_extension() {
        assert_eq!(MediaSource::from_path("/videos/clip.MOV").extension(), "mov");
        assert_eq!(MediaSource::from_path("/videos/clip").extension(), "mp4");
        assert_eq!(MediaSource::from_bytes("photo.jpeg", vec![]).extension(), "jpeg");
        assert_eq!(MediaSource::from_bytes("weird.m p4", vec![]).extension(), "mp4");
    }

    #[test]
    fn test_source_check_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"frames").unwrap();

        assert!(MediaSource::from_path(&path).check_readable().is_ok());

        let missing = MediaSource::from_path(dir.path().join("missing.mp4"));
        assert!(matches!(missing.check_readable(), Err(CoreError::Staging(_))));

        let in_memory = MediaSource::from_bytes("clip.mp4", b"abc".to_vec());
        assert!(in_memory.check_readable().is_ok());
    }

    #[test]
    fn test_artifact_accessors() {
        let artifact = OutputArtifact::new(vec![1, 2, 3], OperationMode::TrimAndReencode);
        assert_eq!(artifact.len(), 3);
        assert!(!artifact.is_empty());
        assert_eq!(artifact.mime_type(), "video/mp4");
        assert_eq!(artifact.file_name(), "output.mp4");
        assert_eq!(artifact.into_bytes(), vec![1, 2, 3]);
    }
}
