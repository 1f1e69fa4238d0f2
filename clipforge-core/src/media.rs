//! FFprobe integration for media inspection.
//!
//! Used to learn a source's duration so a selected range can be checked
//! against it before any export starts.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Struct containing media information.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MediaInfo {
    /// Duration of the media in seconds
    pub duration: Option<f64>,
    /// Width of the first video stream
    pub width: Option<i64>,
    /// Height of the first video stream
    pub height: Option<i64>,
    /// Container format name reported by ffprobe
    pub format_name: Option<String>,
}

/// Gets duration, dimensions and container format for a media file.
pub fn get_media_info(input_path: &Path) -> CoreResult<MediaInfo> {
    log::debug!(
        "Running ffprobe (via crate) for media info on: {}",
        input_path.display()
    );
    match ffprobe(input_path) {
        Ok(metadata) => {
            let duration = metadata
                .format
                .duration
                .as_deref()
                .and_then(|d| d.parse::<f64>().ok());
            let video_stream = metadata
                .streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"));

            Ok(MediaInfo {
                duration,
                width: video_stream.and_then(|s| s.width),
                height: video_stream.and_then(|s| s.height),
                format_name: Some(metadata.format.format_name.clone()),
            })
        }
        Err(err) => {
            log::error!("ffprobe failed for {}: {:?}", input_path.display(), err);
            Err(map_ffprobe_error(err, "media info"))
        }
    }
}

/// Gets the duration of a media file in seconds.
pub fn get_duration(input_path: &Path) -> CoreResult<f64> {
    get_media_info(input_path)?.duration.ok_or_else(|| {
        CoreError::FfprobeParse(format!(
            "Failed to parse duration from format for {}",
            input_path.display()
        ))
    })
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
            CoreError::DependencyNotFound("ffprobe".to_string())
        }
        FfProbeError::Io(io_err) => command_start_error(format!("ffprobe ({context})"), io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({context})"), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => CoreError::FfprobeParse(format!(
            "ffprobe {context} output deserialization: {err}"
        )),
        #[allow(unreachable_patterns)]
        other => CoreError::FfprobeParse(format!("Unknown ffprobe error during {context}: {other:?}")),
    }
}
