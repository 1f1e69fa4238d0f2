//! Core library for range-based media clipping through ffmpeg.
//!
//! A [`ClipPipeline`] stages a source into a private engine workspace, runs
//! one ffmpeg command for the requested [`Operation`], retrieves the output
//! and hands it to a [`DownloadTrigger`]. Lifecycle and progress are reported
//! as [`Event`]s.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use clipforge_core::{
//!     ClipPipeline, ClipRequest, CoreConfig, FfmpegEngine, MediaSource, TimeRange,
//!     download::trigger_for,
//! };
//! use std::path::PathBuf;
//!
//! let config = CoreConfig::new(PathBuf::from("/path/to/output"));
//! let pipeline = ClipPipeline::new(FfmpegEngine::new(&config).unwrap());
//!
//! let request = ClipRequest::gif(
//!     MediaSource::from_path("/path/to/clip.mp4"),
//!     TimeRange::new(2.0, 5.0).unwrap(),
//! );
//! let artifact = pipeline.export(&request).unwrap();
//! let delivery = pipeline.deliver(artifact, trigger_for(&config).as_ref()).unwrap();
//! println!("saved to {delivery}");
//! ```

pub mod clip;
pub mod config;
pub mod download;
pub mod error;
pub mod events;
pub mod external;
pub mod file_logging;
pub mod media;
pub mod photo;
pub mod pipeline;
pub mod temp_files;
pub mod utils;

// Re-exports for public API
pub use clip::{
    ClipRequest, EngineInvocation, MediaSource, Operation, OperationMode, OutputArtifact,
    TimeRange,
};
pub use config::{CoreConfig, CoreConfigBuilder, DeliveryStrategy};
pub use download::{DataUrlDownload, Delivery, DownloadTrigger, FileDownload, trigger_for};
pub use error::{CoreError, CoreResult};
pub use events::{Event, EventDispatcher, EventHandler, ExportStatus, JsonProgressHandler};
pub use external::{EngineAdapter, EngineProgress, FfmpegEngine, check_ffmpeg, check_ffprobe};
pub use file_logging::FileLoggingHandler;
pub use media::{MediaInfo, get_duration, get_media_info};
pub use photo::PhotoAdjustment;
pub use pipeline::ClipPipeline;
pub use utils::{format_bytes, format_duration, parse_ffmpeg_time};
