//! `photo` command.

use crate::cli::{GlobalArgs, PhotoArgs};
use crate::commands::{build_config, build_dispatcher, run_export, validate_input_path};
use crate::error::CliResult;
use clipforge_core::{
    ClipPipeline, ClipRequest, FfmpegEngine, MediaSource, PhotoAdjustment, check_ffmpeg,
    trigger_for,
};

/// Runs `photo`: scales and brightens the image into `edited_image.png`.
pub fn run_photo(globals: &GlobalArgs, args: PhotoArgs) -> CliResult<()> {
    let input = validate_input_path(&args.input)?;
    let adjustment = PhotoAdjustment::new(args.brightness, args.width)?;
    check_ffmpeg()?;

    log::debug!(
        "Photo adjustment: brightness {}%, width {}px",
        adjustment.brightness_percent(),
        adjustment.width()
    );
    let request = ClipRequest::photo(MediaSource::from_path(input), adjustment);

    let config = build_config(globals, &args.output)?;
    let pipeline = ClipPipeline::with_dispatcher(FfmpegEngine::new(&config)?, build_dispatcher(globals));
    let trigger = trigger_for(&config);
    run_export(&pipeline, &request, trigger.as_ref())?;
    Ok(())
}
