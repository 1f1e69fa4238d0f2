//! `gif` and `trim` commands.

use crate::cli::{GlobalArgs, RangeArgs};
use crate::commands::{build_config, build_dispatcher, run_export, validate_input_path};
use crate::error::CliResult;
use clipforge_core::{
    ClipPipeline, ClipRequest, FfmpegEngine, MediaSource, TimeRange, check_ffmpeg, check_ffprobe,
    get_duration, trigger_for,
};
use std::path::Path;

/// Builds the request for one range-based mode.
type RangeRequest = fn(MediaSource, TimeRange) -> ClipRequest;

/// Runs `gif`: exports the range as `output.gif`.
pub fn run_gif(globals: &GlobalArgs, args: RangeArgs) -> CliResult<()> {
    run_range_export(globals, args, ClipRequest::gif)
}

/// Runs `trim`: stream-copies the range into `output.mp4`.
pub fn run_trim(globals: &GlobalArgs, args: RangeArgs) -> CliResult<()> {
    run_range_export(globals, args, ClipRequest::trim)
}

/// Validates the input and range, then exports through ffmpeg.
fn run_range_export(
    globals: &GlobalArgs,
    args: RangeArgs,
    make_request: RangeRequest,
) -> CliResult<()> {
    let request = prepare_request(&args, make_request)?;
    check_ffmpeg()?;
    if let (MediaSource::File(input), Some(range)) = (&request.source, request.operation.range()) {
        check_range_against_source(input, &range)?;
    }

    let config = build_config(globals, &args.output)?;
    let pipeline = ClipPipeline::with_dispatcher(FfmpegEngine::new(&config)?, build_dispatcher(globals));
    let trigger = trigger_for(&config);
    run_export(&pipeline, &request, trigger.as_ref())?;
    Ok(())
}

/// Checks the input path, then the range, and builds the request.
fn prepare_request(args: &RangeArgs, make_request: RangeRequest) -> CliResult<ClipRequest> {
    let input = validate_input_path(&args.input)?;
    let range = TimeRange::new(args.start, args.end)?;
    Ok(make_request(MediaSource::from_path(input), range))
}

/// Rejects ranges ending past the source. Skipped with a warning when the
/// duration cannot be probed.
fn check_range_against_source(input: &Path, range: &TimeRange) -> CliResult<()> {
    if let Err(e) = check_ffprobe() {
        log::warn!("{}; range end not checked against the source duration", e);
        return Ok(());
    }
    match get_duration(input) {
        Ok(duration) => {
            log::debug!("Source duration: {:.3}s, range {}", duration, range);
            range.check_within(duration)
        }
        Err(e) => {
            log::warn!(
                "Could not determine duration of {} ({}); range end not checked",
                input.display(),
                e
            );
            Ok(())
        }
    }
}
