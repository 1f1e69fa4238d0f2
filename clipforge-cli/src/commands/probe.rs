//! `probe` command.

use crate::cli::{GlobalArgs, ProbeArgs};
use crate::commands::validate_input_path;
use crate::error::CliResult;
use clipforge_core::{MediaInfo, format_duration, get_media_info};
use std::path::Path;

/// Runs `probe`: prints what ffprobe reports about the input.
pub fn run_probe(_globals: &GlobalArgs, args: ProbeArgs) -> CliResult<()> {
    let input = validate_input_path(&args.input)?;
    let info = get_media_info(&input)?;
    print!("{}", render_media_info(&input, &info));
    Ok(())
}

fn render_media_info(input: &Path, info: &MediaInfo) -> String {
    let unknown = || "unknown".to_string();
    let duration = info
        .duration
        .map(|d| format!("{} ({:.3}s)", format_duration(d), d))
        .unwrap_or_else(unknown);
    let dimensions = match (info.width, info.height) {
        (Some(w), Some(h)) => format!("{w}x{h}"),
        _ => unknown(),
    };
    let format = info.format_name.clone().unwrap_or_else(unknown);

    format!(
        "File:       {}\nDuration:   {}\nDimensions: {}\nFormat:     {}\n",
        input.display(),
        duration,
        dimensions,
        format
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_missing_fields() {
        let info = MediaInfo {
            duration: None,
            width: Some(640),
            height: None,
            format_name: Some("mov,mp4,m4a,3gp,3g2,mj2".to_string()),
        };
        let text = render_media_info(Path::new("clip.mp4"), &info);
        assert!(text.contains("Duration:   unknown"));
        assert!(text.contains("Dimensions: unknown"));
        assert!(text.contains("Format:     mov,mp4"));
    }

    #[test]
    fn test_render_dimensions() {
        let info = MediaInfo {
            duration: Some(5.0),
            width: Some(1920),
            height: Some(1080),
            format_name: None,
        };
        let text = render_media_info(Path::new("clip.mp4"), &info);
        assert!(text.contains("Dimensions: 1920x1080"));
        assert!(text.contains("(5.000s)"));
    }
}
