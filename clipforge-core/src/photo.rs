//! Photo adjustment parameters.
//!
//! A photo adjustment scales an image to a target width (keeping its aspect
//! ratio) and multiplies every color channel by a brightness factor, then
//! renders a single PNG frame.

use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg_builder::VideoFilterChain;
use crate::utils::format_decimal_arg;
use serde::Serialize;

/// Lowest accepted brightness, in percent.
pub const MIN_BRIGHTNESS_PERCENT: u16 = 0;
/// Highest accepted brightness, in percent.
pub const MAX_BRIGHTNESS_PERCENT: u16 = 200;
/// Brightness that leaves the image unchanged.
pub const DEFAULT_BRIGHTNESS_PERCENT: u16 = 100;
/// Narrowest accepted output width, in pixels.
pub const MIN_WIDTH: u32 = 100;
/// Widest accepted output width, in pixels.
pub const MAX_WIDTH: u32 = 600;
/// Output width used when none is given.
pub const DEFAULT_WIDTH: u32 = 300;

/// Brightness and width settings for a photo export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhotoAdjustment {
    brightness_percent: u16,
    width: u32,
}

impl Default for PhotoAdjustment {
    fn default() -> Self {
        Self {
            brightness_percent: DEFAULT_BRIGHTNESS_PERCENT,
            width: DEFAULT_WIDTH,
        }
    }
}

impl PhotoAdjustment {
    /// Creates an adjustment, rejecting values outside the accepted bounds.
    pub fn new(brightness_percent: u16, width: u32) -> CoreResult<Self> {
        if brightness_percent > MAX_BRIGHTNESS_PERCENT {
            return Err(CoreError::InvalidInput(format!(
                "brightness {brightness_percent}% is outside {MIN_BRIGHTNESS_PERCENT}..={MAX_BRIGHTNESS_PERCENT}"
            )));
        }
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) {
            return Err(CoreError::InvalidInput(format!(
                "width {width}px is outside {MIN_WIDTH}..={MAX_WIDTH}"
            )));
        }
        Ok(Self {
            brightness_percent,
            width,
        })
    }

    pub fn brightness_percent(&self) -> u16 {
        self.brightness_percent
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Filter graph for the engine: scale first, then the channel multiplier.
    pub fn filter_graph(&self) -> String {
        let factor = format_decimal_arg(f64::from(self.brightness_percent) / 100.0);
        VideoFilterChain::new()
            .add_scale_to_width(self.width)
            .add_filter(format!(
                "colorchannelmixer=rr={factor}:gg={factor}:bb={factor}"
            ))
            .build()
            .unwrap_or_default()
    }
}
