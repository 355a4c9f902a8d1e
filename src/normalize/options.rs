use serde::{Deserialize, Serialize};

use crate::foundation::error::{InkpadError, InkpadResult};

/// How RGB pixels collapse into tensor channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelMode {
    /// Plain average of R, G and B. One channel.
    #[default]
    Mean,
    /// sRGB-encoded relative luminance, rounded to an integer level. One channel.
    Luminance,
    /// Keep R, G and B. Three channels.
    Rgb,
}

impl ChannelMode {
    pub fn channels(self) -> usize {
        match self {
            ChannelMode::Mean | ChannelMode::Luminance => 1,
            ChannelMode::Rgb => 3,
        }
    }
}

/// Mapping from `0..=255` pixel levels to model values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ValueRange {
    /// `v / 255`, into `[0, 1]`.
    #[default]
    Unit,
    /// `v / 127.5 - 1`, into `[-1, 1]`.
    Signed,
    /// `v / divisor + offset`.
    Affine { divisor: f32, offset: f32 },
}

impl ValueRange {
    pub fn apply(self, v: f32) -> f32 {
        match self {
            ValueRange::Unit => v / 255.0,
            ValueRange::Signed => v / 127.5 - 1.0,
            ValueRange::Affine { divisor, offset } => v / divisor + offset,
        }
    }

    pub fn validate(self) -> InkpadResult<()> {
        if let ValueRange::Affine { divisor, offset } = self
            && (!divisor.is_finite() || divisor == 0.0 || !offset.is_finite())
        {
            return Err(InkpadError::validation(
                "affine range needs a finite non-zero divisor and a finite offset",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    pub channels: ChannelMode,
    /// Dark-on-light drawings become light-on-dark (`255 - v`).
    pub invert: bool,
    pub range: ValueRange,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            channels: ChannelMode::Mean,
            invert: true,
            range: ValueRange::Unit,
        }
    }
}

impl NormalizeOptions {
    /// Photo-style input: RGB kept, no inversion, `[-1, 1]` values.
    pub fn rgb_signed() -> Self {
        Self {
            channels: ChannelMode::Rgb,
            invert: false,
            range: ValueRange::Signed,
        }
    }

    /// Camera frames: RGB kept, no inversion, `[0, 1]` values.
    pub fn rgb_unit() -> Self {
        Self {
            channels: ChannelMode::Rgb,
            invert: false,
            range: ValueRange::Unit,
        }
    }
}
