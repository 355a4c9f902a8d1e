use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::Rgba8,
    error::{InkpadError, InkpadResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Round,
    Bevel,
    Miter,
}

/// Construction parameters of a [`crate::DrawingSurface`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
    pub line_color: Rgba8,
    pub line_width: f64,
    pub line_join: LineJoin,
    pub background_color: Rgba8,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            line_color: Rgba8::BLACK,
            line_width: 16.0,
            line_join: LineJoin::Round,
            background_color: Rgba8::WHITE,
        }
    }
}

impl SurfaceConfig {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> InkpadResult<()> {
        let max = u32::from(u16::MAX);
        if self.width == 0 || self.height == 0 {
            return Err(InkpadError::validation("surface width/height must be > 0"));
        }
        if self.width > max || self.height > max {
            return Err(InkpadError::validation(format!(
                "surface width/height must be <= {max}"
            )));
        }
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(InkpadError::validation(
                "line_width must be finite and > 0",
            ));
        }
        Ok(())
    }

    pub(crate) fn stroke(&self) -> vello_cpu::kurbo::Stroke {
        use vello_cpu::kurbo::{Cap, Join, Stroke};

        // Every segment is stroked on its own, so the join style has to pick the end caps.
        let (join, cap) = match self.line_join {
            LineJoin::Round => (Join::Round, Cap::Round),
            LineJoin::Bevel => (Join::Bevel, Cap::Butt),
            LineJoin::Miter => (Join::Miter, Cap::Butt),
        };
        Stroke::new(self.line_width).with_join(join).with_caps(cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_drawing_conventions() {
        let c = SurfaceConfig::default();
        assert_eq!((c.width, c.height), (200, 200));
        assert_eq!(c.line_color, Rgba8::BLACK);
        assert_eq!(c.background_color, Rgba8::WHITE);
        assert_eq!(c.line_width, 16.0);
        assert_eq!(c.line_join, LineJoin::Round);
        c.validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: SurfaceConfig = serde_json::from_value(json!({
            "width": 64,
            "line_width": 8,
            "line_join": "bevel",
            "background_color": "#000"
        }))
        .unwrap();
        assert_eq!(c.width, 64);
        assert_eq!(c.height, 200);
        assert_eq!(c.line_width, 8.0);
        assert_eq!(c.line_join, LineJoin::Bevel);
        assert_eq!(c.background_color, Rgba8::BLACK);
    }

    #[test]
    fn validate_rejects_degenerate_sizes() {
        assert!(SurfaceConfig::with_size(0, 10).validate().is_err());
        assert!(SurfaceConfig::with_size(70_000, 10).validate().is_err());
        let c = SurfaceConfig {
            line_width: f64::NAN,
            ..SurfaceConfig::default()
        };
        assert!(c.validate().is_err());
    }
}
