//! Detection overlays drawn onto camera frames.

use serde::{Deserialize, Serialize};
use vello_cpu::kurbo::Rect;

use crate::{
    foundation::{core::Rgba8, error::InkpadResult},
    model::Detection,
    raster::RasterImage,
    surface::cpu::CpuCanvas,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub color: Rgba8,
    pub frame_width: f64,
    /// Filled tag in the top-left corner of each box, sized for the label text.
    pub label_background: bool,
    pub label_font_size: f64,
    /// Approximate advance of one label character; labels are not shaped.
    pub label_char_width: f64,
    pub label_padding: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: Rgba8::opaque(0x2f, 0xff, 0x00),
            frame_width: 1.0,
            label_background: true,
            label_font_size: 16.0,
            label_char_width: 9.0,
            label_padding: 10.0,
        }
    }
}

impl OverlayStyle {
    /// Size of the label tag for `label`.
    pub fn label_box(&self, label: &str) -> (f64, f64) {
        let chars = label.chars().count() as f64;
        (
            chars * self.label_char_width + self.label_padding,
            self.label_font_size + self.label_padding,
        )
    }
}

/// Returns a copy of `frame` with every detection outlined.
///
/// Outlines sit on pixel centers, so a one pixel frame covers exactly one pixel row or
/// column on each side of the box.
#[tracing::instrument(skip_all, fields(boxes = detections.len()))]
pub fn draw_detections(
    frame: &RasterImage,
    detections: &[Detection],
    style: &OverlayStyle,
) -> InkpadResult<RasterImage> {
    let mut canvas = CpuCanvas::from_raster(frame)?;
    let half = style.frame_width / 2.0;
    for d in detections {
        let (x, y) = (f64::from(d.x), f64::from(d.y));
        let outline = Rect::new(
            x + half,
            y + half,
            x + f64::from(d.width) + half,
            y + f64::from(d.height) + half,
        );
        canvas.stroke_rect(outline, style.frame_width, style.color)?;

        if style.label_background {
            let (w, h) = style.label_box(&d.label);
            canvas.fill_rect(Rect::new(x, y, x + w, y + h), style.color)?;
        }
    }
    Ok(canvas.to_raster())
}
