//! Object-detection post-processing.
//!
//! Detector outputs arrive as normalized `[y1, x1, y2, x2]` boxes with one score and one
//! class id per box. [`decode_detections`] keeps the boxes that survive non-max
//! suppression and scales them to pixel rectangles on the source frame.

use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        core::Size,
        error::{InkpadError, InkpadResult},
    },
    tensor::Tensor,
};

/// A box in normalized `[0, 1]` image coordinates, corner order as detectors emit it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub y1: f32,
    pub x1: f32,
    pub y2: f32,
    pub x2: f32,
}

impl BoundingBox {
    pub fn new(y1: f32, x1: f32, y2: f32, x2: f32) -> Self {
        Self { y1, x1, y2, x2 }
    }

    /// Corners may come in either order; the area is always non-negative.
    pub fn area(&self) -> f32 {
        (self.y2 - self.y1).abs() * (self.x2 - self.x1).abs()
    }

    /// Intersection over union; `0` when either box is degenerate.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let (area_a, area_b) = (self.area(), other.area());
        if area_a <= 0.0 || area_b <= 0.0 {
            return 0.0;
        }
        let top = self.y1.min(self.y2).max(other.y1.min(other.y2));
        let left = self.x1.min(self.x2).max(other.x1.min(other.x2));
        let bottom = self.y1.max(self.y2).min(other.y1.max(other.y2));
        let right = self.x1.max(self.x2).min(other.x1.max(other.x2));
        let inter = (bottom - top).max(0.0) * (right - left).max(0.0);
        inter / (area_a + area_b - inter)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionOptions {
    pub max_boxes: usize,
    /// A candidate is dropped when its IoU with a kept box reaches this value.
    pub iou_threshold: f32,
    /// Only scores strictly above this value are considered.
    pub score_threshold: f32,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            max_boxes: 20,
            iou_threshold: 0.5,
            score_threshold: 0.2,
        }
    }
}

/// Greedy non-max suppression. Returns kept indices, best score first.
pub fn non_max_suppression(
    boxes: &[BoundingBox],
    scores: &[f32],
    opts: &DetectionOptions,
) -> Vec<usize> {
    let mut candidates: Vec<usize> = (0..boxes.len().min(scores.len()))
        .filter(|&i| scores[i] > opts.score_threshold)
        .collect();
    // Stable, so equal scores keep their original order.
    candidates.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut kept: Vec<usize> = Vec::new();
    for i in candidates {
        if kept.len() >= opts.max_boxes {
            break;
        }
        if kept
            .iter()
            .all(|&k| boxes[k].iou(&boxes[i]) < opts.iou_threshold)
        {
            kept.push(i);
        }
    }
    kept
}

/// One detected object, in pixels of the frame it was found on.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Detection {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub class: usize,
    pub score: f32,
    /// `"<class name> <percent>%"`, percent floored.
    pub label: String,
}

/// Scales a normalized box to whole pixels; each edge is floored on its own.
pub fn to_pixels(b: &BoundingBox, frame: Size) -> (i32, i32, i32, i32) {
    let scale = |v: f32, extent: u32| (f64::from(v) * f64::from(extent)).floor() as i32;
    let x1 = scale(b.x1, frame.width);
    let y1 = scale(b.y1, frame.height);
    let x2 = scale(b.x2, frame.width);
    let y2 = scale(b.y2, frame.height);
    (x1, y1, x2 - x1, y2 - y1)
}

pub fn detection_label(name: &str, score: f32) -> String {
    format!("{name} {}%", (100.0 * score).floor() as i32)
}

/// Decodes detector outputs into pixel-space detections.
///
/// `boxes` is `[1, N, 4]` (or `[N, 4]`), `scores` and `classes` are `[1, N]` (or `[N]`).
/// Class ids without an entry in `labels` get an empty name.
#[tracing::instrument(skip_all, fields(frame_w = frame.width, frame_h = frame.height))]
pub fn decode_detections(
    boxes: &Tensor,
    scores: &Tensor,
    classes: &Tensor,
    labels: &[String],
    frame: Size,
    opts: &DetectionOptions,
) -> InkpadResult<Vec<Detection>> {
    if boxes.shape().last() != Some(&4) {
        return Err(InkpadError::model(format!(
            "detection boxes need a trailing axis of 4, got shape {:?}",
            boxes.shape()
        )));
    }
    let n = boxes.len() / 4;
    if scores.len() != n || classes.len() != n {
        return Err(InkpadError::model(format!(
            "detection outputs disagree: {n} boxes, {} scores, {} classes",
            scores.len(),
            classes.len()
        )));
    }

    let parsed: Vec<BoundingBox> = boxes
        .data()
        .chunks_exact(4)
        .map(|c| BoundingBox::new(c[0], c[1], c[2], c[3]))
        .collect();
    let score_values = scores.data();

    let kept = non_max_suppression(&parsed, score_values, opts);
    let mut out = Vec::with_capacity(kept.len());
    for i in kept {
        let class = classes.data()[i].max(0.0) as usize;
        let name = match labels.get(class) {
            Some(name) => name.as_str(),
            None => {
                tracing::warn!(class, "unknown class id");
                ""
            }
        };
        let score = score_values[i];
        let (x, y, width, height) = to_pixels(&parsed[i], frame);
        out.push(Detection {
            x,
            y,
            width,
            height,
            class,
            score,
            label: detection_label(name, score),
        });
    }
    Ok(out)
}
