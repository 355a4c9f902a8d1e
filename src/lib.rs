//! Inkpad turns freehand pointer input into model-ready tensors.
//!
//! - [`DrawingSurface`] captures strokes on a fixed-size raster.
//! - [`normalize`] converts a raster into a `[1, H, W, C]` tensor.
//! - [`Sketchpad`] wires both to an opaque [`InferenceModel`].
#![forbid(unsafe_code)]

mod foundation;

pub mod frames;
pub mod input;
pub mod model;
pub mod normalize;
pub mod overlay;
pub mod raster;
pub mod recognize;
pub mod script;
pub mod surface;
pub mod tensor;

pub use crate::foundation::core::{Point, Rgba8, Size, Vec2, unpremul_rgba8};
pub use crate::foundation::error::{InkpadError, InkpadResult};

pub use crate::frames::{CameraConfig, FacingMode, FrameSampler, FrameSource, FrameThrottle};
pub use crate::input::{
    EventTarget, ListenerGuard, PointerEvent, PointerEventKind, StrokePhase, SurfaceBindings,
    bind_surface,
};
pub use crate::model::{
    BoundingBox, Detection, DetectionOptions, GenerateOptions, InferenceModel, LoadOptions,
    ModelHandle, ModelLoader, Prediction, ProbabilityBar, decode_detections, generate_text,
    load_model, non_max_suppression, sample_logits,
};
pub use crate::normalize::{
    ChannelMode, NormalizeOptions, ValueRange, greyscale_matrix, invert_greyscale, normalize,
    normalize_image, normalize_snapshot,
};
pub use crate::overlay::{OverlayStyle, draw_detections};
pub use crate::raster::RasterImage;
pub use crate::recognize::Sketchpad;
pub use crate::script::{ScriptEvent, StrokeScript};
pub use crate::surface::{DrawEnd, DrawingSurface, LineJoin, Mount, PenState, SurfaceConfig};
pub use crate::tensor::Tensor;
