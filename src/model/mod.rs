//! Model-inference collaborator.
//!
//! Models are opaque: anything that can turn an input tensor into an output tensor and
//! report its declared input shape. Loading goes through a caller-supplied
//! [`ModelLoader`], so this crate never owns a model format.

pub mod detection;
pub mod generate;
pub mod prediction;

use std::path::Path;

use crate::{
    foundation::{
        core::Size,
        error::{InkpadError, InkpadResult},
    },
    tensor::Tensor,
};

pub use detection::{
    BoundingBox, Detection, DetectionOptions, decode_detections, non_max_suppression,
};
pub use generate::{GenerateOptions, generate_text, sample_logits};
pub use prediction::{Prediction, ProbabilityBar};

pub trait InferenceModel {
    /// Declared input shape, `None` for free dimensions (usually the batch axis).
    fn input_shape(&self) -> &[Option<usize>];

    fn predict(&mut self, input: &Tensor) -> InkpadResult<Tensor>;

    /// Drops recurrent state between generation runs. Stateless models ignore this.
    fn reset_state(&mut self) {}
}

pub trait ModelLoader {
    fn load(&self, path: &Path) -> InkpadResult<Box<dyn InferenceModel>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Run one throwaway prediction right after loading.
    pub warmup: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { warmup: true }
    }
}

/// A loaded, ready-to-use model.
pub struct ModelHandle {
    model: Box<dyn InferenceModel>,
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("input_shape", &self.model.input_shape())
            .finish()
    }
}

impl ModelHandle {
    pub fn new(model: Box<dyn InferenceModel>) -> Self {
        Self { model }
    }

    pub fn input_shape(&self) -> &[Option<usize>] {
        self.model.input_shape()
    }

    /// Spatial input size from an NHWC shape: height is axis 1, width axis 2.
    pub fn input_size(&self) -> InkpadResult<Size> {
        let shape = self.model.input_shape();
        let (Some(Some(h)), Some(Some(w))) = (shape.get(1), shape.get(2)) else {
            return Err(InkpadError::model(format!(
                "model input shape {shape:?} has no fixed spatial dimensions"
            )));
        };
        let to_u32 = |v: usize| {
            u32::try_from(v).map_err(|_| InkpadError::model("model input dimension exceeds u32"))
        };
        Ok(Size::new(to_u32(*w)?, to_u32(*h)?))
    }

    pub fn predict(&mut self, input: &Tensor) -> InkpadResult<Tensor> {
        self.model.predict(input)
    }

    pub fn reset_state(&mut self) {
        self.model.reset_state();
    }

    /// Predicts once on zeros shaped like the declared input (free dims become 1).
    pub fn warmup(&mut self) -> InkpadResult<()> {
        let shape: Vec<usize> = self
            .model
            .input_shape()
            .iter()
            .map(|d| d.unwrap_or(1))
            .collect();
        self.model.predict(&Tensor::zeros(shape))?;
        Ok(())
    }
}

#[tracing::instrument(skip(loader))]
pub fn load_model(
    loader: &dyn ModelLoader,
    path: &Path,
    opts: LoadOptions,
) -> InkpadResult<ModelHandle> {
    let model = loader.load(path)?;
    let mut handle = ModelHandle::new(model);
    if opts.warmup {
        handle.warmup()?;
        tracing::debug!(shape = ?handle.input_shape(), "model warmed up");
    }
    Ok(handle)
}
