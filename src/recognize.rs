use std::{cell::RefCell, rc::Rc};

use crate::{
    foundation::{
        core::Point,
        error::{InkpadError, InkpadResult},
    },
    model::{ModelHandle, Prediction},
    normalize::{NormalizeOptions, normalize_snapshot},
    raster::RasterImage,
    surface::{DrawingSurface, SurfaceConfig},
};

/// Draw-then-recognize session: a surface, the latest stroke-end snapshot and a model.
pub struct Sketchpad {
    surface: DrawingSurface,
    latest: Rc<RefCell<Option<RasterImage>>>,
    model: Option<ModelHandle>,
    options: NormalizeOptions,
    last_prediction: Option<Prediction>,
}

impl Sketchpad {
    pub fn new(config: SurfaceConfig, options: NormalizeOptions) -> InkpadResult<Self> {
        let mut surface = DrawingSurface::new(config)?;
        let latest = Rc::new(RefCell::new(None));
        let sink = latest.clone();
        surface.on_draw_end(move |end| {
            // An unmounted surface reports nothing; keep what was drawn before.
            if let Some(image) = &end.image {
                *sink.borrow_mut() = Some(image.clone());
            }
        });
        Ok(Self {
            surface,
            latest,
            model: None,
            options,
            last_prediction: None,
        })
    }

    pub fn with_model(mut self, model: ModelHandle) -> Self {
        self.model = Some(model);
        self
    }

    pub fn set_model(&mut self, model: ModelHandle) {
        self.model = Some(model);
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut DrawingSurface {
        &mut self.surface
    }

    pub fn pointer_down(&mut self, page: Point) {
        self.surface.pointer_down(page);
    }

    pub fn pointer_move(&mut self, page: Point) {
        self.surface.pointer_move(page);
    }

    pub fn pointer_up(&mut self) {
        self.surface.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.surface.pointer_leave();
    }

    pub fn snapshot(&self) -> Option<RasterImage> {
        self.latest.borrow().clone()
    }

    /// Recognition is offered only with both a drawing and a model.
    pub fn can_recognize(&self) -> bool {
        self.latest.borrow().is_some() && self.model.is_some()
    }

    pub fn last_prediction(&self) -> Option<&Prediction> {
        self.last_prediction.as_ref()
    }

    pub fn recognize(&mut self) -> InkpadResult<Prediction> {
        let snapshot = self.latest.borrow().clone();
        let Some(snapshot) = snapshot else {
            return Err(InkpadError::invalid_input("nothing has been drawn yet"));
        };
        let model = self
            .model
            .as_mut()
            .ok_or_else(|| InkpadError::model("no model attached"))?;

        let size = model.input_size()?;
        let input = normalize_snapshot(Some(&snapshot), size.width, size.height, &self.options)?;
        let output = model.predict(&input)?;
        let prediction = Prediction::from_output(&output)?;
        tracing::debug!(best = prediction.best, "recognized");

        self.last_prediction = Some(prediction.clone());
        Ok(prediction)
    }

    /// Erases the surface and forgets the drawing and the last result.
    pub fn clear(&mut self) -> u64 {
        self.latest.borrow_mut().take();
        self.last_prediction = None;
        self.surface.clear()
    }
}
