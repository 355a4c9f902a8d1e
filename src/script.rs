use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        core::Point,
        error::{InkpadError, InkpadResult},
    },
    raster::RasterImage,
    surface::{DrawingSurface, SurfaceConfig},
};

/// One recorded input step, in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
    Clear,
}

/// A replayable drawing: surface settings plus an ordered event list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeScript {
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

impl StrokeScript {
    /// A single pen-down stroke through `points`.
    pub fn stroke(points: &[(f64, f64)]) -> Vec<ScriptEvent> {
        let mut events = Vec::with_capacity(points.len() + 1);
        for (i, &(x, y)) in points.iter().enumerate() {
            if i == 0 {
                events.push(ScriptEvent::Down { x, y });
            } else {
                events.push(ScriptEvent::Move { x, y });
            }
        }
        if !points.is_empty() {
            events.push(ScriptEvent::Up);
        }
        events
    }

    pub fn apply(&self, surface: &mut DrawingSurface) {
        for event in &self.events {
            match *event {
                ScriptEvent::Down { x, y } => surface.pointer_down(Point::new(x, y)),
                ScriptEvent::Move { x, y } => surface.pointer_move(Point::new(x, y)),
                ScriptEvent::Up => surface.pointer_up(),
                ScriptEvent::Leave => surface.pointer_leave(),
                ScriptEvent::Clear => {
                    surface.clear();
                }
            }
        }
    }

    /// Replays the script on a fresh surface and returns the final raster.
    pub fn render(&self) -> InkpadResult<RasterImage> {
        let mut surface = DrawingSurface::new(self.surface.clone())?;
        self.apply(&mut surface);
        surface
            .snapshot()
            .ok_or_else(|| InkpadError::render("surface was unmounted during replay"))
    }
}
