//! Interactive freehand drawing surface.
//!
//! A [`DrawingSurface`] owns a fixed-size raster and a small pen state machine
//! (`Idle <-> Active`). Pointer positions arrive in page space and are resolved into
//! surface space by subtracting the mount offset. When the surface is unmounted every
//! pointer handler degrades to a no-op; nothing here panics or returns an error from an
//! input event.

pub(crate) mod composite;
pub mod config;
pub(crate) mod cpu;

use crate::{
    foundation::{
        core::{Point, Rgba8, Size, Vec2},
        error::InkpadResult,
    },
    raster::RasterImage,
};

pub use config::{LineJoin, SurfaceConfig};

/// Payload handed to the draw-end callback.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawEnd {
    /// Full pixel buffer at the end of the stroke, `None` when the surface is not mounted.
    pub image: Option<RasterImage>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PenState {
    Idle,
    Active { last: Point },
}

/// On-screen placement of a mounted surface (its page offset).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Mount {
    pub offset: Vec2,
}

impl Mount {
    pub fn at(left: f64, top: f64) -> Self {
        Self {
            offset: Vec2::new(left, top),
        }
    }
}

type DrawEndCallback = Box<dyn FnMut(&DrawEnd)>;

pub struct DrawingSurface {
    config: SurfaceConfig,
    canvas: cpu::CpuCanvas,
    stroke: vello_cpu::kurbo::Stroke,
    pen: PenState,
    mount: Option<Mount>,
    revision: u64,
    on_draw_end: Option<DrawEndCallback>,
}

impl std::fmt::Debug for DrawingSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingSurface")
            .field("config", &self.config)
            .field("pen", &self.pen)
            .field("mount", &self.mount)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl DrawingSurface {
    /// Allocates the raster and fills it with the background color.
    ///
    /// The new surface is mounted at page offset `(0, 0)`.
    pub fn new(config: SurfaceConfig) -> InkpadResult<Self> {
        config.validate()?;
        let mut canvas = cpu::CpuCanvas::new(config.width, config.height)?;
        canvas.fill(config.background_color);
        let stroke = config.stroke();
        Ok(Self {
            config,
            canvas,
            stroke,
            pen: PenState::Idle,
            mount: Some(Mount::default()),
            revision: 0,
            on_draw_end: None,
        })
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn size(&self) -> Size {
        Size::new(self.config.width, self.config.height)
    }

    pub fn pen(&self) -> PenState {
        self.pen
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.pen, PenState::Active { .. })
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    pub fn mount(&mut self, mount: Mount) {
        self.mount = Some(mount);
    }

    pub fn unmount(&mut self) {
        self.mount = None;
    }

    /// Registers the stroke-end callback, replacing any previous one.
    pub fn on_draw_end(&mut self, f: impl FnMut(&DrawEnd) + 'static) {
        self.on_draw_end = Some(Box::new(f));
    }

    /// Translates a page-space position into surface space.
    pub fn resolve(&self, page: Point) -> Option<Point> {
        let mount = self.mount?;
        Some(page - mount.offset)
    }

    pub fn pointer_down(&mut self, page: Point) {
        let Some(pos) = self.resolve(page) else {
            return;
        };
        tracing::debug!(x = pos.x, y = pos.y, "stroke start");
        self.pen = PenState::Active { last: pos };
    }

    pub fn pointer_move(&mut self, page: Point) {
        let PenState::Active { last } = self.pen else {
            return;
        };
        let Some(pos) = self.resolve(page) else {
            return;
        };

        if pos != last
            && let Err(err) = self.canvas.stroke_segment(
                last,
                pos,
                &self.stroke,
                self.config.line_color,
            )
        {
            tracing::warn!(%err, "dropping stroke segment");
        }
        self.pen = PenState::Active { last: pos };
    }

    pub fn pointer_up(&mut self) {
        self.exit_paint();
    }

    pub fn pointer_leave(&mut self) {
        self.exit_paint();
    }

    fn exit_paint(&mut self) {
        let end = DrawEnd {
            image: self.snapshot(),
        };
        if let Some(cb) = self.on_draw_end.as_mut() {
            cb(&end);
        }
        if self.is_drawing() {
            tracing::debug!(revision = self.revision, "stroke end");
        }
        self.pen = PenState::Idle;
    }

    /// Clears the surface when `revision` differs from the last one seen.
    pub fn set_revision(&mut self, revision: u64) {
        if revision == self.revision {
            return;
        }
        tracing::debug!(from = self.revision, to = revision, "surface clear");
        self.revision = revision;
        self.canvas.fill(self.config.background_color);
    }

    /// Clears by bumping the revision; returns the new revision.
    pub fn clear(&mut self) -> u64 {
        let next = self.revision.wrapping_add(1);
        self.set_revision(next);
        next
    }

    /// Changing the background refills the whole surface.
    pub fn set_background(&mut self, color: Rgba8) {
        self.config.background_color = color;
        self.canvas.fill(color);
    }

    pub fn snapshot(&self) -> Option<RasterImage> {
        self.mount?;
        Some(RasterImage::from_premul(
            self.config.width,
            self.config.height,
            self.canvas.premul_bytes(),
        ))
    }
}
