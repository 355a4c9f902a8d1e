use vello_cpu::kurbo::{Affine, BezPath, Rect, Stroke};

use crate::{
    foundation::{
        core::{Point, Rgba8},
        error::{InkpadError, InkpadResult},
    },
    raster::RasterImage,
    surface::composite,
};

/// Pixel-aligned window of the canvas that a draw call can touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Region {
    x: u16,
    y: u16,
    width: u16,
    height: u16,
}

/// Owns premultiplied pixels and rasterizes paths into them.
///
/// Every draw call renders into a scratch pixmap covering only the bounds of the shape,
/// then composites it source-over into the canvas.
pub(crate) struct CpuCanvas {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl CpuCanvas {
    pub(crate) fn new(width: u32, height: u32) -> InkpadResult<Self> {
        let width: u16 = width
            .try_into()
            .map_err(|_| InkpadError::render("surface width exceeds u16"))?;
        let height: u16 = height
            .try_into()
            .map_err(|_| InkpadError::render("surface height exceeds u16"))?;
        Ok(Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
        })
    }

    /// A canvas holding a copy of `raster` (straight alpha in, premultiplied inside).
    pub(crate) fn from_raster(raster: &RasterImage) -> InkpadResult<Self> {
        if raster.data.len() != raster.size().area() * 4 {
            return Err(InkpadError::invalid_input("raster byte length mismatch"));
        }
        let mut canvas = Self::new(raster.width, raster.height)?;
        for (dst, src) in canvas
            .pixmap
            .data_as_u8_slice_mut()
            .chunks_exact_mut(4)
            .zip(raster.data.chunks_exact(4))
        {
            let px = Rgba8 {
                r: src[0],
                g: src[1],
                b: src[2],
                a: src[3],
            };
            dst.copy_from_slice(&px.to_premul());
        }
        Ok(canvas)
    }

    pub(crate) fn fill(&mut self, color: Rgba8) {
        composite::fill(self.pixmap.data_as_u8_slice_mut(), color.to_premul());
    }

    pub(crate) fn premul_bytes(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn to_raster(&self) -> RasterImage {
        RasterImage::from_premul(
            u32::from(self.width),
            u32::from(self.height),
            self.premul_bytes(),
        )
    }

    /// Strokes the line `from -> to` and composites it over the current pixels.
    pub(crate) fn stroke_segment(
        &mut self,
        from: Point,
        to: Point,
        stroke: &Stroke,
        color: Rgba8,
    ) -> InkpadResult<()> {
        let (from, to) = (point_to_cpu(from), point_to_cpu(to));
        let mut path = BezPath::new();
        path.move_to(from);
        path.line_to(to);

        let pad = stroke.width / 2.0 + 1.0;
        let bounds = Rect::from_points(from, to).inflate(pad, pad);
        self.paint(bounds, |ctx| {
            ctx.set_paint(paint_color(color));
            ctx.set_stroke(stroke.clone());
            ctx.stroke_path(&path);
        })
    }

    /// Outlines `rect`, with the line centered on its edges.
    pub(crate) fn stroke_rect(&mut self, rect: Rect, width: f64, color: Rgba8) -> InkpadResult<()> {
        let pad = width / 2.0 + 1.0;
        let stroke = Stroke::new(width);
        self.paint(rect.inflate(pad, pad), |ctx| {
            ctx.set_paint(paint_color(color));
            ctx.set_stroke(stroke);
            ctx.stroke_rect(&rect);
        })
    }

    pub(crate) fn fill_rect(&mut self, rect: Rect, color: Rgba8) -> InkpadResult<()> {
        self.paint(rect.inflate(1.0, 1.0), |ctx| {
            ctx.set_paint(paint_color(color));
            ctx.fill_rect(&rect);
        })
    }

    /// Clips `bounds` to the canvas; `None` when nothing is left.
    fn region(&self, bounds: Rect) -> Option<Region> {
        let x0 = bounds.x0.floor().max(0.0);
        let y0 = bounds.y0.floor().max(0.0);
        let x1 = bounds.x1.ceil().min(f64::from(self.width));
        let y1 = bounds.y1.ceil().min(f64::from(self.height));
        if !(x1 > x0 && y1 > y0) {
            return None;
        }
        Some(Region {
            x: x0 as u16,
            y: y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        })
    }

    fn paint(
        &mut self,
        bounds: Rect,
        draw: impl FnOnce(&mut vello_cpu::RenderContext),
    ) -> InkpadResult<()> {
        let Some(region) = self.region(bounds) else {
            return Ok(());
        };

        let mut ctx = vello_cpu::RenderContext::new(region.width, region.height);
        ctx.set_transform(Affine::translate((
            -f64::from(region.x),
            -f64::from(region.y),
        )));
        draw(&mut ctx);
        ctx.flush();

        let mut scratch = vello_cpu::Pixmap::new(region.width, region.height);
        ctx.render_to_pixmap(&mut scratch);

        composite::over_region(
            self.pixmap.data_as_u8_slice_mut(),
            usize::from(self.width),
            scratch.data_as_u8_slice(),
            usize::from(region.width),
            usize::from(region.x),
            usize::from(region.y),
        )
    }
}

fn paint_color(color: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}
