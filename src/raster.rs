use std::path::Path;

use anyhow::Context;

use crate::foundation::{
    core::{Size, unpremul_rgba8},
    error::{InkpadError, InkpadResult},
};

/// Snapshot of a raster as straight-alpha RGBA8, row-major.
///
/// This is what a surface hands out when a stroke ends, and what [`crate::normalize`]
/// consumes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> InkpadResult<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(InkpadError::invalid_input(format!(
                "incorrect image data format: sizes do not match ({} != {width} x {height} x 4)",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub(crate) fn from_premul(width: u32, height: u32, premul: &[u8]) -> Self {
        let mut data = Vec::with_capacity(premul.len());
        for px in premul.chunks_exact(4) {
            data.extend_from_slice(&unpremul_rgba8([px[0], px[1], px[2], px[3]]));
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn from_image(img: &image::DynamicImage) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            data: rgba.into_raw(),
        }
    }

    pub fn open(path: &Path) -> InkpadResult<Self> {
        let img = image::open(path).with_context(|| format!("open image '{}'", path.display()))?;
        Ok(Self::from_image(&img))
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when there is nothing to sample: zero-sized or a malformed buffer.
    pub fn is_empty(&self) -> bool {
        self.size().is_empty() || self.data.len() != self.size().area() * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Mirrors the image around its vertical axis (selfie-style camera frames).
    pub fn flip_horizontal(&self) -> Self {
        let row_len = self.width as usize * 4;
        let mut data = Vec::with_capacity(self.data.len());
        for row in self.data.chunks_exact(row_len.max(4)) {
            for px in row.chunks_exact(4).rev() {
                data.extend_from_slice(px);
            }
        }
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }

    pub fn to_image(&self) -> InkpadResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| InkpadError::invalid_input("raster byte length mismatch"))
    }

    pub fn save_png(&self, path: &Path) -> InkpadResult<()> {
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}
