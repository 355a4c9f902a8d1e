//! Raster to model-input tensor conversion.
//!
//! Pipeline, in order:
//! 1. nearest-neighbor resize to the target size,
//! 2. channel reduction ([`ChannelMode`]),
//! 3. optional inversion (`255 - v`),
//! 4. value mapping ([`ValueRange`]),
//! 5. reshape to a batch-first `[1, height, width, channels]` tensor.

pub mod greyscale;
pub mod options;
pub mod resize;

use crate::{
    foundation::error::{InkpadError, InkpadResult},
    raster::RasterImage,
    tensor::Tensor,
};

pub use greyscale::{greyscale_matrix, invert_greyscale, luminance_rgb, mean_rgb};
pub use options::{ChannelMode, NormalizeOptions, ValueRange};

#[tracing::instrument(skip(raster), fields(src_w = raster.width, src_h = raster.height))]
pub fn normalize(
    raster: &RasterImage,
    target_width: u32,
    target_height: u32,
    options: &NormalizeOptions,
) -> InkpadResult<Tensor> {
    if raster.is_empty() {
        return Err(InkpadError::invalid_input(
            "source raster is empty or malformed",
        ));
    }
    if target_width == 0 || target_height == 0 {
        return Err(InkpadError::invalid_input("target size must be non-zero"));
    }
    options.range.validate()?;

    let resized = resize::resize_nearest_rgba8(
        &raster.data,
        raster.width,
        raster.height,
        target_width,
        target_height,
    );

    let channels = options.channels.channels();
    let level = |v: f32| -> f32 {
        let v = if options.invert {
            invert_greyscale(v)
        } else {
            v
        };
        options.range.apply(v)
    };

    let mut data = Vec::with_capacity(resized.len() / 4 * channels);
    for px in resized.chunks_exact(4) {
        let (r, g, b) = (px[0], px[1], px[2]);
        match options.channels {
            ChannelMode::Mean => data.push(level(mean_rgb(r, g, b))),
            ChannelMode::Luminance => data.push(level(f32::from(luminance_rgb(r, g, b)))),
            ChannelMode::Rgb => {
                data.push(level(f32::from(r)));
                data.push(level(f32::from(g)));
                data.push(level(f32::from(b)));
            }
        }
    }

    Tensor::new(
        vec![1, target_height as usize, target_width as usize, channels],
        data,
    )
}

/// Normalizes whatever the surface handed out at stroke end.
///
/// A missing snapshot is an [`InkpadError::InvalidInput`]; callers are expected to check
/// for one before offering recognition at all.
pub fn normalize_snapshot(
    snapshot: Option<&RasterImage>,
    target_width: u32,
    target_height: u32,
    options: &NormalizeOptions,
) -> InkpadResult<Tensor> {
    let raster = snapshot.ok_or_else(|| InkpadError::invalid_input("no raster to normalize"))?;
    normalize(raster, target_width, target_height, options)
}

pub fn normalize_image(
    image: &image::DynamicImage,
    target_width: u32,
    target_height: u32,
    options: &NormalizeOptions,
) -> InkpadResult<Tensor> {
    normalize(
        &RasterImage::from_image(image),
        target_width,
        target_height,
        options,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_raster_becomes_zeros() {
        let white = RasterImage::filled(200, 200, [255, 255, 255, 255]);
        let t = normalize(&white, 28, 28, &NormalizeOptions::default()).unwrap();
        assert_eq!(t.shape(), &[1, 28, 28, 1]);
        assert!(t.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn black_raster_becomes_ones() {
        let black = RasterImage::filled(10, 10, [0, 0, 0, 255]);
        let t = normalize(&black, 5, 5, &NormalizeOptions::default()).unwrap();
        assert!(t.data().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn rectangular_targets_are_height_major() {
        let raster = RasterImage::filled(7, 3, [0, 0, 0, 255]);
        let t = normalize(&raster, 4, 2, &NormalizeOptions::default()).unwrap();
        assert_eq!(t.shape(), &[1, 2, 4, 1]);
    }

    #[test]
    fn rgb_mode_keeps_three_channels() {
        let raster = RasterImage::filled(2, 2, [255, 0, 51, 255]);
        let t = normalize(&raster, 2, 2, &NormalizeOptions::rgb_unit()).unwrap();
        assert_eq!(t.shape(), &[1, 2, 2, 3]);
        assert_eq!(&t.data()[..3], &[1.0, 0.0, 0.2]);
    }

    #[test]
    fn signed_range_without_inversion() {
        let raster = RasterImage::filled(1, 1, [0, 0, 0, 255]);
        let t = normalize(&raster, 1, 1, &NormalizeOptions::rgb_signed()).unwrap();
        assert_eq!(t.data(), &[-1.0, -1.0, -1.0]);
    }

    #[test]
    fn luminance_mode_weights_channels() {
        let red = RasterImage::filled(4, 4, [255, 0, 0, 255]);
        let opts = NormalizeOptions {
            channels: ChannelMode::Luminance,
            ..NormalizeOptions::default()
        };
        let t = normalize(&red, 2, 2, &opts).unwrap();
        assert_eq!(t.shape(), &[1, 2, 2, 1]);

        let expected = (255.0 - f32::from(luminance_rgb(255, 0, 0))) / 255.0;
        assert!(t.data().iter().all(|&v| v == expected));
        // Mean would give (255 - 85) / 255.
        let mean = normalize(&red, 2, 2, &NormalizeOptions::default()).unwrap();
        assert_ne!(t.data()[0], mean.data()[0]);
    }

    #[test]
    fn affine_range_applies_divisor_and_offset() {
        let grey = RasterImage::filled(3, 3, [100, 100, 100, 255]);
        let opts = NormalizeOptions {
            channels: ChannelMode::Mean,
            invert: false,
            range: ValueRange::Affine {
                divisor: 50.0,
                offset: -1.0,
            },
        };
        let t = normalize(&grey, 3, 3, &opts).unwrap();
        assert!(t.data().iter().all(|&v| v == 1.0));

        let inverted = normalize(&grey, 3, 3, &NormalizeOptions { invert: true, ..opts }).unwrap();
        // (255 - 100) / 50 - 1
        assert!(inverted.data().iter().all(|&v| (v - 2.1).abs() < 1e-6));

        let broken = NormalizeOptions {
            range: ValueRange::Affine {
                divisor: 0.0,
                offset: 0.0,
            },
            ..opts
        };
        let err = normalize(&grey, 3, 3, &broken).unwrap_err();
        assert!(matches!(err, InkpadError::Validation(_)));
    }

    #[test]
    fn empty_and_missing_inputs_are_invalid() {
        let empty = RasterImage::filled(0, 0, [0, 0, 0, 0]);
        let err = normalize(&empty, 28, 28, &NormalizeOptions::default()).unwrap_err();
        assert!(matches!(err, InkpadError::InvalidInput(_)));

        let err = normalize_snapshot(None, 28, 28, &NormalizeOptions::default()).unwrap_err();
        assert!(matches!(err, InkpadError::InvalidInput(_)));

        let one = RasterImage::filled(1, 1, [0, 0, 0, 255]);
        let err = normalize(&one, 0, 28, &NormalizeOptions::default()).unwrap_err();
        assert!(matches!(err, InkpadError::InvalidInput(_)));
    }

    #[test]
    fn normalize_image_accepts_decoded_images() {
        let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([255, 255, 255, 255]));
        let t = normalize_image(
            &image::DynamicImage::ImageRgba8(img),
            4,
            4,
            &NormalizeOptions::default(),
        )
        .unwrap();
        assert_eq!(t.shape(), &[1, 4, 4, 1]);
        assert!(t.data().iter().all(|&v| v == 0.0));
    }
}
