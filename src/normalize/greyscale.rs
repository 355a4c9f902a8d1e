use crate::{
    foundation::error::{InkpadError, InkpadResult},
    raster::RasterImage,
};

/// Average of R, G and B; alpha is ignored.
pub fn mean_rgb(r: u8, g: u8, b: u8) -> f32 {
    (f32::from(r) + f32::from(g) + f32::from(b)) / 3.0
}

/// sRGB-encoded relative luminance of an 8-bit RGB triple, as a `0..=255` level.
pub fn luminance_rgb(r: u8, g: u8, b: u8) -> u8 {
    let linear =
        (0.2126 * f64::from(r) + 0.7152 * f64::from(g) + 0.0722 * f64::from(b)) / 255.0;
    let encoded = if linear < 0.003_130_8 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round().clamp(0.0, 255.0) as u8
}

pub fn invert_greyscale(v: f32) -> f32 {
    255.0 - v
}

/// Row-major luminance matrix of a raster (`matrix[row][col]`).
pub fn greyscale_matrix(raster: &RasterImage) -> InkpadResult<Vec<Vec<u8>>> {
    let (w, h) = (raster.width as usize, raster.height as usize);
    if raster.data.len() != w * h * 4 {
        return Err(InkpadError::invalid_input(format!(
            "incorrect image data format: sizes do not match ({} != {w} x {h})",
            raster.data.len()
        )));
    }

    let matrix = raster
        .data
        .chunks_exact(w.max(1) * 4)
        .take(h)
        .map(|row| {
            row.chunks_exact(4)
                .map(|px| luminance_rgb(px[0], px[1], px[2]))
                .collect()
        })
        .collect();
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_ignores_alpha_and_averages() {
        assert_eq!(mean_rgb(0, 0, 0), 0.0);
        assert_eq!(mean_rgb(255, 255, 255), 255.0);
        assert_eq!(mean_rgb(30, 60, 90), 60.0);
    }

    #[test]
    fn luminance_endpoints_and_neutral_grey() {
        assert_eq!(luminance_rgb(0, 0, 0), 0);
        assert_eq!(luminance_rgb(255, 255, 255), 255);
        // Green dominates the weighting.
        assert!(luminance_rgb(0, 255, 0) > luminance_rgb(255, 0, 0));
        assert!(luminance_rgb(255, 0, 0) > luminance_rgb(0, 0, 255));
    }

    #[test]
    fn inverting_twice_is_identity() {
        for v in [0.0f32, 1.0, 127.0, 127.5, 254.0, 255.0] {
            assert_eq!(invert_greyscale(invert_greyscale(v)), v);
        }
    }

    #[test]
    fn matrix_shape_follows_raster() {
        let raster = RasterImage::filled(3, 2, [255, 255, 255, 255]);
        let m = greyscale_matrix(&raster).unwrap();
        assert_eq!(m.len(), 2);
        assert!(m.iter().all(|row| row.len() == 3 && row.iter().all(|&v| v == 255)));

        let bad = RasterImage {
            width: 3,
            height: 2,
            data: vec![0; 7],
        };
        assert!(greyscale_matrix(&bad).is_err());
    }
}
