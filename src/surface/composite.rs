use crate::foundation::error::{InkpadError, InkpadResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = src[3].saturating_add(mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> InkpadResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(InkpadError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Source-over of a `src_width`-pixel-wide buffer onto `dst` with its top-left at `(x, y)`.
pub fn over_region(
    dst: &mut [u8],
    dst_width: usize,
    src: &[u8],
    src_width: usize,
    x: usize,
    y: usize,
) -> InkpadResult<()> {
    let (dst_stride, src_stride) = (dst_width * 4, src_width * 4);
    if dst_stride == 0
        || src_stride == 0
        || !dst.len().is_multiple_of(dst_stride)
        || !src.len().is_multiple_of(src_stride)
    {
        return Err(InkpadError::render(
            "over_region expects whole rows of rgba8 pixels",
        ));
    }
    let src_rows = src.len() / src_stride;
    if x + src_width > dst_width || y + src_rows > dst.len() / dst_stride {
        return Err(InkpadError::render("over_region source does not fit"));
    }
    for (row, src_row) in src.chunks_exact(src_stride).enumerate() {
        let start = (y + row) * dst_stride + x * 4;
        over_in_place(&mut dst[start..start + src_stride], src_row)?;
    }
    Ok(())
}

pub fn fill(dst: &mut [u8], premul: PremulRgba8) {
    for px in dst.chunks_exact_mut(4) {
        px.copy_from_slice(&premul);
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_src_alpha_0_is_noop() {
        let dst = [10, 20, 30, 40];
        assert_eq!(over(dst, [0, 0, 0, 0]), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        assert_eq!(over([255, 255, 255, 255], [0, 0, 0, 255]), [0, 0, 0, 255]);
    }

    #[test]
    fn half_black_over_white_is_mid_grey() {
        let out = over([255, 255, 255, 255], [0, 0, 0, 128]);
        assert_eq!(out[3], 255);
        assert_eq!(out[0], 127);
    }

    #[test]
    fn over_in_place_rejects_mismatched_buffers() {
        let mut dst = vec![0u8; 8];
        assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
    }

    #[test]
    fn over_region_touches_only_the_window() {
        // 3x2 white destination, 1x2 opaque black source at column 1.
        let mut dst = vec![255u8; 3 * 2 * 4];
        let src = [0, 0, 0, 255, 0, 0, 0, 255];
        over_region(&mut dst, 3, &src, 1, 1, 0).unwrap();

        let px = |x: usize, y: usize| dst[(y * 3 + x) * 4];
        assert_eq!((px(0, 0), px(1, 0), px(2, 0)), (255, 0, 255));
        assert_eq!((px(0, 1), px(1, 1), px(2, 1)), (255, 0, 255));
    }

    #[test]
    fn over_region_rejects_out_of_bounds_windows() {
        let mut dst = vec![0u8; 2 * 2 * 4];
        assert!(over_region(&mut dst, 2, &[0u8; 8], 2, 1, 0).is_err());
        assert!(over_region(&mut dst, 2, &[0u8; 8], 1, 0, 1).is_err());
        assert!(over_region(&mut dst, 0, &[0u8; 4], 1, 0, 0).is_err());
    }
}
