/// Source index for output index `dst` when resampling `input` samples to `output`.
///
/// Corners are not aligned and no half-pixel shift is applied:
/// `min(input - 1, floor(dst * input / output))`.
pub fn nearest_source_index(dst: u32, input: u32, output: u32) -> u32 {
    debug_assert!(input > 0 && output > 0);
    let frac = u64::from(dst) * u64::from(input) / u64::from(output);
    (frac as u32).min(input - 1)
}

/// Nearest-neighbor resample of a straight RGBA8 buffer.
pub fn resize_nearest_rgba8(
    src: &[u8],
    src_width: u32,
    src_height: u32,
    dst_width: u32,
    dst_height: u32,
) -> Vec<u8> {
    let cols: Vec<usize> = (0..dst_width)
        .map(|x| nearest_source_index(x, src_width, dst_width) as usize)
        .collect();

    let mut out = Vec::with_capacity(dst_width as usize * dst_height as usize * 4);
    for y in 0..dst_height {
        let sy = nearest_source_index(y, src_height, dst_height) as usize;
        let row = sy * src_width as usize;
        for &sx in &cols {
            let i = (row + sx) * 4;
            out.extend_from_slice(&src[i..i + 4]);
        }
    }
    out
}
