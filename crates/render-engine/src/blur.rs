//! Box blur over premultiplied RGBA8 buffers.
//!
//! Three passes approximate a gaussian closely enough for shadows and glows.
//! Pixels outside the buffer count as transparent.

/// Passes used for shadows and soft shapes.
pub const DEFAULT_PASSES: usize = 3;

/// Blur `data` (`width * height * 4` bytes) in place.
pub fn box_blur(data: &mut [u8], width: usize, height: usize, radius: usize, passes: usize) {
    if radius == 0 || width == 0 || height == 0 || data.len() < width * height * 4 {
        return;
    }
    let mut scratch = vec![0u8; data.len()];
    for _ in 0..passes {
        for y in 0..height {
            blur_line(data, &mut scratch, y * width * 4, 4, width, radius);
        }
        for x in 0..width {
            blur_line(&scratch, data, x * 4, width * 4, height, radius);
        }
    }
}

/// Sliding-window average along one row or column.
fn blur_line(src: &[u8], dst: &mut [u8], start: usize, stride: usize, len: usize, radius: usize) {
    let window = (2 * radius + 1) as u32;
    let at = |i: usize| start + i * stride;

    let mut sum = [0u32; 4];
    for i in 0..=radius.min(len - 1) {
        for c in 0..4 {
            sum[c] += src[at(i) + c] as u32;
        }
    }

    for i in 0..len {
        for c in 0..4 {
            dst[at(i) + c] = ((sum[c] + window / 2) / window) as u8;
        }
        let incoming = i + radius + 1;
        if incoming < len {
            for c in 0..4 {
                sum[c] += src[at(incoming) + c] as u32;
            }
        }
        if i >= radius {
            let outgoing = i - radius;
            for c in 0..4 {
                sum[c] -= src[at(outgoing) + c] as u32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_dot(size: usize) -> Vec<u8> {
        let mut data = vec![0u8; size * size * 4];
        let center = (size / 2) * size + size / 2;
        data[center * 4..center * 4 + 4].copy_from_slice(&[255, 255, 255, 255]);
        data
    }

    #[test]
    fn test_zero_radius_is_noop() {
        let mut data = single_dot(5);
        let before = data.clone();
        box_blur(&mut data, 5, 5, 0, 3);
        assert_eq!(data, before);
    }

    #[test]
    fn test_blur_spreads_and_dims() {
        let mut data = single_dot(9);
        box_blur(&mut data, 9, 9, 1, 1);
        let center = (4 * 9 + 4) * 4;
        let neighbor = (4 * 9 + 5) * 4;
        assert!(data[center + 3] < 255);
        assert!(data[neighbor + 3] > 0);
        assert_eq!(data[3], 0);
    }

    #[test]
    fn test_uniform_interior_unchanged() {
        let mut data = vec![200u8; 20 * 20 * 4];
        box_blur(&mut data, 20, 20, 2, 3);
        let center = (10 * 20 + 10) * 4;
        assert_eq!(&data[center..center + 4], &[200, 200, 200, 200]);
    }

    #[test]
    fn test_premultiplied_invariant_holds() {
        let mut data = vec![0u8; 16 * 16 * 4];
        for (i, px) in data.chunks_exact_mut(4).enumerate() {
            let a = (i * 7 % 256) as u8;
            px.copy_from_slice(&[a / 2, a / 3, a, a]);
        }
        box_blur(&mut data, 16, 16, 3, 3);
        for px in data.chunks_exact(4) {
            assert!(px[0] <= px[3] && px[1] <= px[3] && px[2] <= px[3]);
        }
    }
}
