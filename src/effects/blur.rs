use crate::foundation::error::{RasterkitError, RasterkitResult};

/// Square box blur of a single-channel `width x height` plane.
///
/// Each output sample is the mean of the in-bounds samples of its `(2r+1)^2` neighbourhood.
/// Near the edges the denominator shrinks with the neighbourhood; there is no padding. Means are
/// rounded half up.
pub fn box_blur_u8(src: &[u8], width: u32, height: u32, radius: u32) -> RasterkitResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| RasterkitError::validation("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(RasterkitError::validation(
            "box_blur_u8 expects src matching width*height",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    // Integer sums keep the separable passes identical to a direct 2D mean.
    let (row_sums, row_counts) = horizontal_sums(src, width, height, radius);
    Ok(vertical_mean(&row_sums, &row_counts, width, height, radius))
}

fn horizontal_sums(src: &[u8], width: u32, height: u32, radius: u32) -> (Vec<u32>, Vec<u32>) {
    let w = width as i64;
    let r = i64::from(radius);
    let mut sums = vec![0u32; src.len()];
    let mut counts = vec![0u32; width as usize];
    for x in 0..w {
        counts[x as usize] = ((x + r).min(w - 1) - (x - r).max(0) + 1) as u32;
    }
    for y in 0..height as i64 {
        let row = (y * w) as usize;
        for x in 0..w {
            let lo = (x - r).max(0) as usize;
            let hi = (x + r).min(w - 1) as usize;
            sums[row + x as usize] = src[row + lo..=row + hi].iter().map(|&v| u32::from(v)).sum();
        }
    }
    (sums, counts)
}

fn vertical_mean(sums: &[u32], counts_x: &[u32], width: u32, height: u32, radius: u32) -> Vec<u8> {
    let w = width as usize;
    let h = height as i64;
    let r = i64::from(radius);
    let mut out = vec![0u8; sums.len()];
    for y in 0..h {
        let lo = (y - r).max(0);
        let hi = (y + r).min(h - 1);
        let cy = (hi - lo + 1) as u32;
        for x in 0..w {
            let mut acc = 0u32;
            for sy in lo..=hi {
                acc += sums[(sy as usize) * w + x];
            }
            let count = cy * counts_x[x];
            out[(y as usize) * w + x] = ((2 * acc + count) / (2 * count)).min(255) as u8;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
