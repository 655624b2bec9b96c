//! Sampling helpers shared by the geometric transforms.
//!
//! Samples are premultiplied `f32` in `0..=255` so interpolation never bleeds color out of
//! transparent pixels.

/// Bilinear sample at continuous pixel coordinates `(x, y)` where pixel `(i, j)` covers
/// `[i, i+1) x [j, j+1)` and its centre is `(i + 0.5, j + 0.5)`.
///
/// Taps outside the source contribute transparent black, which antialiases the image edge.
pub(crate) fn bilinear_premul(src: &[f32], width: u32, height: u32, x: f64, y: f64) -> [f32; 4] {
    let u = x - 0.5;
    let v = y - 0.5;
    let x0 = u.floor();
    let y0 = v.floor();
    let fx = (u - x0) as f32;
    let fy = (v - y0) as f32;
    let x0 = x0 as i64;
    let y0 = y0 as i64;

    let mut out = [0.0f32; 4];
    let taps = [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1, y0, fx * (1.0 - fy)),
        (x0, y0 + 1, (1.0 - fx) * fy),
        (x0 + 1, y0 + 1, fx * fy),
    ];
    for (tx, ty, w) in taps {
        if w == 0.0 || tx < 0 || ty < 0 || tx >= i64::from(width) || ty >= i64::from(height) {
            continue;
        }
        let idx = ((ty as usize) * (width as usize) + (tx as usize)) * 4;
        for c in 0..4 {
            out[c] += src[idx + c] * w;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/transform/sample.rs"]
mod tests;
