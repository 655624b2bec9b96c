//! Edge-mask alpha: the "background remover" stand-in.
//!
//! This is a placeholder heuristic, not segmentation. It keys on red-channel gradients only and
//! does poorly on blue or green dominated images. Output is kept stable for compatibility.

use crate::effects::blur::box_blur_u8;
use crate::foundation::core::Raster;
use crate::foundation::error::RasterkitResult;

/// Sum of absolute red differences above which a pixel counts as foreground.
pub const EDGE_THRESHOLD: u32 = 50;
/// Radius of the square box blur applied to the binary mask.
pub const MASK_BLUR_RADIUS: u32 = 2;

/// Binary foreground mask (0 or 255 per pixel) from 4-neighbour red-channel differences.
///
/// Border pixels have no full neighbourhood and are always 0.
pub fn edge_mask(src: &Raster) -> Vec<u8> {
    let (w, h) = src.dimensions();
    let bytes = src.as_bytes();
    let red = |x: u32, y: u32| i32::from(bytes[src.index_of(x, y)]);

    let mut mask = vec![0u8; (w as usize) * (h as usize)];
    if w < 3 || h < 3 {
        return mask;
    }
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let r = red(x, y);
            let edge = (r - red(x - 1, y)).unsigned_abs()
                + (r - red(x + 1, y)).unsigned_abs()
                + (r - red(x, y - 1)).unsigned_abs()
                + (r - red(x, y + 1)).unsigned_abs();
            if edge > EDGE_THRESHOLD {
                mask[(y as usize) * (w as usize) + x as usize] = 255;
            }
        }
    }
    mask
}

/// Replace the alpha channel with the blurred edge mask. RGB is copied unchanged.
#[tracing::instrument(skip(src), fields(w = src.width(), h = src.height()))]
pub fn remove_background(src: &Raster) -> RasterkitResult<Raster> {
    let (w, h) = src.dimensions();
    let mask = edge_mask(src);
    let blurred = box_blur_u8(&mask, w, h, MASK_BLUR_RADIUS)?;

    let mut out = src.clone();
    for (px, &a) in out.as_bytes_mut().chunks_exact_mut(4).zip(&blurred) {
        px[3] = a;
    }
    tracing::debug!(
        foreground = mask.iter().filter(|&&m| m != 0).count(),
        "edge mask applied"
    );
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/edge_mask.rs"]
mod tests;
