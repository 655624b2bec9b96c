use crate::foundation::core::Raster;
use crate::foundation::error::{RasterkitError, RasterkitResult};
use crate::foundation::math::{mul_div255_u8, premultiply, unpremultiply};

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over with a global opacity, on premultiplied pixels.
///
/// The source is scaled by `opacity` first; the destination keeps `255 - scaled alpha`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let weight = (opacity.clamp(0.0, 1.0) * 255.0).round() as u16;
    let src = src.map(|c| mul_div255_u8(u16::from(c), weight));
    if src[3] == 0 {
        return dst;
    }
    let keep = 255 - u16::from(src[3]);
    std::array::from_fn(|i| src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), keep)))
}

/// Draw a premultiplied `layer_w x layer_h` layer onto `base` with its top-left at `(x, y)`.
///
/// Parts of the layer outside the base are clipped. Base pixels under fully transparent layer
/// pixels, and everything outside the layer footprint, are left byte-identical.
pub fn composite_premul_at(
    base: &mut Raster,
    layer: &[u8],
    layer_w: u32,
    layer_h: u32,
    x: i64,
    y: i64,
    opacity: f32,
) -> RasterkitResult<()> {
    let expected_len = (layer_w as usize)
        .checked_mul(layer_h as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| RasterkitError::validation("layer buffer size overflow"))?;
    if layer.len() != expected_len {
        return Err(RasterkitError::validation(
            "composite_premul_at expects layer matching layer_w*layer_h*4",
        ));
    }

    let (bw, bh) = (i64::from(base.width()), i64::from(base.height()));
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(layer_w)).min(bw);
    let y1 = (y + i64::from(layer_h)).min(bh);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    for by in y0..y1 {
        for bx in x0..x1 {
            let li = (((by - y) as usize) * (layer_w as usize) + ((bx - x) as usize)) * 4;
            let src = [layer[li], layer[li + 1], layer[li + 2], layer[li + 3]];
            if src[3] == 0 {
                continue;
            }
            let bi = base.index_of(bx as u32, by as u32);
            let bytes = base.as_bytes_mut();
            let dst = premultiply([bytes[bi], bytes[bi + 1], bytes[bi + 2], bytes[bi + 3]]);
            let out = unpremultiply(over(dst, src, opacity));
            bytes[bi..bi + 4].copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Draw a straight-alpha overlay raster onto `base` at `(x, y)`.
pub fn composite_at(
    base: &mut Raster,
    overlay: &Raster,
    x: i64,
    y: i64,
    opacity: f32,
) -> RasterkitResult<()> {
    let premul: Vec<u8> = overlay.pixels().flat_map(premultiply).collect();
    composite_premul_at(
        base,
        &premul,
        overlay.width(),
        overlay.height(),
        x,
        y,
        opacity,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
