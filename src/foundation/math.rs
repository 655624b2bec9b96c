use crate::foundation::core::Rgba8;

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Straight RGBA8 to premultiplied RGBA8.
pub(crate) fn premultiply(px: Rgba8) -> Rgba8 {
    let a = u16::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    [
        mul_div255_u8(u16::from(px[0]), a),
        mul_div255_u8(u16::from(px[1]), a),
        mul_div255_u8(u16::from(px[2]), a),
        px[3],
    ]
}

/// Premultiplied RGBA8 back to straight RGBA8.
pub(crate) fn unpremultiply(px: Rgba8) -> Rgba8 {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let un = |c: u8| ((u32::from(c) * 255 + a / 2) / a).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

/// Expand straight RGBA8 bytes into premultiplied `f32` samples in `0..=255`.
pub(crate) fn premul_f32(bytes: &[u8]) -> Vec<f32> {
    let mut out = Vec::with_capacity(bytes.len());
    for px in bytes.chunks_exact(4) {
        let a = f32::from(px[3]) / 255.0;
        out.push(f32::from(px[0]) * a);
        out.push(f32::from(px[1]) * a);
        out.push(f32::from(px[2]) * a);
        out.push(f32::from(px[3]));
    }
    out
}

/// Inverse of [`premul_f32`], rounding and clamping into straight RGBA8.
pub(crate) fn straight_u8(samples: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len());
    for px in samples.chunks_exact(4) {
        let a = px[3].round().clamp(0.0, 255.0);
        if a <= 0.0 {
            out.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        let k = 255.0 / px[3].min(255.0);
        for &c in &px[..3] {
            out.push((c * k).round().clamp(0.0, 255.0) as u8);
        }
        out.push(a as u8);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
