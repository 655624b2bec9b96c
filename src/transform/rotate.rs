use crate::foundation::core::{Affine, Point, Raster, Vec2};
use crate::foundation::error::RasterkitResult;
use crate::foundation::math::{premul_f32, straight_u8};
use crate::transform::sample::bilinear_premul;

/// Rotation and mirroring request.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RotateParams {
    /// Clockwise rotation in degrees (y axis points down).
    #[serde(default)]
    pub angle_degrees: f64,
    /// Mirror across the vertical axis.
    #[serde(default)]
    pub flip_horizontal: bool,
    /// Mirror across the horizontal axis.
    #[serde(default)]
    pub flip_vertical: bool,
}

/// `(sin, cos)` with exact values at multiples of 90 degrees.
fn sin_cos_degrees(angle: f64) -> (f64, f64) {
    let a = angle.rem_euclid(360.0);
    if a == 0.0 {
        (0.0, 1.0)
    } else if a == 90.0 {
        (1.0, 0.0)
    } else if a == 180.0 {
        (0.0, -1.0)
    } else if a == 270.0 {
        (-1.0, 0.0)
    } else {
        a.to_radians().sin_cos()
    }
}

fn canvas_dim(v: f64) -> u32 {
    let snapped = v.round();
    let v = if (v - snapped).abs() < 1e-6 {
        snapped
    } else {
        v.floor()
    };
    v.clamp(1.0, f64::from(u32::MAX)) as u32
}

/// Size of the canvas that fully contains `width x height` rotated by `angle` degrees.
pub fn rotated_bounds(width: u32, height: u32, angle: f64) -> (u32, u32) {
    let (s, c) = sin_cos_degrees(angle);
    let (w, h) = (f64::from(width), f64::from(height));
    let nw = (w * c).abs() + (h * s).abs();
    let nh = (w * s).abs() + (h * c).abs();
    (canvas_dim(nw), canvas_dim(nh))
}

/// Forward matrix mapping source pixel space into the output canvas.
///
/// Composition order is fixed: translate to the new centre, rotate, mirror, then re-centre the
/// source. Mirroring therefore happens in source-image space.
pub fn rotate_flip_matrix(
    src_w: u32,
    src_h: u32,
    out_w: u32,
    out_h: u32,
    params: RotateParams,
) -> Affine {
    let (s, c) = sin_cos_degrees(params.angle_degrees);
    let rotation = Affine::new([c, s, -s, c, 0.0, 0.0]);
    let mirror = Affine::scale_non_uniform(
        if params.flip_horizontal { -1.0 } else { 1.0 },
        if params.flip_vertical { -1.0 } else { 1.0 },
    );
    Affine::translate(Vec2::new(f64::from(out_w) / 2.0, f64::from(out_h) / 2.0))
        * rotation
        * mirror
        * Affine::translate(Vec2::new(
            -f64::from(src_w) / 2.0,
            -f64::from(src_h) / 2.0,
        ))
}

/// Rotate and/or mirror `src` onto a canvas sized to its rotated bounding box.
///
/// Corners not covered by the source are transparent.
#[tracing::instrument(skip(src), fields(src_w = src.width(), src_h = src.height()))]
pub fn rotate_flip(src: &Raster, params: RotateParams) -> RasterkitResult<Raster> {
    let (sw, sh) = src.dimensions();
    let (ow, oh) = rotated_bounds(sw, sh, params.angle_degrees);
    let inverse = rotate_flip_matrix(sw, sh, ow, oh, params).inverse();
    tracing::debug!(ow, oh, "rotated canvas size");

    let premul = premul_f32(src.as_bytes());
    let mut out = vec![0.0f32; (ow as usize) * (oh as usize) * 4];
    for y in 0..oh {
        for x in 0..ow {
            let p = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let px = bilinear_premul(&premul, sw, sh, p.x, p.y);
            let idx = ((y as usize) * (ow as usize) + (x as usize)) * 4;
            out[idx..idx + 4].copy_from_slice(&px);
        }
    }

    Raster::from_rgba8(ow, oh, straight_u8(&out))
}

#[cfg(test)]
#[path = "../../tests/unit/transform/rotate.rs"]
mod tests;
