use std::str::FromStr;

use fast_image_resize as fr;

use crate::foundation::core::Raster;
use crate::foundation::error::{RasterkitError, RasterkitResult};

/// Resampling kernel used by [`resize`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    /// Nearest source pixel, no smoothing.
    Nearest,
    /// Triangle kernel. When downscaling the kernel widens so every covered source pixel
    /// contributes ("high quality" smoothing).
    #[default]
    Bilinear,
    /// Catmull-Rom cubic (bicubic).
    CatmullRom,
}

impl ResampleFilter {
    fn resize_alg(self) -> fr::ResizeAlg {
        match self {
            Self::Nearest => fr::ResizeAlg::Nearest,
            Self::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
            Self::CatmullRom => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
        }
    }

    fn blends(self) -> bool {
        !matches!(self, Self::Nearest)
    }
}

impl FromStr for ResampleFilter {
    type Err = RasterkitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "bilinear" | "linear" => Ok(Self::Bilinear),
            "catmull_rom" | "catmull-rom" | "bicubic" | "cubic" => Ok(Self::CatmullRom),
            other => Err(RasterkitError::validation(format!(
                "unknown resample filter '{other}'"
            ))),
        }
    }
}

/// Which dimension the user edited last; the other one follows when the aspect ratio is locked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditedAxis {
    /// Height is derived from width.
    #[default]
    Width,
    /// Width is derived from height.
    Height,
}

impl FromStr for EditedAxis {
    type Err = RasterkitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "width" | "w" => Ok(Self::Width),
            "height" | "h" => Ok(Self::Height),
            other => Err(RasterkitError::validation(format!("unknown axis '{other}'"))),
        }
    }
}

/// Resize request as entered by the user.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResizeParams {
    /// Requested width in pixels.
    pub width: u32,
    /// Requested height in pixels.
    pub height: u32,
    /// Recompute the opposing dimension from the source aspect ratio.
    #[serde(default)]
    pub maintain_aspect_ratio: bool,
    /// Dimension that drives the other when `maintain_aspect_ratio` is set.
    #[serde(default)]
    pub edited: EditedAxis,
    /// Resampling kernel.
    #[serde(default)]
    pub filter: ResampleFilter,
}

impl ResizeParams {
    /// Resolve the final output size for a source of `orig_w x orig_h`.
    ///
    /// Both results are floored at 1. With the aspect lock on, the caller-supplied opposing
    /// dimension is ignored.
    pub fn resolve(&self, orig_w: u32, orig_h: u32) -> (u32, u32) {
        let width = self.width.max(1);
        let height = self.height.max(1);
        if !self.maintain_aspect_ratio || orig_w == 0 || orig_h == 0 {
            return (width, height);
        }
        let ratio = f64::from(orig_w) / f64::from(orig_h);
        match self.edited {
            EditedAxis::Width => {
                let h = (f64::from(width) / ratio).round().max(1.0) as u32;
                (width, h)
            }
            EditedAxis::Height => {
                let w = (f64::from(height) * ratio).round().max(1.0) as u32;
                (w, height)
            }
        }
    }
}

/// Resample `src` to exactly `width x height` (each floored at 1).
///
/// Blending filters work on premultiplied pixels so transparent neighbours do not bleed
/// their color. Aspect ratio is not preserved here; resolve it first with
/// [`ResizeParams::resolve`].
#[tracing::instrument(skip(src), fields(src_w = src.width(), src_h = src.height()))]
pub fn resize(
    src: &Raster,
    width: u32,
    height: u32,
    filter: ResampleFilter,
) -> RasterkitResult<Raster> {
    let width = width.max(1);
    let height = height.max(1);
    let (sw, sh) = src.dimensions();
    if (sw, sh) == (width, height) {
        return Ok(src.clone());
    }

    let mut src_image =
        fr::images::Image::from_vec_u8(sw, sh, src.as_bytes().to_vec(), fr::PixelType::U8x4)
            .map_err(|e| RasterkitError::validation(format!("resize source buffer: {e}")))?;
    let mut dst_image = fr::images::Image::new(width, height, fr::PixelType::U8x4);

    let mul_div = fr::MulDiv::default();
    if filter.blends() {
        mul_div
            .multiply_alpha_inplace(&mut src_image)
            .map_err(|e| RasterkitError::validation(format!("premultiply alpha: {e}")))?;
    }

    let options = fr::ResizeOptions::new()
        .resize_alg(filter.resize_alg())
        .use_alpha(false);
    fr::Resizer::new()
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| {
            RasterkitError::validation(format!("resize {sw}x{sh} -> {width}x{height}: {e}"))
        })?;

    if filter.blends() {
        mul_div
            .divide_alpha_inplace(&mut dst_image)
            .map_err(|e| RasterkitError::validation(format!("unpremultiply alpha: {e}")))?;
    }

    tracing::debug!(width, height, ?filter, "resized raster");
    Raster::from_rgba8(width, height, dst_image.into_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/transform/resize.rs"]
mod tests;
