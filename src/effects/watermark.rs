use std::str::FromStr;

use crate::analysis::color::Rgb;
use crate::effects::composite::{composite_at, composite_premul_at};
use crate::effects::text::{TextRenderer, TextRun};
use crate::foundation::core::Raster;
use crate::foundation::error::{RasterkitError, RasterkitResult};
use crate::transform::resize::{ResampleFilter, resize};

/// Distance kept between a watermark and the image edge.
pub const WATERMARK_PADDING: i64 = 20;
/// Image watermarks are limited to this share of the smaller base dimension.
pub const IMAGE_WATERMARK_MAX_SHARE: f64 = 0.2;
/// Offset of the legibility shadow behind text watermarks.
pub const TEXT_SHADOW_OFFSET: f64 = 2.0;

/// Nine named placement anchors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// Top-left corner.
    TopLeft,
    /// Middle of the top edge.
    TopCenter,
    /// Top-right corner.
    TopRight,
    /// Middle of the left edge.
    MiddleLeft,
    /// Image centre.
    Center,
    /// Middle of the right edge.
    MiddleRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Middle of the bottom edge.
    BottomCenter,
    /// Bottom-right corner.
    #[default]
    BottomRight,
}

impl Anchor {
    /// All anchors in reading order.
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::MiddleLeft,
        Anchor::Center,
        Anchor::MiddleRight,
        Anchor::BottomLeft,
        Anchor::BottomCenter,
        Anchor::BottomRight,
    ];

    /// Parse a name, falling back to [`Anchor::BottomRight`] for anything unknown.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for Anchor {
    type Err = RasterkitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "top-left" => Ok(Self::TopLeft),
            "top-center" => Ok(Self::TopCenter),
            "top-right" => Ok(Self::TopRight),
            "middle-left" => Ok(Self::MiddleLeft),
            "center" => Ok(Self::Center),
            "middle-right" => Ok(Self::MiddleRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-center" => Ok(Self::BottomCenter),
            "bottom-right" => Ok(Self::BottomRight),
            other => Err(RasterkitError::validation(format!(
                "unknown watermark position '{other}'"
            ))),
        }
    }
}

/// Top-left placement of a `w x h` overlay on a `base_w x base_h` image.
///
/// Centred terms use floor division; results may be negative when the overlay is larger than
/// the base.
pub fn resolve_position(base_w: u32, base_h: u32, w: u32, h: u32, anchor: Anchor) -> (i64, i64) {
    let pad = WATERMARK_PADDING;
    let (bw, bh, w, h) = (
        i64::from(base_w),
        i64::from(base_h),
        i64::from(w),
        i64::from(h),
    );
    let left = pad;
    let center_x = (bw - w).div_euclid(2);
    let right = bw - w - pad;
    let top = pad;
    let middle_y = (bh - h).div_euclid(2);
    let bottom = bh - h - pad;

    match anchor {
        Anchor::TopLeft => (left, top),
        Anchor::TopCenter => (center_x, top),
        Anchor::TopRight => (right, top),
        Anchor::MiddleLeft => (left, middle_y),
        Anchor::Center => (center_x, middle_y),
        Anchor::MiddleRight => (right, middle_y),
        Anchor::BottomLeft => (left, bottom),
        Anchor::BottomCenter => (center_x, bottom),
        Anchor::BottomRight => (right, bottom),
    }
}

/// Text watermark content.
#[derive(Clone, Debug, PartialEq)]
pub struct TextWatermark {
    /// Text to draw.
    pub text: String,
    /// Font size in pixels; also the height of the placement box.
    pub font_size_px: f32,
    /// Fill color.
    pub color: Rgb,
}

/// What gets stamped onto the image.
#[derive(Clone, Debug, PartialEq)]
pub enum WatermarkKind {
    /// Rendered text with a drop shadow.
    Text(TextWatermark),
    /// A secondary image, scaled down to fit.
    Image(Raster),
}

/// A complete watermark request.
#[derive(Clone, Debug, PartialEq)]
pub struct Watermark {
    /// Content.
    pub kind: WatermarkKind,
    /// Placement anchor.
    pub position: Anchor,
    /// Opacity in percent, clamped to `10..=100`.
    pub opacity_percent: u8,
}

impl Watermark {
    /// Global alpha in `0.1..=1.0`.
    pub fn opacity(&self) -> f32 {
        f32::from(self.opacity_percent.clamp(10, 100)) / 100.0
    }
}

/// Size an image watermark so its longer side is at most 20% of the smaller base dimension.
///
/// Scaling is uniform and never enlarges the watermark.
pub fn fit_image_watermark(base_w: u32, base_h: u32, wm_w: u32, wm_h: u32) -> (u32, u32) {
    let max_side = f64::from(base_w.min(base_h)) * IMAGE_WATERMARK_MAX_SHARE;
    let longer = f64::from(wm_w.max(wm_h)).max(1.0);
    let scale = (max_side / longer).min(1.0);
    let w = (f64::from(wm_w) * scale).round().max(1.0) as u32;
    let h = (f64::from(wm_h) * scale).round().max(1.0) as u32;
    (w, h)
}

/// Stamp `watermark` onto a copy of `base`. Output dimensions equal the base dimensions.
///
/// Text that no loaded font face can lay out is a validation error rather than a silent no-op.
#[tracing::instrument(skip_all, fields(w = base.width(), h = base.height(), position = ?watermark.position))]
pub fn apply_watermark(
    base: &Raster,
    watermark: &Watermark,
    fonts: &TextRenderer,
) -> RasterkitResult<Raster> {
    let mut out = base.clone();
    let opacity = watermark.opacity();
    let (bw, bh) = base.dimensions();

    match &watermark.kind {
        WatermarkKind::Text(t) => {
            if t.text.trim().is_empty() {
                return Ok(out);
            }
            let font_size = t.font_size_px.max(1.0);
            let metrics = fonts.measure(&t.text, font_size)?;
            if !metrics.shaped {
                return Err(RasterkitError::validation(format!(
                    "no font face can draw watermark text ({} faces loaded)",
                    fonts.face_count()
                )));
            }
            let box_w = metrics.width.ceil() as u32;
            let box_h = font_size.ceil() as u32;
            let (x, y) = resolve_position(bw, bh, box_w, box_h, watermark.position);
            tracing::debug!(x, y, box_w, box_h, shaped = metrics.shaped, "text watermark box");

            let shadow = t.color.contrast_label().rgb();
            let baseline = (y as f64) + f64::from(font_size);
            let runs = [
                TextRun {
                    text: &t.text,
                    font_size,
                    x: x as f64 + TEXT_SHADOW_OFFSET,
                    baseline: baseline + TEXT_SHADOW_OFFSET,
                    fill: shadow,
                },
                TextRun {
                    text: &t.text,
                    font_size,
                    x: x as f64,
                    baseline,
                    fill: t.color,
                },
            ];
            let layer = fonts.render_layer(bw, bh, &runs)?;
            composite_premul_at(&mut out, &layer, bw, bh, 0, 0, opacity)?;
        }
        WatermarkKind::Image(img) => {
            let (w, h) = fit_image_watermark(bw, bh, img.width(), img.height());
            let scaled = resize(img, w, h, ResampleFilter::Bilinear)?;
            let (x, y) = resolve_position(bw, bh, w, h, watermark.position);
            tracing::debug!(x, y, w, h, "image watermark box");
            composite_at(&mut out, &scaled, x, y, opacity)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/watermark.rs"]
mod tests;
