use std::str::FromStr;

use image::ImageEncoder as _;

use crate::foundation::core::Raster;
use crate::foundation::error::{RasterkitError, RasterkitResult};

/// Quality used for lossy output when the caller gives none.
pub const DEFAULT_QUALITY: f32 = 0.92;

/// Encoded output types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Lossy, no alpha. Transparent areas come out black.
    Jpeg,
    /// Lossless with alpha.
    #[default]
    Png,
    /// Lossless WebP with alpha.
    WebP,
}

impl OutputFormat {
    /// MIME type of the encoded bytes.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    /// `true` when `quality` affects the output.
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg)
    }
}

impl FromStr for OutputFormat {
    type Err = RasterkitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.trim_start_matches("image/") {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            other => Err(RasterkitError::validation(format!(
                "unknown output format '{other}'. Expected jpeg, png, or webp"
            ))),
        }
    }
}

/// Map a `0.0..=1.0` quality onto the JPEG encoder's `1..=100` scale.
pub fn jpeg_quality(quality: Option<f32>) -> u8 {
    let q = quality
        .filter(|q| q.is_finite())
        .unwrap_or(DEFAULT_QUALITY)
        .clamp(0.0, 1.0);
    ((q * 100.0).round() as u8).clamp(1, 100)
}

/// Encode `raster`. `quality` only matters for lossy formats.
#[tracing::instrument(skip(raster), fields(w = raster.width(), h = raster.height()))]
pub fn encode(
    raster: &Raster,
    format: OutputFormat,
    quality: Option<f32>,
) -> RasterkitResult<Vec<u8>> {
    let (w, h) = raster.dimensions();
    let mut buf = Vec::new();
    let result = match format {
        OutputFormat::Jpeg => {
            let rgb = flatten_on_black(raster.as_bytes());
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, jpeg_quality(quality))
                .write_image(&rgb, w, h, image::ExtendedColorType::Rgb8)
        }
        OutputFormat::Png => image::codecs::png::PngEncoder::new(&mut buf).write_image(
            raster.as_bytes(),
            w,
            h,
            image::ExtendedColorType::Rgba8,
        ),
        OutputFormat::WebP => image::codecs::webp::WebPEncoder::new_lossless(&mut buf)
            .write_image(raster.as_bytes(), w, h, image::ExtendedColorType::Rgba8),
    };
    result.map_err(|err| RasterkitError::encode(format!("{}: {err}", format.mime())))?;

    if buf.is_empty() {
        return Err(RasterkitError::encode(format!(
            "{} encoder produced no output",
            format.mime()
        )));
    }
    tracing::debug!(bytes = buf.len(), mime = format.mime(), "encoded image");
    Ok(buf)
}

fn flatten_on_black(rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = u16::from(px[3]);
        for &c in &px[..3] {
            out.push(((u16::from(c) * a + 127) / 255) as u8);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/codec/encode.rs"]
mod tests;
