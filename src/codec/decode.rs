use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Raster;
use crate::foundation::error::{RasterkitError, RasterkitResult};

/// Image types accepted as input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageMime {
    /// `image/jpeg`
    Jpeg,
    /// `image/png`
    Png,
    /// `image/webp`
    WebP,
    /// `image/gif`
    Gif,
    /// `image/bmp`
    Bmp,
}

impl ImageMime {
    /// Map a declared MIME type. Anything that is not a supported image is rejected.
    pub fn from_mime(mime: &str) -> RasterkitResult<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            "image/webp" => Ok(Self::WebP),
            "image/gif" => Ok(Self::Gif),
            "image/bmp" => Ok(Self::Bmp),
            other => Err(RasterkitError::invalid_input_type(format!(
                "'{other}' is not a supported image type"
            ))),
        }
    }

    /// Canonical MIME string.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }

    /// Detect the type from magic bytes.
    pub fn sniff(bytes: &[u8]) -> RasterkitResult<Self> {
        let format = image::guess_format(bytes).map_err(|_| {
            RasterkitError::invalid_input_type("input is not a recognised image")
        })?;
        Self::from_format(format).ok_or_else(|| {
            RasterkitError::invalid_input_type(format!("{format:?} images are not supported"))
        })
    }

    fn from_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::WebP => Some(Self::WebP),
            image::ImageFormat::Gif => Some(Self::Gif),
            image::ImageFormat::Bmp => Some(Self::Bmp),
            _ => None,
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::WebP => image::ImageFormat::WebP,
            Self::Gif => image::ImageFormat::Gif,
            Self::Bmp => image::ImageFormat::Bmp,
        }
    }
}

/// Decode image bytes into a straight-alpha raster at natural size.
///
/// Unsupported types fail with [`RasterkitError::InvalidInputType`] before any decoding;
/// corrupt data fails with [`RasterkitError::Decode`].
pub fn decode_image(bytes: &[u8]) -> RasterkitResult<Raster> {
    decode_image_with_mime(bytes).map(|(_, raster)| raster)
}

/// Like [`decode_image`], also returning the sniffed type.
pub fn decode_image_with_mime(bytes: &[u8]) -> RasterkitResult<(ImageMime, Raster)> {
    let mime = ImageMime::sniff(bytes)?;
    let dyn_img = image::load_from_memory_with_format(bytes, mime.image_format())
        .map_err(|err| RasterkitError::decode(format!("{}: {err}", mime.mime())))?;
    let rgba = dyn_img.to_rgba8();
    tracing::debug!(
        mime = mime.mime(),
        width = rgba.width(),
        height = rgba.height(),
        "decoded image"
    );
    Ok((mime, Raster::from_rgba_image(rgba)?))
}

/// Read and decode an image file.
pub fn decode_file(path: &Path) -> RasterkitResult<Raster> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/codec/decode.rs"]
mod tests;
