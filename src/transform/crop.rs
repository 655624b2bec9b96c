use std::str::FromStr;

use crate::foundation::core::{Raster, Region};
use crate::foundation::error::{RasterkitError, RasterkitResult};

/// Aspect-ratio presets offered by the cropper.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropAspect {
    /// No lock.
    #[default]
    Free,
    /// 1:1
    Square,
    /// 4:3
    FourThree,
    /// 16:9
    SixteenNine,
    /// 3:2
    ThreeTwo,
    /// 2:3
    TwoThree,
    /// Arbitrary `width / height`.
    Custom(f64),
}

impl CropAspect {
    /// `width / height`, or `None` when unlocked or the custom ratio is unusable.
    pub fn ratio(self) -> Option<f64> {
        match self {
            Self::Free => None,
            Self::Square => Some(1.0),
            Self::FourThree => Some(4.0 / 3.0),
            Self::SixteenNine => Some(16.0 / 9.0),
            Self::ThreeTwo => Some(3.0 / 2.0),
            Self::TwoThree => Some(2.0 / 3.0),
            Self::Custom(r) if r.is_finite() && r > 0.0 => Some(r),
            Self::Custom(_) => None,
        }
    }
}

/// Accepts preset names, `w:h` pairs, or a bare ratio such as `1.5`.
impl FromStr for CropAspect {
    type Err = RasterkitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let v = value.trim().to_ascii_lowercase();
        let invalid = || RasterkitError::validation(format!("invalid aspect ratio '{v}'"));
        match v.as_str() {
            "free" | "" => return Ok(Self::Free),
            "square" | "1:1" => return Ok(Self::Square),
            "4:3" => return Ok(Self::FourThree),
            "16:9" => return Ok(Self::SixteenNine),
            "3:2" => return Ok(Self::ThreeTwo),
            "2:3" => return Ok(Self::TwoThree),
            _ => {}
        }
        let ratio = match v.split_once(':') {
            Some((w, h)) => {
                let w: f64 = w.trim().parse().map_err(|_| invalid())?;
                let h: f64 = h.trim().parse().map_err(|_| invalid())?;
                w / h
            }
            None => v.parse().map_err(|_| invalid())?,
        };
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(invalid());
        }
        Ok(Self::Custom(ratio))
    }
}

/// Crop request: a region plus an optional aspect lock.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropParams {
    /// Requested crop box.
    pub region: Region,
    /// Aspect lock applied before clamping.
    #[serde(default)]
    pub aspect: CropAspect,
}

impl CropParams {
    /// Apply the aspect lock, then clamp into an image of `img_w x img_h`.
    pub fn resolve(&self, img_w: u32, img_h: u32) -> Region {
        let region = match self.aspect.ratio() {
            Some(ratio) => apply_aspect_lock(self.region, ratio, img_h),
            None => self.region,
        };
        clamp_region(region, img_w, img_h)
    }
}

/// Clamp a crop box into `img_w x img_h`.
///
/// The box keeps its size (capped at the image size, floored at 1) and slides back inside
/// when it overhangs the right or bottom edge.
pub fn clamp_region(region: Region, img_w: u32, img_h: u32) -> Region {
    let width = region.width.clamp(1, img_w.max(1));
    let height = region.height.clamp(1, img_h.max(1));
    let x = region.x.min(img_w.saturating_sub(width));
    let y = region.y.min(img_h.saturating_sub(height));
    Region {
        x,
        y,
        width,
        height,
    }
}

/// Recompute `height = width / ratio`, limited to the vertical space left below `region.y`.
pub fn apply_aspect_lock(region: Region, ratio: f64, img_h: u32) -> Region {
    if !ratio.is_finite() || ratio <= 0.0 {
        return region;
    }
    let wanted = (f64::from(region.width) / ratio).round().max(1.0);
    let room = f64::from(img_h.saturating_sub(region.y).max(1));
    Region {
        height: wanted.min(room) as u32,
        ..region
    }
}

/// Extract `region` (clamped into bounds first). Pixels are copied exactly.
#[tracing::instrument(skip(src), fields(src_w = src.width(), src_h = src.height()))]
pub fn crop(src: &Raster, region: Region) -> RasterkitResult<Raster> {
    let clamped = clamp_region(region, src.width(), src.height());
    if clamped != region {
        tracing::debug!(?region, ?clamped, "crop region clamped into bounds");
    }
    src.copy_region(clamped)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/crop.rs"]
mod tests;
