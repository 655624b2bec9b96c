use std::collections::HashMap;

use crate::analysis::color::{LabelColor, Rgb};
use crate::foundation::core::Raster;
use crate::foundation::error::RasterkitResult;
use crate::transform::resize::{ResampleFilter, resize};

/// Side length of the square grid the source is reduced to before counting.
pub const SAMPLE_GRID: u32 = 100;
/// Samples with alpha below this are ignored.
pub const MIN_ALPHA: u8 = 128;
/// Channels are rounded to the nearest multiple of this step.
pub const QUANT_STEP: u16 = 10;
/// Smallest palette a caller may request.
pub const MIN_COLORS: usize = 3;
/// Largest palette a caller may request.
pub const MAX_COLORS: usize = 10;

/// Returned when no sample is opaque enough to count.
pub const FALLBACK_PALETTE: [Rgb; 5] = [
    Rgb::new(0x3b, 0x82, 0xf6),
    Rgb::new(0x10, 0xb9, 0x81),
    Rgb::new(0xf5, 0x9e, 0x0b),
    Rgb::new(0xef, 0x44, 0x44),
    Rgb::new(0x8b, 0x5c, 0xf6),
];

/// One palette entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ColorSwatch {
    /// Quantized color.
    pub color: Rgb,
    /// Readable label color on top of `color`.
    pub contrast_label: LabelColor,
}

impl ColorSwatch {
    /// Build a swatch, deriving its label color.
    pub fn new(color: Rgb) -> Self {
        Self {
            color,
            contrast_label: color.contrast_label(),
        }
    }
}

/// Dominant colors, most frequent first.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    /// Swatches in descending frequency.
    pub swatches: Vec<ColorSwatch>,
}

impl Palette {
    /// The fixed five-color fallback.
    pub fn fallback() -> Self {
        Self {
            swatches: FALLBACK_PALETTE.iter().copied().map(ColorSwatch::new).collect(),
        }
    }

    /// `#rrggbb` strings in palette order.
    pub fn to_hex_list(&self) -> Vec<String> {
        self.swatches.iter().map(|s| s.color.to_hex()).collect()
    }

    /// Number of swatches.
    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    /// `true` when there are no swatches.
    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }
}

/// `round(c / 10) * 10`, rounding halves up. 255 maps to 260 here.
pub fn quantize_channel(c: u8) -> u16 {
    (u16::from(c) + QUANT_STEP / 2) / QUANT_STEP * QUANT_STEP
}

/// Extract up to `num_colors` (clamped to 3..=10) dominant colors.
///
/// The source is not modified; repeated calls give identical results.
#[tracing::instrument(skip(src), fields(w = src.width(), h = src.height()))]
pub fn extract_palette(src: &Raster, num_colors: usize) -> RasterkitResult<Palette> {
    let num_colors = num_colors.clamp(MIN_COLORS, MAX_COLORS);
    let grid = resize(src, SAMPLE_GRID, SAMPLE_GRID, ResampleFilter::Bilinear)?;

    // Buckets in first-encounter order; the index map only speeds up lookups.
    let mut buckets: Vec<([u16; 3], u32)> = Vec::new();
    let mut index: HashMap<[u16; 3], usize> = HashMap::new();
    for px in grid.pixels() {
        if px[3] < MIN_ALPHA {
            continue;
        }
        let key = [
            quantize_channel(px[0]),
            quantize_channel(px[1]),
            quantize_channel(px[2]),
        ];
        match index.get(&key) {
            Some(&i) => buckets[i].1 += 1,
            None => {
                index.insert(key, buckets.len());
                buckets.push((key, 1));
            }
        }
    }

    if buckets.is_empty() {
        tracing::debug!("no opaque samples, using fallback palette");
        return Ok(Palette::fallback());
    }

    // Stable: equal counts keep first-encounter order.
    buckets.sort_by(|a, b| b.1.cmp(&a.1));
    tracing::debug!(buckets = buckets.len(), "counted color buckets");

    let swatches = buckets
        .iter()
        .take(num_colors)
        .map(|(key, _)| {
            let sat = |v: u16| v.min(255) as u8;
            ColorSwatch::new(Rgb::new(sat(key[0]), sat(key[1]), sat(key[2])))
        })
        .collect();
    Ok(Palette { swatches })
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/palette.rs"]
mod tests;
