use crate::foundation::error::{RasterkitError, RasterkitResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Straight (non-premultiplied) RGBA8 sample.
pub type Rgba8 = [u8; 4];

/// Fully transparent black.
pub const TRANSPARENT: Rgba8 = [0, 0, 0, 0];

/// A rectangular grid of straight-alpha RGBA8 pixels, row-major, top-left origin.
///
/// Invariant: `data.len() == width * height * 4` and both dimensions are non-zero.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

pub(crate) fn rgba8_len(width: u32, height: u32) -> RasterkitResult<usize> {
    if width == 0 || height == 0 {
        return Err(RasterkitError::validation(format!(
            "raster dimensions must be positive, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| RasterkitError::validation("raster buffer size overflow"))
}

impl Raster {
    /// Allocate a fully transparent raster.
    pub fn new(width: u32, height: u32) -> RasterkitResult<Self> {
        let len = rgba8_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Allocate a raster where every pixel is `px`.
    pub fn filled(width: u32, height: u32, px: Rgba8) -> RasterkitResult<Self> {
        let len = rgba8_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: px.repeat(len / 4),
        })
    }

    /// Wrap an existing straight-alpha RGBA8 buffer.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> RasterkitResult<Self> {
        let len = rgba8_len(width, height)?;
        if data.len() != len {
            return Err(RasterkitError::validation(format!(
                "rgba8 buffer has {} bytes, expected {len} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Borrow the raw RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the raw bytes. The length can not change.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the raster and return its bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub(crate) fn index_of(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    /// Read one pixel, `None` when `(x, y)` is out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index_of(x, y);
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Overwrite one pixel.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba8) -> RasterkitResult<()> {
        if x >= self.width || y >= self.height {
            return Err(RasterkitError::validation(format!(
                "pixel ({x},{y}) outside {}x{} raster",
                self.width, self.height
            )));
        }
        let i = self.index_of(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
        Ok(())
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgba8> + '_ {
        self.data.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Copy a sub-region that must lie fully inside the raster.
    pub fn copy_region(&self, region: Region) -> RasterkitResult<Raster> {
        if !region.fits_within(self.width, self.height) {
            return Err(RasterkitError::validation(format!(
                "region {region:?} exceeds {}x{} raster",
                self.width, self.height
            )));
        }
        let mut out = Raster::new(region.width, region.height)?;
        let row_bytes = (region.width as usize) * 4;
        for row in 0..region.height {
            let src = self.index_of(region.x, region.y + row);
            let dst = out.index_of(0, row);
            out.data[dst..dst + row_bytes].copy_from_slice(&self.data[src..src + row_bytes]);
        }
        Ok(out)
    }

    /// Convert into an `image` buffer (no copy).
    pub fn into_rgba_image(self) -> image::RgbaImage {
        // Length invariant is upheld by every constructor.
        image::RgbaImage::from_raw(self.width, self.height, self.data)
            .unwrap_or_else(|| image::RgbaImage::new(0, 0))
    }

    /// Wrap an `image` buffer (no copy).
    pub fn from_rgba_image(img: image::RgbaImage) -> RasterkitResult<Self> {
        let (w, h) = img.dimensions();
        Self::from_rgba8(w, h, img.into_raw())
    }
}

/// Axis-aligned pixel rectangle, top-left origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Region {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Region {
    /// Construct a region.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// `true` when the region is non-empty and fully inside an image of `w x h`.
    pub fn fits_within(self, w: u32, h: u32) -> bool {
        self.width > 0
            && self.height > 0
            && u64::from(self.x) + u64::from(self.width) <= u64::from(w)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
