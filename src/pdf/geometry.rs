use std::str::FromStr;

use crate::foundation::core::Rect;
use crate::foundation::error::RasterkitError;

/// Named page sizes, in PostScript points (1/72 in).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    /// 595 x 842
    #[default]
    A4,
    /// 612 x 792
    Letter,
    /// 612 x 1008
    Legal,
    /// 842 x 1191
    A3,
}

/// Page orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Portrait dimensions as listed.
    #[default]
    Portrait,
    /// Width and height swapped.
    Landscape,
}

impl PageSize {
    /// Portrait `(width, height)` in points.
    pub fn portrait_points(self) -> (f64, f64) {
        match self {
            Self::A4 => (595.0, 842.0),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::A3 => (842.0, 1191.0),
        }
    }

    /// `(width, height)` in points for `orientation`.
    pub fn points(self, orientation: Orientation) -> (f64, f64) {
        let (w, h) = self.portrait_points();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

impl FromStr for PageSize {
    type Err = RasterkitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            "a3" => Ok(Self::A3),
            other => Err(RasterkitError::validation(format!(
                "unknown page size '{other}'. Expected a4, letter, legal, or a3"
            ))),
        }
    }
}

impl FromStr for Orientation {
    type Err = RasterkitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            other => Err(RasterkitError::validation(format!(
                "unknown orientation '{other}'"
            ))),
        }
    }
}

/// Page margins in points.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Margins {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

impl Margins {
    /// Same margin on every side.
    pub fn uniform(m: f64) -> Self {
        Self {
            top: m,
            right: m,
            bottom: m,
            left: m,
        }
    }

    /// Clamp each side into `0..=min(w, h)/2 - 1` so some content area always remains.
    pub fn clamped(self, page_w: f64, page_h: f64) -> Self {
        let max = (page_w.min(page_h) / 2.0 - 1.0).max(0.0);
        let c = |v: f64| if v.is_finite() { v.clamp(0.0, max) } else { 0.0 };
        Self {
            top: c(self.top),
            right: c(self.right),
            bottom: c(self.bottom),
            left: c(self.left),
        }
    }
}

/// Page size plus margins.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageLayout {
    /// Named size.
    pub size: PageSize,
    /// Orientation.
    #[serde(default)]
    pub orientation: Orientation,
    /// Margins, clamped on use.
    #[serde(default)]
    pub margins: Margins,
}

impl PageLayout {
    /// `(width, height)` in points.
    pub fn page_points(&self) -> (f64, f64) {
        self.size.points(self.orientation)
    }

    /// Area inside the clamped margins, origin at the top-left of the page.
    pub fn content_box(&self) -> Rect {
        let (w, h) = self.page_points();
        let m = self.margins.clamped(w, h);
        Rect::new(m.left, m.top, w - m.right, h - m.bottom)
    }

    /// Placement of an `img_w x img_h` pixel image inside the content box: scaled uniformly to
    /// fit (never enlarged), centred. One pixel maps to one point at scale 1.
    pub fn fit_image(&self, img_w: u32, img_h: u32) -> Rect {
        let content = self.content_box();
        let (iw, ih) = (f64::from(img_w.max(1)), f64::from(img_h.max(1)));
        let scale = (content.width() / iw).min(content.height() / ih).min(1.0);
        let (w, h) = (iw * scale, ih * scale);
        let x = content.x0 + (content.width() - w) / 2.0;
        let y = content.y0 + (content.height() - h) / 2.0;
        Rect::new(x, y, x + w, y + h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pdf/geometry.rs"]
mod tests;
