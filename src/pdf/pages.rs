use std::str::FromStr;

use crate::foundation::error::{RasterkitError, RasterkitResult};

/// Inclusive, 1-based page range. `end: None` runs to the last page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PageRange {
    /// First page (1-based).
    pub start: u32,
    /// Last page, inclusive.
    pub end: Option<u32>,
}

impl PageRange {
    /// Pages of this range that exist in a `page_count`-page document.
    ///
    /// Out-of-range bounds are clamped; reversed bounds are swapped.
    pub fn resolve(self, page_count: u32) -> Option<(u32, u32)> {
        if page_count == 0 {
            return None;
        }
        let start = self.start.max(1);
        let end = self.end.unwrap_or(page_count).max(1);
        let (lo, hi) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        if lo > page_count {
            return None;
        }
        Some((lo, hi.min(page_count)))
    }
}

impl FromStr for PageRange {
    type Err = RasterkitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let s = value.trim();
        let num = |t: &str| {
            t.trim().parse::<u32>().map_err(|_| {
                RasterkitError::validation(format!("invalid page number '{}' in '{s}'", t.trim()))
            })
        };
        match s.split_once('-') {
            None => {
                let p = num(s)?;
                Ok(Self {
                    start: p,
                    end: Some(p),
                })
            }
            Some((a, b)) => {
                let start = if a.trim().is_empty() { 1 } else { num(a)? };
                let end = if b.trim().is_empty() { None } else { Some(num(b)?) };
                Ok(Self { start, end })
            }
        }
    }
}

/// Parse a comma separated list such as `"1-3, 5, 8-"`.
pub fn parse_ranges(s: &str) -> RasterkitResult<Vec<PageRange>> {
    let ranges = s
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect::<RasterkitResult<Vec<PageRange>>>()?;
    if ranges.is_empty() {
        return Err(RasterkitError::validation("page selection is empty"));
    }
    Ok(ranges)
}

/// How a document is split into output documents.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// One output document per page.
    EveryPage,
    /// One output document per range.
    Ranges(Vec<PageRange>),
}

impl SplitMode {
    /// Page lists (1-based) for each output document.
    ///
    /// Ranges that fall entirely outside the document are dropped.
    pub fn plan(&self, page_count: u32) -> RasterkitResult<Vec<Vec<u32>>> {
        let plan: Vec<Vec<u32>> = match self {
            Self::EveryPage => (1..=page_count).map(|p| vec![p]).collect(),
            Self::Ranges(ranges) => ranges
                .iter()
                .filter_map(|r| r.resolve(page_count))
                .map(|(lo, hi)| (lo..=hi).collect())
                .collect(),
        };
        if plan.is_empty() {
            return Err(RasterkitError::validation(format!(
                "split selects no pages of a {page_count}-page document"
            )));
        }
        Ok(plan)
    }
}

/// Pages chosen for an edit or export, in document order without duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSelection {
    /// Every page.
    #[default]
    All,
    /// Union of ranges.
    Ranges(Vec<PageRange>),
}

impl PageSelection {
    /// `"all"` (or empty) selects everything; otherwise a range list.
    pub fn parse(s: &str) -> RasterkitResult<Self> {
        let t = s.trim();
        if t.is_empty() || t.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Ok(Self::Ranges(parse_ranges(t)?))
    }

    /// Selected 1-based page numbers, ascending.
    pub fn pages(&self, page_count: u32) -> Vec<u32> {
        match self {
            Self::All => (1..=page_count).collect(),
            Self::Ranges(ranges) => {
                let mut pages: Vec<u32> = ranges
                    .iter()
                    .filter_map(|r| r.resolve(page_count))
                    .flat_map(|(lo, hi)| lo..=hi)
                    .collect();
                pages.sort_unstable();
                pages.dedup();
                pages
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pdf/pages.rs"]
mod tests;
