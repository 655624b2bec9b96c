use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::analysis::color::Rgb;
use crate::foundation::error::{RasterkitError, RasterkitResult};

/// Width used per character when no font face can lay the text out.
const FALLBACK_ADVANCE_EM: f32 = 0.6;
const FONT_STACK: &str = "sans-serif, 'DejaVu Sans', 'Liberation Sans', 'Noto Sans', Arial";

/// Measured text box. Height is always the font size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// Horizontal extent in pixels.
    pub width: f32,
    /// Vertical extent in pixels (equal to the font size).
    pub height: f32,
    /// `false` when no font face was found and `width` is an estimate.
    pub shaped: bool,
}

/// One run of text drawn into a layer.
#[derive(Clone, Debug)]
pub struct TextRun<'a> {
    /// Text content.
    pub text: &'a str,
    /// Font size in pixels.
    pub font_size: f32,
    /// Left edge.
    pub x: f64,
    /// Alphabetic baseline.
    pub baseline: f64,
    /// Fill color.
    pub fill: Rgb,
}

/// Lays out and rasterizes text through `usvg`/`resvg`.
#[derive(Clone)]
pub struct TextRenderer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::with_system_fonts()
    }
}

impl TextRenderer {
    /// Renderer backed by the fonts installed on this machine.
    pub fn with_system_fonts() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Renderer with an empty font database. Text is measured by estimate and not drawn.
    pub fn without_fonts() -> Self {
        Self {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    /// Add every `.ttf`/`.otf`/`.ttc` file in `dir`. Unreadable entries are skipped.
    pub fn load_font_dir(&mut self, dir: &Path) {
        let Ok(rd) = std::fs::read_dir(dir) else {
            return;
        };
        let db = Arc::make_mut(&mut self.fontdb);
        for entry in rd.flatten() {
            let path = entry.path();
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };
            let ext = ext.to_ascii_lowercase();
            if ext != "ttf" && ext != "otf" && ext != "ttc" {
                continue;
            }
            if let Err(err) = db.load_font_file(&path) {
                tracing::warn!(path = %path.display(), %err, "skipping font file");
            }
        }
    }

    /// Number of loaded font faces.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    fn parse(&self, svg: &str) -> RasterkitResult<usvg::Tree> {
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &opts).context("parse text svg")?;
        Ok(tree)
    }

    /// Measure `text` at `font_size` pixels.
    pub fn measure(&self, text: &str, font_size: f32) -> RasterkitResult<TextMetrics> {
        let font_size = font_size.max(1.0);
        let estimate = FALLBACK_ADVANCE_EM * font_size * text.chars().count() as f32;
        if text.is_empty() {
            return Ok(TextMetrics {
                width: 0.0,
                height: font_size,
                shaped: false,
            });
        }

        let canvas_w = (estimate * 4.0).ceil().max(16.0);
        let canvas_h = (font_size * 3.0).ceil();
        let run = TextRun {
            text,
            font_size,
            x: 0.0,
            baseline: f64::from(font_size * 2.0),
            fill: Rgb::new(0, 0, 0),
        };
        let svg = svg_document(canvas_w as u32, canvas_h as u32, &[run]);
        let tree = self.parse(&svg)?;

        let measured = max_text_width(tree.root());
        Ok(match measured {
            Some(width) if width > 0.0 => TextMetrics {
                width,
                height: font_size,
                shaped: true,
            },
            _ => TextMetrics {
                width: estimate,
                height: font_size,
                shaped: false,
            },
        })
    }

    /// Rasterize `runs` (drawn in order) into a transparent `width x height` layer.
    ///
    /// Returns premultiplied RGBA8.
    pub fn render_layer(
        &self,
        width: u32,
        height: u32,
        runs: &[TextRun<'_>],
    ) -> RasterkitResult<Vec<u8>> {
        let svg = svg_document(width, height, runs);
        let tree = self.parse(&svg)?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| RasterkitError::validation("failed to allocate text pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::default(),
            &mut pixmap.as_mut(),
        );
        Ok(pixmap.data().to_vec())
    }
}

fn max_text_width(group: &usvg::Group) -> Option<f32> {
    let mut best: Option<f32> = None;
    for child in group.children() {
        let w = match child {
            usvg::Node::Group(g) => max_text_width(g.as_ref()),
            usvg::Node::Text(t) => Some(t.bounding_box().width()),
            usvg::Node::Path(_) | usvg::Node::Image(_) => None,
        };
        if let Some(w) = w {
            best = Some(best.map_or(w, |b| b.max(w)));
        }
    }
    best
}

fn svg_document(width: u32, height: u32, runs: &[TextRun<'_>]) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    for run in runs {
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" font-family="{FONT_STACK}" font-size="{}" fill="{}">{}</text>"#,
            run.x,
            run.baseline,
            run.font_size,
            run.fill.to_hex(),
            escape_xml(run.text)
        ));
    }
    svg.push_str("</svg>");
    svg
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/text.rs"]
mod tests;
