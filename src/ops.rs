use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::analysis::color::Rgb;
use crate::codec::decode::{decode_file, decode_image};
use crate::codec::encode::{OutputFormat, encode};
use crate::effects::edge_mask::remove_background;
use crate::effects::text::TextRenderer;
use crate::effects::watermark::{Anchor, TextWatermark, Watermark, WatermarkKind, apply_watermark};
use crate::foundation::core::Raster;
use crate::foundation::error::{RasterkitError, RasterkitResult};
use crate::transform::crop::{CropParams, crop};
use crate::transform::resize::{ResizeParams, resize};
use crate::transform::rotate::{RotateParams, rotate_flip};

fn default_font_size() -> f32 {
    48.0
}

fn default_text_color() -> String {
    "#ffffff".to_string()
}

fn default_opacity() -> u8 {
    50
}

/// Where watermark content comes from in a job file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WatermarkSource {
    /// Rendered text.
    Text {
        /// Text to draw.
        text: String,
        /// Font size in pixels.
        #[serde(default = "default_font_size")]
        font_size_px: f32,
        /// Fill color as `#rgb` or `#rrggbb`.
        #[serde(default = "default_text_color")]
        color: String,
    },
    /// An image file decoded at apply time.
    ImageFile {
        /// Path to the watermark image.
        path: PathBuf,
    },
}

/// Watermark step of a job.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WatermarkOp {
    /// Content.
    pub source: WatermarkSource,
    /// Placement anchor.
    #[serde(default)]
    pub position: Anchor,
    /// Opacity percent, clamped to `10..=100` when applied.
    #[serde(default = "default_opacity")]
    pub opacity_percent: u8,
}

impl WatermarkOp {
    /// Materialize into a [`Watermark`], decoding image content if needed.
    pub fn to_watermark(&self) -> RasterkitResult<Watermark> {
        let kind = match &self.source {
            WatermarkSource::Text {
                text,
                font_size_px,
                color,
            } => WatermarkKind::Text(TextWatermark {
                text: text.clone(),
                font_size_px: *font_size_px,
                color: Rgb::from_hex(color)?,
            }),
            WatermarkSource::ImageFile { path } => WatermarkKind::Image(decode_file(path)?),
        };
        Ok(Watermark {
            kind,
            position: self.position,
            opacity_percent: self.opacity_percent,
        })
    }
}

/// One raster-to-raster step.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "params", rename_all = "snake_case")]
pub enum Operation {
    /// Resample to new dimensions.
    Resize(ResizeParams),
    /// Extract a clamped region.
    Crop(CropParams),
    /// Rotate and/or mirror.
    Rotate(RotateParams),
    /// Stamp text or an image.
    Watermark(WatermarkOp),
    /// Edge-mask alpha heuristic.
    RemoveBackground,
}

impl Operation {
    /// Short name used in logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Resize(_) => "resize",
            Self::Crop(_) => "crop",
            Self::Rotate(_) => "rotate",
            Self::Watermark(_) => "watermark",
            Self::RemoveBackground => "remove_background",
        }
    }

    /// Apply this step to `src`, producing a new raster.
    #[tracing::instrument(skip_all, fields(op = self.name()))]
    pub fn apply(&self, src: &Raster, fonts: &TextRenderer) -> RasterkitResult<Raster> {
        match self {
            Self::Resize(p) => {
                let (w, h) = p.resolve(src.width(), src.height());
                resize(src, w, h, p.filter)
            }
            Self::Crop(p) => crop(src, p.resolve(src.width(), src.height())),
            Self::Rotate(p) => rotate_flip(src, *p),
            Self::Watermark(op) => apply_watermark(src, &op.to_watermark()?, fonts),
            Self::RemoveBackground => remove_background(src),
        }
    }

    fn rebase_paths(&mut self, dir: &Path) {
        if let Self::Watermark(WatermarkOp {
            source: WatermarkSource::ImageFile { path },
            ..
        }) = self
            && path.is_relative()
        {
            *path = dir.join(&*path);
        }
    }
}

/// Output format implied by a file extension.
pub fn format_for_path(path: &Path) -> Option<OutputFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse().ok())
}

/// A batch job: decode `input`, apply `operations` in order, encode to `output`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Job {
    /// Source image.
    pub input: PathBuf,
    /// Destination file.
    pub output: PathBuf,
    /// Output format; inferred from the output extension when absent, else PNG.
    #[serde(default)]
    pub format: Option<OutputFormat>,
    /// Lossy quality in `0.0..=1.0`.
    #[serde(default)]
    pub quality: Option<f32>,
    /// Steps, applied in order.
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// Summary of a finished job.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct JobReport {
    /// Output width.
    pub width: u32,
    /// Output height.
    pub height: u32,
    /// Encoded format.
    pub format: OutputFormat,
    /// Size of the input file.
    pub input_bytes: u64,
    /// Size of the encoded output.
    pub output_bytes: u64,
}

impl Job {
    /// Parse a job from a JSON reader. Relative paths are kept as written.
    pub fn from_reader<R: std::io::Read>(r: R) -> RasterkitResult<Self> {
        serde_json::from_reader(r).map_err(|e| RasterkitError::serde(format!("parse job JSON: {e}")))
    }

    /// Parse a job file. Relative paths resolve against the job file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> RasterkitResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("open job '{}'", path.display()))?;
        let mut job = Self::from_reader(BufReader::new(f))?;
        if let Some(dir) = path.parent() {
            job.rebase_paths(dir);
        }
        Ok(job)
    }

    fn rebase_paths(&mut self, dir: &Path) {
        if self.input.is_relative() {
            self.input = dir.join(&self.input);
        }
        if self.output.is_relative() {
            self.output = dir.join(&self.output);
        }
        for op in &mut self.operations {
            op.rebase_paths(dir);
        }
    }

    /// Resolved output format.
    pub fn output_format(&self) -> OutputFormat {
        self.format
            .or_else(|| format_for_path(&self.output))
            .unwrap_or_default()
    }

    /// Apply the operations to an already decoded raster.
    pub fn apply(&self, src: Raster, fonts: &TextRenderer) -> RasterkitResult<Raster> {
        self.operations
            .iter()
            .try_fold(src, |raster, op| op.apply(&raster, fonts))
    }

    /// Run the job end to end, writing the output file.
    #[tracing::instrument(skip_all, fields(input = %self.input.display(), ops = self.operations.len()))]
    pub fn run(&self, fonts: &TextRenderer) -> RasterkitResult<JobReport> {
        let bytes = std::fs::read(&self.input)
            .with_context(|| format!("read image '{}'", self.input.display()))?;
        let src = decode_image(&bytes)?;
        let out = self.apply(src, fonts)?;

        let format = self.output_format();
        let encoded = encode(&out, format, self.quality)?;
        if let Some(dir) = self.output.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create output dir '{}'", dir.display()))?;
        }
        std::fs::write(&self.output, &encoded)
            .with_context(|| format!("write '{}'", self.output.display()))?;

        let report = JobReport {
            width: out.width(),
            height: out.height(),
            format,
            input_bytes: bytes.len() as u64,
            output_bytes: encoded.len() as u64,
        };
        tracing::debug!(?report, "job finished");
        Ok(report)
    }
}

#[cfg(test)]
#[path = "../tests/unit/ops.rs"]
mod tests;
