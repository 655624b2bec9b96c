//! rasterkit is a set of in-memory raster utilities behind a small CLI.
//!
//! Everything operates on [`Raster`], a straight-alpha RGBA8 buffer, and produces a new raster.
//! Codecs sit at the edges: bytes are decoded into a raster on the way in and encoded on the
//! way out.
//!
//! # Operations
//!
//! - **Transform**: [`resize`] (separable resampling), [`crop`] (lossless copy of a clamped
//!   region), [`rotate_flip`] (explicit affine inverse mapping onto an enlarged canvas).
//! - **Watermark**: text or image stamped at one of nine [`Anchor`]s with clamped opacity.
//! - **Background removal**: [`remove_background`] applies an edge-mask heuristic. It is a
//!   placeholder, not segmentation.
//! - **Palette**: [`extract_palette`] buckets a downsampled copy and labels each swatch with a
//!   readable text color.
//! - **PDF geometry**: page sizes, margins, image fitting and page-range plans for an external
//!   PDF toolkit.
//!
//! [`Operation`] and [`Job`] describe work as JSON; [`ToolSession`] tracks the source, result,
//! and object-URL lifecycle of one interactive tool.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod analysis;
mod codec;
mod effects;
mod foundation;
mod ops;
mod pdf;
mod session;
mod transform;
mod units;

pub use analysis::color::{LabelColor, Rgb};
pub use analysis::palette::{
    ColorSwatch, FALLBACK_PALETTE, MAX_COLORS, MIN_COLORS, Palette, extract_palette,
    quantize_channel,
};
pub use codec::decode::{ImageMime, decode_file, decode_image, decode_image_with_mime};
pub use codec::encode::{DEFAULT_QUALITY, OutputFormat, encode, jpeg_quality};
pub use effects::blur::box_blur_u8;
pub use effects::composite::{PremulRgba8, composite_at, composite_premul_at, over};
pub use effects::edge_mask::{EDGE_THRESHOLD, MASK_BLUR_RADIUS, edge_mask, remove_background};
pub use effects::text::{TextMetrics, TextRenderer, TextRun};
pub use effects::watermark::{
    Anchor, TextWatermark, WATERMARK_PADDING, Watermark, WatermarkKind, apply_watermark,
    fit_image_watermark, resolve_position,
};
pub use foundation::core::{Affine, Point, Raster, Rect, Region, Rgba8, TRANSPARENT, Vec2};
pub use foundation::error::{RasterkitError, RasterkitResult};
pub use ops::{Job, JobReport, Operation, WatermarkOp, WatermarkSource, format_for_path};
pub use pdf::geometry::{Margins, Orientation, PageLayout, PageSize};
pub use pdf::pages::{PageRange, PageSelection, SplitMode, parse_ranges};
pub use session::{
    Blob, ObjectUrl, ObjectUrlRegistry, ObjectUrlStats, SessionResult, ToolSession,
};
pub use transform::crop::{CropAspect, CropParams, apply_aspect_lock, clamp_region, crop};
pub use transform::resize::{EditedAxis, ResampleFilter, ResizeParams, resize};
pub use transform::rotate::{RotateParams, rotate_flip, rotate_flip_matrix, rotated_bounds};
pub use units::{compression_ratio, format_file_size};
