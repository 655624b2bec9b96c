use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rasterkit::{
    Anchor, CropAspect, CropParams, EditedAxis, Job, Margins, Operation, Orientation, OutputFormat,
    PageLayout, PageSize, ResampleFilter, ResizeParams, Region, RotateParams, SplitMode,
    TextRenderer, WatermarkOp, WatermarkSource, compression_ratio, decode_file, extract_palette,
    format_file_size, parse_ranges,
};

#[derive(Parser, Debug)]
#[command(name = "rasterkit", version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resize an image.
    Resize(ResizeArgs),
    /// Crop a region out of an image.
    Crop(CropArgs),
    /// Rotate and/or flip an image.
    Rotate(RotateArgs),
    /// Stamp a text or image watermark.
    Watermark(WatermarkArgs),
    /// Make edge-free regions transparent (heuristic, not segmentation).
    RemoveBg(IoArgs),
    /// Print the dominant colors of an image as JSON.
    Palette(PaletteArgs),
    /// Re-encode an image and report the size change.
    Encode(IoArgs),
    /// Run a JSON job file.
    Run(RunArgs),
    /// Print PDF page geometry as JSON.
    PageSize(PageSizeArgs),
    /// Print the page lists of a PDF split as JSON.
    SplitPlan(SplitPlanArgs),
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path. The extension picks the format unless --format is given.
    #[arg(long)]
    out: PathBuf,

    /// Output format (jpeg, png, webp).
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Lossy quality in 0.0..=1.0.
    #[arg(long)]
    quality: Option<f32>,
}

#[derive(Args, Debug)]
struct ResizeArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Target width in pixels.
    #[arg(long)]
    width: u32,

    /// Target height in pixels.
    #[arg(long)]
    height: u32,

    /// Derive the other dimension from the source aspect ratio.
    #[arg(long, default_value_t = false)]
    keep_aspect: bool,

    /// Dimension that drives the other with --keep-aspect (width, height).
    #[arg(long, default_value = "width")]
    edited: EditedAxis,

    /// Resampling filter (nearest, bilinear, bicubic).
    #[arg(long, default_value = "bilinear")]
    filter: ResampleFilter,
}

#[derive(Args, Debug)]
struct CropArgs {
    #[command(flatten)]
    io: IoArgs,

    #[arg(long, default_value_t = 0)]
    x: u32,

    #[arg(long, default_value_t = 0)]
    y: u32,

    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,

    /// Aspect lock: free, square, 4:3, 16:9, 3:2, 2:3, w:h or a ratio.
    #[arg(long, default_value = "free")]
    aspect: CropAspect,
}

#[derive(Args, Debug)]
struct RotateArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Clockwise angle in degrees.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    angle: f64,

    #[arg(long, default_value_t = false)]
    flip_h: bool,

    #[arg(long, default_value_t = false)]
    flip_v: bool,
}

#[derive(Args, Debug)]
struct WatermarkArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Watermark text.
    #[arg(long, conflicts_with = "image", required_unless_present = "image")]
    text: Option<String>,

    /// Watermark image.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Font size in pixels.
    #[arg(long, default_value_t = 48.0)]
    font_size: f32,

    /// Text color as hex.
    #[arg(long, default_value = "#ffffff")]
    color: String,

    /// One of top-left, top-center, ..., bottom-right.
    #[arg(long, default_value = "bottom-right")]
    position: Anchor,

    /// Opacity percent (10-100).
    #[arg(long, default_value_t = 50)]
    opacity: u8,

    /// Extra directory of font files.
    #[arg(long)]
    font_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PaletteArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of colors (3-10).
    #[arg(long, default_value_t = 5)]
    colors: usize,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Job JSON file.
    #[arg(long)]
    job: PathBuf,

    /// Extra directory of font files.
    #[arg(long)]
    font_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PageSizeArgs {
    /// a4, letter, legal or a3.
    #[arg(long, default_value = "a4")]
    size: PageSize,

    /// portrait or landscape.
    #[arg(long, default_value = "portrait")]
    orientation: Orientation,

    /// Uniform margin in points.
    #[arg(long, default_value_t = 0.0)]
    margin: f64,

    /// Fit an image of WIDTHxHEIGHT pixels into the content box.
    #[arg(long, value_parser = parse_dims)]
    image: Option<(u32, u32)>,
}

#[derive(Args, Debug)]
struct SplitPlanArgs {
    /// Page count of the document.
    #[arg(long)]
    pages: u32,

    /// Ranges such as "1-3, 5, 8-". Omit to split every page.
    #[arg(long)]
    ranges: Option<String>,
}

fn parse_dims(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w = w.trim().parse().map_err(|e| format!("width: {e}"))?;
    let h = h.trim().parse().map_err(|e| format!("height: {e}"))?;
    Ok((w, h))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose {
        "rasterkit=debug"
    } else {
        "rasterkit=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.cmd {
        Command::Resize(args) => {
            let op = Operation::Resize(ResizeParams {
                width: args.width,
                height: args.height,
                maintain_aspect_ratio: args.keep_aspect,
                edited: args.edited,
                filter: args.filter,
            });
            run_single(args.io, op, &TextRenderer::without_fonts())
        }
        Command::Crop(args) => {
            let op = Operation::Crop(CropParams {
                region: Region::new(args.x, args.y, args.width, args.height),
                aspect: args.aspect,
            });
            run_single(args.io, op, &TextRenderer::without_fonts())
        }
        Command::Rotate(args) => {
            let op = Operation::Rotate(RotateParams {
                angle_degrees: args.angle,
                flip_horizontal: args.flip_h,
                flip_vertical: args.flip_v,
            });
            run_single(args.io, op, &TextRenderer::without_fonts())
        }
        Command::Watermark(args) => cmd_watermark(args),
        Command::RemoveBg(io) => {
            run_single(io, Operation::RemoveBackground, &TextRenderer::without_fonts())
        }
        Command::Palette(args) => cmd_palette(args),
        Command::Encode(io) => run_ops(io, Vec::new(), &TextRenderer::without_fonts()),
        Command::Run(args) => cmd_run(args),
        Command::PageSize(args) => cmd_page_size(args),
        Command::SplitPlan(args) => cmd_split_plan(args),
    }
}

fn fonts(font_dir: Option<&Path>) -> TextRenderer {
    let mut fonts = TextRenderer::with_system_fonts();
    if let Some(dir) = font_dir {
        fonts.load_font_dir(dir);
    }
    fonts
}

fn run_single(io: IoArgs, op: Operation, fonts: &TextRenderer) -> anyhow::Result<()> {
    run_ops(io, vec![op], fonts)
}

fn run_ops(io: IoArgs, operations: Vec<Operation>, fonts: &TextRenderer) -> anyhow::Result<()> {
    let job = Job {
        input: io.in_path,
        output: io.out,
        format: io.format,
        quality: io.quality,
        operations,
    };
    execute(&job, fonts)
}

fn execute(job: &Job, fonts: &TextRenderer) -> anyhow::Result<()> {
    let report = job
        .run(fonts)
        .with_context(|| format!("process '{}'", job.input.display()))?;
    eprintln!(
        "wrote {} ({}x{}, {} -> {}, {}% saved)",
        job.output.display(),
        report.width,
        report.height,
        format_file_size(report.input_bytes),
        format_file_size(report.output_bytes),
        compression_ratio(report.input_bytes, report.output_bytes),
    );
    Ok(())
}

fn cmd_watermark(args: WatermarkArgs) -> anyhow::Result<()> {
    let source = match (args.text, args.image) {
        (_, Some(path)) => WatermarkSource::ImageFile { path },
        (Some(text), None) => WatermarkSource::Text {
            text,
            font_size_px: args.font_size,
            color: args.color,
        },
        (None, None) => anyhow::bail!("either --text or --image is required"),
    };
    let text_needed = matches!(source, WatermarkSource::Text { .. });
    let op = Operation::Watermark(WatermarkOp {
        source,
        position: args.position,
        opacity_percent: args.opacity,
    });
    let fonts = if text_needed {
        fonts(args.font_dir.as_deref())
    } else {
        TextRenderer::without_fonts()
    };
    run_single(args.io, op, &fonts)
}

fn cmd_palette(args: PaletteArgs) -> anyhow::Result<()> {
    let raster = decode_file(&args.in_path)?;
    let palette = extract_palette(&raster, args.colors)?;
    println!("{}", serde_json::to_string_pretty(&palette)?);
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let job = Job::from_path(&args.job)?;
    let needs_fonts = job.operations.iter().any(|op| {
        matches!(
            op,
            Operation::Watermark(WatermarkOp {
                source: WatermarkSource::Text { .. },
                ..
            })
        )
    });
    let fonts = if needs_fonts {
        fonts(args.font_dir.as_deref())
    } else {
        TextRenderer::without_fonts()
    };
    execute(&job, &fonts)
}

fn cmd_page_size(args: PageSizeArgs) -> anyhow::Result<()> {
    let layout = PageLayout {
        size: args.size,
        orientation: args.orientation,
        margins: Margins::uniform(args.margin),
    };
    let (w, h) = layout.page_points();
    let content = layout.content_box();
    let mut out = serde_json::json!({
        "width_pt": w,
        "height_pt": h,
        "content": [content.x0, content.y0, content.x1, content.y1],
    });
    if let Some((iw, ih)) = args.image {
        let r = layout.fit_image(iw, ih);
        out["image"] = serde_json::json!([r.x0, r.y0, r.x1, r.y1]);
    }
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_split_plan(args: SplitPlanArgs) -> anyhow::Result<()> {
    let mode = match args.ranges.as_deref() {
        Some(r) => SplitMode::Ranges(parse_ranges(r)?),
        None => SplitMode::EveryPage,
    };
    let plan = mode.plan(args.pages)?;
    println!("{}", serde_json::to_string(&plan)?);
    Ok(())
}
