use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "slatecast", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a template document and print a summary.
    Validate(ValidateArgs),
    /// Rewrite a template document as the current version.
    Convert(ConvertArgs),
    /// Bind a week of schedule data and export a PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Template JSON document.
    #[arg(long)]
    template: PathBuf,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input template JSON (version "1.0" or "2.0").
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path for the rewritten document.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Template JSON document.
    #[arg(long)]
    template: PathBuf,

    /// Stream records as a JSON array.
    #[arg(long)]
    streams: PathBuf,

    /// First day of the visible week (YYYY-MM-DD).
    #[arg(long)]
    week: String,

    /// Font file registered for the overlay text.
    #[arg(long)]
    font: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output pixels per canvas unit.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Background image file; the template's stored reference is not
    /// fetched.
    #[arg(long)]
    background: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Convert(args) => cmd_convert(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_document(path: &PathBuf) -> anyhow::Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read template '{}'", path.display()))?;
    Ok(slatecast::parse_document(&text)?)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let doc = read_document(&args.template)?;
    let decoded = slatecast::decode_document(&doc)?;

    let version = doc.get("version").and_then(|v| v.as_str()).unwrap_or("?");
    println!(
        "version {}: {}x{} canvas, background {}, {} regions",
        version,
        decoded.canvas.width,
        decoded.canvas.height,
        decoded.background.location(),
        decoded.regions.len(),
    );
    for region in &decoded.regions {
        let b = region.bounds();
        println!(
            "  {}  {}x{} at ({}, {})",
            region.key,
            b.width(),
            b.height(),
            b.x0,
            b.y0,
        );
    }
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let doc = read_document(&args.in_path)?;
    let template = slatecast::migrate_document(&doc)?;
    let value = slatecast::template_to_value(&template)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let mut text = serde_json::to_string_pretty(&value)?;
    text.push('\n');
    std::fs::write(&args.out, text)
        .with_context(|| format!("write template '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let week_start = chrono::NaiveDate::parse_from_str(&args.week, "%Y-%m-%d")
        .with_context(|| format!("parse week start '{}' (expected YYYY-MM-DD)", args.week))?;

    let doc = read_document(&args.template)?;
    let decoded = slatecast::decode_document(&doc)?;

    let streams_text = std::fs::read_to_string(&args.streams)
        .with_context(|| format!("read streams '{}'", args.streams.display()))?;
    let records: Vec<slatecast::StreamRecord> = serde_json::from_str(&streams_text)
        .with_context(|| format!("parse streams '{}'", args.streams.display()))?;
    let map = slatecast::build_week_map(week_start, &records);

    let font_bytes = std::fs::read(&args.font)
        .with_context(|| format!("read font '{}'", args.font.display()))?;
    let mut shaper = slatecast::TextShaper::with_font(&font_bytes)?;

    let prefs = slatecast::PrefsStore::new();
    let overlay = slatecast::build_overlay(&decoded.regions, &map, &prefs, &mut shaper);

    let background = match &args.background {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read background '{}'", path.display()))?;
            Some(slatecast::decode_background(&bytes)?)
        }
        None => None,
    };

    let opts = slatecast::RenderOpts {
        pixel_scale: args.scale,
        ..slatecast::RenderOpts::default()
    };
    let frame = slatecast::render_canvas(
        decoded.canvas,
        background.as_ref(),
        &decoded.regions,
        &overlay,
        &mut shaper,
        &opts,
    )?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
