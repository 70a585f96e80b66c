use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "skyhour", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate every missing hour frame (00.png .. 23.png).
    Generate(GenerateArgs),
    /// Render a single hour to an explicit PNG path (overwrites).
    Hour(HourArgs),
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CanvasKind {
    /// 400x400 frames, written to `profile_pics/` by default.
    Profile,
    /// 1500x500 frames, written to `banners/` by default.
    Banner,
}

impl CanvasKind {
    fn canvas(self) -> (u32, u32) {
        match self {
            Self::Profile => (400, 400),
            Self::Banner => (1500, 500),
        }
    }

    fn default_out(self) -> &'static str {
        match self {
            Self::Profile => "profile_pics",
            Self::Banner => "banners",
        }
    }
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Generation config JSON (sky colour table, name, options).
    #[arg(long)]
    config: PathBuf,

    /// Canvas preset. Mutually exclusive with --width/--height.
    #[arg(long, value_enum)]
    kind: Option<CanvasKind>,

    /// Custom canvas width (requires --height).
    #[arg(long)]
    width: Option<u32>,

    /// Custom canvas height (requires --width).
    #[arg(long)]
    height: Option<u32>,

    /// Output directory (defaults to the preset's directory).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Font file, overriding the config's `font` entry.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Write into a fresh directory (`dir`, `dir_1`, ...) instead of filling
    /// the missing hours of an existing one.
    #[arg(long, default_value_t = false)]
    fresh: bool,

    /// Enable hour-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct HourArgs {
    /// Generation config JSON (sky colour table, name, options).
    #[arg(long)]
    config: PathBuf,

    /// Hour of day (0-23).
    #[arg(long)]
    hour: u8,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Canvas preset. Mutually exclusive with --width/--height.
    #[arg(long, value_enum)]
    kind: Option<CanvasKind>,

    /// Custom canvas width (requires --height).
    #[arg(long)]
    width: Option<u32>,

    /// Custom canvas height (requires --width).
    #[arg(long)]
    height: Option<u32>,

    /// Font file, overriding the config's `font` entry.
    #[arg(long)]
    font: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Hour(args) => cmd_hour(args),
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_canvas(
    kind: Option<CanvasKind>,
    width: Option<u32>,
    height: Option<u32>,
) -> anyhow::Result<(skyhour::Canvas, Option<&'static str>)> {
    match (kind, width, height) {
        (Some(kind), None, None) => {
            let (w, h) = kind.canvas();
            Ok((skyhour::Canvas::new(w, h)?, Some(kind.default_out())))
        }
        (None, Some(w), Some(h)) => Ok((skyhour::Canvas::new(w, h)?, None)),
        (Some(_), _, _) => anyhow::bail!("--kind cannot be combined with --width/--height"),
        _ => anyhow::bail!("pass --kind, or both --width and --height"),
    }
}

fn resolve_font(
    config_path: &Path,
    cfg: &skyhour::GenerationConfig,
    cli_font: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli_font {
        return Ok(path);
    }
    let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    cfg.font_path_relative_to(config_dir).ok_or_else(|| {
        anyhow::anyhow!("no font configured: set `font` in the config or pass --font")
    })
}

fn build_job(
    cfg: &skyhour::GenerationConfig,
    canvas: skyhour::Canvas,
    font_bytes: Vec<u8>,
) -> anyhow::Result<skyhour::GenerateJob> {
    Ok(skyhour::GenerateJob {
        palette: cfg.palette()?,
        label: cfg.name.clone(),
        canvas,
        fade_policy: cfg.fade_policy,
        text_opacity: cfg.text_opacity,
        grain: cfg.grain,
        font_bytes: Arc::new(font_bytes),
    })
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let cfg = skyhour::GenerationConfig::from_path(&args.config)?;
    let (canvas, preset_out) = resolve_canvas(args.kind, args.width, args.height)?;

    let out_dir = args
        .out
        .or_else(|| preset_out.map(PathBuf::from))
        .ok_or_else(|| anyhow::anyhow!("pass --out (custom dimensions have no preset directory)"))?;
    let out_dir = if args.fresh {
        skyhour::fresh_dir(&out_dir)
    } else {
        out_dir
    };

    let font_path = resolve_font(&args.config, &cfg, args.font)?;
    let font_bytes = skyhour::read_font_bytes(&font_path)?;
    let job = build_job(&cfg, canvas, font_bytes)?;

    let threading = skyhour::GenerateThreading {
        parallel: args.parallel,
        threads: args.threads,
    };
    let (outcomes, stats) = skyhour::generate(&job, &out_dir, &threading)?;

    for outcome in &outcomes {
        if let skyhour::HourStatus::Failed { stage, message } = &outcome.status {
            eprintln!(
                "hour {} failed during {}: {message}",
                outcome.hour.file_stem(),
                stage.as_str()
            );
        }
    }
    eprintln!(
        "generated {}, skipped {}, failed {} -> {}",
        stats.hours_generated,
        stats.hours_skipped,
        stats.hours_failed,
        out_dir.display()
    );

    if stats.hours_failed > 0 {
        anyhow::bail!("{} hour(s) failed", stats.hours_failed);
    }
    Ok(())
}

fn cmd_hour(args: HourArgs) -> anyhow::Result<()> {
    let cfg = skyhour::GenerationConfig::from_path(&args.config)?;
    let (canvas, _) = resolve_canvas(args.kind, args.width, args.height)?;
    let hour = skyhour::Hour::new(args.hour)?;

    let font_path = resolve_font(&args.config, &cfg, args.font)?;
    let font_bytes = skyhour::read_font_bytes(&font_path)?;
    let job = build_job(&cfg, canvas, font_bytes)?;

    let mut engine = skyhour::TextLayoutEngine::from_font_bytes(&job.font_bytes)?;
    let base_seed = job.grain.seed.unwrap_or_else(skyhour::entropy_seed);
    let frame = skyhour::render_hour(
        &job,
        &mut engine,
        hour,
        skyhour::hour_seed(base_seed, hour.get()),
    )?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
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
