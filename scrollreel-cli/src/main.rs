use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sha2::{Digest, Sha256};

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the extended frame table, holds and phase ranges.
    Plan(PlanArgs),
    /// Render the canvas for one frame as a PNG.
    Frame(FrameArgs),
    /// Simulate a top-to-bottom scroll and render every step.
    Sweep(SweepArgs),
    /// Resolve a site path against the embedded content.
    Route(RouteArgs),
}

#[derive(clap::Args, Debug)]
struct ConfigArgs {
    /// Engine config JSON. Overrides `--frames`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in preset: 50, 100 or 200 frames.
    #[arg(long, default_value_t = 100)]
    frames: u32,
}

#[derive(clap::Args, Debug)]
struct CanvasArgs {
    /// Directory holding the frame images.
    #[arg(long)]
    dir: PathBuf,

    /// Canvas width in CSS pixels.
    #[arg(long, default_value_t = 320.0)]
    width: f64,

    /// Canvas height in CSS pixels.
    #[arg(long, default_value_t = 180.0)]
    height: f64,

    /// Host device pixel ratio (raised to the config minimum).
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Also print every position of the extended sequence.
    #[arg(long, default_value_t = false)]
    positions: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(flatten)]
    canvas: CanvasArgs,

    /// Frame number (1-based).
    #[arg(long)]
    frame: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(flatten)]
    canvas: CanvasArgs,

    /// Number of evenly spaced scroll offsets.
    #[arg(long, default_value_t = 120)]
    steps: usize,

    /// Write one PNG per step into this directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct RouteArgs {
    /// Request path, e.g. `/dochakWebsite/news/molit-award-2025`.
    path: String,

    /// Base path the site is served under.
    #[arg(long, default_value = "/dochakWebsite")]
    base: String,

    /// Publication search term (disclosure pages).
    #[arg(long, default_value = "")]
    search: String,

    /// Publication year, or `all`.
    #[arg(long, default_value = "all")]
    year: String,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Sweep(args) => cmd_sweep(args),
        Command::Route(args) => cmd_route(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<scrollreel::EngineConfig> {
    if let Some(path) = &args.config {
        return scrollreel::EngineConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()));
    }
    let count = scrollreel::FrameCount::from_total(args.frames).with_context(|| {
        format!(
            "no built-in preset for {} frames (expected 50, 100 or 200)",
            args.frames
        )
    })?;
    Ok(scrollreel::EngineConfig::preset(count)?)
}

/// Load every frame under `dir`: priority wave first, then the rest.
fn load_frames(
    config: &scrollreel::EngineConfig,
    dir: &Path,
) -> anyhow::Result<scrollreel::LoadedFrames> {
    let manifest = scrollreel::FrameManifest::scan_dir(dir, &config.frames, config.total_frames)
        .with_context(|| format!("scan frames in '{}'", dir.display()))?;
    let cache = scrollreel::ImageCache::new(Arc::new(scrollreel::FsImageSource::new(dir)));
    let plan = scrollreel::PreloadPlan::new(&manifest, config.priority_count);

    let mut state = scrollreel::PreloadState::new();
    let token = scrollreel::CancellationToken::new();
    scrollreel::run_waves(&plan, &cache, &token, |ev| state.apply(ev));

    tracing::debug!(
        loaded = state.frames().len(),
        failed = state.failed().len(),
        "frames loaded"
    );
    if !state.failed().is_empty() {
        eprintln!(
            "warning: {} frame(s) failed to load: {:?}",
            state.failed().len(),
            state.failed().iter().map(|f| f.get()).collect::<Vec<_>>()
        );
    }
    Ok(state.frames().clone())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let sequence = config.sequence()?;
    let phases = config.phase_boundaries()?;

    let ranges: Vec<_> = phases
        .ranges()
        .into_iter()
        .map(|(phase, r)| {
            serde_json::json!({ "phase": phase, "start": r.start(), "end": r.end() })
        })
        .collect();
    let mut out = serde_json::json!({
        "total_frames": config.total_frames,
        "positions": sequence.len(),
        "priority_count": config.priority_count,
        "holds": config.holds,
        "phases": ranges,
    });
    if args.positions {
        out["sequence"] = serde_json::to_value(sequence.as_slice())?;
    }

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let frames = load_frames(&config, &args.canvas.dir)?;

    let css = scrollreel::CssSize::new(args.canvas.width, args.canvas.height)?;
    let mut renderer =
        scrollreel::CanvasRenderer::new(css, args.canvas.dpr, config.canvas_settings())?;
    let outcome = renderer.draw(scrollreel::FrameNumber(args.frame), &frames)?;
    if outcome.drawn != Some(outcome.requested) {
        eprintln!(
            "frame {} not loaded; drew {:?}",
            args.frame,
            outcome.drawn.map(|f| f.get())
        );
    }
    let frame = renderer.readback();

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

/// Hashes every pushed step, and forwards it to `inner` when set.
struct DigestSink {
    hasher: Sha256,
    inner: Option<scrollreel::PngDirSink>,
}

impl scrollreel::FrameSink for DigestSink {
    fn begin(&mut self, cfg: scrollreel::SinkConfig) -> scrollreel::ReelResult<()> {
        self.hasher.update(cfg.width.to_le_bytes());
        self.hasher.update(cfg.height.to_le_bytes());
        match self.inner.as_mut() {
            Some(s) => s.begin(cfg),
            None => Ok(()),
        }
    }

    fn push_frame(
        &mut self,
        step: usize,
        frame: scrollreel::FrameNumber,
        rgba: &scrollreel::FrameRGBA,
    ) -> scrollreel::ReelResult<()> {
        self.hasher.update(&rgba.data);
        match self.inner.as_mut() {
            Some(s) => s.push_frame(step, frame, rgba),
            None => Ok(()),
        }
    }

    fn end(&mut self) -> scrollreel::ReelResult<()> {
        match self.inner.as_mut() {
            Some(s) => s.end(),
            None => Ok(()),
        }
    }
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let frames = load_frames(&config, &args.canvas.dir)?;
    let sequence = Arc::new(config.sequence()?);
    let steps = scrollreel::sweep_frames(&config, sequence, args.steps)?;

    let css = scrollreel::CssSize::new(args.canvas.width, args.canvas.height)?;
    let opts = scrollreel::SweepOpts {
        parallel: args.parallel,
        threads: args.threads,
    };
    let mut sink = DigestSink {
        hasher: Sha256::new(),
        inner: args.out.clone().map(scrollreel::PngDirSink::new),
    };
    let stats = scrollreel::render_sweep(
        &config,
        &frames,
        &steps,
        css,
        args.canvas.dpr,
        opts,
        &mut sink,
    )?;

    let digest = sink.hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "stats": stats,
            "first_frame": steps.first().map(|s| s.frame),
            "last_frame": steps.last().map(|s| s.frame),
            "sha256": hex,
        }))?
    );
    if let Some(out) = &args.out {
        eprintln!("wrote {} step(s) to {}", stats.steps, out.display());
    }
    Ok(())
}

fn cmd_route(args: RouteArgs) -> anyhow::Result<()> {
    let catalog = scrollreel::Catalog::embedded()?;
    let filter = scrollreel::PublicationFilter::new(
        args.search.as_str(),
        scrollreel::parse_year_filter(&args.year)?,
    );
    let route = scrollreel::Route::parse(&args.path, &args.base);
    let view = scrollreel::resolve_filtered(&route, &catalog, &filter);

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "route": route,
            "view": view,
        }))?
    );
    Ok(())
}
