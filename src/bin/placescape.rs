use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use placescape::{
    CpuRenderer, DEFAULT_SVG_RASTER_PX, Evaluator, Fps, PageConfig,
    PageLayout, PngSequenceSink, RenderSettings, RenderThreading, ScrollProgress, ScrollSweep,
    SectionRegistry, VisualStore,
};

#[derive(Parser, Debug)]
#[command(name = "placescape", version)]
struct Cli {
    /// Section registry JSON (defaults to the built-in essay).
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Page config JSON (viewport, section heights, scroll window, signal keyframes).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (`-v` debug, `-vv` trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the sections in reading order.
    Sections,
    /// Print one section's visual signals as JSON.
    Signals(SignalsArgs),
    /// Export the route as a static HTML document.
    Html(HtmlArgs),
    /// Render the viewport at one scroll offset as a PNG.
    Frame(FrameArgs),
    /// Render the whole scroll as a PNG sequence.
    Sweep(SweepArgs),
}

#[derive(Parser, Debug)]
struct SignalsArgs {
    /// Section id.
    #[arg(long)]
    section: String,

    /// Scroll progress through the section's window, `[0, 1]`.
    #[arg(long, conflicts_with = "scroll", required_unless_present = "scroll")]
    progress: Option<f64>,

    /// Document scroll offset in px.
    #[arg(long)]
    scroll: Option<f64>,
}

#[derive(Parser, Debug)]
struct HtmlArgs {
    /// Output HTML path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct AssetArgs {
    /// Directory holding section visuals (`/1.png` resolves to `<assets>/1.png`).
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Longest edge, in px, SVG visuals are rasterized at.
    #[arg(long, default_value_t = DEFAULT_SVG_RASTER_PX)]
    svg_raster_px: u32,

    /// Skip text rendering.
    #[arg(long, default_value_t = false)]
    no_text: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Document scroll offset in px.
    #[arg(long)]
    scroll: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    assets: AssetArgs,
}

#[derive(Parser, Debug)]
struct SweepOpts {
    /// Scroll distance between frames, in px.
    #[arg(long, default_value_t = 16.0)]
    step: f64,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Render chunk size.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Render identical pages once per chunk.
    #[arg(long, default_value_t = false)]
    static_frame_elision: bool,
}

impl SweepOpts {
    fn threading(&self) -> RenderThreading {
        RenderThreading {
            parallel: self.parallel,
            chunk_size: self.chunk_size,
            threads: self.threads,
            static_frame_elision: self.static_frame_elision,
        }
    }
}

#[derive(Parser, Debug)]
struct SweepArgs {
    /// Output directory for `frame_NNNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    #[command(flatten)]
    sweep: SweepOpts,

    #[command(flatten)]
    assets: AssetArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let registry = load_registry(cli.registry.as_deref())?;
    let config = load_config(cli.config.as_deref())?;
    // Visuals of a custom registry resolve next to it unless --assets says otherwise.
    let registry_dir = cli
        .registry
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf);

    match cli.cmd {
        Command::Sections => cmd_sections(&registry),
        Command::Signals(args) => cmd_signals(&registry, &config, args),
        Command::Html(args) => cmd_html(&registry, &config, args),
        Command::Frame(args) => cmd_frame(&registry, &config, registry_dir, args),
        Command::Sweep(args) => cmd_sweep(&registry, &config, registry_dir, args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_registry(path: Option<&Path>) -> anyhow::Result<SectionRegistry> {
    match path {
        Some(p) => SectionRegistry::from_path(p)
            .with_context(|| format!("load registry '{}'", p.display())),
        None => Ok(placescape::places_and_landscapes()?),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PageConfig> {
    let config = match path {
        Some(p) => {
            PageConfig::from_path(p).with_context(|| format!("load config '{}'", p.display()))?
        }
        None => PageConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn cmd_sections(registry: &SectionRegistry) -> anyhow::Result<()> {
    for (i, s) in registry.iter().enumerate() {
        println!(
            "{}  {:<14} {:<40} {}",
            placescape::index_label(i),
            s.id,
            s.title,
            s.visual_path()
        );
    }
    Ok(())
}

fn cmd_signals(
    registry: &SectionRegistry,
    config: &PageConfig,
    args: SignalsArgs,
) -> anyhow::Result<()> {
    let index = registry
        .index_of(&args.section)
        .with_context(|| format!("unknown section '{}'", args.section))?;

    let value = match (args.progress, args.scroll) {
        (Some(p), _) => {
            let progress = ScrollProgress::new(p);
            serde_json::json!({
                "section": args.section,
                "label": placescape::index_label(index),
                "progress": progress,
                "signals": config.policy.signals_at(progress),
            })
        }
        (None, Some(y)) => {
            let layout = PageLayout::compute(registry, config)?;
            let page = Evaluator::new(config).eval_page(&layout, y);
            let section = page
                .section(&args.section)
                .context("evaluated page is missing a registry section")?;
            serde_json::to_value(section)?
        }
        (None, None) => anyhow::bail!("either --progress or --scroll is required"),
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn cmd_html(registry: &SectionRegistry, config: &PageConfig, args: HtmlArgs) -> anyhow::Result<()> {
    let html = placescape::export_page(registry, config)?;
    ensure_parent(&args.out)?;
    std::fs::write(&args.out, html)
        .with_context(|| format!("write html '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

struct Scene {
    layout: PageLayout,
    evaluator: Evaluator,
    renderer: CpuRenderer,
}

fn prepare_scene(
    registry: &SectionRegistry,
    config: &PageConfig,
    registry_dir: Option<PathBuf>,
    assets: &AssetArgs,
) -> anyhow::Result<Scene> {
    let root = assets.assets.clone().or(registry_dir);
    let layout = PageLayout::compute(registry, config)?;
    let visuals = VisualStore::prepare(registry, root.as_deref(), assets.svg_raster_px)?;
    let settings = RenderSettings {
        svg_raster_px: assets.svg_raster_px,
        draw_text: !assets.no_text,
        ..RenderSettings::default()
    };
    let fontdb = settings
        .draw_text
        .then(|| placescape::build_fontdb(root.as_deref()));
    let renderer = CpuRenderer::with_fonts(registry, &layout, &visuals, settings, fontdb)?;
    Ok(Scene {
        evaluator: Evaluator::new(config),
        layout,
        renderer,
    })
}

fn cmd_frame(
    registry: &SectionRegistry,
    config: &PageConfig,
    registry_dir: Option<PathBuf>,
    args: FrameArgs,
) -> anyhow::Result<()> {
    let scene = prepare_scene(registry, config, registry_dir, &args.assets)?;
    let frame =
        placescape::render_frame(&scene.renderer, &scene.evaluator, &scene.layout, args.scroll)?;
    frame.save_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sweep(
    registry: &SectionRegistry,
    config: &PageConfig,
    registry_dir: Option<PathBuf>,
    args: SweepArgs,
) -> anyhow::Result<()> {
    let scene = prepare_scene(registry, config, registry_dir, &args.assets)?;
    let sweep = ScrollSweep::full(&scene.layout, args.sweep.step)?;
    let mut sink = PngSequenceSink::new(&args.out_dir);
    let stats = placescape::render_sweep_to_sink(
        &scene.renderer,
        &scene.evaluator,
        &scene.layout,
        sweep,
        &args.sweep.threading(),
        Fps::default(),
        &mut sink,
    )?;
    eprintln!(
        "wrote {} frames ({} rendered) to {}",
        stats.frames_total,
        stats.frames_rendered,
        args.out_dir.display()
    );
    Ok(())
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
