use std::path::{Path, PathBuf};

use anyhow::Context as _;
use choreo::{
    AssetProvider, CpuSurface, GuidanceConfig, GuidanceSequence, NoiseParams, Palette,
    PlaybackConfig, PlaybackController, PreparedAssetStore, RecordingOverlay, RewardTable,
    Sequence, StageId, TradeoffConfig, TradeoffSequence, TrainingConfig, TrainingSequence,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "choreo", version)]
struct Cli {
    /// Log to stderr (filter with `RUST_LOG`, default `info`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print the anchor set for a container width as JSON.
    Anchors(AnchorsArgs),
    /// Print the stage table.
    Timeline(TimelineArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SequenceChoice {
    Guidance,
    Training,
    Tradeoff,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[arg(long, value_enum)]
    sequence: SequenceChoice,

    /// Elapsed loop time in milliseconds.
    #[arg(long)]
    at_ms: f64,

    /// Host container width in pixels.
    #[arg(long, default_value_t = 960.0)]
    width: f64,

    /// Sequence config JSON; omitted fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Asset root directory. Without it every image is a placeholder.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Reward CSV for the tradeoff sequence (overrides the configured path).
    #[arg(long)]
    rewards: Option<PathBuf>,

    /// Use the light palette.
    #[arg(long)]
    light: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct AnchorsArgs {
    #[arg(long, value_enum)]
    sequence: SequenceChoice,

    #[arg(long, default_value_t = 960.0)]
    width: f64,

    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TimelineArgs {
    #[arg(long, value_enum)]
    sequence: SequenceChoice,

    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();
    }
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Anchors(args) => cmd_anchors(args),
        Command::Timeline(args) => cmd_timeline(args),
    }
}

fn read_config<T>(path: Option<&Path>) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read config '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse config '{}'", path.display()))
}

fn guidance(path: Option<&Path>) -> anyhow::Result<GuidanceSequence> {
    Ok(GuidanceSequence::new(read_config::<GuidanceConfig>(path)?)?)
}

fn training(path: Option<&Path>) -> anyhow::Result<TrainingSequence> {
    Ok(TrainingSequence::new(read_config::<TrainingConfig>(path)?)?)
}

fn tradeoff(path: Option<&Path>) -> anyhow::Result<TradeoffSequence> {
    Ok(TradeoffSequence::new(read_config::<TradeoffConfig>(path)?)?)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = args.config.as_deref();
    let root = args.assets.clone().unwrap_or_else(|| PathBuf::from("."));
    let mut assets = PreparedAssetStore::new(root);

    match args.sequence {
        SequenceChoice::Guidance => {
            let seq = guidance(config)?;
            let images = &seq.config().images;
            if args.assets.is_some() {
                assets.preload([
                    images.input.as_str(),
                    images.high.as_str(),
                    images.low.as_str(),
                    images.final_output.as_str(),
                ]);
            }
            let noise = seq.config().noise;
            render_frame(seq, noise, &args, &assets)
        }
        SequenceChoice::Training => {
            let seq = training(config)?;
            if args.assets.is_some() {
                assets.preload([seq.config().image.as_str()]);
            }
            let noise = seq.config().noise;
            render_frame(seq, noise, &args, &assets)
        }
        SequenceChoice::Tradeoff => {
            let mut seq = tradeoff(config)?;
            if let Some(csv) = &args.rewards {
                match RewardTable::from_path(csv, seq.config().reward_count()) {
                    Ok(table) => seq = seq.with_rewards(table),
                    Err(err) => {
                        tracing::warn!(%err, "reward table unavailable; using neutral rewards")
                    }
                }
            } else if let Some(root) = &args.assets {
                if let Err(err) = seq.load_rewards(root) {
                    tracing::warn!(%err, "reward table unavailable; using neutral rewards");
                }
            }
            if args.assets.is_some() {
                let frame = seq.frame_at(args.at_ms);
                seq.prefetch(&mut assets, frame);
            }
            render_frame(seq, NoiseParams::default(), &args, &assets)
        }
    }
}

fn render_frame<Q: Sequence>(
    seq: Q,
    noise: NoiseParams,
    args: &FrameArgs,
    assets: &dyn AssetProvider,
) -> anyhow::Result<()> {
    let palette = if args.light {
        Palette::light()
    } else {
        Palette::default()
    };
    let controller = PlaybackController::new(seq, PlaybackConfig::default(), args.width)?;
    let plan = controller.render_at(args.at_ms, &palette, assets)?;

    let mut overlay = RecordingOverlay::default();
    controller.present(&plan, &mut overlay);
    for (label, state) in overlay.visible() {
        tracing::info!(
            label,
            x = state.position.x,
            y = state.position.y,
            opacity = state.opacity,
            "overlay"
        );
    }

    let mut surface = CpuSurface::new(plan.surface, noise)?;
    let frame = choreo::render_plan(&mut surface, &plan, palette.bg, assets)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} stage, {}x{})",
        args.out.display(),
        plan.stage,
        frame.width,
        frame.height
    );
    Ok(())
}

fn cmd_anchors(args: AnchorsArgs) -> anyhow::Result<()> {
    let config = args.config.as_deref();
    match args.sequence {
        SequenceChoice::Guidance => print_anchors(&guidance(config)?, args.width),
        SequenceChoice::Training => print_anchors(&training(config)?, args.width),
        SequenceChoice::Tradeoff => print_anchors(&tradeoff(config)?, args.width),
    }
}

fn print_anchors<Q: Sequence>(seq: &Q, width: f64) -> anyhow::Result<()> {
    let (surface, breakpoint) = seq.surface_for_container(width)?;
    let anchors = seq.layout().compute_anchors(surface, breakpoint);
    println!("{}", serde_json::to_string_pretty(&anchors)?);
    Ok(())
}

fn cmd_timeline(args: TimelineArgs) -> anyhow::Result<()> {
    let config = args.config.as_deref();
    match args.sequence {
        SequenceChoice::Guidance => print_timeline(&guidance(config)?),
        SequenceChoice::Training => print_timeline(&training(config)?),
        SequenceChoice::Tradeoff => print_timeline(&tradeoff(config)?),
    }
    Ok(())
}

fn print_timeline<Q: Sequence>(seq: &Q) {
    let timeline = seq.timeline();
    println!("{:<22} {:>9} {:>9}  handler", "stage", "start_ms", "dur_ms");
    for (i, stage) in timeline.stages().iter().enumerate() {
        println!(
            "{:<22} {:>9} {:>9}  {:?}",
            stage.id.name(),
            timeline.start_of(i).unwrap_or_default(),
            stage.duration_ms,
            seq.handler_for(stage.id),
        );
    }
    println!("{:<22} {:>9}", "total", timeline.total_ms());
}
