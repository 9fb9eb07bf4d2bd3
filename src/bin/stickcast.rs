use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "stickcast", version)]
struct Cli {
    /// Log more (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Strip annotations from a script, producing the aligner transcript.
    Transcript(TranscriptArgs),
    /// Build the schedule artifact from a script and its alignment.
    Schedule(ScheduleArgs),
    /// Render every frame of a schedule as a PNG sequence.
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Mux a PNG sequence with narration audio into an MP4 (requires `ffmpeg` on PATH).
    Finish(FinishArgs),
}

#[derive(Parser, Debug)]
struct TranscriptArgs {
    /// Annotated script.
    #[arg(long)]
    script: PathBuf,

    /// Output text file; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ScheduleArgs {
    /// Annotated script.
    #[arg(long)]
    script: PathBuf,

    /// Aligner JSON output.
    #[arg(long)]
    alignment: PathBuf,

    /// Output schedule artifact.
    #[arg(long)]
    out: PathBuf,

    /// Character rig JSON; the stock rig when omitted.
    #[arg(long)]
    rig: Option<PathBuf>,

    /// Pose RNG seed; derived from the clock when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyChoice {
    Discrete,
    JigglePhase,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Schedule artifact.
    #[arg(long)]
    schedule: PathBuf,

    /// Character rig JSON.
    #[arg(long)]
    rig: PathBuf,

    /// Output directory for `f%06d.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Squash-and-stretch the body around pose changes.
    #[arg(long)]
    jiggle: bool,

    /// Render every frame instead of copying repeated ones.
    #[arg(long)]
    no_cache: bool,

    /// What makes two frames identical.
    #[arg(long, value_enum, default_value_t = PolicyChoice::Discrete)]
    signature: PolicyChoice,

    /// Render unique frames on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    /// Frames planned per parallel batch.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Schedule artifact.
    #[arg(long)]
    schedule: PathBuf,

    /// Character rig JSON.
    #[arg(long)]
    rig: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Squash-and-stretch the body around pose changes.
    #[arg(long)]
    jiggle: bool,
}

#[derive(Parser, Debug)]
struct FinishArgs {
    /// Directory holding the rendered PNG sequence.
    #[arg(long)]
    frames_dir: PathBuf,

    /// Narration audio.
    #[arg(long)]
    audio: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Character rig JSON, read for its frame rate.
    #[arg(long)]
    rig: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Transcript(args) => cmd_transcript(args),
        Command::Schedule(args) => cmd_schedule(args),
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Finish(args) => cmd_finish(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn load_rig(path: Option<&Path>) -> anyhow::Result<stickcast::RigConfig> {
    match path {
        Some(p) => Ok(stickcast::RigConfig::from_path(p)?),
        None => Ok(stickcast::RigConfig::default()),
    }
}

fn load_timeline(
    schedule: &Path,
    rig: &stickcast::RigConfig,
) -> anyhow::Result<stickcast::Timeline> {
    let schedule = stickcast::Schedule::from_path(schedule)?;
    Ok(stickcast::compile_timeline(&schedule, rig.timeline_opts())?)
}

fn cmd_transcript(args: TranscriptArgs) -> anyhow::Result<()> {
    let script = read_text(&args.script)?;
    let transcript = stickcast::aligner_transcript(&script);
    match args.out {
        Some(out) => {
            stickcast::ensure_parent_dir(&out)?;
            std::fs::write(&out, transcript)
                .with_context(|| format!("write '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{transcript}"),
    }
    Ok(())
}

fn cmd_schedule(args: ScheduleArgs) -> anyhow::Result<()> {
    let rig = load_rig(args.rig.as_deref())?;
    let script = read_text(&args.script)?;
    let alignment = stickcast::Alignment::from_path(&args.alignment)?;

    let seed = args.seed.unwrap_or_else(clock_seed);
    tracing::info!(seed, "picking poses");
    let mut rng = stickcast::Rng64::new(seed);

    let out = stickcast::build_schedule(&script, &alignment, &rig.schedule_opts(), &mut rng)?;
    out.schedule.write_path(&args.out)?;
    eprintln!(
        "wrote {} ({} warnings)",
        args.out.display(),
        out.warnings.len()
    );
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let rig = load_rig(Some(&args.rig))?;
    let timeline = load_timeline(&args.schedule, &rig)?;
    let assets = stickcast::CharacterAssets::load(&rig)?;

    let opts = stickcast::RenderOpts {
        jiggle: args.jiggle,
        frame_caching: !args.no_cache,
        signature_policy: match args.signature {
            PolicyChoice::Discrete => stickcast::SignaturePolicy::DiscreteOnly,
            PolicyChoice::JigglePhase => stickcast::SignaturePolicy::WithJigglePhase,
        },
        parallel: args.parallel,
        threads: args.threads,
        chunk_size: args.chunk_size,
    };
    let mut sink = stickcast::PngSequenceSink::new(&args.out_dir);
    let stats = stickcast::render_timeline(&timeline, &assets, rig.jiggle, &opts, &mut sink)?;

    eprintln!(
        "wrote {} frames to {} ({} rendered, {} copied)",
        stats.frames_total,
        args.out_dir.display(),
        stats.frames_rendered,
        stats.frames_elided
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let rig = load_rig(Some(&args.rig))?;
    let timeline = load_timeline(&args.schedule, &rig)?;
    let assets = stickcast::CharacterAssets::load(&rig)?;

    let state = timeline.state_at(stickcast::FrameIndex(args.frame))?;
    let renderer = stickcast::FrameRenderer::new(&assets, args.jiggle.then_some(rig.jiggle));
    let frame = renderer.render(&state)?;
    stickcast::write_png(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_finish(args: FinishArgs) -> anyhow::Result<()> {
    let rig = load_rig(args.rig.as_deref())?;
    let opts = stickcast::FinishOpts::new(&args.frames_dir, &args.audio, &args.out, rig.fps);
    stickcast::finish_video(&opts)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
