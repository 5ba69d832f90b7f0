use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "orrery", version, about = "Audio-reactive solar system renderer")]
struct Cli {
    /// Log progress to stderr (repeat for more detail).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render the whole track as an MP4 (requires `ffmpeg` on PATH) or a PNG sequence.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input track sheet JSON.
    #[arg(long)]
    track: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input track sheet JSON.
    #[arg(long)]
    track: PathBuf,

    /// Output MP4 path, or a directory when `--png-seq` is set.
    #[arg(long)]
    out: PathBuf,

    /// Write numbered PNG files instead of an MP4.
    #[arg(long)]
    png_seq: bool,

    /// Render frames on a worker pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel` (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames handed to the worker pool at a time.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Do not mux the track's audio into the MP4.
    #[arg(long)]
    no_audio: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Cpu,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_track(path: &std::path::Path) -> anyhow::Result<orrery::TrackSheet> {
    orrery::TrackSheet::from_path(path)
        .with_context(|| format!("load track sheet '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let track = load_track(&args.track)?;
    let session = orrery::RenderSession::new(track, orrery::RenderSessionOpts::default())?;

    let plan = session.plan_frame(orrery::FrameIndex(args.frame))?;
    let kind = match args.backend {
        BackendChoice::Cpu => orrery::BackendKind::Cpu,
    };
    let mut backend = orrery::create_backend(kind, session.backend_opts().clone())?;
    let frame = backend.render_plan(&plan)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let mut scratch = Vec::new();
    let data = orrery::encode::sink::straight_rgba8(&frame, &mut scratch)?;
    image::save_buffer_with_format(
        &args.out,
        data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let track = load_track(&args.track)?;
    let range = orrery::FrameRange::new(
        orrery::FrameIndex(0),
        orrery::FrameIndex(track.duration_frames()),
    )?;
    let opts = orrery::RenderSessionOpts {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
        enable_audio: !args.no_audio && !args.png_seq,
        ..Default::default()
    };
    let mut session = orrery::RenderSession::new(track, opts)?;

    let mut sink: Box<dyn orrery::FrameSink> = if args.png_seq {
        Box::new(orrery::PngSequenceSink::new(&args.out))
    } else {
        Box::new(orrery::FfmpegSink::new(orrery::FfmpegSinkOpts::new(&args.out)))
    };
    let stats = session.render_range(range, sink.as_mut())?;

    tracing::info!(frames = stats.frames_rendered, "render finished");
    eprintln!("wrote {} ({} frames)", args.out.display(), stats.frames_total);
    Ok(())
}
