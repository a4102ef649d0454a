use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::{SeedableRng, rngs::StdRng};

#[derive(Parser, Debug)]
#[command(name = "gifwright", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a confetti and sparkle burst to an optimized GIF.
    Confetti(ConfettiArgs),
    /// Probe an existing GIF and check it against a profile.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct ConfettiArgs {
    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Optimize for the emoji profile (128x128, 64 KiB).
    #[arg(long)]
    emoji: bool,

    /// Canvas width.
    #[arg(long, default_value_t = 480)]
    width: u32,

    /// Canvas height.
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Frames per second.
    #[arg(long, default_value_t = 20)]
    fps: u32,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 40)]
    frames: usize,

    /// Random seed for the particle bursts.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Palette size (overrides `--opts`).
    #[arg(long)]
    colors: Option<u16>,

    /// Screen shake intensity in pixels during the first frames.
    #[arg(long, default_value_t = 0)]
    shake: u32,

    /// Motion blur amount in `[0, 1]`.
    #[arg(long, default_value_t = 0.0)]
    blur: f64,

    /// Save options as JSON.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// GIF to inspect.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Check against the emoji profile instead of the message profile.
    #[arg(long)]
    emoji: bool,

    /// Print the validation report as JSON.
    #[arg(long)]
    json: bool,
}

const BACKGROUND: gifwright::Rgb8 = gifwright::Rgb8::new(18, 20, 28);
const SHAKE_FRAMES: usize = 6;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Confetti(args) => cmd_confetti(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_opts_json(path: &Path) -> anyhow::Result<gifwright::SaveOpts> {
    let f = File::open(path).with_context(|| format!("open save options '{}'", path.display()))?;
    let opts = serde_json::from_reader(BufReader::new(f)).with_context(|| "parse save options JSON")?;
    Ok(opts)
}

fn cmd_confetti(args: ConfettiArgs) -> anyhow::Result<()> {
    let mut opts = match &args.opts {
        Some(p) => read_opts_json(p)?,
        None => gifwright::SaveOpts::default(),
    };
    if args.emoji {
        opts.profile = gifwright::Profile::Emoji;
    }
    if let Some(c) = args.colors {
        opts.colors = c;
    }

    let fps = gifwright::Fps::whole(args.fps)?;
    let mut seq = gifwright::FrameSequence::new(args.width, args.height, fps)?;
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut system = gifwright::ParticleSystem::new();

    let (w, h) = (f64::from(args.width), f64::from(args.height));
    let burst = gifwright::Point::new(w / 2.0, h * 0.6);
    let confetti_count = ((args.width.min(args.height) / 8) as usize).max(10);
    system.emit_confetti(&mut rng, burst, confetti_count, &[]);

    let mut prev: Option<gifwright::FrameRgb> = None;
    for i in 0..args.frames {
        if i % 5 == 0 {
            system.emit_sparkles(&mut rng, burst, 8);
        }
        let mut frame = gifwright::FrameRgb::filled(args.width, args.height, BACKGROUND);
        system.render(&mut frame)?;
        if args.shake > 0 && i < SHAKE_FRAMES {
            let mut shake = gifwright::shake_rng(args.seed, i as u64);
            frame = gifwright::apply_screen_shake(&frame, &mut shake, args.shake);
        }
        if args.blur > 0.0 {
            frame = gifwright::motion_blur(&frame, prev.as_ref(), args.blur)?;
            prev = Some(frame.clone());
        }
        seq.add_frame(frame)?;
        system.update();
    }

    let report = seq.save(&args.out, &opts)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(r: &gifwright::GifReport) {
    if let Some(p) = &r.path {
        println!("wrote {}", p.display());
    }
    println!(
        "  {}x{}, {} frames ({} duplicates removed of {}), {:.1} fps, {:.2}s",
        r.width,
        r.height,
        r.frame_count,
        r.removed_duplicates,
        r.original_frame_count,
        r.fps,
        r.duration_secs
    );
    println!(
        "  {:.1} KB of {:.1} KB {} budget, {} colors: {}",
        r.size_kb,
        r.limit_bytes as f64 / 1024.0,
        r.profile.name(),
        r.colors,
        if r.passes { "ok" } else { "over budget" }
    );
    for w in &r.warnings {
        println!("  warning: {w}");
    }
    for s in &r.suggestions {
        println!("  - {s}");
    }
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let profile = if args.emoji {
        gifwright::OptimizationProfile::emoji()
    } else {
        gifwright::OptimizationProfile::message()
    };
    let report = gifwright::validate_gif(&args.in_path, &profile)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let p = &report.probe;
    println!("{}", args.in_path.display());
    println!(
        "  {}x{}, {} frames, {:.2}s, {}",
        p.width,
        p.height,
        p.frame_count,
        p.duration_secs,
        if p.loops_forever { "loops" } else { "plays once" }
    );
    if let Some(fps) = p.fps {
        println!("  {fps:.1} fps");
    }
    println!(
        "  {:.1} KB of {:.1} KB, dimensions {:?}: {}",
        report.size.size_kb(),
        report.size.limit_kb(),
        report.dimensions.fit,
        if report.passes { "pass" } else { "fail" }
    );
    for s in &report.suggestions {
        println!("  - {s}");
    }
    Ok(())
}
