use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pathweave", version)]
struct Cli {
    /// Log decisions and degraded inputs to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample every visible layer and write the renderer payload.
    Export(ExportArgs),
    /// Generate a rise/plateau/fall opacity curve.
    Opacity(OpacityArgs),
    /// Change a document's output length, refitting box keyframes.
    Retarget(RetargetArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Samples per curved layer (default: from the document settings).
    #[arg(long)]
    frames: Option<usize>,

    /// Output payload path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct OpacityArgs {
    /// Number of frames.
    #[arg(long)]
    frames: usize,

    /// Rise and fall length in frames.
    #[arg(long)]
    overlap: usize,

    /// Easing mode (linear, in, out, in_out, out_in).
    #[arg(long, default_value = "linear")]
    easing: String,

    /// Curve bend; 0.5 leaves the eased curve unchanged.
    #[arg(long, default_value_t = 0.5)]
    remap_clamp: f64,

    /// Clamp `y` into [0, 1].
    #[arg(long, default_value_t = false)]
    clamped: bool,

    /// Output path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RetargetArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// New output length in frames.
    #[arg(long)]
    frames: u32,

    /// Output document path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Opacity(args) => cmd_opacity(args),
        Command::Retarget(args) => cmd_retarget(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "pathweave=debug" } else { "pathweave=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let doc = load(&args.in_path)?;
    let payload = pathweave::export_layers(&doc, args.frames);
    for d in &payload.diagnostics {
        eprintln!("warning: {}", serde_json::to_string(d)?);
    }
    let json = serde_json::to_string_pretty(&payload).context("serialize export payload")?;
    write_output(args.out.as_deref(), &json)
}

fn cmd_opacity(args: OpacityArgs) -> anyhow::Result<()> {
    let easing: pathweave::EaseMode = args
        .easing
        .parse()
        .with_context(|| format!("parse easing '{}'", args.easing))?;
    let mut curve =
        pathweave::generate_opacity(args.frames, args.overlap, easing, args.remap_clamp);
    if args.clamped {
        curve = curve.to_renderer();
    }
    let json = serde_json::to_string_pretty(&curve).context("serialize opacity curve")?;
    write_output(args.out.as_deref(), &json)
}

fn cmd_retarget(args: RetargetArgs) -> anyhow::Result<()> {
    let mut doc = load(&args.in_path)?;
    let decision = doc.retarget(args.frames);
    tracing::info!(?decision, max_frames = doc.max_frames, "retargeted");
    let json = doc.to_json()?;
    write_output(args.out.as_deref(), &json)
}

fn load(path: &Path) -> anyhow::Result<pathweave::Document> {
    let doc = pathweave::Document::from_path(path)
        .with_context(|| format!("load document '{}'", path.display()))?;
    doc.validate()
        .with_context(|| format!("validate document '{}'", path.display()))?;
    Ok(doc)
}

fn write_output(out: Option<&Path>, json: &str) -> anyhow::Result<()> {
    let Some(out) = out else {
        println!("{json}");
        return Ok(());
    };
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, json).with_context(|| format!("write '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}
