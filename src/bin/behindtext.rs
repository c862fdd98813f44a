use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use behindtext::{
    EditorSession, ExportOpts, FfmpegRecorder, FixedStepScheduler, Fps, ProjectFile, StillFormat,
};

#[derive(Parser, Debug)]
#[command(name = "behindtext", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the composition as a PNG or JPEG still.
    Still(StillArgs),
    /// Render the animated composition as an MP4 video (requires `ffmpeg` on PATH).
    Video(VideoArgs),
}

#[derive(Parser, Debug)]
struct StillArgs {
    /// Project JSON.
    #[arg(long)]
    project: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Image format.
    #[arg(long, value_enum, default_value_t = FormatChoice::Png)]
    format: FormatChoice,
}

#[derive(Parser, Debug)]
struct VideoArgs {
    /// Project JSON.
    #[arg(long)]
    project: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Jpeg,
}

impl From<FormatChoice> for StillFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Png => StillFormat::Png,
            FormatChoice::Jpeg => StillFormat::Jpeg,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let res = match cli.cmd {
        Command::Still(args) => cmd_still(args),
        Command::Video(args) => cmd_video(args),
    };
    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_session(project: &Path) -> anyhow::Result<EditorSession> {
    let project = ProjectFile::from_path(project)
        .with_context(|| format!("load project '{}'", project.display()))?;
    Ok(EditorSession::from_project(&project)?)
}

fn cmd_still(args: StillArgs) -> anyhow::Result<()> {
    let mut session = load_session(&args.project)?;
    let bytes = session.render_still(args.format.into())?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write image '{}'", args.out.display()))?;

    for w in session.renderer().warnings() {
        eprintln!("warning: {w}");
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_video(args: VideoArgs) -> anyhow::Result<()> {
    let fps = Fps::new(args.fps, 1)?;
    let mut session = load_session(&args.project)?.with_export_opts(ExportOpts {
        fps,
        ..ExportOpts::default()
    });

    let mut recorder = FfmpegRecorder::new(&args.out);
    let mut scheduler = FixedStepScheduler::new(fps);
    let video = session
        .export_video(&mut recorder, &mut scheduler)?
        .context("nothing to export: the project has no background image")?;

    for w in session.renderer().warnings() {
        eprintln!("warning: {w}");
    }
    eprintln!(
        "wrote {} ({} frames, {:.2}s)",
        args.out.display(),
        video.frames,
        video.duration_secs()
    );
    Ok(())
}
