//! mapsight CLI — operator frontend for the telemetry pipeline.
//!
//! Default build is headless: a batch run over an image directory that
//! writes the selected render target per image. The `gui` feature adds an
//! interactive window (enter = next image, space = cycle render mode,
//! esc = quit); the `capture` feature adds live device input.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use mapsight_core::{init_with_level, Controller, ImageSequence, MapScale, RenderMode};

mod batch;
#[cfg(feature = "capture")]
mod capture;
#[cfg(feature = "gui")]
mod window;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "mapsight")]
#[command(about = "Segment the marker/player color classes in a frame stream and inspect the mask and contour overlays")]
#[command(version)]
struct Cli {
    /// Directory of still images, or a single .png/.jpg file.
    #[arg(long, conflicts_with = "device")]
    images: Option<PathBuf>,

    /// Capture device index for live mode (requires --window and the
    /// `capture` feature).
    #[arg(long)]
    device: Option<u32>,

    /// Open an interactive window (requires the `gui` feature).
    #[arg(long)]
    window: bool,

    /// Output directory for the headless batch run.
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Artifact to render in the headless batch run.
    #[arg(long, value_enum, default_value_t = RenderArg::Contours)]
    render: RenderArg,

    /// Draw the map grid over every written artifact.
    #[arg(long)]
    grid: bool,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RenderArg {
    Image,
    Mask,
    Contours,
}

impl From<RenderArg> for RenderMode {
    fn from(arg: RenderArg) -> Self {
        match arg {
            RenderArg::Image => RenderMode::Image,
            RenderArg::Mask => RenderMode::Mask,
            RenderArg::Contours => RenderMode::Contours,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = init_with_level(cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    if cli.window {
        #[cfg(feature = "gui")]
        return run_window(cli);
        #[cfg(not(feature = "gui"))]
        return Err("built without gui support; rebuild with --features gui".into());
    }
    if cli.device.is_some() {
        return Err("--device requires --window".into());
    }

    let images = cli
        .images
        .as_deref()
        .ok_or("no source: pass --images <dir>, or --device <id> with --window")?;
    run_batch(cli, images)
}

fn run_batch(cli: &Cli, images: &Path) -> CliResult<()> {
    std::fs::create_dir_all(&cli.out)?;

    let source = ImageSequence::open(images)?;
    let mode = RenderMode::from(cli.render);
    log::info!("batch run: {} image(s), rendering {mode:?}", source.len());

    let input = batch::BatchInput::new();
    let sink = batch::FileSink::new(cli.out.clone(), cli.grid.then(MapScale::default));
    let mut controller = Controller::new(source, input, sink);
    controller.set_render_mode(mode);
    controller.run();
    Ok(())
}

#[cfg(feature = "gui")]
fn run_window(cli: &Cli) -> CliResult<()> {
    let shared = window::OperatorWindow::open("mapsight", mapsight_core::CAPTURE_SIZE)?;

    if let Some(device_id) = cli.device {
        #[cfg(feature = "capture")]
        {
            let source = capture::LiveCapture::open(device_id)?;
            Controller::new(source, shared.clone(), shared).run();
            return Ok(());
        }
        #[cfg(not(feature = "capture"))]
        {
            let _ = device_id;
            return Err("built without capture support; rebuild with --features capture".into());
        }
    }

    let images = cli
        .images
        .as_deref()
        .ok_or("no source: pass --images <dir> or --device <id>")?;
    let source = ImageSequence::open(images)?;
    Controller::new(source, shared.clone(), shared).run();
    Ok(())
}
