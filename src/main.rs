// What you SEE now:
// • The field around (x, y) at the given zoom, filling the window.
// • Arrow keys pan, +/- (or PageUp/PageDown) zoom. Held keys repeat.
// • The status line (top-left and window title) shows X, Y and ZOOM.
// • P saves the current frame as a PNG. ESC quits.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};

use zoomfield::draw::Drawer;
use zoomfield::snapshot;
use zoomfield::{
    BufferMode, Engine, EscapeTimeEngine, Palette, PixelBuffer, Surface, ViewportController,
    ViewportState,
};

/// Pan and zoom around an escape-time field.
#[derive(Parser)]
#[command(name = "zoomfield")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Initial centre x. Unparseable values fall back to -0.5.
    #[arg(long, allow_hyphen_values = true)]
    x: Option<String>,

    /// Initial centre y. Unparseable values fall back to 0.0.
    #[arg(long, allow_hyphen_values = true)]
    y: Option<String>,

    /// Initial zoom (> 0). Unparseable values fall back to 1.0.
    #[arg(long, allow_hyphen_values = true)]
    zoom: Option<String>,

    /// Window width in pixels, rounded down to whole cells.
    #[arg(long, default_value = "800")]
    width: usize,

    /// Window height in pixels, rounded down to whole cells.
    #[arg(long, default_value = "600")]
    height: usize,

    /// Window pixels per field cell, each way. The engine computes
    /// `floor(width / cell_size) x floor(height / cell_size)` cells.
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    cell_size: u32,

    /// What the engine emits per cell.
    #[arg(long, default_value = "scalar")]
    mode: ModeArg,

    /// Palette saturation (0-1).
    #[arg(long, default_value = "0.9")]
    saturation: f32,

    /// Palette lightness (0-1).
    #[arg(long, default_value = "0.5")]
    lightness: f32,

    /// Hue rotation added to every sample, in degrees.
    #[arg(long, default_value = "30", allow_hyphen_values = true)]
    offset: i32,

    /// Reverse the direction of every pan and zoom.
    #[arg(long)]
    invert_controls: bool,

    /// Hide the status text and centre crosshair.
    #[arg(long)]
    no_hud: bool,

    /// Render the initial view to this PNG and exit without opening a window.
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// One sample per cell, coloured here.
    Scalar,
    /// Engine colours the cells itself.
    Rgba,
}

impl From<ModeArg> for BufferMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Scalar => BufferMode::ScalarField,
            ModeArg::Rgba => BufferMode::DirectRgba,
        }
    }
}

/// Surface for `--snapshot`: keeps nothing, the frame is read back from the controller.
struct Headless;

impl Surface for Headless {
    fn present(&mut self, _frame: &PixelBuffer) -> Result<(), zoomfield::Error> {
        Ok(())
    }

    fn set_status(&mut self, status: &str) {
        info!(%status, "rendered");
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let initial =
        ViewportState::from_params(cli.x.as_deref(), cli.y.as_deref(), cli.zoom.as_deref());
    let palette = Palette::new(cli.saturation, cli.lightness, cli.offset);
    let cell_size = cli.cell_size as usize;
    let engine = EscapeTimeEngine::new(cli.width / cell_size, cli.height / cell_size, cli.mode.into())
        .context("creating engine")?;

    let mut controller = ViewportController::new(engine, palette, initial, cli.invert_controls);
    let grid = controller.engine().dimensions();
    info!(cells_x = grid.width, cells_y = grid.height, cell_size, %initial, "starting");

    if let Some(path) = cli.snapshot {
        controller.render(&mut Headless).context("rendering snapshot")?;
        snapshot::save_png(controller.frame(), cell_size, &path)
            .with_context(|| format!("writing {}", path.display()))?;
        return Ok(());
    }

    /* --- Window + first frame ---
       Visual: window opens already showing the initial view. */
    let mut drawer = Drawer::new("zoomfield", grid, cell_size, !cli.no_hud)?;
    controller.render(&mut drawer).context("rendering first frame")?;
    let mut snapshots = 0u32;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Navigation: each press is a full engine + composite + present cycle. */
        for cmd in drawer.commands() {
            if let Err(e) = controller.handle(cmd, &mut drawer) {
                // Only this frame is lost; the viewport already moved.
                error!(error = %e, ?cmd, "frame dropped");
            }
        }

        /* 2) Snapshot of what is on screen (without the HUD). */
        if drawer.snapshot_pressed_once() {
            let path = Path::new(".").join(format!("zoomfield-{snapshots}.png"));
            match snapshot::save_png(controller.frame(), cell_size, &path) {
                Ok(()) => snapshots += 1,
                Err(e) => error!(error = %e, "snapshot failed"),
            }
        }

        /* 3) Pump window events and redraw the overlay. */
        drawer.refresh()?;
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
