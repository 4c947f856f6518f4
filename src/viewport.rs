// Navigation state and the one entry point that moves it.
// Visual expectation: every accepted key press redraws the field around the
// new (x, y, zoom) and refreshes the status line; ignored presses change nothing.

use std::fmt;

use tracing::{debug, info, warn};

use crate::compositor::FrameCompositor;
use crate::engine::Engine;
use crate::error::Error;
use crate::types::{Palette, PixelBuffer};

/// Fraction of the current coordinate (or zoom) moved per key press.
pub const STEP: f64 = 0.1;

pub const DEFAULT_X: f64 = -0.5;
pub const DEFAULT_Y: f64 = 0.0;
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Where the engine is looking. `zoom` is always > 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self { x: DEFAULT_X, y: DEFAULT_Y, zoom: DEFAULT_ZOOM }
    }
}

impl ViewportState {
    /// Build the initial state from optional raw parameters.
    /// Anything missing or unusable quietly becomes its default.
    pub fn from_params(x: Option<&str>, y: Option<&str>, zoom: Option<&str>) -> Self {
        Self {
            x: param_or_default("x", x, DEFAULT_X),
            y: param_or_default("y", y, DEFAULT_Y),
            zoom: param_or_default("zoom", zoom, DEFAULT_ZOOM),
        }
    }

    /// What `cmd` would change, before anything is applied.
    ///
    /// Pans move by `STEP / zoom` of the coordinate itself, so they shrink to
    /// nothing as x or y approaches 0.
    pub fn delta(&self, cmd: Command, invert_controls: bool) -> Delta {
        let pan = STEP / self.zoom;
        let mut d = match cmd {
            Command::PanLeft => Delta { dx: pan * self.x, ..Delta::ZERO },
            Command::PanRight => Delta { dx: -pan * self.x, ..Delta::ZERO },
            Command::PanUp => Delta { dy: pan * self.y, ..Delta::ZERO },
            Command::PanDown => Delta { dy: -pan * self.y, ..Delta::ZERO },
            Command::ZoomIn => Delta { dzoom: STEP * self.zoom, ..Delta::ZERO },
            Command::ZoomOut => Delta { dzoom: -STEP * self.zoom, ..Delta::ZERO },
        };
        if invert_controls {
            d = d.negated();
        }
        d
    }

    pub fn apply(&self, d: Delta) -> Self {
        Self { x: self.x + d.dx, y: self.y + d.dy, zoom: self.zoom + d.dzoom }
    }

    fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.zoom.is_finite() && self.zoom > 0.0
    }
}

impl fmt::Display for ViewportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X: {}  Y: {}  ZOOM: {}", self.x, self.y, self.zoom)
    }
}

/// Parse one navigation parameter. `None` means "not given" and is not an error.
pub fn parse_param(name: &'static str, raw: Option<&str>, default: f64) -> Result<f64, Error> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let invalid = || Error::InvalidParameter { name, value: raw.to_string() };
    let v: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !v.is_finite() || (name == "zoom" && v <= 0.0) {
        return Err(invalid());
    }
    Ok(v)
}

fn param_or_default(name: &'static str, raw: Option<&str>, default: f64) -> f64 {
    parse_param(name, raw, default).unwrap_or_else(|e| {
        warn!(error = %e, default, "using default navigation parameter");
        default
    })
}

/// The six things a key press can ask for. Keys are translated by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    ZoomIn,
    ZoomOut,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Delta {
    pub dx: f64,
    pub dy: f64,
    pub dzoom: f64,
}

impl Delta {
    pub const ZERO: Delta = Delta { dx: 0.0, dy: 0.0, dzoom: 0.0 };

    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0 && self.dzoom == 0.0
    }

    pub fn negated(self) -> Self {
        Self { dx: -self.dx, dy: -self.dy, dzoom: -self.dzoom }
    }
}

/// Where frames and the status line go.
pub trait Surface {
    fn present(&mut self, frame: &PixelBuffer) -> Result<(), Error>;

    fn set_status(&mut self, status: &str);
}

/// Result of `ViewportController::handle`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transition {
    /// Zero delta (or a move that would break `zoom > 0`); nothing was called.
    Ignored,
    /// State moved by `delta` and a new frame went out.
    Rendered { delta: Delta },
}

/// Owns the viewport, the engine and the output frame. One per surface.
pub struct ViewportController<E: Engine> {
    state: ViewportState,
    invert_controls: bool,
    engine: E,
    compositor: FrameCompositor,
    frame: PixelBuffer,
}

impl<E: Engine> ViewportController<E> {
    pub fn new(engine: E, palette: Palette, initial: ViewportState, invert_controls: bool) -> Self {
        let dims = engine.dimensions();
        let state = if initial.is_valid() {
            initial
        } else {
            warn!(?initial, "initial viewport out of range; using defaults");
            ViewportState::default()
        };
        Self {
            state,
            invert_controls,
            engine,
            compositor: FrameCompositor::new(dims, palette),
            frame: PixelBuffer::new(dims),
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Last composited frame.
    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    /// Full cycle at the current state: engine, composite, present, status.
    /// Used for the first frame and by `handle`.
    pub fn render(&mut self, surface: &mut dyn Surface) -> Result<(), Error> {
        let ViewportState { x, y, zoom } = self.state;
        self.engine.render(x, y, zoom);
        let raw = self.engine.buffer();
        let declared = self.engine.mode();
        if raw.mode != declared {
            return Err(Error::ModeMismatch { declared, actual: raw.mode });
        }
        self.compositor.composite_into(raw, &mut self.frame)?;
        // `raw` is not touched past this point; the next engine render may overwrite it.
        surface.present(&self.frame)?;
        surface.set_status(&self.state.to_string());
        Ok(())
    }

    /// Apply one command. The new state sticks even if the redraw fails.
    pub fn handle(&mut self, cmd: Command, surface: &mut dyn Surface) -> Result<Transition, Error> {
        let delta = self.state.delta(cmd, self.invert_controls);
        if delta.is_zero() {
            debug!(?cmd, "zero delta; ignoring");
            return Ok(Transition::Ignored);
        }
        let next = self.state.apply(delta);
        if !next.is_valid() {
            debug!(?cmd, ?next, "move leaves valid range; ignoring");
            return Ok(Transition::Ignored);
        }

        self.state = next;
        info!(?cmd, x = next.x, y = next.y, zoom = next.zoom, "viewport moved");
        self.render(surface)?;
        Ok(Transition::Rendered { delta })
    }
}
