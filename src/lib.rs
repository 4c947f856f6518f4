//! Pan/zoom viewer for a scalar field computed by an external engine.
//!
//! Per key press: [`ViewportController`] moves the viewport, asks the
//! [`Engine`] for a fresh buffer, [`FrameCompositor`] turns it into RGBA
//! (copying it, or colouring one sample per cell through the HSL palette),
//! and the [`Surface`] shows the frame and the new status line.

pub mod color;
pub mod compositor;
pub mod draw;
pub mod engine;
pub mod error;
pub mod lut;
pub mod snapshot;
pub mod types;
pub mod viewport;

pub use compositor::FrameCompositor;
pub use engine::{Engine, EscapeTimeEngine};
pub use error::Error;
pub use lut::PaletteLut;
pub use types::{BufferMode, Color, Dimensions, FrameBuffer, Palette, PixelBuffer, RawBuffer};
pub use viewport::{Command, Delta, Surface, Transition, ViewportController, ViewportState};
