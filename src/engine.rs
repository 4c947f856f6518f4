// The field provider. The pipeline only sees the `Engine` trait; what fills the
// buffer is the engine's business.

use std::time::Instant;

use tracing::debug;

use crate::color;
use crate::error::Error;
use crate::types::{BufferMode, Dimensions, RawBuffer, RGBA_BYTES};

/// Something that recomputes a field for a viewport into memory it owns.
///
/// `buffer` borrows that memory, so the borrow checker refuses to keep a view
/// alive across the next `render` (which takes `&mut self`).
pub trait Engine {
    fn dimensions(&self) -> Dimensions;

    fn mode(&self) -> BufferMode;

    /// Recompute the whole field centred on (x, y) at `zoom`.
    fn render(&mut self, x: f64, y: f64, zoom: f64);

    /// View of the last rendered field.
    fn buffer(&self) -> RawBuffer<'_>;
}

const MAX_ITERATIONS: u8 = 255;

/// Escape-time iteration count per cell.
/// Stand-in provider so the binary has something to look at.
pub struct EscapeTimeEngine {
    dims: Dimensions,
    mode: BufferMode,
    memory: Vec<u8>,
}

impl EscapeTimeEngine {
    pub fn new(width: usize, height: usize, mode: BufferMode) -> Result<Self, Error> {
        let dims = Dimensions::new(width, height)?;
        Ok(Self { dims, mode, memory: vec![0u8; dims.raw_len(mode)] })
    }

    /// Iterations before |z| leaves radius 2, capped at `MAX_ITERATIONS - 1`.
    fn escape_count(cx: f64, cy: f64) -> u8 {
        let (mut zr, mut zi) = (0.0f64, 0.0f64);
        let mut count = 0u8;
        for i in 0..MAX_ITERATIONS {
            // |z|^2 > 4 is the same test as |z| > 2 without the sqrt
            if zr * zr + zi * zi > 4.0 {
                break;
            }
            let t = zr * zr - zi * zi + cx;
            zi = 2.0 * zr * zi + cy;
            zr = t;
            count = i;
        }
        count
    }
}

impl Engine for EscapeTimeEngine {
    fn dimensions(&self) -> Dimensions {
        self.dims
    }

    fn mode(&self) -> BufferMode {
        self.mode
    }

    fn render(&mut self, x: f64, y: f64, zoom: f64) {
        let start = Instant::now();

        // 4 x 3 units of the plane at zoom 1
        let cxmin = x - 2.0 / zoom;
        let cymin = y - 1.5 / zoom;
        let scalex = (4.0 / zoom) / self.dims.width as f64;
        let scaley = (3.0 / zoom) / self.dims.height as f64;

        let width = self.dims.width;
        let cell_bytes = match self.mode {
            BufferMode::ScalarField => 1,
            BufferMode::DirectRgba => RGBA_BYTES,
        };
        for (idx, cell) in self.memory.chunks_exact_mut(cell_bytes).enumerate() {
            let cx = cxmin + (idx % width) as f64 * scalex;
            let cy = cymin + (idx / width) as f64 * scaley;
            let count = Self::escape_count(cx, cy);
            match self.mode {
                BufferMode::ScalarField => cell[0] = count,
                BufferMode::DirectRgba => {
                    cell.copy_from_slice(&color::map(count, 1.0, 0.5, 30).to_rgba());
                }
            }
        }

        debug!(
            x,
            y,
            zoom,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "engine rendered field"
        );
    }

    fn buffer(&self) -> RawBuffer<'_> {
        RawBuffer::new(self.mode, &self.memory)
    }
}
