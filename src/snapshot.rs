//! PNG export of a composited frame.

use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};
use tracing::info;

use crate::error::Error;
use crate::types::{BufferMode, PixelBuffer, RGBA_BYTES};

/// Copy a frame into an `RgbaImage`, one `cell_size` x `cell_size` block per frame pixel.
pub fn to_image(frame: &PixelBuffer, cell_size: usize) -> Result<RgbaImage, Error> {
    let dims = frame.dimensions();
    let too_big = || Error::DimensionMismatch {
        mode: BufferMode::DirectRgba,
        expected: dims.rgba_len().saturating_mul(cell_size).saturating_mul(cell_size),
        actual: frame.as_bytes().len(),
    };
    let side = |cells: usize| -> Result<u32, Error> {
        let px = cells.checked_mul(cell_size).filter(|&px| px > 0).ok_or_else(too_big)?;
        u32::try_from(px).map_err(|_| too_big())
    };
    let (width, height) = (side(dims.width)?, side(dims.height)?);

    let cell = cell_size as u32;
    let src = frame.as_bytes();
    Ok(ImageBuffer::from_fn(width, height, |x, y| {
        let i = ((y / cell) as usize * dims.width + (x / cell) as usize) * RGBA_BYTES;
        Rgba([src[i], src[i + 1], src[i + 2], src[i + 3]])
    }))
}

/// Write `frame` as an 8-bit RGBA PNG at window resolution. The format comes from the extension.
pub fn save_png(frame: &PixelBuffer, cell_size: usize, path: &Path) -> Result<(), Error> {
    to_image(frame, cell_size)?.save(path)?;
    info!(path = %path.display(), cell_size, "saved snapshot");
    Ok(())
}
