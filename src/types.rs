// Core types shared by the colour mapper, the compositor and the viewport.

use crate::error::Error;

/// Bytes per displayable pixel (R, G, B, A).
pub const RGBA_BYTES: usize = 4;

/// Surface size in cells. Fixed at startup; a resize means building a new pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of cells (one sample each in a scalar field).
    pub fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Byte length of a full RGBA frame.
    pub fn rgba_len(&self) -> usize {
        self.cells() * RGBA_BYTES
    }

    /// Byte length the engine must hand us in `mode`.
    pub fn raw_len(&self, mode: BufferMode) -> usize {
        match mode {
            BufferMode::DirectRgba => self.rgba_len(),
            BufferMode::ScalarField => self.cells(),
        }
    }
}

/// What the engine writes per cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferMode {
    /// Four display-ready bytes per cell; copied straight through.
    DirectRgba,
    /// One sample (0..=255) per cell; coloured by the palette.
    ScalarField,
}

/// RGB in [0,1] per channel. Stack-sized; never allocated per pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Opaque RGBA bytes. Channels are clamped first so 1.0000001 can't wrap to 0.
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [channel_byte(self.r), channel_byte(self.g), channel_byte(self.b), 255]
    }
}

#[inline]
fn channel_byte(c: f32) -> u8 {
    (255.0 * c.clamp(0.0, 1.0)) as u8
}

/// Palette tuning constants applied to every sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub saturation: f32,
    pub lightness: f32,
    /// Rotates the hue away from the reds at sample 0.
    pub offset: i32,
}

impl Palette {
    /// Saturation and lightness are clamped to [0,1]; NaN falls back to the default.
    pub fn new(saturation: f32, lightness: f32, offset: i32) -> Self {
        let d = Self::default();
        Self {
            saturation: unit_or(saturation, d.saturation),
            lightness: unit_or(lightness, d.lightness),
            offset,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self { saturation: 0.9, lightness: 0.5, offset: 30 }
    }
}

fn unit_or(v: f32, fallback: f32) -> f32 {
    if v.is_nan() { fallback } else { v.clamp(0.0, 1.0) }
}

/// Read-only view of the engine's buffer.
/// Borrowed from the engine, so it can't outlive the next `Engine::render` call.
#[derive(Clone, Copy, Debug)]
pub struct RawBuffer<'a> {
    pub mode: BufferMode,
    pub bytes: &'a [u8],
}

impl<'a> RawBuffer<'a> {
    pub fn new(mode: BufferMode, bytes: &'a [u8]) -> Self {
        Self { mode, bytes }
    }
}

/// Flat RGBA bytes, `width * height * 4` long, rewritten in place every frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    dims: Dimensions,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// All-zero (transparent black) frame.
    pub fn new(dims: Dimensions) -> Self {
        Self { dims, data: vec![0u8; dims.rgba_len()] }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// RGBA of the pixel at (x, y), or None outside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.dims.width || y >= self.dims.height {
            return None;
        }
        let i = (y * self.dims.width + x) * RGBA_BYTES;
        let px = &self.data[i..i + RGBA_BYTES];
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// What minifb wants: one 0x00RRGGBB word per pixel.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,     // how wide the frame is on screen (pixels)
    pub height: usize,    // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>, // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(dims: Dimensions) -> Self {
        Self {
            width: dims.width,
            height: dims.height,
            pixels: vec![0u32; dims.cells()],
        }
    }

    /// Pack an RGBA frame into 0x00RRGGBB words, one `cell_size` x `cell_size`
    /// block per frame pixel. Alpha is dropped; the window is opaque.
    pub fn copy_from(&mut self, frame: &PixelBuffer, cell_size: usize) -> Result<(), Error> {
        let grid = frame.dimensions();
        if cell_size == 0
            || self.width != grid.width * cell_size
            || self.height != grid.height * cell_size
        {
            return Err(Error::DimensionMismatch {
                mode: BufferMode::DirectRgba,
                expected: self.pixels.len() * RGBA_BYTES,
                actual: grid.rgba_len() * cell_size * cell_size,
            });
        }
        let src = frame.as_bytes();
        let row_bytes = grid.width * RGBA_BYTES;
        for (y, row) in self.pixels.chunks_exact_mut(self.width).enumerate() {
            let src_row = &src[(y / cell_size) * row_bytes..][..row_bytes];
            for (x, dst) in row.iter_mut().enumerate() {
                let px = &src_row[(x / cell_size) * RGBA_BYTES..][..RGBA_BYTES];
                *dst = ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            Dimensions::new(0, 4),
            Err(Error::InvalidDimensions { width: 0, height: 4 })
        ));
        assert!(Dimensions::new(3, 0).is_err());
    }

    #[test]
    fn raw_len_depends_on_mode() {
        let dims = Dimensions::new(3, 2).unwrap();
        assert_eq!(dims.raw_len(BufferMode::ScalarField), 6);
        assert_eq!(dims.raw_len(BufferMode::DirectRgba), 24);
    }

    #[test]
    fn color_bytes_are_clamped() {
        let c = Color::new(1.5, -0.2, 0.5);
        assert_eq!(c.to_rgba(), [255, 0, 127, 255]);
    }

    #[test]
    fn palette_clamps_unit_values() {
        let p = Palette::new(1.7, f32::NAN, -5);
        assert_eq!(p.saturation, 1.0);
        assert_eq!(p.lightness, 0.5);
        assert_eq!(p.offset, -5);
    }

    #[test]
    fn frame_buffer_packs_rgb_and_drops_alpha() {
        let dims = Dimensions::new(2, 1).unwrap();
        let mut pb = PixelBuffer::new(dims);
        pb.as_mut_bytes().copy_from_slice(&[0x12, 0x34, 0x56, 0xFF, 1, 2, 3, 0]);
        let mut fb = FrameBuffer::new(dims);
        fb.copy_from(&pb, 1).unwrap();
        assert_eq!(fb.pixels, vec![0x0012_3456, 0x0001_0203]);
    }

    #[test]
    fn cells_are_blown_up_into_blocks() {
        let grid = Dimensions::new(2, 2).unwrap();
        let mut pb = PixelBuffer::new(grid);
        pb.as_mut_bytes().copy_from_slice(&[
            1, 0, 0, 255, 2, 0, 0, 255, //
            3, 0, 0, 255, 4, 0, 0, 255,
        ]);
        let mut fb = FrameBuffer::new(Dimensions::new(4, 4).unwrap());
        fb.copy_from(&pb, 2).unwrap();
        let (a, b, c, d) = (0x0001_0000, 0x0002_0000, 0x0003_0000, 0x0004_0000);
        assert_eq!(
            fb.pixels,
            vec![
                a, a, b, b, //
                a, a, b, b, //
                c, c, d, d, //
                c, c, d, d,
            ]
        );
    }

    #[test]
    fn block_copy_rejects_a_window_that_is_not_a_whole_multiple() {
        let pb = PixelBuffer::new(Dimensions::new(2, 2).unwrap());
        let mut fb = FrameBuffer::new(Dimensions::new(5, 4).unwrap());
        assert!(matches!(fb.copy_from(&pb, 2), Err(Error::DimensionMismatch { .. })));
        let mut fb = FrameBuffer::new(Dimensions::new(2, 2).unwrap());
        assert!(fb.copy_from(&pb, 0).is_err());
    }

    #[test]
    fn pixel_lookup_is_bounds_checked() {
        let dims = Dimensions::new(2, 2).unwrap();
        let pb = PixelBuffer::new(dims);
        assert_eq!(pb.pixel(1, 1), Some([0, 0, 0, 0]));
        assert_eq!(pb.pixel(2, 0), None);
    }
}
