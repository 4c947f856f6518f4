// Engine buffer -> displayable RGBA.
// Two paths: a straight copy when the engine already speaks RGBA, and a
// palette lookup per cell when it hands us one sample per cell.

use std::time::Instant;

use tracing::debug;

use crate::error::Error;
use crate::lut::PaletteLut;
use crate::types::{BufferMode, Dimensions, Palette, PixelBuffer, RawBuffer, RGBA_BYTES};

/// Holds nothing between frames except the palette table.
pub struct FrameCompositor {
    dims: Dimensions,
    lut: PaletteLut,
}

impl FrameCompositor {
    pub fn new(dims: Dimensions, palette: Palette) -> Self {
        Self { dims, lut: PaletteLut::new(palette) }
    }

    /// Composite into a fresh buffer.
    pub fn composite(&self, raw: RawBuffer<'_>) -> Result<PixelBuffer, Error> {
        let mut out = PixelBuffer::new(self.dims);
        self.composite_into(raw, &mut out)?;
        Ok(out)
    }

    /// Composite into `out`, overwriting every byte.
    ///
    /// Both lengths are checked before anything is written, so a mismatch
    /// leaves `out` exactly as it was.
    pub fn composite_into(&self, raw: RawBuffer<'_>, out: &mut PixelBuffer) -> Result<(), Error> {
        let expected = self.dims.raw_len(raw.mode);
        if raw.bytes.len() != expected {
            return Err(Error::DimensionMismatch {
                mode: raw.mode,
                expected,
                actual: raw.bytes.len(),
            });
        }
        let dst = out.as_mut_bytes();
        if dst.len() != self.dims.rgba_len() {
            return Err(Error::DimensionMismatch {
                mode: BufferMode::DirectRgba,
                expected: self.dims.rgba_len(),
                actual: dst.len(),
            });
        }

        let start = Instant::now();
        match raw.mode {
            BufferMode::DirectRgba => dst.copy_from_slice(raw.bytes),
            BufferMode::ScalarField => {
                for (px, &sample) in dst.chunks_exact_mut(RGBA_BYTES).zip(raw.bytes) {
                    px.copy_from_slice(&self.lut.rgba(sample));
                }
            }
        }
        debug!(
            mode = ?raw.mode,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "composited frame"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;

    fn dims(w: usize, h: usize) -> Dimensions {
        Dimensions::new(w, h).unwrap()
    }

    #[test]
    fn direct_rgba_is_a_byte_copy() {
        let c = FrameCompositor::new(dims(2, 2), Palette::default());
        let raw: Vec<u8> = (0..16).collect();
        let out = c.composite(RawBuffer::new(BufferMode::DirectRgba, &raw)).unwrap();
        assert_eq!(out.as_bytes(), raw.as_slice());
    }

    #[test]
    fn scalar_field_writes_mapped_colour_and_opaque_alpha() {
        let palette = Palette::default();
        let c = FrameCompositor::new(dims(3, 1), palette);
        let raw = [0u8, 128, 255];
        let out = c.composite(RawBuffer::new(BufferMode::ScalarField, &raw)).unwrap();
        for (i, &s) in raw.iter().enumerate() {
            let want = color::map_with(s, &palette).to_rgba();
            assert_eq!(out.pixel(i, 0), Some(want));
            assert_eq!(want[3], 255);
        }
    }

    #[test]
    fn scalar_length_mismatch_is_rejected() {
        let c = FrameCompositor::new(dims(4, 4), Palette::default());
        let raw = vec![0u8; 15];
        let err = c.composite(RawBuffer::new(BufferMode::ScalarField, &raw)).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch { mode: BufferMode::ScalarField, expected: 16, actual: 15 }
        ));
    }

    #[test]
    fn rgba_length_mismatch_is_rejected() {
        let c = FrameCompositor::new(dims(4, 4), Palette::default());
        // A scalar-sized buffer handed over as RGBA.
        let raw = vec![0u8; 16];
        let err = c.composite(RawBuffer::new(BufferMode::DirectRgba, &raw)).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 64, actual: 16, .. }));
    }

    #[test]
    fn mismatch_leaves_output_untouched() {
        let c = FrameCompositor::new(dims(2, 1), Palette::default());
        let mut out = PixelBuffer::new(dims(2, 1));
        out.as_mut_bytes().fill(7);
        let raw = [1u8; 3];
        assert!(c.composite_into(RawBuffer::new(BufferMode::ScalarField, &raw), &mut out).is_err());
        assert!(out.as_bytes().iter().all(|&b| b == 7));
    }

    #[test]
    fn output_buffer_of_wrong_size_is_rejected() {
        let c = FrameCompositor::new(dims(2, 2), Palette::default());
        let mut out = PixelBuffer::new(dims(1, 1));
        let raw = [0u8; 4];
        let err = c
            .composite_into(RawBuffer::new(BufferMode::ScalarField, &raw), &mut out)
            .unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 16, actual: 4, .. }));
    }
}
