// Replaces per-pixel HSL with a table lookup.
// A sample is one byte, so every colour a palette can produce fits in 256 entries.

use crate::color;
use crate::types::Palette;

pub struct PaletteLut {
    // sample(0..255) -> opaque RGBA bytes
    rgba: [[u8; 4]; 256],
}

impl PaletteLut {
    /// Build the table once per palette.
    pub fn new(palette: Palette) -> Self {
        let mut rgba = [[0u8; 4]; 256];
        for (sample, entry) in rgba.iter_mut().enumerate() {
            *entry = color::map_with(sample as u8, &palette).to_rgba();
        }
        Self { rgba }
    }

    #[inline]
    pub fn rgba(&self, sample: u8) -> [u8; 4] {
        self.rgba[sample as usize]
    }
}

impl Default for PaletteLut {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}
