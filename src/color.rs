// Sample -> colour. The engine's byte becomes a hue; saturation and lightness are fixed.

use crate::types::{Color, Palette};

/// HSL to RGB, the closed-form "alternative" formulation
/// (https://en.wikipedia.org/wiki/HSL_and_HSV#HSL_to_RGB_alternative).
///
/// h: degrees, any value (the formula is periodic in 360), s: 0-1, l: 0-1.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Color {
    // Both sides of the min and the final clamp are required; dropping either
    // shifts the band edges at k = 3 and k = 9.
    let a = s * l.min(1.0 - l);
    let k = |n: f32| (n + h / 30.0) % 12.0;
    let f = |n: f32| {
        let k = k(n);
        l - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0)
    };

    Color::new(f(0.0), f(8.0), f(4.0))
}

/// Hue for a sample: `(sample + offset) mod 360`.
#[inline]
pub fn hue(sample: u8, offset: i32) -> f32 {
    (sample as i32 + offset).rem_euclid(360) as f32
}

/// Colour for one engine sample. Pure; no error cases.
#[inline]
pub fn map(sample: u8, saturation: f32, lightness: f32, offset: i32) -> Color {
    hsl_to_rgb(hue(sample, offset), saturation, lightness)
}

/// `map` with the tuning constants bundled in a `Palette`.
#[inline]
pub fn map_with(sample: u8, palette: &Palette) -> Color {
    map(sample, palette.saturation, palette.lightness, palette.offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
        (a - b).abs() <= epsilon
    }

    fn assert_rgb(c: Color, r: f32, g: f32, b: f32) {
        assert!(
            approx_eq(c.r, r, 1e-6) && approx_eq(c.g, g, 1e-6) && approx_eq(c.b, b, 1e-6),
            "expected ({r}, {g}, {b}), got {c:?}"
        );
    }

    #[test]
    fn hue_30_full_saturation_is_orange() {
        assert_rgb(map(0, 1.0, 0.5, 30), 1.0, 0.5, 0.0);
    }

    #[test]
    fn hue_30_default_palette_is_muted_orange() {
        // s = 0.9 pulls every channel 10% of the way back towards l.
        assert_rgb(map(0, 0.9, 0.5, 30), 0.95, 0.5, 0.05);
    }

    #[test]
    fn primaries_land_on_their_hues() {
        assert_rgb(hsl_to_rgb(0.0, 1.0, 0.5), 1.0, 0.0, 0.0);
        assert_rgb(hsl_to_rgb(120.0, 1.0, 0.5), 0.0, 1.0, 0.0);
        assert_rgb(hsl_to_rgb(240.0, 1.0, 0.5), 0.0, 0.0, 1.0);
    }

    #[test]
    fn zero_saturation_is_exactly_grey() {
        for sample in [0u8, 17, 90, 200, 255] {
            for l in [0.0f32, 0.25, 0.5, 0.8, 1.0] {
                let c = map(sample, 0.0, l, 30);
                assert_eq!((c.r, c.g, c.b), (l, l, l));
            }
        }
    }

    #[test]
    fn hue_wraps_at_360() {
        assert_eq!(hue(250, 130), 20.0);
        assert_eq!(hue(0, -30), 330.0);
        assert_eq!(map(250, 0.9, 0.5, 130), map(0, 0.9, 0.5, 20));
    }

    #[test]
    fn offset_and_sample_are_interchangeable() {
        assert_eq!(map(30, 0.9, 0.5, 0), map_with(0, &Palette::default()));
    }
}
