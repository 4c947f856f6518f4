// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the composited field.
// 2) A crosshair marking the viewport centre (the point the engine zooms around).
// 3) A tiny 5x7 bitmap font for the status line on top of the field.

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::error::Error;
use crate::types::{Dimensions, FrameBuffer, PixelBuffer};
use crate::viewport::{Command, Surface};

const HUD_COLOR: u32 = 0x00_FF_FF_FF;
const CROSSHAIR_COLOR: u32 = 0x00_FF_CC_33;

pub struct Drawer {
    window: Window,      // the on-screen window you see
    title: String,
    base: FrameBuffer,   // last presented frame, without overlay
    screen: FrameBuffer, // base + overlay; what actually gets pushed
    status: String,
    show_hud: bool,
    cell_size: usize,    // window pixels per field cell, each way
}

impl Drawer {
    /// Window sized to `grid` cells of `cell_size` pixels each.
    /// Visual: a new black window appears with your chosen title.
    pub fn new(title: &str, grid: Dimensions, cell_size: usize, show_hud: bool) -> Result<Self, Error> {
        let dims = Dimensions::new(grid.width * cell_size, grid.height * cell_size)?;
        let mut window = Window::new(title, dims.width, dims.height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        // Input is polled once per update; 60 polls a second is plenty for key presses.
        window.set_target_fps(60);
        Ok(Self {
            window,
            title: title.to_string(),
            base: FrameBuffer::new(dims),
            screen: FrameBuffer::new(dims),
            status: String::new(),
            show_hud,
            cell_size,
        })
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// P writes the current frame to disk.
    pub fn snapshot_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::P, KeyRepeat::No)
    }

    /// Navigation commands for keys pressed since the last update (held keys repeat).
    pub fn commands(&self) -> Vec<Command> {
        self.window
            .get_keys_pressed(KeyRepeat::Yes)
            .into_iter()
            .filter_map(command_for_key)
            .collect()
    }

    /// Push base + overlay to the window. Also pumps window events, so call it every loop.
    pub fn refresh(&mut self) -> Result<(), Error> {
        self.screen.pixels.copy_from_slice(&self.base.pixels);
        if self.show_hud {
            draw_overlay(&mut self.screen, &self.status);
        }
        self.window
            .update_with_buffer(&self.screen.pixels, self.screen.width, self.screen.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }
}

impl Surface for Drawer {
    /// Visual: the window immediately shows the new field, one block per cell.
    fn present(&mut self, frame: &PixelBuffer) -> Result<(), Error> {
        self.base.copy_from(frame, self.cell_size)?;
        self.refresh()
    }

    fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.window.set_title(&format!("{} | {}", self.title, status));
    }
}

/// Key -> navigation command. Everything else is not navigation.
pub fn command_for_key(key: Key) -> Option<Command> {
    match key {
        Key::Left => Some(Command::PanLeft),
        Key::Right => Some(Command::PanRight),
        Key::Up => Some(Command::PanUp),
        Key::Down => Some(Command::PanDown),
        Key::Equal | Key::NumPadPlus | Key::PageUp => Some(Command::ZoomIn),
        Key::Minus | Key::NumPadMinus | Key::PageDown => Some(Command::ZoomOut),
        _ => None,
    }
}

/// Crosshair at the centre plus the status line in the top-left corner.
pub fn draw_overlay(fb: &mut FrameBuffer, status: &str) {
    let (cx, cy) = ((fb.width / 2) as i32, (fb.height / 2) as i32);
    draw_crosshair(fb, cx, cy, 8, CROSSHAIR_COLOR);
    draw_text_5x7(fb, 8, 8, status, HUD_COLOR);
}

/* ---------- Software drawing: pixels, crosshair, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

// Axis-aligned only; the crosshair never needs diagonals.
fn draw_hline(fb: &mut FrameBuffer, x0: i32, x1: i32, y: i32, color: u32) {
    for x in x0..=x1 {
        put_pixel(fb, x, y, color);
    }
}

fn draw_vline(fb: &mut FrameBuffer, x: i32, y0: i32, y1: i32, color: u32) {
    for y in y0..=y1 {
        put_pixel(fb, x, y, color);
    }
}

/// Visual: a "+" with a small gap at the centre so the centre pixel stays visible.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_hline(fb, cx - size, cx - 2, cy, color);
    draw_hline(fb, cx + 2, cx + size, cy, color);
    draw_vline(fb, cx, cy - size, cy - 2, color);
    draw_vline(fb, cx, cy + 2, cy + size, color);
}

/* ---------- 5x7 bitmap font (what the status line needs) ---------- */

/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // X Y ZOOM
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),

        _ => None,
    }
}

/// Visual: a tiny glyph with a 1-pixel black shadow so it reads on any hue.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    let Some(rows) = glyph5x7(ch) else { return };
    for (shift, c) in [(1, 0x00_00_00_00), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx + shift, y + ry as i32 + shift, c);
                }
            }
        }
    }
}

/// Each glyph is 5x7 with 1-pixel spacing. Unknown characters leave a gap.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(w: usize, h: usize) -> FrameBuffer {
        FrameBuffer::new(Dimensions::new(w, h).unwrap())
    }

    #[test]
    fn arrows_and_zoom_keys_map_to_commands() {
        assert_eq!(command_for_key(Key::Left), Some(Command::PanLeft));
        assert_eq!(command_for_key(Key::Right), Some(Command::PanRight));
        assert_eq!(command_for_key(Key::Up), Some(Command::PanUp));
        assert_eq!(command_for_key(Key::Down), Some(Command::PanDown));
        assert_eq!(command_for_key(Key::NumPadPlus), Some(Command::ZoomIn));
        assert_eq!(command_for_key(Key::PageDown), Some(Command::ZoomOut));
        assert_eq!(command_for_key(Key::P), None);
    }

    #[test]
    fn status_characters_all_have_glyphs() {
        for ch in "X: -0.45  Y: 0  ZOOM: 1.1".chars().chain('0'..='9') {
            assert!(glyph5x7(ch).is_some(), "missing glyph for {ch:?}");
        }
    }

    #[test]
    fn text_paints_foreground_pixels() {
        let mut fb = blank(16, 10);
        draw_text_5x7(&mut fb, 0, 0, "1", HUD_COLOR);
        // Top row of '1' has its single pixel at column 2.
        assert_eq!(fb.pixels[2], HUD_COLOR);
        assert_eq!(fb.pixels[0], 0);
    }

    #[test]
    fn crosshair_leaves_centre_gap_and_clips_at_edges() {
        let mut fb = blank(9, 9);
        draw_crosshair(&mut fb, 4, 4, 8, CROSSHAIR_COLOR);
        assert_eq!(fb.pixels[4 * 9 + 4], 0);
        assert_eq!(fb.pixels[4 * 9], CROSSHAIR_COLOR);
        assert_eq!(fb.pixels[4], CROSSHAIR_COLOR);
    }
}
