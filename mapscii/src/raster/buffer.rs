//! Character-cell framebuffer.

use super::ascii::ascii_table;
use super::BRAILLE_MAP;
use std::collections::HashMap;
use std::num::NonZeroU8;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Row delimiter of [`RasterBuffer::frame`].
pub const DELIMITER: &str = "\n";

/// SGR sequence restoring the default colors.
pub const TERM_RESET: &str = "\x1b[39;49m";

/// First braille pattern code point (no dots raised).
const BRAILLE_BASE: u32 = 0x2800;

/// A `width × height` pixel canvas packed into 2×4-pixel character cells.
///
/// Each cell keeps a dot mask, a foreground and a background color; text
/// glyphs written with [`set_char`](Self::set_char) overlay the dots.
/// Writes outside the canvas are ignored. Color `0` means "no color".
///
/// # Example
///
/// ```
/// use mapscii::raster::RasterBuffer;
///
/// let mut buffer = RasterBuffer::new(4, 4);
/// buffer.set_pixel(0, 0, 1);
/// buffer.set_pixel(3, 3, 1);
///
/// let frame = buffer.frame();
/// assert!(frame.starts_with("\x1b[49;38;5;1m\u{2801}\u{2880}"));
/// ```
#[derive(Debug, Clone)]
pub struct RasterBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    foreground: Vec<Option<NonZeroU8>>,
    background: Vec<Option<NonZeroU8>>,
    chars: HashMap<usize, String>,
    global_background: Option<NonZeroU8>,
    use_braille: bool,
}

impl RasterBuffer {
    /// Create a canvas. The size is rounded down to whole cells
    /// (width to a multiple of 2, height to a multiple of 4).
    pub fn new(width: usize, height: usize) -> Self {
        let width = width & !1;
        let height = height & !3;
        let cells = (width / 2) * (height / 4);

        Self {
            width,
            height,
            pixels: vec![0; cells],
            foreground: vec![None; cells],
            background: vec![None; cells],
            chars: HashMap::new(),
            global_background: None,
            use_braille: true,
        }
    }

    /// Effective width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Effective height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Width in character cells.
    pub fn columns(&self) -> usize {
        self.width / 2
    }

    /// Height in character cells.
    pub fn rows(&self) -> usize {
        self.height / 4
    }

    /// Switch between braille and block-character output.
    pub fn set_braille(&mut self, use_braille: bool) {
        self.use_braille = use_braille;
    }

    pub fn use_braille(&self) -> bool {
        self.use_braille
    }

    /// Cell index of pixel `(x, y)`, or `None` off-canvas.
    #[inline]
    fn locate(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((x >> 1) + (self.width >> 1) * (y >> 2))
    }

    /// Cell index of cell `(cx, cy)`, or `None` off-canvas.
    #[inline]
    fn cell(&self, cx: i32, cy: i32) -> Option<usize> {
        let (cx, cy) = (usize::try_from(cx).ok()?, usize::try_from(cy).ok()?);
        if cx >= self.columns() || cy >= self.rows() {
            return None;
        }
        Some(cx + self.columns() * cy)
    }

    /// Raise the dot at pixel `(x, y)` and color its cell.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u8) {
        if let Some(idx) = self.locate(x, y) {
            self.pixels[idx] |= BRAILLE_MAP[(y & 3) as usize][(x & 1) as usize];
            self.foreground[idx] = NonZeroU8::new(color);
        }
    }

    /// Lower the dot at pixel `(x, y)`.
    pub fn unset_pixel(&mut self, x: i32, y: i32) {
        if let Some(idx) = self.locate(x, y) {
            self.pixels[idx] &= !BRAILLE_MAP[(y & 3) as usize][(x & 1) as usize];
        }
    }

    /// Set the background color of the cell containing pixel `(x, y)`.
    pub fn set_background(&mut self, x: i32, y: i32, color: u8) {
        if let Some(idx) = self.locate(x, y) {
            self.background[idx] = NonZeroU8::new(color);
        }
    }

    /// Background for cells without their own.
    pub fn set_global_background(&mut self, color: u8) {
        self.global_background = NonZeroU8::new(color);
    }

    /// Place a glyph at cell `(cx, cy)`, overriding the cell's dots.
    ///
    /// Glyphs with no display width are ignored; they would shift the rest
    /// of the row.
    pub fn set_char(&mut self, glyph: &str, cx: i32, cy: i32, color: u8) {
        if glyph.width() == 0 {
            return;
        }
        if let Some(idx) = self.cell(cx, cy) {
            self.chars.insert(idx, glyph.to_string());
            self.foreground[idx] = NonZeroU8::new(color);
        }
    }

    /// Write `text` starting at cell `(cx, cy)`.
    ///
    /// Each character advances by its display width; zero-width characters
    /// are skipped. Centered text starts half its width to the left.
    pub fn write_text(&mut self, text: &str, cx: i32, cy: i32, color: u8, center: bool) {
        let mut x = if center {
            cx - (text.width() / 2) as i32
        } else {
            cx
        };

        let mut glyph = [0u8; 4];
        for c in text.chars() {
            let width = c.width().unwrap_or(0);
            if width == 0 {
                continue;
            }
            self.set_char(c.encode_utf8(&mut glyph), x, cy, color);
            x += width as i32;
        }
    }

    /// Dot mask of cell `(cx, cy)`.
    pub fn cell_mask(&self, cx: i32, cy: i32) -> Option<u8> {
        self.cell(cx, cy).map(|idx| self.pixels[idx])
    }

    /// Reset every cell; the canvas keeps its size and global background.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
        self.foreground.fill(None);
        self.background.fill(None);
        self.chars.clear();
    }

    /// Render the canvas as one string of SGR escapes, glyphs and row
    /// delimiters. Color escapes are only emitted when they change.
    pub fn frame(&self) -> String {
        let columns = self.columns();
        let ascii = ascii_table();
        let mut output = String::with_capacity(self.pixels.len() * 4 + self.rows() * 16);
        let mut current = None;

        for row in 0..self.rows() {
            if row > 0 {
                output.push_str(DELIMITER);
            }

            let mut skip = 0usize;
            for col in 0..columns {
                let idx = row * columns + col;

                let colors = (
                    self.foreground[idx],
                    self.background[idx].or(self.global_background),
                );
                if current != Some(colors) {
                    output.push_str(&color_code(colors.0, colors.1));
                    current = Some(colors);
                }

                if let Some(glyph) = self.chars.get(&idx) {
                    skip += glyph.width().saturating_sub(1);
                    if skip + col < columns {
                        output.push_str(glyph);
                    }
                } else if skip == 0 {
                    let mask = self.pixels[idx];
                    if self.use_braille {
                        output.push(
                            char::from_u32(BRAILLE_BASE + u32::from(mask)).unwrap_or(' '),
                        );
                    } else {
                        output.push(ascii[usize::from(mask)]);
                    }
                } else {
                    skip -= 1;
                }
            }
        }

        output.push_str(TERM_RESET);
        output.push_str(DELIMITER);
        output
    }
}

/// SGR sequence selecting a foreground/background pair.
fn color_code(fg: Option<NonZeroU8>, bg: Option<NonZeroU8>) -> String {
    match (fg, bg) {
        (Some(fg), Some(bg)) => format!("\x1b[38;5;{};48;5;{}m", fg, bg),
        (Some(fg), None) => format!("\x1b[49;38;5;{}m", fg),
        (None, Some(bg)) => format!("\x1b[39;48;5;{}m", bg),
        (None, None) => TERM_RESET.to_string(),
    }
}
